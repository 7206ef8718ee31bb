fn main() {
    // Only the ESP-IDF cross build needs the IDF environment exported to rustc.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
