//! Actuator and input drivers, hardware initialisation.

pub mod button;
pub mod buzzer;
pub mod hw_init;
pub mod segment_display;
pub mod status_led;
