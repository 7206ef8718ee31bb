//! Monotonic clock adapter.
//!
//! Implements the [`Clock`] port for the control loop.
//!
//! - **`target_os = "espidf"`** — reads `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side simulation.
//!
//! Sleeping goes through `std::thread::sleep` on both targets; on
//! ESP-IDF that yields to FreeRTOS.

use std::time::Duration;

use crate::app::ports::Clock;

/// Wall-clock backed [`Clock`].
pub struct SystemClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time is a read of the always-running RTC timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since construction (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.uptime_us() / 1_000
    }

    fn sleep_ms(&mut self, ms: u32) {
        if ms > 0 {
            std::thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}
