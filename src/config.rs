//! System configuration parameters
//!
//! All tunable parameters for the washer controller.  Defaults match the
//! stock front panel; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasherConfig {
    // --- Loop cadence ---
    /// Poll period while the appliance is off (milliseconds)
    pub off_poll_interval_ms: u32,
    /// Poll period while idle or running (milliseconds)
    pub active_poll_interval_ms: u32,

    // --- Sensor conditioning ---
    /// Samples averaged per load/light/temperature reading
    pub samples_per_reading: u8,
    /// Spacing between averaged samples (milliseconds)
    pub sample_spacing_ms: u32,
    /// Light sensor scale (raw 0–1 → percent)
    pub light_scale: f32,
    /// Temperature sensor scale (raw 0–1 → sensor units)
    pub temp_sensor_scale: f32,
    /// Multiplier applied after scaling to get °C
    pub temp_calibration: f32,

    // --- Report gating (log only, never control) ---
    pub load_report_threshold: f32,
    pub light_report_threshold_pct: f32,
    pub temp_report_threshold_c: f32,
    pub rpm_report_threshold: f32,
    pub temp_setting_report_threshold: f32,
    pub time_report_threshold: f32,

    // --- Interlocks ---
    /// Door counts as open above this light level (percent)
    pub door_open_threshold_pct: f32,
    /// Drum counts as overloaded above this normalized load
    pub overload_threshold: f32,
    /// Consecutive opposing samples needed to flip a debounced flag
    pub debounce_count: u8,

    // --- Actuators ---
    /// RGB load indicator PWM frequency (Hz)
    pub led_pwm_frequency_hz: f32,

    // --- Cycle timing ---
    /// Simulated seconds per real second during a wash cycle.
    /// 600 → each 10-minute countdown step lasts one real second.
    pub cycle_time_compression: u32,

    // --- Fault handling ---
    /// Consecutive polls with I/O failures before the loop gives up
    pub max_consecutive_io_failures: u8,
}

impl Default for WasherConfig {
    fn default() -> Self {
        Self {
            // Cadence
            off_poll_interval_ms: 500,
            active_poll_interval_ms: 100,

            // Conditioning
            samples_per_reading: 5,
            sample_spacing_ms: 5,
            light_scale: 100.0,
            temp_sensor_scale: 330.0,
            temp_calibration: 0.5,

            // Report gating
            load_report_threshold: 0.1,
            light_report_threshold_pct: 15.0,
            temp_report_threshold_c: 5.0,
            rpm_report_threshold: 50.0,
            temp_setting_report_threshold: 5.0,
            time_report_threshold: 5.0,

            // Interlocks
            door_open_threshold_pct: 40.0,
            overload_threshold: 0.7,
            debounce_count: 3,

            // Actuators
            led_pwm_frequency_hz: 100.0,

            // Cycle
            cycle_time_compression: 600,

            // Faults
            max_consecutive_io_failures: 10,
        }
    }
}

impl WasherConfig {
    /// Check every field against its valid domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.off_poll_interval_ms == 0 || self.active_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll intervals must be non-zero"));
        }
        if self.samples_per_reading == 0 {
            return Err(ConfigError::Invalid("samples_per_reading must be at least 1"));
        }
        if self.debounce_count == 0 {
            return Err(ConfigError::Invalid("debounce_count must be at least 1"));
        }
        if self.max_consecutive_io_failures == 0 {
            return Err(ConfigError::Invalid("max_consecutive_io_failures must be at least 1"));
        }
        if self.cycle_time_compression == 0 {
            return Err(ConfigError::Invalid("cycle_time_compression must be non-zero"));
        }

        let scales = [self.light_scale, self.temp_sensor_scale, self.temp_calibration];
        if scales.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ConfigError::Invalid("sensor scales must be finite and positive"));
        }

        let thresholds = [
            self.load_report_threshold,
            self.light_report_threshold_pct,
            self.temp_report_threshold_c,
            self.rpm_report_threshold,
            self.temp_setting_report_threshold,
            self.time_report_threshold,
            self.overload_threshold,
        ];
        if thresholds.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(ConfigError::Invalid("thresholds must be finite and non-negative"));
        }

        if !(self.door_open_threshold_pct > 0.0 && self.door_open_threshold_pct < 100.0) {
            return Err(ConfigError::Invalid("door_open_threshold_pct must be within (0, 100)"));
        }
        if !self.led_pwm_frequency_hz.is_finite() || self.led_pwm_frequency_hz <= 0.0 {
            return Err(ConfigError::Invalid("led_pwm_frequency_hz must be positive"));
        }
        Ok(())
    }

    /// Real milliseconds one 10-minute countdown step lasts.
    pub fn cycle_step_interval_ms(&self) -> u64 {
        const STEP_SIM_MS: u64 = 10 * 60 * 1000;
        (STEP_SIM_MS / u64::from(self.cycle_time_compression.max(1))).max(1)
    }
}
