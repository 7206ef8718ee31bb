//! Sensor subsystem: conditioning, load classification and the
//! aggregating [`SensorHub`].
//!
//! The hub reads every analog input through the [`HardwareIo`] port and
//! produces a [`SensorSnapshot`] each powered poll, which gets written
//! into `FsmContext.sensors`.

pub mod conditioner;
pub mod load;

use crate::app::ports::{AnalogInput, Clock, HardwareIo};
use crate::config::WasherConfig;
use crate::error::SensorError;

/// One poll's worth of conditioned readings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Raw potentiometer positions (0.0–1.0), read once.
    pub rpm_pot: f32,
    pub temp_pot: f32,
    pub time_pot: f32,
    /// Averaged normalized drum load.
    pub load: f32,
    /// Averaged light level behind the door glass (percent).
    pub light_pct: f32,
    /// Averaged drum temperature (°C).
    pub temperature_c: f32,
}

impl SensorSnapshot {
    /// Instantaneous door condition for this snapshot.
    pub fn door_open(&self, config: &WasherConfig) -> bool {
        self.light_pct > config.door_open_threshold_pct
    }

    /// Instantaneous overload condition for this snapshot.
    pub fn overloaded(&self, config: &WasherConfig) -> bool {
        self.load > config.overload_threshold
    }

    /// Values in the order the status change gate compares them.
    pub fn as_report_values(&self) -> [f32; 3] {
        [self.load, self.temperature_c, self.light_pct]
    }
}

/// Reads and conditions every analog input.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorHub;

impl SensorHub {
    pub fn new() -> Self {
        Self
    }

    /// Read every sensor and return a unified snapshot.
    ///
    /// Any failing channel fails the whole snapshot; the caller keeps the
    /// previous one.
    pub fn read_all<H: HardwareIo, C: Clock>(
        &mut self,
        hw: &mut H,
        clock: &mut C,
        config: &WasherConfig,
    ) -> Result<SensorSnapshot, SensorError> {
        let rpm_pot = hw.read_analog(AnalogInput::RpmPot)?;
        let temp_pot = hw.read_analog(AnalogInput::TempPot)?;
        let time_pot = hw.read_analog(AnalogInput::TimePot)?;

        let (n, spacing) = (config.samples_per_reading, config.sample_spacing_ms);
        let load = conditioner::average(hw, clock, AnalogInput::Load, 1.0, n, spacing)?;
        let light_pct =
            conditioner::average(hw, clock, AnalogInput::Light, config.light_scale, n, spacing)?;
        let temperature_c = conditioner::average(
            hw,
            clock,
            AnalogInput::Temperature,
            config.temp_sensor_scale,
            n,
            spacing,
        )? * config.temp_calibration;

        Ok(SensorSnapshot {
            rpm_pot,
            temp_pot,
            time_pot,
            load,
            light_pct,
            temperature_c,
        })
    }
}
