//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ WasherService (domain)
//! ```
//!
//! Driven adapters (real board, simulated board, clocks, event sinks)
//! implement these traits.  The [`WasherService`](super::service::WasherService)
//! consumes them via generics, so the domain core never touches hardware
//! or wall-clock time directly.

use crate::error::{ActuatorError, SensorError};

// ───────────────────────────────────────────────────────────────
// Channel identities
// ───────────────────────────────────────────────────────────────

/// Analog inputs, each normalized to 0.0–1.0 by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogInput {
    /// Spin speed potentiometer.
    RpmPot,
    /// Wash temperature potentiometer.
    TempPot,
    /// Wash time potentiometer.
    TimePot,
    /// Force-sensitive resistor under the drum.
    Load,
    /// Drum temperature sensor.
    Temperature,
    /// Light-dependent resistor behind the door glass.
    Light,
}

impl AnalogInput {
    pub const ALL: [Self; 6] = [
        Self::RpmPot,
        Self::TempPot,
        Self::TimePot,
        Self::Load,
        Self::Temperature,
        Self::Light,
    ];
}

/// Digital inputs.  Buttons are wired active-low with pull-ups, so
/// `true` (high) means released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigitalInput {
    PowerButton,
    StartButton,
}

/// PWM outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PwmOutput {
    Buzzer,
    RgbRed,
    RgbGreen,
    RgbBlue,
}

/// Plain digital outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigitalOutput {
    /// Red "door open" indicator.
    DoorLed,
}

// ───────────────────────────────────────────────────────────────
// Hardware port (driven adapter: hardware ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Capability interface over every peripheral the controller uses.
///
/// Implemented by the real board adapter, the simulated board and the
/// test doubles.  Reads are fallible at the I/O boundary; the service
/// decides whether a failure is recoverable.
pub trait HardwareIo {
    /// Read an analog channel, normalized to 0.0–1.0.
    fn read_analog(&mut self, input: AnalogInput) -> Result<f32, SensorError>;

    /// Read a digital level (`true` = high).
    fn read_digital(&mut self, input: DigitalInput) -> Result<bool, SensorError>;

    /// Set a PWM duty cycle (0.0–1.0).
    fn write_pwm_duty(&mut self, output: PwmOutput, duty: f32) -> Result<(), ActuatorError>;

    /// Set a PWM period in seconds.
    fn set_pwm_period(&mut self, output: PwmOutput, period_secs: f32) -> Result<(), ActuatorError>;

    /// Drive a digital output.
    fn write_digital(&mut self, output: DigitalOutput, high: bool) -> Result<(), ActuatorError>;

    /// Latch a raw segment bitmask (bit 0 = segment a … bit 6 = segment g).
    fn write_segment_pattern(&mut self, pattern: u8) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port (injectable time)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source plus blocking delay.
///
/// Every wait in the controller (sample spacing, beep hold, loop cadence)
/// goes through this trait so tests can run cycles without real time.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;

    /// Block for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`WasherEvent`](super::events::WasherEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::WasherEvent);
}
