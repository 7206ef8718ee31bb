//! Piezo buzzer on a PWM channel.
//!
//! A beep is three writes: period `1/freq`, duty 0.5, hold, duty 0.
//! No envelope.  An optional silent pause follows so tones can be chained.

use crate::app::ports::{Clock, HardwareIo, PwmOutput};
use crate::error::ActuatorError;

/// One beep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub freq_hz: u32,
    pub duration_ms: u32,
    /// Silence after the beep.
    pub pause_ms: u32,
}

impl Tone {
    pub const fn new(freq_hz: u32, duration_ms: u32) -> Self {
        Self {
            freq_hz,
            duration_ms,
            pause_ms: 0,
        }
    }

    pub const fn with_pause(self, pause_ms: u32) -> Self {
        Self { pause_ms, ..self }
    }
}

pub const POWER_TOGGLE: Tone = Tone::new(600, 100);
pub const DOOR_ALERT: Tone = Tone::new(700, 200);
pub const OVERLOAD_WARNING: Tone = Tone::new(500, 100);
pub const START_REJECTED: Tone = Tone::new(300, 500);
pub const CYCLE_START: Tone = Tone::new(700, 100);
pub const ALREADY_RUNNING: Tone = Tone::new(500, 100);
/// Played three times when a cycle completes.
pub const CYCLE_COMPLETE: Tone = Tone::new(1000, 200).with_pause(200);
pub const CYCLE_COMPLETE_REPEATS: usize = 3;

const DUTY_ON: f32 = 0.5;

/// Play `tone`, blocking on `clock` for its duration and pause.
pub fn play<H: HardwareIo, C: Clock>(
    hw: &mut H,
    clock: &mut C,
    tone: Tone,
) -> Result<(), ActuatorError> {
    let period = 1.0 / tone.freq_hz.max(1) as f32;
    hw.set_pwm_period(PwmOutput::Buzzer, period)?;
    hw.write_pwm_duty(PwmOutput::Buzzer, DUTY_ON)?;
    clock.sleep_ms(tone.duration_ms);
    hw.write_pwm_duty(PwmOutput::Buzzer, 0.0)?;
    if tone.pause_ms > 0 {
        clock.sleep_ms(tone.pause_ms);
    }
    Ok(())
}

/// Force the buzzer silent.
pub fn silence<H: HardwareIo>(hw: &mut H) -> Result<(), ActuatorError> {
    hw.write_pwm_duty(PwmOutput::Buzzer, 0.0)
}
