//! RGB load indicator.
//!
//! Three PWM channels drive discrete R/G/B LEDs.  The PWM period is set
//! once on power-up; afterwards only duties are written.

use crate::app::ports::{HardwareIo, PwmOutput};
use crate::error::ActuatorError;

const CHANNELS: [PwmOutput; 3] = [PwmOutput::RgbRed, PwmOutput::RgbGreen, PwmOutput::RgbBlue];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusLed;

impl StatusLed {
    pub fn new() -> Self {
        Self
    }

    /// Program the PWM period on all three channels.
    pub fn init<H: HardwareIo>(&mut self, hw: &mut H, freq_hz: f32) -> Result<(), ActuatorError> {
        let period = 1.0 / freq_hz;
        for ch in CHANNELS {
            hw.set_pwm_period(ch, period)?;
        }
        Ok(())
    }

    pub fn set_colour<H: HardwareIo>(
        &mut self,
        hw: &mut H,
        (r, g, b): (f32, f32, f32),
    ) -> Result<(), ActuatorError> {
        hw.write_pwm_duty(PwmOutput::RgbRed, r)?;
        hw.write_pwm_duty(PwmOutput::RgbGreen, g)?;
        hw.write_pwm_duty(PwmOutput::RgbBlue, b)
    }

    pub fn off<H: HardwareIo>(&mut self, hw: &mut H) -> Result<(), ActuatorError> {
        self.set_colour(hw, (0.0, 0.0, 0.0))
    }
}
