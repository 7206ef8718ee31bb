//! Front-panel push buttons with single-shot press detection.
//!
//! ## Hardware
//!
//! Active-low momentary switches with pull-ups: a high level means
//! released, low means pressed.  Buttons are sampled once per poll; there
//! is no ISR.
//!
//! ## Edge detection
//!
//! A press fires when the level is low *and* the previous sample was
//! high.  The latch starts in the pressed position, so a button held down
//! at power-up (or held across polls) does not fire until it has been
//! seen released.  Holding for any number of polls yields one event.

use crate::app::commands::{PanelCommand, PanelInput};
use crate::app::ports::{DigitalInput, HardwareIo};
use crate::error::SensorError;

/// Edge detector for one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonLatch {
    last_level: bool,
}

impl Default for ButtonLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonLatch {
    pub fn new() -> Self {
        Self { last_level: false }
    }

    /// Feed the current level (`true` = high/released).  Returns `true`
    /// exactly once per released→pressed transition.
    pub fn detect_press(&mut self, level: bool) -> bool {
        let fired = !level && self.last_level;
        self.last_level = level;
        fired
    }
}

/// Both panel buttons, read through the hardware port.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelButtons {
    power: ButtonLatch,
    start: ButtonLatch,
}

impl PanelButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample both buttons and collect the commands they produced.
    ///
    /// Both are read even if the first read fails, so neither latch falls
    /// behind; the first error is returned.
    pub fn poll<H: HardwareIo>(&mut self, hw: &mut H) -> Result<PanelInput, SensorError> {
        let mut input = PanelInput::default();
        let mut first_err = None;

        for (button, latch) in [
            (DigitalInput::PowerButton, &mut self.power),
            (DigitalInput::StartButton, &mut self.start),
        ] {
            match hw.read_digital(button) {
                Ok(level) => {
                    if latch.detect_press(level) {
                        input.record(PanelCommand::for_button(button));
                    }
                }
                Err(e) if first_err.is_none() => first_err = Some(e),
                Err(_) => {}
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(input),
        }
    }
}
