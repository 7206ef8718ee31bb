//! Single-digit 7-segment display.
//!
//! Segments a–g sit on seven GPIOs, bit 0 = a … bit 6 = g, active high.
//! The controller only ever shows one hex digit (`value % 10` in practice)
//! and blanks the display while powered off.

use embedded_hal::digital::{OutputPin, PinState};

use crate::app::ports::HardwareIo;
use crate::error::ActuatorError;

/// Standard hex digit patterns 0–F.
pub const HEX_DIGITS: [u8; 16] = [
    0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F, 0x77, 0x7C, 0x39, 0x5E, 0x79, 0x71,
];

pub const BLANK: u8 = 0x00;

/// Pattern for `value` (last decimal digit), or blank when unpowered.
pub fn pattern_for(value: u32, powered: bool) -> u8 {
    if powered {
        HEX_DIGITS[(value % 10) as usize]
    } else {
        BLANK
    }
}

/// Write the digit for `value`; blank when `None` or unpowered.
pub fn show<H: HardwareIo>(
    hw: &mut H,
    value: Option<u32>,
    powered: bool,
) -> Result<(), ActuatorError> {
    let pattern = value.map_or(BLANK, |v| pattern_for(v, powered));
    hw.write_segment_pattern(pattern)
}

/// Seven segment lines driven through embedded-hal output pins.
pub struct SegmentBus<P> {
    pins: [P; 7],
}

impl<P: OutputPin> SegmentBus<P> {
    /// `pins[0]` is segment a, `pins[6]` is segment g.
    pub fn new(pins: [P; 7]) -> Self {
        Self { pins }
    }

    /// Drive every segment line from `pattern`.
    pub fn write(&mut self, pattern: u8) -> Result<(), P::Error> {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            pin.set_state(PinState::from(pattern & (1 << bit) != 0))?;
        }
        Ok(())
    }
}
