//! Simulated washer board.
//!
//! [`SimBoard`] implements [`HardwareIo`] entirely in memory: analog
//! inputs are settable, buttons can be tapped, and every output is
//! recorded so the host binary can print a status line.  A tap holds the
//! button low for exactly one read, which is one poll.
//!
//! [`SimCommand`] parses the host front-panel commands typed on stdin.

use std::collections::VecDeque;
use std::fmt;

use crate::app::ports::{AnalogInput, DigitalInput, DigitalOutput, HardwareIo, PwmOutput};
use crate::drivers::segment_display::HEX_DIGITS;
use crate::error::{ActuatorError, SensorError};

/// In-memory board.
#[derive(Debug, Clone)]
pub struct SimBoard {
    analog: [f32; 6],
    pending_power: VecDeque<bool>,
    pending_start: VecDeque<bool>,
    rgb: [f32; 3],
    buzzer_duty: f32,
    buzzer_freq_hz: f32,
    door_led: bool,
    segments: u8,
    beeps: u32,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

fn analog_index(input: AnalogInput) -> usize {
    match input {
        AnalogInput::RpmPot => 0,
        AnalogInput::TempPot => 1,
        AnalogInput::TimePot => 2,
        AnalogInput::Load => 3,
        AnalogInput::Temperature => 4,
        AnalogInput::Light => 5,
    }
}

impl SimBoard {
    /// Door shut, empty drum, room temperature, pots mid-travel.
    pub fn new() -> Self {
        let mut board = Self {
            analog: [0.0; 6],
            pending_power: VecDeque::new(),
            pending_start: VecDeque::new(),
            rgb: [0.0; 3],
            buzzer_duty: 0.0,
            buzzer_freq_hz: 0.0,
            door_led: false,
            segments: 0,
            beeps: 0,
        };
        board.set_analog(AnalogInput::RpmPot, 0.5);
        board.set_analog(AnalogInput::TempPot, 0.5);
        board.set_analog(AnalogInput::TimePot, 0.25);
        board.set_analog(AnalogInput::Load, 0.1);
        // 0.13 * 330 * 0.5 ≈ 21 °C
        board.set_analog(AnalogInput::Temperature, 0.13);
        board.set_analog(AnalogInput::Light, 0.1);
        board
    }

    pub fn set_analog(&mut self, input: AnalogInput, value: f32) {
        self.analog[analog_index(input)] = value;
    }

    pub fn analog(&self, input: AnalogInput) -> f32 {
        self.analog[analog_index(input)]
    }

    /// Press and release `button`: low on the next read, high after.
    pub fn tap(&mut self, button: DigitalInput) {
        let queue = match button {
            DigitalInput::PowerButton => &mut self.pending_power,
            DigitalInput::StartButton => &mut self.pending_start,
        };
        queue.push_back(false);
        queue.push_back(true);
    }

    /// Digit currently shown, if the pattern is a known one.
    pub fn displayed_digit(&self) -> Option<u8> {
        HEX_DIGITS
            .iter()
            .position(|&p| p == self.segments && p != 0)
            .map(|d| d as u8)
    }

    /// Beeps started since construction.
    pub fn beeps(&self) -> u32 {
        self.beeps
    }
}

impl fmt::Display for SimBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digit = self
            .displayed_digit()
            .map_or_else(|| String::from("-"), |d| d.to_string());
        write!(
            f,
            "display={} door_led={} rgb=({:.1},{:.1},{:.1}) beeps={} | rpm={:.2} temp={:.2} time={:.2} load={:.2} temp_sensor={:.2} light={:.2}",
            digit,
            if self.door_led { "ON" } else { "off" },
            self.rgb[0],
            self.rgb[1],
            self.rgb[2],
            self.beeps,
            self.analog[0],
            self.analog[1],
            self.analog[2],
            self.analog[3],
            self.analog[4],
            self.analog[5],
        )
    }
}

impl HardwareIo for SimBoard {
    fn read_analog(&mut self, input: AnalogInput) -> Result<f32, SensorError> {
        Ok(self.analog(input))
    }

    fn read_digital(&mut self, input: DigitalInput) -> Result<bool, SensorError> {
        let queue = match input {
            DigitalInput::PowerButton => &mut self.pending_power,
            DigitalInput::StartButton => &mut self.pending_start,
        };
        Ok(queue.pop_front().unwrap_or(true))
    }

    fn write_pwm_duty(&mut self, output: PwmOutput, duty: f32) -> Result<(), ActuatorError> {
        match output {
            PwmOutput::Buzzer => {
                if duty > 0.0 && self.buzzer_duty == 0.0 {
                    self.beeps += 1;
                    log::debug!("sim buzzer: {:.0} Hz", self.buzzer_freq_hz);
                }
                self.buzzer_duty = duty;
            }
            PwmOutput::RgbRed => self.rgb[0] = duty,
            PwmOutput::RgbGreen => self.rgb[1] = duty,
            PwmOutput::RgbBlue => self.rgb[2] = duty,
        }
        Ok(())
    }

    fn set_pwm_period(&mut self, output: PwmOutput, period_secs: f32) -> Result<(), ActuatorError> {
        if output == PwmOutput::Buzzer && period_secs > 0.0 {
            self.buzzer_freq_hz = 1.0 / period_secs;
        }
        Ok(())
    }

    fn write_digital(&mut self, output: DigitalOutput, high: bool) -> Result<(), ActuatorError> {
        match output {
            DigitalOutput::DoorLed => self.door_led = high,
        }
        Ok(())
    }

    fn write_segment_pattern(&mut self, pattern: u8) -> Result<(), ActuatorError> {
        self.segments = pattern;
        Ok(())
    }
}

// ── Front-panel commands ──────────────────────────────────────

/// One line typed at the simulated front panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimCommand {
    Tap(DigitalInput),
    Set(AnalogInput, f32),
    ShowConfig,
    ShowStatus,
    Help,
}

pub const SIM_HELP: &str = "commands: power | start | set <rpm|temp|time|load|heat|light> <0..1> | config | status | help";

impl SimCommand {
    pub fn parse(line: &str) -> Result<Self, &'static str> {
        let mut words = line.split_whitespace();
        let cmd = words.next().ok_or("empty command")?;
        match cmd {
            "power" | "p" => Ok(Self::Tap(DigitalInput::PowerButton)),
            "start" | "s" => Ok(Self::Tap(DigitalInput::StartButton)),
            "config" => Ok(Self::ShowConfig),
            "status" => Ok(Self::ShowStatus),
            "help" | "?" => Ok(Self::Help),
            "set" => {
                let input = match words.next().ok_or("set: missing input name")? {
                    "rpm" => AnalogInput::RpmPot,
                    "temp" => AnalogInput::TempPot,
                    "time" => AnalogInput::TimePot,
                    "load" => AnalogInput::Load,
                    "heat" => AnalogInput::Temperature,
                    "light" => AnalogInput::Light,
                    _ => return Err("set: unknown input"),
                };
                let value: f32 = words
                    .next()
                    .ok_or("set: missing value")?
                    .parse()
                    .map_err(|_| "set: value is not a number")?;
                if !value.is_finite() {
                    return Err("set: value must be finite");
                }
                Ok(Self::Set(input, value))
            }
            _ => Err("unknown command"),
        }
    }

    /// Apply a board-level command.  Returns `false` for commands the
    /// caller must handle itself (config/status/help).
    pub fn apply(self, board: &mut SimBoard) -> bool {
        match self {
            Self::Tap(button) => board.tap(button),
            Self::Set(input, value) => board.set_analog(input, value),
            Self::ShowConfig | Self::ShowStatus | Self::Help => return false,
        }
        true
    }
}
