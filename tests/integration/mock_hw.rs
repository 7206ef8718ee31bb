//! Mock adapters for integration tests.
//!
//! `MockHardware` scripts every input and records every output so tests
//! can assert on what the panel would have shown and sounded.
//! `ManualClock` only moves when something sleeps, so a whole wash cycle
//! runs in microseconds.

use std::collections::VecDeque;

use washer::app::events::WasherEvent;
use washer::app::ports::{
    AnalogInput, Clock, DigitalInput, DigitalOutput, EventSink, HardwareIo, PwmOutput,
};
use washer::app::service::{PollReport, WasherService};
use washer::config::WasherConfig;
use washer::error::{ActuatorError, Error, SensorError};
use washer::fsm::StateId;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    analog: [f32; 6],
    /// Resting level of each button (`true` = released).
    held: [bool; 2],
    /// One-shot levels consumed before the resting level.
    scripted: [VecDeque<bool>; 2],
    pub fail_analog: bool,
    pub fail_writes: bool,
    /// Number of upcoming buzzer-off writes that fail.
    pub stuck_buzzer_offs: u32,
    /// Frequency of every beep started, in order.
    pub beeps: Vec<u32>,
    /// Every segment pattern written, in order.
    pub segments: Vec<u8>,
    pub rgb: [f32; 3],
    pub door_led: bool,
    pub buzzer_duty: f32,
    buzzer_freq_hz: u32,
}

fn analog_slot(input: AnalogInput) -> usize {
    match input {
        AnalogInput::RpmPot => 0,
        AnalogInput::TempPot => 1,
        AnalogInput::TimePot => 2,
        AnalogInput::Load => 3,
        AnalogInput::Temperature => 4,
        AnalogInput::Light => 5,
    }
}

fn button_slot(input: DigitalInput) -> usize {
    match input {
        DigitalInput::PowerButton => 0,
        DigitalInput::StartButton => 1,
    }
}

#[allow(dead_code)]
impl MockHardware {
    /// Door shut, light load, 30-minute wash selected.
    pub fn new() -> Self {
        let mut hw = Self {
            analog: [0.0; 6],
            held: [true; 2],
            scripted: [VecDeque::new(), VecDeque::new()],
            fail_analog: false,
            fail_writes: false,
            stuck_buzzer_offs: 0,
            beeps: Vec::new(),
            segments: Vec::new(),
            rgb: [0.0; 3],
            door_led: false,
            buzzer_duty: 0.0,
            buzzer_freq_hz: 0,
        };
        hw.set(AnalogInput::RpmPot, 0.5);
        hw.set(AnalogInput::TempPot, 0.5);
        hw.set(AnalogInput::TimePot, 0.25);
        hw.set(AnalogInput::Load, 0.1);
        hw.set(AnalogInput::Temperature, 0.13);
        hw.set(AnalogInput::Light, 0.1);
        hw
    }

    pub fn set(&mut self, input: AnalogInput, value: f32) {
        self.analog[analog_slot(input)] = value;
    }

    /// Low for exactly one read.
    pub fn tap(&mut self, button: DigitalInput) {
        self.scripted[button_slot(button)].push_back(false);
    }

    /// Change the resting level (`false` = held down).
    pub fn hold(&mut self, button: DigitalInput, released: bool) {
        self.held[button_slot(button)] = released;
    }

    pub fn last_segment(&self) -> Option<u8> {
        self.segments.last().copied()
    }

    pub fn clear_history(&mut self) {
        self.beeps.clear();
        self.segments.clear();
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareIo for MockHardware {
    fn read_analog(&mut self, input: AnalogInput) -> Result<f32, SensorError> {
        if self.fail_analog {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(self.analog[analog_slot(input)])
    }

    fn read_digital(&mut self, input: DigitalInput) -> Result<bool, SensorError> {
        let slot = button_slot(input);
        Ok(self.scripted[slot].pop_front().unwrap_or(self.held[slot]))
    }

    fn write_pwm_duty(&mut self, output: PwmOutput, duty: f32) -> Result<(), ActuatorError> {
        if self.fail_writes {
            return Err(ActuatorError::PwmWriteFailed);
        }
        if output == PwmOutput::Buzzer && duty == 0.0 && self.stuck_buzzer_offs > 0 {
            self.stuck_buzzer_offs -= 1;
            return Err(ActuatorError::PwmWriteFailed);
        }
        match output {
            PwmOutput::Buzzer => {
                if duty > 0.0 && self.buzzer_duty == 0.0 {
                    self.beeps.push(self.buzzer_freq_hz);
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
        if self.fail_writes {
            return Err(ActuatorError::PwmWriteFailed);
        }
        if output == PwmOutput::Buzzer {
            self.buzzer_freq_hz = (1.0 / period_secs).round() as u32;
        }
        Ok(())
    }

    fn write_digital(&mut self, output: DigitalOutput, high: bool) -> Result<(), ActuatorError> {
        if self.fail_writes {
            return Err(ActuatorError::GpioWriteFailed);
        }
        match output {
            DigitalOutput::DoorLed => self.door_led = high,
        }
        Ok(())
    }

    fn write_segment_pattern(&mut self, pattern: u8) -> Result<(), ActuatorError> {
        if self.fail_writes {
            return Err(ActuatorError::DisplayWriteFailed);
        }
        self.segments.push(pattern);
        Ok(())
    }
}

// ── ManualClock ───────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ManualClock {
    pub now: u64,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn sleep_ms(&mut self, ms: u32) {
        self.now += u64::from(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<WasherEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &WasherEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&WasherEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &WasherEvent) {
        self.events.push(*event);
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// Service plus mocks, polled the way the control loop polls it.
pub struct Rig {
    pub service: WasherService,
    pub hw: MockHardware,
    pub clock: ManualClock,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    /// Started service, no polls yet.  Button latches are not armed.
    pub fn cold() -> Self {
        let mut service = WasherService::new(WasherConfig::default()).unwrap();
        let mut sink = RecordingSink::new();
        service.start(&mut sink);
        Self {
            service,
            hw: MockHardware::new(),
            clock: ManualClock::new(),
            sink,
        }
    }

    /// Off, with one poll done so released buttons have been seen.
    pub fn new() -> Self {
        let mut rig = Self::cold();
        rig.poll();
        rig.sink.clear();
        rig
    }

    /// Idle with one sensor reading taken; history cleared.
    pub fn powered_on() -> Self {
        let mut rig = Self::new();
        rig.press(DigitalInput::PowerButton);
        rig.poll();
        assert_eq!(rig.service.state(), StateId::Idle);
        rig.sink.clear();
        rig.hw.clear_history();
        rig
    }

    /// Running a freshly started cycle; history cleared.
    pub fn running() -> Self {
        let mut rig = Self::powered_on();
        let report = rig.press(DigitalInput::StartButton);
        assert_eq!(report.state, StateId::Running);
        rig.sink.clear();
        rig.hw.clear_history();
        rig
    }

    pub fn try_poll(&mut self) -> Result<PollReport, Error> {
        let report = self
            .service
            .poll(&mut self.hw, &mut self.clock, &mut self.sink)?;
        self.clock.sleep_ms(report.next_poll_ms);
        Ok(report)
    }

    pub fn poll(&mut self) -> PollReport {
        self.try_poll().unwrap()
    }

    pub fn press(&mut self, button: DigitalInput) -> PollReport {
        self.hw.tap(button);
        self.poll()
    }

    /// Poll until the state changes away from `state`, at most `limit` times.
    pub fn poll_while(&mut self, state: StateId, limit: usize) -> PollReport {
        for _ in 0..limit {
            let report = self.poll();
            if report.state != state {
                return report;
            }
        }
        panic!("still {state} after {limit} polls");
    }
}
