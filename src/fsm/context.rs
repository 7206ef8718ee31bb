//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It contains the panel input and sensor snapshot of the
//! current poll, the debounced interlocks, the running cycle, actuator
//! command outputs, the event outbox and configuration.  Think of it as
//! the "blackboard" in a blackboard architecture.

use heapless::Vec;
use log::warn;

use crate::app::commands::PanelInput;
use crate::app::events::WasherEvent;
use crate::config::WasherConfig;
use crate::cycle::CycleRun;
use crate::drivers::buzzer::Tone;
use crate::error::StartRejected;
use crate::safety::SafetySupervisor;
use crate::sensors::SensorSnapshot;
use crate::sensors::conditioner::ChangeGate;
use crate::sensors::load::LoadTier;
use crate::settings::UserSettings;

/// Events one poll can queue before overflow.
pub const OUTBOX_CAPACITY: usize = 24;
/// Beeps one poll can queue before overflow.
pub const TONE_CAPACITY: usize = 8;

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// Commands that state handlers write to request actuator actions.
/// The service applies these to the hardware after each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorCommands {
    /// Load indicator duty per channel (R, G, B), each 0.0–1.0.
    pub rgb: (f32, f32, f32),
    /// Red door-open indicator.
    pub door_led: bool,
    /// Digit to show; `None` = blank.
    pub display: Option<u32>,
    /// One-shot request to program the RGB PWM period.
    pub init_led_pwm: bool,
}

impl Default for ActuatorCommands {
    fn default() -> Self {
        Self {
            rgb: (0.0, 0.0, 0.0),
            door_led: false,
            display: None,
            init_led_pwm: false,
        }
    }
}

impl ActuatorCommands {
    /// All actuators off.
    pub fn all_off() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Clock reading taken at the start of the current poll.
    pub now_ms: u64,

    // -- Inputs --
    /// Button presses detected this poll.
    pub input: PanelInput,
    /// Latest sensor readings.  Kept from the previous poll on read failure.
    pub sensors: SensorSnapshot,
    /// Settings derived from the pots in the latest snapshot.
    pub settings: UserSettings,
    /// Tier of the latest load reading.
    pub load_tier: LoadTier,

    // -- Interlocks and report gating --
    pub safety: SafetySupervisor,
    /// rpm / temperature / minutes.
    pub settings_gate: ChangeGate<3>,
    /// load / temperature °C / light %.
    pub sensor_gate: ChangeGate<3>,

    // -- Cycle --
    /// The in-flight wash, present only while Running.
    pub cycle: Option<CycleRun>,
    /// Outcome of a start press handled this poll.
    pub start_outcome: Option<Result<UserSettings, StartRejected>>,

    // -- Outputs --
    pub commands: ActuatorCommands,
    /// Events queued for the sink, drained after every poll.
    pub outbox: Vec<WasherEvent, OUTBOX_CAPACITY>,
    /// Beeps queued for the buzzer, drained after every poll.
    pub tones: Vec<Tone, TONE_CAPACITY>,

    // -- Configuration --
    pub config: WasherConfig,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: WasherConfig) -> Self {
        Self {
            now_ms: 0,
            input: PanelInput::default(),
            sensors: SensorSnapshot::default(),
            settings: UserSettings::default(),
            load_tier: LoadTier::Light,
            safety: SafetySupervisor::new(&config),
            settings_gate: ChangeGate::new([
                config.rpm_report_threshold,
                config.temp_setting_report_threshold,
                config.time_report_threshold,
            ]),
            sensor_gate: ChangeGate::new([
                config.load_report_threshold,
                config.temp_report_threshold_c,
                config.light_report_threshold_pct,
            ]),
            cycle: None,
            start_outcome: None,
            commands: ActuatorCommands::all_off(),
            outbox: Vec::new(),
            tones: Vec::new(),
            config,
        }
    }

    /// Queue an event for the sink.
    pub fn emit(&mut self, event: WasherEvent) {
        if self.outbox.push(event).is_err() {
            warn!("event outbox full, dropped {:?}", event);
        }
    }

    /// Queue a beep.
    pub fn beep(&mut self, tone: Tone) {
        if self.tones.push(tone).is_err() {
            warn!("tone queue full, dropped {} Hz", tone.freq_hz);
        }
    }

    /// Forget all report baselines and interlock history.
    pub fn reset_tracking(&mut self) {
        self.safety.reset();
        self.settings_gate.reset();
        self.sensor_gate.reset();
    }
}
