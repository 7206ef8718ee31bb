//! Application service — the hexagonal core.
//!
//! [`WasherService`] owns the FSM, its shared context, the panel button
//! latches and the sensor hub.  It exposes a clean, hardware-agnostic
//! API.  All I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.
//!
//! ```text
//!   HardwareIo ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                  │       WasherService         │
//!   HardwareIo ◀── │  Buttons · Sensors · Safety │
//!        Clock ──▶ │  FSM · Cycle                │
//!                  └────────────────────────────┘
//! ```

use log::{debug, error, info, warn};

use crate::config::WasherConfig;
use crate::drivers::button::PanelButtons;
use crate::drivers::status_led::StatusLed;
use crate::drivers::{buzzer, segment_display};
use crate::error::{ActuatorError, ConfigError, Error, StartRejected};
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::safety::FlagEdges;
use crate::sensors::SensorHub;
use crate::sensors::load::classify;
use crate::settings::UserSettings;

use super::commands::PanelInput;
use super::events::WasherEvent;
use super::ports::{Clock, DigitalOutput, EventSink, HardwareIo};

// ───────────────────────────────────────────────────────────────
// Poll report
// ───────────────────────────────────────────────────────────────

/// What one poll did, for the control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollReport {
    /// State after the poll.
    pub state: StateId,
    /// How long the loop should wait before polling again.
    pub next_poll_ms: u32,
    /// Outcome of a start press handled in this poll.
    pub start: Option<Result<UserSettings, StartRejected>>,
}

// ───────────────────────────────────────────────────────────────
// WasherService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct WasherService {
    fsm: Fsm,
    ctx: FsmContext,
    buttons: PanelButtons,
    hub: SensorHub,
    led: StatusLed,
    poll_count: u64,
    consecutive_io_failures: u8,
}

impl WasherService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: WasherConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ctx = FsmContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Off);

        Ok(Self {
            fsm,
            ctx,
            buttons: PanelButtons::new(),
            hub: SensorHub::new(),
            led: StatusLed::new(),
            poll_count: 0,
            consecutive_io_failures: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Off.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&WasherEvent::Started(self.fsm.current_state()));
        info!("WasherService started in {}", self.fsm.current_state());
    }

    /// Drive every actuator to its safe off state.
    ///
    /// Forces the FSM to Off first so a running cycle is dropped.  Every
    /// write is attempted even if an earlier one fails.
    pub fn shutdown(&mut self, hw: &mut impl HardwareIo) -> Result<(), Error> {
        self.fsm.force_transition(StateId::Off, &mut self.ctx);
        self.ctx.tones.clear();
        self.ctx.outbox.clear();

        let results = [
            self.led.off(hw),
            buzzer::silence(hw),
            hw.write_digital(DigitalOutput::DoorLed, false),
            segment_display::show(hw, None, false),
        ];
        match results.into_iter().find_map(Result::err) {
            Some(e) => {
                error!("shutdown incomplete: {e}");
                Err(e.into())
            }
            None => {
                info!("WasherService shut down, all outputs off");
                Ok(())
            }
        }
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one control iteration:
    /// buttons → sensors → interlocks → FSM → actuators → tones → events.
    ///
    /// Recoverable I/O failures are reported as events.  Only after
    /// `max_consecutive_io_failures` polls in a row have failed does this
    /// return `Err(Error::Hardware)`.
    pub fn poll(
        &mut self,
        hw: &mut impl HardwareIo,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<PollReport, Error> {
        self.poll_count += 1;
        let prev_state = self.fsm.current_state();
        let mut io_failed = false;

        self.ctx.now_ms = clock.now_ms();
        self.ctx.start_outcome = None;

        // 1. Buttons (always, even when off)
        let input = match self.buttons.poll(hw) {
            Ok(input) => input,
            Err(e) => {
                io_failed = true;
                self.ctx.emit(WasherEvent::SensorFault(e));
                PanelInput::default()
            }
        };
        if input.any() {
            debug!("panel input: {:?}", input);
        }

        // 2. Sensors, settings, interlocks (powered only)
        if prev_state.is_powered() {
            match self.hub.read_all(hw, clock, &self.ctx.config) {
                Ok(snapshot) => self.process_snapshot(prev_state, snapshot),
                Err(e) => {
                    io_failed = true;
                    warn!("sensor read failed, keeping previous snapshot: {e}");
                    self.ctx.emit(WasherEvent::SensorFault(e));
                }
            }
        }

        // 3. FSM
        self.ctx.now_ms = clock.now_ms();
        self.ctx.input = input;
        self.fsm.tick(&mut self.ctx);
        let state = self.fsm.current_state();

        // 4. Actuators and tones
        if let Err(e) = self.apply_actuators(hw, state) {
            io_failed = true;
            self.ctx.emit(WasherEvent::ActuatorFault(e));
        }
        if let Err(e) = self.play_tones(hw, clock) {
            io_failed = true;
            self.ctx.emit(WasherEvent::ActuatorFault(e));
        }

        // 5. Events
        for event in self.ctx.outbox.iter() {
            sink.emit(event);
        }
        self.ctx.outbox.clear();
        if state != prev_state {
            sink.emit(&WasherEvent::StateChanged {
                from: prev_state,
                to: state,
            });
        }

        // 6. Failure accounting
        if io_failed {
            self.consecutive_io_failures = self.consecutive_io_failures.saturating_add(1);
            if self.consecutive_io_failures >= self.ctx.config.max_consecutive_io_failures {
                error!(
                    "{} consecutive polls with I/O failures, giving up",
                    self.consecutive_io_failures
                );
                return Err(Error::Hardware("persistent I/O failure"));
            }
        } else {
            self.consecutive_io_failures = 0;
        }

        Ok(PollReport {
            state,
            next_poll_ms: self.poll_interval_ms(),
            start: self.ctx.start_outcome.take(),
        })
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Total polls executed since startup.
    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    /// Wait before the next poll in the current state.
    pub fn poll_interval_ms(&self) -> u32 {
        if self.state().is_powered() {
            self.ctx.config.active_poll_interval_ms
        } else {
            self.ctx.config.off_poll_interval_ms
        }
    }

    /// Settings derived from the latest snapshot.
    pub fn settings(&self) -> UserSettings {
        self.ctx.settings
    }

    /// Current interlock bitmask (see `SafetyFault::mask()`).
    pub fn fault_flags(&self) -> u8 {
        self.ctx.safety.faults()
    }

    /// Settings the running cycle was started with, if any.
    pub fn cycle_settings(&self) -> Option<UserSettings> {
        self.ctx.cycle.as_ref().map(|run| run.settings())
    }

    /// Minutes left in the running cycle, if any.
    pub fn remaining_minutes(&self) -> Option<u32> {
        self.ctx.cycle.as_ref().map(|run| run.remaining_minutes())
    }

    pub fn config(&self) -> &WasherConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Derive settings and tier, gate reports, debounce interlocks.
    fn process_snapshot(&mut self, state: StateId, snapshot: crate::sensors::SensorSnapshot) {
        let ctx = &mut self.ctx;
        let settings =
            UserSettings::from_pots(snapshot.rpm_pot, snapshot.temp_pot, snapshot.time_pot);
        ctx.sensors = snapshot;
        ctx.settings = settings;
        ctx.load_tier = classify(snapshot.load);

        if ctx.settings_gate.check(settings.as_report_values()) {
            ctx.emit(WasherEvent::SettingsChanged(settings));
        }
        if ctx.sensor_gate.check(snapshot.as_report_values()) {
            let door_open = snapshot.door_open(&ctx.config);
            ctx.emit(WasherEvent::SensorStatus {
                load: snapshot.load,
                temperature_c: snapshot.temperature_c.round() as i32,
                door_open,
            });
        }

        let edges = ctx.safety.evaluate(&snapshot, &ctx.config);
        self.handle_edges(state, edges);
    }

    fn handle_edges(&mut self, state: StateId, edges: FlagEdges) {
        let ctx = &mut self.ctx;
        match edges.door {
            Some(true) => {
                ctx.emit(WasherEvent::DoorOpened);
                if state == StateId::Idle {
                    ctx.beep(buzzer::DOOR_ALERT);
                }
            }
            Some(false) => ctx.emit(WasherEvent::DoorClosed),
            None => {}
        }
        match edges.overload {
            Some(true) => {
                ctx.emit(WasherEvent::OverloadWarning);
                ctx.beep(buzzer::OVERLOAD_WARNING);
            }
            Some(false) => ctx.emit(WasherEvent::OverloadCleared),
            None => {}
        }
    }

    /// Translate FSM actuator commands into port calls.
    ///
    /// Every output is written; the first failure is returned.
    fn apply_actuators(
        &mut self,
        hw: &mut impl HardwareIo,
        state: StateId,
    ) -> Result<(), ActuatorError> {
        let cmds = &mut self.ctx.commands;
        let mut first_err = None;

        if cmds.init_led_pwm {
            cmds.init_led_pwm = false;
            if let Err(e) = self.led.init(hw, self.ctx.config.led_pwm_frequency_hz) {
                first_err = Some(e);
            }
        }

        let results = [
            self.led.set_colour(hw, cmds.rgb),
            hw.write_digital(DigitalOutput::DoorLed, cmds.door_led),
            segment_display::show(hw, cmds.display, state.is_powered()),
        ];
        first_err = first_err.or_else(|| results.into_iter().find_map(Result::err));

        match first_err {
            Some(e) => {
                warn!("actuator write failed: {e}");
                Err(e)
            }
            None => Ok(()),
        }
    }

    /// Play every queued beep in order.
    fn play_tones(
        &mut self,
        hw: &mut impl HardwareIo,
        clock: &mut impl Clock,
    ) -> Result<(), ActuatorError> {
        let mut result = Ok(());
        for tone in self.ctx.tones.iter() {
            if let Err(e) = buzzer::play(hw, clock, *tone) {
                warn!("buzzer failed at {} Hz: {e}", tone.freq_hz);
                if let Err(off) = buzzer::silence(hw) {
                    warn!("buzzer could not be silenced: {off}");
                }
                result = Err(e);
                break;
            }
        }
        self.ctx.tones.clear();
        result
    }
}
