//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  OFF ──[power]──▶ IDLE ──[start, door shut, not overloaded]──▶ RUNNING
//!   ▲                 │ ▲                                           │
//!   │              [power]└──────────[countdown finished]───────────┤
//!   │                 ▼                                             │
//!   └─────────────────┴──────────────────[power]────────────────────┘
//! ```
//!
//! A refused start leaves Idle untouched apart from the rejection tone
//! and event.

use super::context::{ActuatorCommands, FsmContext};
use super::{StateDescriptor, StateId};
use crate::app::events::WasherEvent;
use crate::cycle::{CycleProgress, CycleRun};
use crate::drivers::buzzer;
use crate::error::{RejectReason, SafetyFault, StartRejected};
use crate::settings::UserSettings;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Off
        StateDescriptor {
            id: StateId::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: Some(off_exit),
            on_update: off_update,
        },
        // Index 1 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: None,
            on_exit: None,
            on_update: idle_update,
        },
        // Index 2 — Running
        StateDescriptor {
            id: StateId::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: Some(running_exit),
            on_update: running_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF state
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut FsmContext) {
    ctx.commands = ActuatorCommands::all_off();
    ctx.cycle = None;
    ctx.reset_tracking();
    debug!("OFF: outputs zeroed, interlocks and report baselines reset");
}

fn off_exit(ctx: &mut FsmContext) {
    ctx.commands.init_led_pwm = true;
    ctx.reset_tracking();
}

fn off_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.input.power_pressed {
        ctx.beep(buzzer::POWER_TOGGLE);
        ctx.emit(WasherEvent::PoweredOn);
        return Some(StateId::Idle);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — waiting for a start press
// ═══════════════════════════════════════════════════════════════════════════

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.input.power_pressed {
        power_off(ctx);
        return Some(StateId::Off);
    }

    if ctx.input.start_pressed {
        let outcome = evaluate_start(ctx);
        ctx.start_outcome = Some(outcome);
        match outcome {
            Ok(_) => return Some(StateId::Running),
            Err(rejected) => {
                info!("IDLE: {rejected}");
                ctx.emit(WasherEvent::CycleRejected(rejected.reason));
                ctx.beep(buzzer::START_REJECTED);
            }
        }
    }

    ctx.commands.door_led = ctx.safety.has_fault(SafetyFault::DoorOpen);
    ctx.commands.display = Some(ctx.settings.steps());
    ctx.commands.rgb = ctx.load_tier.colour();
    None
}

/// May a cycle start right now?
///
/// Refused when either debounced interlock is active *or* this poll's
/// instantaneous reading shows the condition.
pub fn evaluate_start(ctx: &FsmContext) -> Result<UserSettings, StartRejected> {
    let door = ctx.safety.has_fault(SafetyFault::DoorOpen) || ctx.sensors.door_open(&ctx.config);
    if door {
        return Err(StartRejected { reason: RejectReason::DoorOpen });
    }

    let overloaded =
        ctx.safety.has_fault(SafetyFault::Overloaded) || ctx.sensors.overloaded(&ctx.config);
    if overloaded {
        return Err(StartRejected { reason: RejectReason::Overloaded });
    }

    Ok(ctx.settings)
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING state — countdown advanced by elapsed time each poll
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut FsmContext) {
    let settings = ctx.settings;
    let run = CycleRun::start(settings, ctx.now_ms, ctx.config.cycle_step_interval_ms());
    info!(
        "RUNNING: {} rpm, {} C, {} min ({} ms per step)",
        settings.rpm,
        settings.temp_c,
        settings.minutes,
        ctx.config.cycle_step_interval_ms()
    );

    ctx.emit(WasherEvent::CycleStarted(settings));
    ctx.beep(buzzer::CYCLE_START);
    ctx.emit(WasherEvent::CycleProgress {
        remaining_minutes: run.remaining_minutes(),
    });
    ctx.commands.display = Some(run.remaining_steps());
    ctx.cycle = Some(run);
}

fn running_exit(ctx: &mut FsmContext) {
    ctx.cycle = None;
}

fn running_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.input.power_pressed {
        if let Some(run) = &ctx.cycle {
            let remaining_minutes = run.remaining_minutes();
            ctx.emit(WasherEvent::CycleAborted { remaining_minutes });
        }
        power_off(ctx);
        return Some(StateId::Off);
    }

    if ctx.input.start_pressed {
        let rejected = StartRejected { reason: RejectReason::AlreadyRunning };
        ctx.start_outcome = Some(Err(rejected));
        ctx.emit(WasherEvent::CycleRejected(rejected.reason));
        ctx.beep(buzzer::ALREADY_RUNNING);
    }

    ctx.commands.rgb = ctx.load_tier.colour();

    let now = ctx.now_ms;
    let progress = match ctx.cycle.as_mut() {
        Some(run) => run.advance(now),
        None => CycleProgress::Finished,
    };

    match progress {
        CycleProgress::Unchanged => None,
        CycleProgress::Stepped(remaining) => {
            ctx.commands.display = Some(remaining);
            ctx.emit(WasherEvent::CycleProgress {
                remaining_minutes: remaining * crate::settings::MINUTES_PER_STEP,
            });
            None
        }
        CycleProgress::Finished => {
            ctx.commands.display = Some(0);
            ctx.emit(WasherEvent::CycleComplete);
            for _ in 0..buzzer::CYCLE_COMPLETE_REPEATS {
                ctx.beep(buzzer::CYCLE_COMPLETE);
            }
            ctx.emit(WasherEvent::CycleEnded);
            Some(StateId::Idle)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared
// ═══════════════════════════════════════════════════════════════════════════

/// Effects of a power press that switches the appliance off.
fn power_off(ctx: &mut FsmContext) {
    ctx.beep(buzzer::POWER_TOGGLE);
    ctx.emit(WasherEvent::PoweredOff);
}
