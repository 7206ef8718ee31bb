//! Outbound application events.
//!
//! State handlers queue these in the FSM context outbox; the
//! [`WasherService`](super::service::WasherService) drains the outbox
//! through the [`EventSink`](super::ports::EventSink) port after each poll.

use crate::error::{ActuatorError, RejectReason, SensorError};
use crate::fsm::StateId;
use crate::settings::UserSettings;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WasherEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// Power button turned the appliance on.
    PoweredOn,

    /// Power button turned the appliance off.
    PoweredOff,

    /// Potentiometer-derived settings moved enough to report.
    SettingsChanged(UserSettings),

    /// Averaged sensor readings moved enough to report.
    SensorStatus {
        load: f32,
        temperature_c: i32,
        door_open: bool,
    },

    /// Debounced door flag rose.
    DoorOpened,

    /// Debounced door flag fell.
    DoorClosed,

    /// Debounced overload flag rose.
    OverloadWarning,

    /// Debounced overload flag fell.
    OverloadCleared,

    /// A cycle began with the captured settings.
    CycleStarted(UserSettings),

    /// A start press was refused.
    CycleRejected(RejectReason),

    /// Countdown display changed.
    CycleProgress { remaining_minutes: u32 },

    /// Countdown reached zero.
    CycleComplete,

    /// Control returned to idle after completion.
    CycleEnded,

    /// Power was switched off mid-cycle.
    CycleAborted { remaining_minutes: u32 },

    /// A sensor read failed; the previous snapshot was kept.
    SensorFault(SensorError),

    /// An actuator write failed.
    ActuatorFault(ActuatorError),
}
