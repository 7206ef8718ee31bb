//! Safety supervisor.
//!
//! The supervisor runs **every powered poll before the FSM** and debounces
//! the two interlock conditions (door open, drum overloaded) into a fault
//! bitmask.  Edges are reported back to the service, which turns them
//! into events and alert tones.
//!
//! ## Fault lifecycle
//!
//! 1. The raw condition is sampled from the latest sensor snapshot.
//! 2. Its [`HysteresisFlag`] flips only after `debounce_count`
//!    consecutive opposing samples.
//! 3. The fault bit mirrors the flag; a flip is returned as an edge.
//! 4. Powering off resets both flags and clears the mask.
//!
//! The start gate in the Idle state reads [`SafetySupervisor::has_fault`]
//! and *also* re-checks the instantaneous reading of the same poll.

use crate::config::WasherConfig;
use crate::debounce::HysteresisFlag;
use crate::error::SafetyFault;
use crate::sensors::SensorSnapshot;
use log::{info, warn};

/// Debounced flag transitions produced by one evaluation.
/// `Some(true)` = rising edge, `Some(false)` = falling edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagEdges {
    pub door: Option<bool>,
    pub overload: Option<bool>,
}

impl FlagEdges {
    pub fn any(&self) -> bool {
        self.door.is_some() || self.overload.is_some()
    }
}

/// Safety supervisor.
#[derive(Debug, Clone)]
pub struct SafetySupervisor {
    door: HysteresisFlag,
    overload: HysteresisFlag,
    /// Debounced fault bitmask.
    faults: u8,
}

impl SafetySupervisor {
    pub fn new(config: &WasherConfig) -> Self {
        let required = u32::from(config.debounce_count);
        Self {
            door: HysteresisFlag::new(required),
            overload: HysteresisFlag::new(required),
            faults: 0,
        }
    }

    /// Feed one snapshot through both debouncers and return the edges.
    pub fn evaluate(&mut self, snap: &SensorSnapshot, config: &WasherConfig) -> FlagEdges {
        let door_raw = snap.door_open(config);
        let overload_raw = snap.overloaded(config);

        let door = self.door.update(door_raw);
        let overload = self.overload.update(overload_raw);

        FlagEdges {
            door: self.eval_fault(SafetyFault::DoorOpen, door),
            overload: self.eval_fault(SafetyFault::Overloaded, overload),
        }
    }

    /// Current fault bitmask.
    pub fn faults(&self) -> u8 {
        self.faults
    }

    /// True if **any** fault is active.
    pub fn has_faults(&self) -> bool {
        self.faults != 0
    }

    /// Check if a specific fault is active.
    pub fn has_fault(&self, fault: SafetyFault) -> bool {
        self.faults & fault.mask() != 0
    }

    /// Drop both flags to inactive (power-off).
    pub fn reset(&mut self) {
        self.door.reset();
        self.overload.reset();
        self.faults = 0;
    }

    // ── Internal ──────────────────────────────────────────────────

    /// Mirror a debounced flag into its fault bit; returns the edge, if any.
    fn eval_fault(&mut self, fault: SafetyFault, active: bool) -> Option<bool> {
        let was = self.has_fault(fault);
        if active == was {
            return None;
        }
        if active {
            warn!("interlock raised: {fault}");
            self.faults |= fault.mask();
        } else {
            info!("interlock cleared: {fault}");
            self.faults &= !fault.mask();
        }
        Some(active)
    }
}
