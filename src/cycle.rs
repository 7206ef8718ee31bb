//! Resumable wash-cycle countdown.
//!
//! A cycle of `M` minutes counts `M / 10` steps down to zero, one step per
//! `step_interval_ms` of real time.  Nothing here blocks: the Running state
//! calls [`CycleRun::advance`] once per poll with the current time.

use crate::settings::{MINUTES_PER_STEP, UserSettings};

/// Result of advancing the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleProgress {
    /// No step boundary crossed since the last call.
    Unchanged,
    /// One or more steps elapsed; carries the steps still remaining.
    Stepped(u32),
    /// The last step elapsed.
    Finished,
}

/// An in-flight wash cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleRun {
    settings: UserSettings,
    remaining: u32,
    step_interval_ms: u64,
    next_step_at_ms: u64,
}

impl CycleRun {
    /// Begin counting down from `settings.steps()` at `now_ms`.
    pub fn start(settings: UserSettings, now_ms: u64, step_interval_ms: u64) -> Self {
        let step_interval_ms = step_interval_ms.max(1);
        Self {
            settings,
            remaining: settings.steps(),
            step_interval_ms,
            next_step_at_ms: now_ms.saturating_add(step_interval_ms),
        }
    }

    /// Settings captured when the cycle started.
    pub fn settings(&self) -> UserSettings {
        self.settings
    }

    /// Steps still to run (the value on the display).
    pub fn remaining_steps(&self) -> u32 {
        self.remaining
    }

    pub fn remaining_minutes(&self) -> u32 {
        self.remaining * MINUTES_PER_STEP
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Consume every step boundary at or before `now_ms`.
    ///
    /// A late poll catches up on all missed steps at once.
    pub fn advance(&mut self, now_ms: u64) -> CycleProgress {
        if self.remaining == 0 {
            return CycleProgress::Finished;
        }

        let before = self.remaining;
        while self.remaining > 0 && now_ms >= self.next_step_at_ms {
            self.remaining -= 1;
            self.next_step_at_ms = self.next_step_at_ms.saturating_add(self.step_interval_ms);
        }

        if self.remaining == 0 {
            CycleProgress::Finished
        } else if self.remaining != before {
            CycleProgress::Stepped(self.remaining)
        } else {
            CycleProgress::Unchanged
        }
    }
}
