//! Hysteresis debouncer for noisy boolean conditions.
//!
//! Two counters track consecutive `true` and `false` samples; at most one
//! is non-zero at a time.  The flag only flips once the counter *opposing*
//! its current value reaches `required`, so a short burst of contrary
//! samples followed by a return to the old value leaves it untouched.

/// A boolean that flips only after sustained opposing evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HysteresisFlag {
    active: bool,
    consecutive_true: u32,
    consecutive_false: u32,
    required: u32,
}

impl HysteresisFlag {
    /// New inactive flag.  A `required` of 0 is treated as 1.
    pub fn new(required: u32) -> Self {
        Self {
            active: false,
            consecutive_true: 0,
            consecutive_false: 0,
            required: required.max(1),
        }
    }

    /// Feed one raw sample and return the (possibly updated) flag.
    pub fn update(&mut self, raw: bool) -> bool {
        if raw {
            self.consecutive_true = self.consecutive_true.saturating_add(1);
            self.consecutive_false = 0;
        } else {
            self.consecutive_false = self.consecutive_false.saturating_add(1);
            self.consecutive_true = 0;
        }

        if !self.active && self.consecutive_true >= self.required {
            self.active = true;
        } else if self.active && self.consecutive_false >= self.required {
            self.active = false;
        }
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    /// Back to inactive with both counters cleared.
    pub fn reset(&mut self) {
        self.active = false;
        self.consecutive_true = 0;
        self.consecutive_false = 0;
    }
}
