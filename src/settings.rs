//! Wash settings derived from the three front-panel potentiometers.
//!
//! Settings are recomputed from the pot positions on every powered poll and
//! never stored; the cycle captures a copy at the moment it starts.

/// Spin speed, wash temperature and duration chosen on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserSettings {
    /// 200–900 in steps of 100.
    pub rpm: u32,
    /// 20–60 °C in steps of 10.
    pub temp_c: u32,
    /// 10–90 minutes in steps of 10.
    pub minutes: u32,
}

/// Longest selectable wash.
pub const MAX_MINUTES: u32 = 90;

/// Minutes represented by one countdown step / display digit.
pub const MINUTES_PER_STEP: u32 = 10;

impl UserSettings {
    /// Map raw pot positions (0.0–1.0) to settings.
    pub fn from_pots(rpm_pot: f32, temp_pot: f32, time_pot: f32) -> Self {
        Self {
            rpm: rpm_from_pot(rpm_pot),
            temp_c: temp_from_pot(temp_pot),
            minutes: minutes_from_pot(time_pot),
        }
    }

    /// Countdown steps for this wash.
    pub fn steps(&self) -> u32 {
        self.minutes / MINUTES_PER_STEP
    }

    /// Values in the order the change gate compares them.
    pub fn as_report_values(&self) -> [f32; 3] {
        [self.rpm as f32, self.temp_c as f32, self.minutes as f32]
    }
}

/// `trunc(raw * 7 + 2) * 100`.
pub fn rpm_from_pot(raw: f32) -> u32 {
    let hundreds = (raw.clamp(0.0, 1.0) * 7.0 + 2.0) as u32;
    hundreds * 100
}

/// `trunc(raw * 4 + 2) * 10`.
pub fn temp_from_pot(raw: f32) -> u32 {
    let tens = (raw.clamp(0.0, 1.0) * 4.0 + 2.0) as u32;
    tens * 10
}

/// `clamp(round(raw * 8) + 1, 1, 9) * 10`.
pub fn minutes_from_pot(raw: f32) -> u32 {
    let raw = if raw.is_nan() { 0.0 } else { raw };
    let steps = ((raw * 8.0).round() + 1.0).clamp(1.0, (MAX_MINUTES / MINUTES_PER_STEP) as f32);
    steps as u32 * MINUTES_PER_STEP
}
