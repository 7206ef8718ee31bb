//! Drum load classification.
//!
//! Tier bounds are half-open and fixed: `[.., 0.2)` Light, `[0.2, 0.4)`
//! Normal, `[0.4, 0.6)` Medium, `[0.6, 0.7)` Heavy, everything else
//! Overload.  Inputs are not clamped.

use core::fmt;

/// Load severity, ordered from lightest to overloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoadTier {
    Light,
    Normal,
    Medium,
    Heavy,
    Overload,
}

/// Upper (exclusive) bound of each tier below `Overload`.
const TIER_BOUNDS: [(f32, LoadTier); 4] = [
    (0.2, LoadTier::Light),
    (0.4, LoadTier::Normal),
    (0.6, LoadTier::Medium),
    (0.7, LoadTier::Heavy),
];

/// RGB duty per tier, indexed by discriminant.
const TIER_COLOURS: [(f32, f32, f32); 5] = [
    (0.0, 1.0, 0.0),
    (0.5, 1.0, 0.0),
    (1.0, 1.0, 0.0),
    (1.0, 0.5, 0.0),
    (1.0, 0.0, 0.0),
];

/// Map a normalized load to its tier.  Total over `f32`; NaN lands in
/// `Overload` since it compares below no bound.
pub fn classify(load: f32) -> LoadTier {
    TIER_BOUNDS
        .iter()
        .find(|(bound, _)| load < *bound)
        .map_or(LoadTier::Overload, |(_, tier)| *tier)
}

impl LoadTier {
    /// Indicator colour as (red, green, blue) duty cycles.
    pub fn colour(self) -> (f32, f32, f32) {
        TIER_COLOURS[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Normal => "normal",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
            Self::Overload => "overload",
        }
    }
}

impl fmt::Display for LoadTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
