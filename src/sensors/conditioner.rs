//! Sensor conditioning: sample averaging and report gating.
//!
//! Averaging is a plain arithmetic mean of evenly spaced samples with no
//! weighting or outlier rejection.  The change gates only decide whether a
//! status line is worth logging; they never feed a control decision.

use crate::app::ports::{AnalogInput, Clock, HardwareIo};
use crate::error::SensorError;

/// Read `samples` scaled values from `input`, `spacing_ms` apart, and
/// return their mean.  The first failing read aborts the whole average.
pub fn average<H: HardwareIo, C: Clock>(
    hw: &mut H,
    clock: &mut C,
    input: AnalogInput,
    scale: f32,
    samples: u8,
    spacing_ms: u32,
) -> Result<f32, SensorError> {
    let samples = samples.max(1);
    let mut sum = 0.0_f32;
    for i in 0..samples {
        if i > 0 {
            clock.sleep_ms(spacing_ms);
        }
        sum += hw.read_analog(input)? * scale;
    }
    Ok(sum / f32::from(samples))
}

/// `true` on the first reading (`previous == None`) or when the value moved
/// by at least `threshold`.
pub fn significant_change(value: f32, previous: Option<f32>, threshold: f32) -> bool {
    match previous {
        None => true,
        Some(prev) => (value - prev).abs() >= threshold,
    }
}

/// Grouped change detector over `N` related values.
///
/// When any member moves past its threshold the whole group is recorded
/// as the new baseline, so a report always carries a consistent set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeGate<const N: usize> {
    previous: Option<[f32; N]>,
    thresholds: [f32; N],
}

impl<const N: usize> ChangeGate<N> {
    pub fn new(thresholds: [f32; N]) -> Self {
        Self {
            previous: None,
            thresholds,
        }
    }

    /// Returns `true` (and re-baselines) if the group deserves a report.
    pub fn check(&mut self, values: [f32; N]) -> bool {
        let changed = match &self.previous {
            None => true,
            Some(prev) => values
                .iter()
                .zip(prev.iter())
                .zip(self.thresholds.iter())
                .any(|((v, p), t)| significant_change(*v, Some(*p), *t)),
        };
        if changed {
            self.previous = Some(values);
        }
        changed
    }

    /// Forget the baseline; the next check always reports.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    pub fn baseline(&self) -> Option<[f32; N]> {
        self.previous
    }
}
