use crate::formula::{Threshold, ThresholdKind};

/// Whether a stage score clears its gate. Cohort-relative kinds (`ranking`,
/// `multiplier`) cannot be decided for a single candidate and always pass.
pub fn passes(score: f64, threshold: &Threshold, stage_max: f64) -> bool {
    match threshold.kind {
        ThresholdKind::Minimum { value } => score >= value,
        ThresholdKind::Percentage { value } => score >= stage_max * value / 100.0,
        ThresholdKind::Ranking { .. } | ThresholdKind::Multiplier { .. } => true,
    }
}
