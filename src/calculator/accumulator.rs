use super::result::ComponentScore;
use crate::formula::{Operation, OperationKind};
use tracing::debug;

/// Working values of one stage.
///
/// Components are recorded first, then each operation consumes the
/// accumulator and hands it to the next, so an operation can read what an
/// earlier one stored under its `result_id`. The stage total is the sum of
/// counted entries only; raw-only entries feed operations without being
/// summed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageAccumulator {
    entries: Vec<ComponentScore>,
}

impl StageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value. An existing id keeps its position and is overwritten.
    pub fn record(&mut self, id: &str, points: f64, counted: bool) {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.points = points;
                entry.counted = counted;
            }
            None => self.entries.push(ComponentScore {
                id: id.to_string(),
                points,
                counted,
            }),
        }
    }

    pub fn value(&self, id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.points)
    }

    pub fn total(&self) -> f64 {
        self.entries
            .iter()
            .filter(|entry| entry.counted)
            .map(|entry| entry.points)
            .sum()
    }

    /// Runs one operation. Without a `result_id` the result is discarded and
    /// the accumulator is returned unchanged.
    pub fn apply(mut self, operation: &Operation) -> Self {
        let operands: Vec<f64> = operation
            .component_ids
            .iter()
            .filter_map(|id| self.value(id))
            .collect();
        let result = combine(&operation.kind, &operands);
        debug!(
            operation = %operation.id,
            kind = operation.kind.label(),
            operands = operands.len(),
            result,
            "applied operation"
        );
        if let Some(result_id) = &operation.result_id {
            self.record(result_id, result, true);
        }
        self
    }

    pub fn into_scores(self) -> Vec<ComponentScore> {
        self.entries
    }
}

/// Operation arithmetic over the operands that were present.
fn combine(kind: &OperationKind, operands: &[f64]) -> f64 {
    match kind {
        OperationKind::Max => operands.iter().copied().reduce(f64::max).unwrap_or(0.0),
        OperationKind::Min => operands.iter().copied().reduce(f64::min).unwrap_or(0.0),
        OperationKind::Sum => operands.iter().sum(),
        OperationKind::Average => {
            if operands.is_empty() {
                0.0
            } else {
                operands.iter().sum::<f64>() / operands.len() as f64
            }
        }
        OperationKind::Multiply { factor } => operands.iter().product::<f64>() * factor,
        OperationKind::Divide { divisor } => {
            let divisor = if *divisor == 0.0 { 1.0 } else { *divisor };
            operands.iter().sum::<f64>() / divisor
        }
        OperationKind::Conditional => operands.first().copied().unwrap_or(0.0),
        OperationKind::Threshold { minimum } => match operands.first() {
            Some(value) if value >= minimum => *value,
            _ => 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> StageAccumulator {
        let mut accumulator = StageAccumulator::new();
        accumulator.record("mat", 40.0, true);
        accumulator.record("alt_fiz", 21.0, false);
        accumulator.record("alt_chem", 27.0, false);
        accumulator
    }

    #[test]
    fn total_ignores_raw_only_entries() {
        assert_eq!(seeded().total(), 40.0);
    }

    #[test]
    fn max_operation_stores_best_alternative_as_counted() {
        let operation = Operation::new("best", OperationKind::Max, ["alt_fiz", "alt_chem"])
            .storing_as("przedmiot");
        let accumulator = seeded().apply(&operation);
        assert_eq!(accumulator.value("przedmiot"), Some(27.0));
        assert_eq!(accumulator.total(), 67.0);
    }

    #[test]
    fn writing_over_an_existing_id_keeps_its_slot() {
        let mut accumulator = seeded();
        accumulator.record("grupa", 0.0, true);
        let accumulator = accumulator.apply(
            &Operation::new("best", OperationKind::Max, ["alt_fiz", "alt_chem"]).storing_as("grupa"),
        );
        let scores = accumulator.into_scores();
        assert_eq!(scores.len(), 4);
        assert_eq!(scores[3].id, "grupa");
        assert_eq!(scores[3].points, 27.0);
    }

    #[test]
    fn later_operations_read_earlier_results() {
        let accumulator = seeded()
            .apply(&Operation::new("s", OperationKind::Sum, ["alt_fiz", "alt_chem"]).storing_as("suma"))
            .apply(
                &Operation::new("d", OperationKind::Divide { divisor: 2.0 }, ["suma"])
                    .storing_as("srednia"),
            );
        assert_eq!(accumulator.value("srednia"), Some(24.0));
    }

    #[test]
    fn operation_without_result_id_changes_nothing() {
        let before = seeded();
        let after = before
            .clone()
            .apply(&Operation::new("s", OperationKind::Sum, ["mat", "alt_fiz"]));
        assert_eq!(before, after);
    }

    #[test]
    fn empty_operand_sets_have_defined_results() {
        assert_eq!(combine(&OperationKind::Max, &[]), 0.0);
        assert_eq!(combine(&OperationKind::Min, &[]), 0.0);
        assert_eq!(combine(&OperationKind::Average, &[]), 0.0);
        assert_eq!(combine(&OperationKind::Multiply { factor: 3.0 }, &[]), 3.0);
        assert_eq!(combine(&OperationKind::Conditional, &[]), 0.0);
    }

    #[test]
    fn arithmetic_follows_each_operation_kind() {
        let values = [30.0, 50.0, 10.0];
        assert_eq!(combine(&OperationKind::Max, &values), 50.0);
        assert_eq!(combine(&OperationKind::Min, &values), 10.0);
        assert_eq!(combine(&OperationKind::Sum, &values), 90.0);
        assert_eq!(combine(&OperationKind::Average, &values), 30.0);
        assert_eq!(combine(&OperationKind::Multiply { factor: 0.5 }, &[4.0, 5.0]), 10.0);
        assert_eq!(combine(&OperationKind::Divide { divisor: 3.0 }, &values), 30.0);
        assert_eq!(combine(&OperationKind::Divide { divisor: 0.0 }, &values), 90.0);
        assert_eq!(combine(&OperationKind::Conditional, &values), 30.0);
        assert_eq!(combine(&OperationKind::Threshold { minimum: 30.0 }, &values), 30.0);
        assert_eq!(combine(&OperationKind::Threshold { minimum: 31.0 }, &values), 0.0);
    }
}
