use super::stage::{ComponentKind, OperationKind, Stage};
use super::Formula;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaIssue {
    pub path: String,
    pub message: String,
}

impl FormulaIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FormulaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Collects every structural problem in a formula. An empty list means the
/// formula is safe to evaluate without degenerate results.
pub fn validate_formula(formula: &Formula) -> Vec<FormulaIssue> {
    let mut issues = Vec::new();

    if formula.stages.is_empty() {
        issues.push(FormulaIssue::new("stages", "formula must declare at least one stage"));
    }
    if !non_negative(formula.metadata.max_possible_score) {
        issues.push(FormulaIssue::new(
            "metadata.max_possible_score",
            format!(
                "must be a non-negative number (found {})",
                formula.metadata.max_possible_score
            ),
        ));
    }

    let mut stage_ids = HashSet::new();
    for stage in &formula.stages {
        if !stage_ids.insert(stage.id.as_str()) {
            issues.push(FormulaIssue::new(
                format!("stages.{}", stage.id),
                "duplicate stage id",
            ));
        }
        validate_stage(stage, &mut issues);
    }

    for rule in &formula.bonuses {
        if let Some(max_bonus) = rule.max_bonus {
            if !non_negative(max_bonus) {
                issues.push(FormulaIssue::new(
                    format!("bonuses.{}.max_bonus", rule.id),
                    "must be a non-negative number",
                ));
            }
        }
    }

    issues
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn validate_stage(stage: &Stage, issues: &mut Vec<FormulaIssue>) {
    let prefix = format!("stages.{}", stage.id);

    if !non_negative(stage.max_points) {
        issues.push(FormulaIssue::new(
            format!("{prefix}.max_points"),
            "must be a non-negative number",
        ));
    }
    if let Some(coefficient) = stage.coefficient {
        if !non_negative(coefficient) {
            issues.push(FormulaIssue::new(
                format!("{prefix}.coefficient"),
                "must be a non-negative number",
            ));
        }
    }
    if stage.components.is_empty() {
        issues.push(FormulaIssue::new(
            format!("{prefix}.components"),
            "stage must declare at least one component",
        ));
    }

    let mut known = HashSet::new();
    for component in &stage.components {
        let path = format!("{prefix}.components.{}", component.id);
        if !known.insert(component.id.clone()) {
            issues.push(FormulaIssue::new(path.clone(), "duplicate component id"));
        }
        if !non_negative(component.weight) {
            issues.push(FormulaIssue::new(
                format!("{path}.weight"),
                format!("must be a non-negative number (found {})", component.weight),
            ));
        }
        for (field, bound) in [
            ("min_score", component.min_score),
            ("max_score", component.max_score),
        ] {
            if let Some(bound) = bound {
                if !non_negative(bound) {
                    issues.push(FormulaIssue::new(
                        format!("{path}.{field}"),
                        "must be a non-negative number",
                    ));
                }
            }
        }
    }

    for operation in &stage.operations {
        let path = format!("{prefix}.operations.{}", operation.id);
        if operation.component_ids.is_empty() {
            issues.push(FormulaIssue::new(path.clone(), "operation references no components"));
        }
        for id in &operation.component_ids {
            if !known.contains(id) {
                issues.push(FormulaIssue::new(
                    path.clone(),
                    format!("references unknown component '{id}'"),
                ));
            }
        }
        match operation.kind {
            OperationKind::Multiply { factor } if !factor.is_finite() => {
                issues.push(FormulaIssue::new(path.clone(), "factor must be finite"));
            }
            OperationKind::Divide { divisor } if !divisor.is_finite() || divisor == 0.0 => {
                issues.push(FormulaIssue::new(
                    path.clone(),
                    "divisor must be a finite, non-zero number",
                ));
            }
            OperationKind::Threshold { minimum } if !minimum.is_finite() => {
                issues.push(FormulaIssue::new(path.clone(), "minimum must be finite"));
            }
            _ => {}
        }
        if let Some(result_id) = &operation.result_id {
            known.insert(result_id.clone());
        }
    }

    for exam in &stage.practical_exams {
        let backed = stage.components.iter().any(|component| {
            component.id == exam.id && component.kind == ComponentKind::PracticalExam
        });
        if !backed {
            issues.push(FormulaIssue::new(
                format!("{prefix}.practical_exams.{}", exam.id),
                "no practical_exam component with this id",
            ));
        }
    }
}
