use super::subject::Subject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Additive bonus awarded outside the stage structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusRule {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BonusKind,
    /// Free-text description; not matched against candidate evidence.
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    /// Cap on this rule's own contribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bonus: Option<f64>,
}

impl BonusRule {
    pub fn new(id: impl Into<String>, kind: BonusKind, points: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            condition: String::new(),
            points,
            multiplier: None,
            max_bonus: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn capped_at(mut self, max_bonus: f64) -> Self {
        self.max_bonus = Some(max_bonus);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusKind {
    Olympiad,
    Competition,
    Certificate,
    Volunteer,
    Sports,
    Other,
}

/// Gate a stage score has to clear before the stage counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    #[serde(flatten)]
    pub kind: ThresholdKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Threshold {
    pub fn minimum(value: f64) -> Self {
        Self {
            kind: ThresholdKind::Minimum { value },
            description: None,
        }
    }

    pub fn percentage(value: f64) -> Self {
        Self {
            kind: ThresholdKind::Percentage { value },
            description: None,
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// `ranking` and `multiplier` are relative to the applicant cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ThresholdKind {
    Minimum { value: f64 },
    Percentage { value: f64 },
    Ranking { value: f64 },
    Multiplier { value: f64 },
}

impl ThresholdKind {
    pub fn value(&self) -> f64 {
        match self {
            ThresholdKind::Minimum { value }
            | ThresholdKind::Percentage { value }
            | ThresholdKind::Ranking { value }
            | ThresholdKind::Multiplier { value } => *value,
        }
    }
}

/// Eligibility gate evaluated before any stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mandatory_subjects: Vec<Subject>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub minimum_scores: BTreeMap<Subject, f64>,
    #[serde(default)]
    pub practical_test_required: bool,
    #[serde(default)]
    pub interview_required: bool,
    #[serde(default)]
    pub portfolio_required: bool,
    #[serde(default)]
    pub previous_degree_required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_parses_tagged_kind() {
        let threshold: Threshold = toml::from_str(
            r#"
type = "percentage"
value = 30
description = "30% of stage maximum"
"#,
        )
        .expect("threshold should parse");
        assert_eq!(threshold.kind, ThresholdKind::Percentage { value: 30.0 });
        assert_eq!(threshold.kind.value(), 30.0);
    }

    #[test]
    fn requirements_parse_subject_keyed_minimums() {
        let requirements: Requirements = toml::from_str(
            r#"
mandatory_subjects = ["BIO", "CHEM"]
practical_test_required = true

[minimum_scores]
BIO = 30
CHE = 30
"#,
        )
        .expect("requirements should parse");
        assert_eq!(
            requirements.mandatory_subjects,
            vec![Subject::Biology, Subject::Chemistry]
        );
        assert_eq!(requirements.minimum_scores.get(&Subject::Chemistry), Some(&30.0));
        assert!(requirements.practical_test_required);
        assert!(!requirements.interview_required);
    }

    #[test]
    fn bonus_rule_defaults_missing_points_to_zero() {
        let rule: BonusRule = serde_json::from_str(
            r#"{"id": "cert", "type": "certificate", "condition": "language certificates", "max_bonus": 100}"#,
        )
        .expect("bonus rule should parse");
        assert_eq!(rule.kind, BonusKind::Certificate);
        assert_eq!(rule.points, 0.0);
        assert_eq!(rule.max_bonus, Some(100.0));
    }
}
