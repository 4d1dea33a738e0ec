use super::rules::Threshold;
use super::subject::{ComponentLevel, Subject, SubjectCode};
use serde::{Deserialize, Serialize};

/// One phase of recruitment. Components are scored in declaration order and
/// operations run afterwards against the same working values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub practical_exams: Vec<PracticalExam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficient: Option<f64>,
    pub max_points: f64,
}

impl Stage {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_points: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            components: Vec::new(),
            operations: Vec::new(),
            practical_exams: Vec::new(),
            threshold: None,
            coefficient: None,
            max_points,
        }
    }

    /// Stage weight in the overall total.
    pub fn coefficient(&self) -> f64 {
        self.coefficient.unwrap_or(1.0)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|component| component.id == id)
    }
}

/// One scored element within a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    #[serde(flatten)]
    pub kind: ComponentKind,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
    /// Declared alternative subjects. Scoring them is the job of separate
    /// raw-only components combined by a `max` operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Subject>,
    /// Post-weight floor; a weighted value below it contributes zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    /// Pre-weight ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "ComponentRole::is_counted")]
    pub role: ComponentRole,
}

fn default_weight() -> f64 {
    1.0
}

impl Component {
    pub fn new(id: impl Into<String>, kind: ComponentKind, weight: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            weight,
            required: false,
            alternatives: Vec::new(),
            min_score: None,
            max_score: None,
            role: ComponentRole::Counted,
        }
    }

    pub fn matura(
        id: impl Into<String>,
        subject: impl Into<SubjectCode>,
        level: impl Into<ComponentLevel>,
        weight: f64,
    ) -> Self {
        Self::new(
            id,
            ComponentKind::MaturaExam {
                subject: subject.into(),
                level: level.into(),
                level_coefficients: None,
            },
            weight,
        )
    }

    pub fn practical(id: impl Into<String>, weight: f64) -> Self {
        Self::new(id, ComponentKind::PracticalExam, weight)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn raw_only(mut self) -> Self {
        self.role = ComponentRole::RawOnly;
        self
    }

    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn with_max_score(mut self, max_score: f64) -> Self {
        self.max_score = Some(max_score);
        self
    }

    pub fn with_alternatives(mut self, alternatives: impl IntoIterator<Item = Subject>) -> Self {
        self.alternatives = alternatives.into_iter().collect();
        self
    }

    /// Ignored for non-exam components.
    pub fn with_level_coefficients(mut self, coefficients: LevelCoefficients) -> Self {
        if let ComponentKind::MaturaExam {
            level_coefficients, ..
        } = &mut self.kind
        {
            *level_coefficients = Some(coefficients);
        }
        self
    }

    pub fn counts_toward_total(&self) -> bool {
        self.role == ComponentRole::Counted
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentKind {
    MaturaExam {
        subject: SubjectCode,
        #[serde(default)]
        level: ComponentLevel,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level_coefficients: Option<LevelCoefficients>,
    },
    PracticalExam,
    Interview,
    Portfolio,
    PreviousDegree,
    Olympiad,
    Certificate,
}

impl ComponentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::MaturaExam { .. } => "matura_exam",
            ComponentKind::PracticalExam => "practical_exam",
            ComponentKind::Interview => "interview",
            ComponentKind::Portfolio => "portfolio",
            ComponentKind::PreviousDegree => "previous_degree",
            ComponentKind::Olympiad => "olympiad",
            ComponentKind::Certificate => "certificate",
        }
    }
}

/// Whether a component's value is summed into the stage total or only feeds
/// operations (for example one alternative of a `max` group).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRole {
    #[default]
    Counted,
    RawOnly,
}

impl ComponentRole {
    fn is_counted(&self) -> bool {
        *self == ComponentRole::Counted
    }
}

/// Per-level multipliers for an exam component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelCoefficients {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bilingual: Option<f64>,
    /// Reserved for IB/EB conversions; not applied by the calculator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international: Option<f64>,
}

/// Post-processing step over values already computed in the stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    #[serde(flatten)]
    pub kind: OperationKind,
    pub component_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
}

impl Operation {
    pub fn new(
        id: impl Into<String>,
        kind: OperationKind,
        component_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            component_ids: component_ids.into_iter().map(Into::into).collect(),
            result_id: None,
        }
    }

    pub fn storing_as(mut self, result_id: impl Into<String>) -> Self {
        self.result_id = Some(result_id.into());
        self
    }
}

/// Operation variants. `multiply` takes the product of its operands times
/// `factor`; `divide` takes the sum of its operands over `divisor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationKind {
    Max,
    Min,
    Sum,
    Average,
    Multiply {
        #[serde(default = "default_operand", alias = "value")]
        factor: f64,
    },
    Divide {
        #[serde(default = "default_operand", alias = "value")]
        divisor: f64,
    },
    /// Placeholder: yields the first present operand.
    Conditional,
    Threshold {
        #[serde(default, alias = "value")]
        minimum: f64,
    },
}

fn default_operand() -> f64 {
    1.0
}

impl OperationKind {
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Max => "max",
            OperationKind::Min => "min",
            OperationKind::Sum => "sum",
            OperationKind::Average => "average",
            OperationKind::Multiply { .. } => "multiply",
            OperationKind::Divide { .. } => "divide",
            OperationKind::Conditional => "conditional",
            OperationKind::Threshold { .. } => "threshold",
        }
    }
}

/// Informational description of a practical test scored by a
/// `practical_exam` component with the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticalExam {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ExamType,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<ExamTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    pub max_points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    Drawing,
    Sculpture,
    Aptitude,
    Physical,
    Musical,
    Portfolio,
    Interview,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamTask {
    pub name: String,
    pub points: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::subject::MaturaLevel;

    #[test]
    fn component_parses_flattened_exam_payload() {
        let component: Component = toml::from_str(
            r#"
id = "mat"
type = "matura_exam"
subject = "MAT"
level = "R"
weight = 0.5
max_score = 100

[level_coefficients]
basic = 0.4
extended = 1.0
bilingual = 1.3
"#,
        )
        .expect("component should parse");

        assert_eq!(component.weight, 0.5);
        assert!(component.counts_toward_total());
        match component.kind {
            ComponentKind::MaturaExam {
                subject,
                level,
                level_coefficients,
            } => {
                assert_eq!(subject, SubjectCode::Subject(Subject::Mathematics));
                assert_eq!(level.lookup_level(), MaturaLevel::Extended);
                assert_eq!(
                    level_coefficients.and_then(|coefficients| coefficients.bilingual),
                    Some(1.3)
                );
            }
            other => panic!("expected matura exam, got {}", other.label()),
        }
    }

    #[test]
    fn component_rejects_unknown_subject_code() {
        let result: Result<Component, _> = serde_json::from_str(
            r#"{"id": "x", "type": "matura_exam", "subject": "ASTRO", "level": "R", "weight": 1}"#,
        );
        let err = result.expect_err("unknown subject should be rejected");
        assert!(err.to_string().contains("unknown subject code"));
    }

    #[test]
    fn operation_accepts_value_alias_for_operands() {
        let operation: Operation = serde_json::from_str(
            r#"{"id": "op", "type": "divide", "component_ids": ["a", "b"], "value": 2.0, "result_id": "avg"}"#,
        )
        .expect("operation should parse");
        assert_eq!(operation.kind, OperationKind::Divide { divisor: 2.0 });
        assert_eq!(operation.result_id.as_deref(), Some("avg"));

        let multiply: Operation =
            serde_json::from_str(r#"{"id": "m", "type": "multiply", "component_ids": ["a"]}"#)
                .expect("multiply without value should parse");
        assert_eq!(multiply.kind, OperationKind::Multiply { factor: 1.0 });
    }

    #[test]
    fn raw_only_role_round_trips_and_counted_is_omitted() {
        let component = Component::matura("alt_fiz", Subject::Physics, MaturaLevel::Extended, 0.3)
            .raw_only();
        let json = serde_json::to_string(&component).expect("component should serialize");
        assert!(json.contains("\"role\":\"raw_only\""));

        let counted = Component::practical("psp", 1.0);
        let json = serde_json::to_string(&counted).expect("component should serialize");
        assert!(!json.contains("role"));
    }
}
