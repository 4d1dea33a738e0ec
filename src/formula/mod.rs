//! Declarative admission formula: stages of weighted components, operations
//! over their values, bonus rules, eligibility requirements and metadata.
//!
//! The model carries no evaluation logic. Producers are responsible for its
//! shape; [`validate_formula`] reports problems before a formula is used.

pub mod rules;
pub mod stage;
pub mod subject;
mod validate;

pub use rules::{BonusKind, BonusRule, Requirements, Threshold, ThresholdKind};
pub use stage::{
    Component, ComponentKind, ComponentRole, ExamTask, ExamType, LevelCoefficients, Operation,
    OperationKind, PracticalExam, Stage,
};
pub use subject::{ComponentLevel, MaturaLevel, Subject, SubjectCode};
pub use validate::{validate_formula, FormulaIssue};

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const SCHEMA_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    #[serde(default = "default_version")]
    pub version: String,
    pub university_id: String,
    pub program_id: String,
    #[serde(rename = "type", default)]
    pub kind: FormulaType,
    pub stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bonuses: Vec<BonusRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
    pub metadata: Metadata,
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl Formula {
    pub fn validate(&self) -> Result<()> {
        match validate_formula(self).into_iter().next() {
            Some(issue) => Err(crate::error::RekrutError::InvalidFormula(issue.to_string())),
            None => Ok(()),
        }
    }

    /// SHA-256 over the canonical JSON encoding, for audit trails.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&bytes);
        Ok(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    pub fn stage(&self, id: &str) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.id == id)
    }
}

/// Shape tag. The calculator treats every type the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaType {
    #[default]
    Simple,
    #[serde(alias = "multiStage")]
    MultiStage,
    Conditional,
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_year_threshold: Option<f64>,
    /// Three-year average admission threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_threshold: Option<f64>,
    pub max_possible_score: f64,
    #[serde(default)]
    pub scoring_unit: ScoringUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_calculator_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
}

impl Metadata {
    pub fn new(description: impl Into<String>, max_possible_score: f64) -> Self {
        Self {
            description: description.into(),
            last_year_threshold: None,
            average_threshold: None,
            max_possible_score,
            scoring_unit: ScoringUnit::Points,
            official_calculator_url: None,
            notes: None,
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringUnit {
    #[default]
    Points,
    Percentage,
}
