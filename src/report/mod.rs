pub mod json;
pub mod md;
pub mod outlook;

pub use outlook::{AdmissionChance, Outlook};

use crate::calculator::CalculationResult;
use crate::error::{RekrutError, Result};
use crate::formula::Formula;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Md,
}

/// One evaluation with the formula context a reader needs to audit it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub university_id: String,
    pub program_id: String,
    pub description: String,
    pub fingerprint: String,
    pub max_possible_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disqualification_reason: Option<String>,
    pub outlook: Outlook,
    pub result: CalculationResult,
}

impl EvaluationReport {
    pub fn new(formula: &Formula, result: CalculationResult) -> Result<Self> {
        Ok(Self {
            university_id: formula.university_id.clone(),
            program_id: formula.program_id.clone(),
            description: formula.metadata.description.clone(),
            fingerprint: formula.fingerprint()?,
            max_possible_score: formula.metadata.max_possible_score,
            disqualification_reason: result.disqualification_reason(),
            outlook: Outlook::from_result(&result, &formula.metadata),
            result,
        })
    }
}

/// `decimals` only affects Markdown; JSON keeps full precision.
pub fn render(report: &EvaluationReport, format: OutputFormat, decimals: usize) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(RekrutError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report, decimals)),
    }
}
