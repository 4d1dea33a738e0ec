//! Normalized candidate input: matura percentages per subject and level plus
//! the optional practical, interview, portfolio, degree, olympiad and
//! certificate evidence.

pub mod convert;

use crate::error::{RekrutError, Result};
use crate::formula::{MaturaLevel, Subject};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateScores {
    /// Percentages (0-100) keyed by subject code.
    #[serde(default)]
    pub matura: BTreeMap<Subject, LevelScores>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub practical_exams: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<f64>,
    /// Grade point average on a 0-10 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_degree_gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub olympiads: Vec<OlympiadResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub bilingual: bool,
    #[serde(default)]
    pub exam_system: ExamSystem,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended: Option<f64>,
}

impl CandidateScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matura(mut self, subject: Subject, level: MaturaLevel, percentage: f64) -> Self {
        self.set_matura(subject, level, percentage);
        self
    }

    pub fn set_matura(&mut self, subject: Subject, level: MaturaLevel, percentage: f64) {
        let entry = self.matura.entry(subject).or_default();
        match level {
            MaturaLevel::Basic => entry.basic = Some(percentage),
            MaturaLevel::Extended => entry.extended = Some(percentage),
        }
    }

    pub fn with_practical(mut self, exam_id: impl Into<String>, score: f64) -> Self {
        self.practical_exams.insert(exam_id.into(), score);
        self
    }

    /// Result for a subject at a level, if the candidate has one.
    pub fn matura_result(&self, subject: Subject, level: MaturaLevel) -> Option<f64> {
        let scores = self.matura.get(&subject)?;
        match level {
            MaturaLevel::Basic => scores.basic,
            MaturaLevel::Extended => scores.extended,
        }
    }

    /// Percentage used for scoring; an absent result counts as zero.
    pub fn percentage(&self, subject: Subject, level: MaturaLevel) -> f64 {
        self.matura_result(subject, level).unwrap_or(0.0)
    }

    pub fn practical_score(&self, exam_id: &str) -> Option<f64> {
        self.practical_exams.get(exam_id).copied()
    }

    /// Checks the 0-100 percentage domain. The calculator never calls this;
    /// it is meant for data-entry boundaries.
    pub fn validate(&self) -> Result<()> {
        for (subject, scores) in &self.matura {
            for (level, value) in [
                (MaturaLevel::Basic, scores.basic),
                (MaturaLevel::Extended, scores.extended),
            ] {
                if let Some(value) = value {
                    if !(0.0..=100.0).contains(&value) {
                        return Err(RekrutError::InvalidScores(format!(
                            "{subject} ({}) must be between 0 and 100 (found {value})",
                            level.code()
                        )));
                    }
                }
            }
        }
        if let Some(gpa) = self.previous_degree_gpa {
            if !(0.0..=10.0).contains(&gpa) {
                return Err(RekrutError::InvalidScores(format!(
                    "previous_degree_gpa must be between 0 and 10 (found {gpa})"
                )));
            }
        }
        for (exam_id, score) in &self.practical_exams {
            if !score.is_finite() || *score < 0.0 {
                return Err(RekrutError::InvalidScores(format!(
                    "practical exam {exam_id} must be a non-negative number"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OlympiadResult {
    pub name: String,
    pub level: OlympiadLevel,
    #[serde(default)]
    pub subject: String,
}

/// Achievement tier of an olympiad result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OlympiadLevel {
    CentralWinner,
    CentralFinalist,
    RegionalWinner,
    RegionalFinalist,
}

impl OlympiadLevel {
    pub fn bonus_points(self) -> f64 {
        match self {
            OlympiadLevel::CentralWinner => 200.0,
            OlympiadLevel::CentralFinalist => 100.0,
            OlympiadLevel::RegionalWinner => 50.0,
            OlympiadLevel::RegionalFinalist => 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Exam system the candidate's results originally came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamSystem {
    #[default]
    Polish,
    Ib,
    Eb,
    Foreign,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_parse_from_toml() {
        let scores: CandidateScores = toml::from_str(
            r#"
bilingual = true
exam_system = "polish"
interview = 42

[matura.MAT]
extended = 80
basic = 95

[matura.ANG]
extended = 70

[practical_exams]
psp = 140

[[olympiads]]
name = "Olimpiada Matematyczna"
level = "central_finalist"
subject = "MAT"

[[certificates]]
type = "CAE"
level = "C1"
"#,
        )
        .expect("scores should parse");

        assert!(scores.bilingual);
        assert_eq!(scores.percentage(Subject::Mathematics, MaturaLevel::Extended), 80.0);
        assert_eq!(scores.percentage(Subject::Mathematics, MaturaLevel::Basic), 95.0);
        assert_eq!(
            scores.matura_result(Subject::ForeignLanguage, MaturaLevel::Extended),
            Some(70.0)
        );
        assert_eq!(scores.percentage(Subject::Physics, MaturaLevel::Extended), 0.0);
        assert_eq!(scores.practical_score("psp"), Some(140.0));
        assert_eq!(scores.interview, Some(42.0));
        assert_eq!(scores.olympiads[0].level.bonus_points(), 100.0);
        assert_eq!(scores.certificates.len(), 1);
    }

    #[test]
    fn validate_rejects_out_of_range_percentages() {
        let scores = CandidateScores::new().with_matura(Subject::Biology, MaturaLevel::Extended, 120.0);
        let err = scores.validate().expect_err("120% should be rejected");
        assert!(err.to_string().contains("BIO (R) must be between 0 and 100"));

        let ok = CandidateScores::new().with_matura(Subject::Biology, MaturaLevel::Basic, 100.0);
        assert!(ok.validate().is_ok());
    }
}
