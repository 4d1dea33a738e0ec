use crate::formula::{MaturaLevel, Requirements, Subject};
use crate::scores::CandidateScores;
use serde::Serialize;
use std::fmt;

/// Reason a candidate fails the eligibility gate. A normal result value, not
/// an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disqualification {
    MissingSubject {
        subject: Subject,
    },
    ScoreTooLow {
        subject: Subject,
        actual: f64,
        required: f64,
    },
    PracticalExamRequired,
    InterviewRequired,
    PortfolioRequired,
    PreviousDegreeRequired,
}

impl Disqualification {
    pub fn summary(&self) -> String {
        match self {
            Disqualification::MissingSubject { subject } => {
                format!("missing required subject: {subject}")
            }
            Disqualification::ScoreTooLow {
                subject,
                actual,
                required,
            } => format!("score too low for {subject}: {actual} < {required}"),
            Disqualification::PracticalExamRequired => "practical exam required".to_string(),
            Disqualification::InterviewRequired => "interview required".to_string(),
            Disqualification::PortfolioRequired => "portfolio required".to_string(),
            Disqualification::PreviousDegreeRequired => "previous degree required".to_string(),
        }
    }
}

impl fmt::Display for Disqualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// First failed gate, if any. Gates are checked in a fixed order: mandatory
/// subjects, minimum scores, practical exam, then (strict mode only) the
/// interview, portfolio and previous-degree flags.
pub(crate) fn check_requirements(
    requirements: &Requirements,
    scores: &CandidateScores,
    strict: bool,
) -> Option<Disqualification> {
    for subject in &requirements.mandatory_subjects {
        let extended = scores.percentage(*subject, MaturaLevel::Extended);
        let best = if extended > 0.0 {
            extended
        } else {
            scores.percentage(*subject, MaturaLevel::Basic)
        };
        if best <= 0.0 {
            return Some(Disqualification::MissingSubject { subject: *subject });
        }
    }

    for (subject, required) in &requirements.minimum_scores {
        let actual = scores.percentage(*subject, MaturaLevel::Extended);
        if actual < *required {
            return Some(Disqualification::ScoreTooLow {
                subject: *subject,
                actual,
                required: *required,
            });
        }
    }

    if requirements.practical_test_required && scores.practical_exams.is_empty() {
        return Some(Disqualification::PracticalExamRequired);
    }

    if strict {
        if requirements.interview_required && scores.interview.is_none() {
            return Some(Disqualification::InterviewRequired);
        }
        if requirements.portfolio_required && scores.portfolio.is_none() {
            return Some(Disqualification::PortfolioRequired);
        }
        if requirements.previous_degree_required && scores.previous_degree_gpa.is_none() {
            return Some(Disqualification::PreviousDegreeRequired);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn requiring(subjects: &[Subject]) -> Requirements {
        Requirements {
            mandatory_subjects: subjects.to_vec(),
            ..Requirements::default()
        }
    }

    #[test]
    fn mandatory_subject_falls_back_to_basic_level() {
        let scores = CandidateScores::new().with_matura(Subject::Mathematics, MaturaLevel::Basic, 64.0);
        assert_eq!(
            check_requirements(&requiring(&[Subject::Mathematics]), &scores, false),
            None
        );
    }

    #[test]
    fn zero_at_both_levels_counts_as_missing() {
        let scores = CandidateScores::new()
            .with_matura(Subject::Biology, MaturaLevel::Extended, 0.0)
            .with_matura(Subject::Biology, MaturaLevel::Basic, 0.0);
        let reason = check_requirements(&requiring(&[Subject::Biology]), &scores, false)
            .expect("biology should be missing");
        assert_eq!(reason.summary(), "missing required subject: BIO");
    }

    #[test]
    fn minimum_scores_only_read_the_extended_level() {
        let requirements = Requirements {
            minimum_scores: BTreeMap::from([(Subject::Chemistry, 30.0)]),
            ..Requirements::default()
        };
        let scores = CandidateScores::new()
            .with_matura(Subject::Chemistry, MaturaLevel::Basic, 90.0)
            .with_matura(Subject::Chemistry, MaturaLevel::Extended, 25.0);
        let reason = check_requirements(&requirements, &scores, false)
            .expect("extended chemistry is below the minimum");
        assert_eq!(reason.to_string(), "score too low for CHEM: 25 < 30");
    }

    #[test]
    fn practical_exam_requirement_needs_any_practical_score() {
        let requirements = Requirements {
            practical_test_required: true,
            ..Requirements::default()
        };
        assert_eq!(
            check_requirements(&requirements, &CandidateScores::new(), false),
            Some(Disqualification::PracticalExamRequired)
        );
        let scores = CandidateScores::new().with_practical("rysunek", 0.0);
        assert_eq!(check_requirements(&requirements, &scores, false), None);
    }

    #[test]
    fn interview_flag_is_only_enforced_in_strict_mode() {
        let requirements = Requirements {
            interview_required: true,
            ..Requirements::default()
        };
        let scores = CandidateScores::new();
        assert_eq!(check_requirements(&requirements, &scores, false), None);
        assert_eq!(
            check_requirements(&requirements, &scores, true),
            Some(Disqualification::InterviewRequired)
        );
    }
}
