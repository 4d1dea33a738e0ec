use crate::calculator::CalculationResult;
use crate::formula::Metadata;
use serde::Serialize;
use std::fmt;

/// Rough admission chance against last year's threshold. Presentation only;
/// the engine never ranks candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionChance {
    Likely,
    Borderline,
    Unlikely,
    Unknown,
    Ineligible,
}

impl AdmissionChance {
    pub fn label(self) -> &'static str {
        match self {
            AdmissionChance::Likely => "likely",
            AdmissionChance::Borderline => "borderline",
            AdmissionChance::Unlikely => "unlikely",
            AdmissionChance::Unknown => "unknown",
            AdmissionChance::Ineligible => "ineligible",
        }
    }
}

impl fmt::Display for AdmissionChance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlook {
    pub chance: AdmissionChance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    /// `total / threshold`; above 1.0 means last year's bar was cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl Outlook {
    pub fn from_result(result: &CalculationResult, metadata: &Metadata) -> Self {
        let threshold = metadata
            .last_year_threshold
            .filter(|threshold| *threshold > 0.0);
        if !result.meets_requirements {
            return Self {
                chance: AdmissionChance::Ineligible,
                threshold,
                progress: None,
            };
        }
        let progress = threshold.map(|threshold| result.total_score / threshold);
        let chance = match progress {
            Some(progress) if progress >= 1.0 => AdmissionChance::Likely,
            Some(progress) if progress >= 0.8 => AdmissionChance::Borderline,
            Some(_) => AdmissionChance::Unlikely,
            None => AdmissionChance::Unknown,
        };
        Self {
            chance,
            threshold,
            progress,
        }
    }

    /// `+7%` above the threshold, `93%` of it, or exactly `100%`.
    pub fn progress_text(&self) -> Option<String> {
        let progress = self.progress?;
        let text = if progress > 1.0 {
            format!("+{}%", whole_percent(progress - 1.0))
        } else if progress < 1.0 {
            format!("{}%", whole_percent(progress))
        } else {
            "100%".to_string()
        };
        Some(text)
    }
}

fn whole_percent(fraction: f64) -> i64 {
    (fraction * 100.0 + 1e-6).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Breakdown, Disqualification};

    fn result(total: f64) -> CalculationResult {
        CalculationResult {
            total_score: total,
            stage_results: Vec::new(),
            bonus_points: 0.0,
            bonuses: Vec::new(),
            meets_requirements: true,
            disqualification: None,
            breakdown: Breakdown::default(),
        }
    }

    fn metadata(threshold: Option<f64>) -> Metadata {
        let mut metadata = Metadata::new("test", 100.0);
        metadata.last_year_threshold = threshold;
        metadata
    }

    #[test]
    fn chance_bands_follow_progress() {
        let above = Outlook::from_result(&result(85.6), &metadata(Some(80.0)));
        assert_eq!(above.chance, AdmissionChance::Likely);
        assert_eq!(above.progress_text().as_deref(), Some("+7%"));

        let near = Outlook::from_result(&result(74.4), &metadata(Some(80.0)));
        assert_eq!(near.chance, AdmissionChance::Borderline);
        assert_eq!(near.progress_text().as_deref(), Some("93%"));

        let far = Outlook::from_result(&result(40.0), &metadata(Some(80.0)));
        assert_eq!(far.chance, AdmissionChance::Unlikely);

        let exact = Outlook::from_result(&result(80.0), &metadata(Some(80.0)));
        assert_eq!(exact.progress_text().as_deref(), Some("100%"));
    }

    #[test]
    fn missing_or_zero_threshold_is_unknown() {
        let none = Outlook::from_result(&result(50.0), &metadata(None));
        assert_eq!(none.chance, AdmissionChance::Unknown);
        assert_eq!(none.progress_text(), None);

        let zero = Outlook::from_result(&result(50.0), &metadata(Some(0.0)));
        assert_eq!(zero.chance, AdmissionChance::Unknown);
    }

    #[test]
    fn disqualified_candidates_are_ineligible() {
        let mut disqualified = result(0.0);
        disqualified.meets_requirements = false;
        disqualified.disqualification = Some(Disqualification::PracticalExamRequired);
        let outlook = Outlook::from_result(&disqualified, &metadata(Some(80.0)));
        assert_eq!(outlook.chance, AdmissionChance::Ineligible);
        assert_eq!(outlook.progress, None);
    }
}
