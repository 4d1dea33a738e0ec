use crate::formula::{Component, ComponentKind, ComponentLevel, LevelCoefficients};
use crate::scores::CandidateScores;

/// Points a single component contributes before any operation runs.
///
/// Absent candidate data scores zero. Olympiads and certificates only ever
/// earn points through bonus rules.
pub(crate) fn score_component(component: &Component, scores: &CandidateScores) -> f64 {
    let raw = match &component.kind {
        ComponentKind::MaturaExam {
            subject,
            level,
            level_coefficients,
        } => {
            let Some(subject) = subject.subject() else {
                return 0.0;
            };
            let percentage = scores.percentage(subject, level.lookup_level());
            let multiplier = level_coefficients
                .as_ref()
                .map_or(1.0, |coefficients| {
                    level_multiplier(coefficients, level, scores.bilingual)
                });
            percentage * multiplier
        }
        ComponentKind::PracticalExam => scores.practical_score(&component.id).unwrap_or(0.0),
        ComponentKind::Interview => scores.interview.unwrap_or(0.0),
        ComponentKind::Portfolio => scores.portfolio.unwrap_or(0.0),
        ComponentKind::PreviousDegree => scores.previous_degree_gpa.map_or(0.0, |gpa| gpa * 10.0),
        ComponentKind::Olympiad | ComponentKind::Certificate => 0.0,
    };

    let weighted = raw * component.weight;
    if let Some(min_score) = component.min_score {
        if weighted < min_score {
            return 0.0;
        }
    }
    match component.max_score {
        Some(max_score) => weighted.min(max_score * component.weight),
        None => weighted,
    }
}

fn level_multiplier(coefficients: &LevelCoefficients, level: &ComponentLevel, bilingual: bool) -> f64 {
    if bilingual {
        if let Some(coefficient) = coefficients.bilingual {
            return coefficient;
        }
    }
    let declared = match level {
        ComponentLevel::Extended => coefficients.extended,
        ComponentLevel::Basic => coefficients.basic,
        ComponentLevel::Marker(_) => None,
    };
    declared.unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{MaturaLevel, Subject, SubjectCode};

    fn candidate() -> CandidateScores {
        CandidateScores::new()
            .with_matura(Subject::Mathematics, MaturaLevel::Extended, 80.0)
            .with_matura(Subject::Mathematics, MaturaLevel::Basic, 96.0)
    }

    #[test]
    fn exam_component_is_weighted_and_capped_before_weighting() {
        let component = Component::matura("mat", Subject::Mathematics, MaturaLevel::Extended, 0.5)
            .with_max_score(100.0);
        assert_eq!(score_component(&component, &candidate()), 40.0);

        let capped = Component::matura("mat", Subject::Mathematics, MaturaLevel::Extended, 2.0)
            .with_max_score(60.0);
        assert_eq!(score_component(&capped, &candidate()), 120.0);
    }

    #[test]
    fn only_p_reads_the_basic_result() {
        let basic = Component::matura("mat_p", Subject::Mathematics, MaturaLevel::Basic, 1.0);
        assert_eq!(score_component(&basic, &candidate()), 96.0);

        let mixed = Component::matura(
            "mat_x",
            Subject::Mathematics,
            ComponentLevel::Marker("mixed".to_string()),
            1.0,
        );
        assert_eq!(score_component(&mixed, &candidate()), 80.0);
    }

    #[test]
    fn min_score_is_a_hard_floor_on_the_weighted_value() {
        let component = Component::matura("mat", Subject::Mathematics, MaturaLevel::Extended, 1.0)
            .with_min_score(60.0);
        let scores = CandidateScores::new().with_matura(Subject::Mathematics, MaturaLevel::Extended, 50.0);
        assert_eq!(score_component(&component, &scores), 0.0);
    }

    #[test]
    fn bilingual_coefficient_wins_over_level_coefficient() {
        let coefficients = LevelCoefficients {
            basic: Some(0.5),
            extended: Some(1.0),
            bilingual: Some(1.2),
            international: None,
        };
        let component = Component::matura("ang", Subject::ForeignLanguage, MaturaLevel::Extended, 1.0)
            .with_level_coefficients(coefficients.clone());
        let mut scores = CandidateScores::new().with_matura(
            Subject::ForeignLanguage,
            MaturaLevel::Extended,
            50.0,
        );
        assert_eq!(score_component(&component, &scores), 50.0);

        scores.bilingual = true;
        assert_eq!(score_component(&component, &scores), 60.0);

        let basic = Component::matura("ang_p", Subject::ForeignLanguage, MaturaLevel::Basic, 1.0)
            .with_level_coefficients(LevelCoefficients {
                bilingual: None,
                ..coefficients
            });
        scores.set_matura(Subject::ForeignLanguage, MaturaLevel::Basic, 90.0);
        assert_eq!(score_component(&basic, &scores), 45.0);
    }

    #[test]
    fn group_markers_and_bonus_only_kinds_score_zero() {
        let group = Component::matura(
            "grupa",
            SubjectCode::Group("GROUP1".to_string()),
            MaturaLevel::Extended,
            1.0,
        );
        assert_eq!(score_component(&group, &candidate()), 0.0);

        let olympiad = Component::new("olimp", ComponentKind::Olympiad, 1.0);
        assert_eq!(score_component(&olympiad, &candidate()), 0.0);
    }

    #[test]
    fn non_exam_components_read_their_own_inputs() {
        let mut scores = CandidateScores::new().with_practical("rysunek", 75.0);
        scores.interview = Some(18.0);
        scores.previous_degree_gpa = Some(4.5);

        assert_eq!(score_component(&Component::practical("rysunek", 2.0), &scores), 150.0);
        assert_eq!(score_component(&Component::practical("rzezba", 2.0), &scores), 0.0);
        assert_eq!(
            score_component(&Component::new("rozmowa", ComponentKind::Interview, 1.0), &scores),
            18.0
        );
        assert_eq!(
            score_component(&Component::new("dyplom", ComponentKind::PreviousDegree, 1.0), &scores),
            45.0
        );
        assert_eq!(
            score_component(&Component::new("teczka", ComponentKind::Portfolio, 1.0), &scores),
            0.0
        );
    }
}
