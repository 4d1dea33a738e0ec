//! Ready-made formulas for common program families.

use super::{FormulaBuilder, StageBuilder};
use crate::error::{RekrutError, Result};
use crate::formula::{
    Component, ExamTask, ExamType, Formula, FormulaType, MaturaLevel, PracticalExam, Subject,
    Threshold,
};

pub const PRESET_NAMES: [&str; 5] = ["it", "law", "medicine", "architecture", "psychology"];

pub fn preset(name: &str, university_id: &str, program_id: &str) -> Result<Formula> {
    let formula = match name.trim().to_lowercase().as_str() {
        "it" => it(university_id, program_id),
        "law" => law(university_id, program_id),
        "medicine" => medicine(university_id, program_id),
        "architecture" => architecture(university_id, program_id),
        "psychology" => psychology(university_id, program_id),
        _ => return Err(RekrutError::UnknownPreset(name.to_string())),
    };
    Ok(formula)
}

pub fn it(university_id: &str, program_id: &str) -> Formula {
    FormulaBuilder::new(university_id, program_id)
        .stage(
            StageBuilder::standard()
                .component(
                    Component::matura("mat", Subject::Mathematics, MaturaLevel::Extended, 0.5)
                        .with_max_score(100.0)
                        .required(),
                )
                .exam_or_best(
                    "inf",
                    Subject::ComputerScience,
                    &[Subject::Physics, Subject::Chemistry],
                    MaturaLevel::Extended,
                    0.3,
                )
                .exam("ang", Subject::ForeignLanguage, MaturaLevel::Extended, 0.2),
        )
        .mandatory_subjects([Subject::Mathematics, Subject::ForeignLanguage])
        .last_year_threshold(85.5)
        .average_threshold(83.0)
        .build()
}

pub fn law(university_id: &str, program_id: &str) -> Formula {
    FormulaBuilder::new(university_id, program_id)
        .stage(
            StageBuilder::standard()
                .exam("pol", Subject::Polish, MaturaLevel::Extended, 0.4)
                .exam("his", Subject::History, MaturaLevel::Extended, 0.3)
                .exam("wos", Subject::SocialStudies, MaturaLevel::Extended, 0.3),
        )
        .mandatory_subjects([Subject::Polish])
        .last_year_threshold(92.0)
        .average_threshold(90.0)
        .build()
}

pub fn medicine(university_id: &str, program_id: &str) -> Formula {
    FormulaBuilder::new(university_id, program_id)
        .stage(
            StageBuilder::standard()
                .exam("bio", Subject::Biology, MaturaLevel::Extended, 0.4)
                .exam("chem", Subject::Chemistry, MaturaLevel::Extended, 0.4)
                .exam_or_best(
                    "mat",
                    Subject::Mathematics,
                    &[Subject::Physics],
                    MaturaLevel::Extended,
                    0.2,
                ),
        )
        .mandatory_subjects([Subject::Biology, Subject::Chemistry])
        .minimum_score(Subject::Biology, 30.0)
        .minimum_score(Subject::Chemistry, 30.0)
        .last_year_threshold(95.0)
        .average_threshold(93.0)
        .build()
}

/// Practical drawing exam gated by a 30-point stage minimum.
pub fn architecture(university_id: &str, program_id: &str) -> Formula {
    let drawing = PracticalExam {
        id: "drawing_test".to_string(),
        name: "Egzamin z rysunku".to_string(),
        kind: ExamType::Drawing,
        weight: 1.0,
        tasks: vec![
            ExamTask {
                name: "Rysunek odręczny".to_string(),
                points: 50.0,
                duration_minutes: Some(120),
            },
            ExamTask {
                name: "Kompozycja przestrzenna".to_string(),
                points: 50.0,
                duration_minutes: Some(120),
            },
        ],
        min_score: Some(30.0),
        max_points: 100.0,
        description: Some(
            "Sprawdzenie predyspozycji plastycznych i wyobraźni przestrzennej".to_string(),
        ),
    };

    FormulaBuilder::new(university_id, program_id)
        .kind(FormulaType::Mixed)
        .stage(
            StageBuilder::new("main", "Rekrutacja z egzaminem praktycznym", 100.0)
                .practical(drawing, 0.5, Some(30.0))
                .exam("mat", Subject::Mathematics, MaturaLevel::Extended, 0.3)
                .best_of(
                    "additional",
                    &[
                        Subject::Physics,
                        Subject::ComputerScience,
                        Subject::Geography,
                        Subject::History,
                    ],
                    MaturaLevel::Extended,
                    0.2,
                )
                .threshold(
                    Threshold::minimum(30.0).described("Minimum 30% z egzaminu praktycznego"),
                ),
        )
        .mandatory_subjects([Subject::Mathematics])
        .requires_practical_test()
        .last_year_threshold(75.0)
        .average_threshold(72.0)
        .notes("Wymagany egzamin z rysunku")
        .build()
}

pub fn psychology(university_id: &str, program_id: &str) -> Formula {
    FormulaBuilder::new(university_id, program_id)
        .stage(
            StageBuilder::standard()
                .exam("bio", Subject::Biology, MaturaLevel::Extended, 0.5)
                .best_of(
                    "additional",
                    &[
                        Subject::Mathematics,
                        Subject::Polish,
                        Subject::History,
                        Subject::SocialStudies,
                    ],
                    MaturaLevel::Extended,
                    0.3,
                )
                .exam("pol", Subject::Polish, MaturaLevel::Basic, 0.2),
        )
        .mandatory_subjects([Subject::Biology, Subject::Polish])
        .last_year_threshold(88.0)
        .average_threshold(85.0)
        .build()
}
