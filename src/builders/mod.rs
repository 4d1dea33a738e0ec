//! Convenience constructors for common formula shapes. Builders only produce
//! [`Formula`] values; they know nothing about evaluation.

mod description;
pub mod expression;
pub mod presets;

pub use description::{describe, describe_stage};
pub use expression::parse_expression;
pub use presets::{preset, PRESET_NAMES};

use crate::formula::{
    BonusRule, Component, ComponentLevel, Formula, FormulaType, MaturaLevel, Metadata, Operation,
    OperationKind, PracticalExam, Requirements, Stage, Subject, SubjectCode, Threshold,
    SCHEMA_VERSION,
};

/// Subject marker stored on the slot component of an alternative group.
pub const GROUP_MARKER: &str = "ADDITIONAL";
pub const DEFAULT_STAGE_ID: &str = "main";
pub const DEFAULT_STAGE_NAME: &str = "Rekrutacja standardowa";

#[derive(Debug, Clone)]
pub struct FormulaBuilder {
    university_id: String,
    program_id: String,
    kind: FormulaType,
    stages: Vec<Stage>,
    bonuses: Vec<BonusRule>,
    requirements: Option<Requirements>,
    metadata: Metadata,
}

impl FormulaBuilder {
    pub fn new(university_id: impl Into<String>, program_id: impl Into<String>) -> Self {
        Self {
            university_id: university_id.into(),
            program_id: program_id.into(),
            kind: FormulaType::Simple,
            stages: Vec::new(),
            bonuses: Vec::new(),
            requirements: None,
            metadata: Metadata::new("", 100.0),
        }
    }

    pub fn kind(mut self, kind: FormulaType) -> Self {
        self.kind = kind;
        self
    }

    pub fn stage(mut self, stage: StageBuilder) -> Self {
        self.stages.push(stage.build());
        self
    }

    pub fn bonus(mut self, rule: BonusRule) -> Self {
        self.bonuses.push(rule);
        self
    }

    pub fn mandatory_subjects(mut self, subjects: impl IntoIterator<Item = Subject>) -> Self {
        self.requirements_mut().mandatory_subjects.extend(subjects);
        self
    }

    pub fn minimum_score(mut self, subject: Subject, minimum: f64) -> Self {
        self.requirements_mut().minimum_scores.insert(subject, minimum);
        self
    }

    pub fn requires_practical_test(mut self) -> Self {
        self.requirements_mut().practical_test_required = true;
        self
    }

    pub fn max_possible_score(mut self, max: f64) -> Self {
        self.metadata.max_possible_score = max;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = description.into();
        self
    }

    pub fn last_year_threshold(mut self, threshold: f64) -> Self {
        self.metadata.last_year_threshold = Some(threshold);
        self
    }

    pub fn average_threshold(mut self, threshold: f64) -> Self {
        self.metadata.average_threshold = Some(threshold);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.metadata.notes = Some(notes.into());
        self
    }

    /// Finishes the formula. An empty description is generated from the
    /// stages.
    pub fn build(self) -> Formula {
        let mut formula = Formula {
            version: SCHEMA_VERSION.to_string(),
            university_id: self.university_id,
            program_id: self.program_id,
            kind: self.kind,
            stages: self.stages,
            bonuses: self.bonuses,
            requirements: self.requirements,
            metadata: self.metadata,
        };
        if formula.metadata.description.is_empty() {
            formula.metadata.description = describe(&formula);
        }
        formula
    }

    fn requirements_mut(&mut self) -> &mut Requirements {
        self.requirements.get_or_insert_with(Requirements::default)
    }
}

#[derive(Debug, Clone)]
pub struct StageBuilder {
    stage: Stage,
}

impl StageBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_points: f64) -> Self {
        Self {
            stage: Stage::new(id, name, max_points),
        }
    }

    /// The usual single-stage shape: `main`, 100 points.
    pub fn standard() -> Self {
        Self::new(DEFAULT_STAGE_ID, DEFAULT_STAGE_NAME, 100.0)
    }

    pub fn component(mut self, component: Component) -> Self {
        self.stage.components.push(component);
        self
    }

    /// Matura component on the 0-100 scale.
    pub fn exam(
        self,
        id: impl Into<String>,
        subject: Subject,
        level: MaturaLevel,
        weight: f64,
    ) -> Self {
        self.component(Component::matura(id, subject, level, weight).with_max_score(100.0))
    }

    /// Exam whose subject may be replaced by the best of `alternatives`. The
    /// primary stays counted and is overwritten by a `max` over itself and
    /// the raw-only alternatives.
    pub fn exam_or_best(
        self,
        id: &str,
        subject: Subject,
        alternatives: &[Subject],
        level: MaturaLevel,
        weight: f64,
    ) -> Self {
        let primary = Component::matura(id, subject, level, weight)
            .with_max_score(100.0)
            .with_alternatives(alternatives.iter().copied());
        self.component(primary)
            .alternatives(id, alternatives, level, weight, true)
    }

    /// Group slot scored as the best of `subjects`.
    pub fn best_of(self, id: &str, subjects: &[Subject], level: MaturaLevel, weight: f64) -> Self {
        self.best_of_at(id, subjects, ComponentLevel::from(level), weight)
    }

    pub(crate) fn best_of_at(
        self,
        id: &str,
        subjects: &[Subject],
        level: ComponentLevel,
        weight: f64,
    ) -> Self {
        let slot = Component::matura(
            id,
            SubjectCode::Group(GROUP_MARKER.to_string()),
            level.clone(),
            weight,
        )
        .with_max_score(100.0)
        .with_alternatives(subjects.iter().copied());
        self.component(slot)
            .alternatives(id, subjects, level, weight, false)
    }

    fn alternatives(
        mut self,
        id: &str,
        subjects: &[Subject],
        level: impl Into<ComponentLevel>,
        weight: f64,
        include_primary: bool,
    ) -> Self {
        let level = level.into();
        let mut operands = Vec::with_capacity(subjects.len() + 1);
        if include_primary {
            operands.push(id.to_string());
        }
        for subject in subjects {
            let alternative_id = alternative_id(id, *subject);
            self.stage.components.push(
                Component::matura(alternative_id.clone(), *subject, level.clone(), weight)
                    .with_max_score(100.0)
                    .raw_only(),
            );
            operands.push(alternative_id);
        }
        let operation_id = format!("op{}", self.stage.operations.len() + 1);
        self.operation(Operation::new(operation_id, OperationKind::Max, operands).storing_as(id))
    }

    /// Practical exam with its descriptor. The component takes the
    /// descriptor's id.
    pub fn practical(mut self, exam: PracticalExam, weight: f64, min_score: Option<f64>) -> Self {
        let mut component = Component::practical(exam.id.clone(), weight)
            .required()
            .with_max_score(exam.max_points);
        component.min_score = min_score;
        self.stage.components.push(component);
        self.stage.practical_exams.push(exam);
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.stage.operations.push(operation);
        self
    }

    pub fn threshold(mut self, threshold: Threshold) -> Self {
        self.stage.threshold = Some(threshold);
        self
    }

    pub fn coefficient(mut self, coefficient: f64) -> Self {
        self.stage.coefficient = Some(coefficient);
        self
    }

    pub fn build(self) -> Stage {
        self.stage
    }
}

/// Id of the raw-only component scoring one alternative of a group.
pub fn alternative_id(group_id: &str, subject: Subject) -> String {
    format!("{group_id}_{}", subject.code().to_lowercase())
}

/// Single-stage weighted sum of matura results, components `c1`, `c2`, ...
pub fn simple_formula(
    university_id: impl Into<String>,
    program_id: impl Into<String>,
    components: &[(Subject, MaturaLevel, f64)],
    mandatory: &[Subject],
    last_year_threshold: Option<f64>,
) -> Formula {
    let stage = components.iter().enumerate().fold(
        StageBuilder::standard(),
        |stage, (index, (subject, level, weight))| {
            let mut component =
                Component::matura(format!("c{}", index + 1), *subject, *level, *weight)
                    .with_max_score(100.0);
            component.required = mandatory.contains(subject);
            stage.component(component)
        },
    );
    let mut builder = FormulaBuilder::new(university_id, program_id).stage(stage);
    if !mandatory.is_empty() {
        builder = builder.mandatory_subjects(mandatory.iter().copied());
    }
    if let Some(threshold) = last_year_threshold {
        builder = builder.last_year_threshold(threshold);
    }
    builder.build()
}
