//! Evaluates a [`Formula`] against [`CandidateScores`].
//!
//! Evaluation is a pure function of its two inputs: requirement gate, stages
//! in order (component scoring, operations, threshold), bonuses, then the
//! final cap at `metadata.max_possible_score`. It never fails; eligibility
//! problems come back as a [`Disqualification`] inside the result.

mod accumulator;
mod bonus;
mod component;
mod requirements;
mod result;
mod threshold;

pub use accumulator::StageAccumulator;
pub use bonus::BonusAward;
pub use requirements::Disqualification;
pub use result::{Breakdown, CalculationResult, ComponentScore, StageResult};
pub use threshold::passes;

use crate::formula::{Formula, Stage};
use crate::scores::CandidateScores;
use bonus::award_bonuses;
use component::score_component;
use requirements::check_requirements;
use tracing::{debug, info};

/// Switches for behavior beyond the base evaluation rules. The default
/// leaves both off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Also enforce the interview, portfolio and previous-degree flags.
    pub strict_requirements: bool,
    /// Clamp each stage score to the stage's `max_points`.
    pub cap_stage_scores: bool,
}

/// Stateless evaluator configured with [`EngineOptions`].
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    options: EngineOptions,
}

impl Calculator {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn evaluate(&self, formula: &Formula, scores: &CandidateScores) -> CalculationResult {
        if let Some(requirements) = &formula.requirements {
            if let Some(reason) =
                check_requirements(requirements, scores, self.options.strict_requirements)
            {
                info!(program = %formula.program_id, %reason, "candidate disqualified");
                return CalculationResult::disqualified(reason);
            }
        }

        let mut total = 0.0;
        let mut stage_results = Vec::with_capacity(formula.stages.len());
        let mut breakdown = Breakdown::default();

        for stage in &formula.stages {
            let result = self.evaluate_stage(stage, scores);
            if !result.passed {
                info!(
                    stage = %stage.id,
                    score = result.score,
                    "stage threshold not met, later stages skipped"
                );
                stage_results.push(result);
                break;
            }
            total += result.score * stage.coefficient();
            breakdown.push(&stage.id, result.components.clone());
            stage_results.push(result);
        }

        let bonuses = award_bonuses(&formula.bonuses, scores);
        let bonus_points: f64 = bonuses.iter().map(|award| award.points).sum();
        total += bonus_points;

        let max_score = formula.metadata.max_possible_score;
        let total_score = total.min(max_score).max(0.0);
        if total_score < total {
            debug!(uncapped = total, cap = max_score, "total capped");
        }
        info!(
            program = %formula.program_id,
            total = total_score,
            bonus = bonus_points,
            "formula evaluated"
        );

        CalculationResult {
            total_score,
            stage_results,
            bonus_points,
            bonuses,
            meets_requirements: true,
            disqualification: None,
            breakdown,
        }
    }

    fn evaluate_stage(&self, stage: &Stage, scores: &CandidateScores) -> StageResult {
        let mut accumulator = StageAccumulator::new();
        for component in &stage.components {
            let points = score_component(component, scores);
            accumulator.record(&component.id, points, component.counts_toward_total());
        }
        let accumulator = stage
            .operations
            .iter()
            .fold(accumulator, StageAccumulator::apply);

        let mut score = accumulator.total();
        if self.options.cap_stage_scores {
            score = score.min(stage.max_points);
        }
        let passed = stage
            .threshold
            .as_ref()
            .map_or(true, |threshold| passes(score, threshold, stage.max_points));
        debug!(stage = %stage.id, score, passed, "stage scored");

        StageResult {
            stage_id: stage.id.clone(),
            stage_name: stage.name.clone(),
            score,
            max_score: stage.max_points,
            passed,
            components: accumulator.into_scores(),
        }
    }
}

/// Evaluates with [`EngineOptions::default`].
pub fn evaluate(formula: &Formula, scores: &CandidateScores) -> CalculationResult {
    Calculator::default().evaluate(formula, scores)
}
