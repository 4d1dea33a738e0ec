use super::bonus::BonusAward;
use super::requirements::Disqualification;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

/// Outcome of one evaluation. Built fresh per call and never mutated.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CalculationResult {
    pub total_score: f64,
    pub stage_results: Vec<StageResult>,
    pub bonus_points: f64,
    pub bonuses: Vec<BonusAward>,
    pub meets_requirements: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disqualification: Option<Disqualification>,
    pub breakdown: Breakdown,
}

impl CalculationResult {
    pub(crate) fn disqualified(reason: Disqualification) -> Self {
        Self {
            total_score: 0.0,
            stage_results: Vec::new(),
            bonus_points: 0.0,
            bonuses: Vec::new(),
            meets_requirements: false,
            disqualification: Some(reason),
            breakdown: Breakdown::default(),
        }
    }

    pub fn disqualification_reason(&self) -> Option<String> {
        self.disqualification.as_ref().map(Disqualification::summary)
    }

    /// Eligible, with every evaluated stage above its threshold.
    pub fn passed_all_stages(&self) -> bool {
        self.meets_requirements && self.stage_results.iter().all(|stage| stage.passed)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct StageResult {
    pub stage_id: String,
    pub stage_name: String,
    pub score: f64,
    pub max_score: f64,
    pub passed: bool,
    pub components: Vec<ComponentScore>,
}

impl StageResult {
    pub fn points(&self, component_id: &str) -> Option<f64> {
        self.components
            .iter()
            .find(|component| component.id == component_id)
            .map(|component| component.points)
    }
}

/// Value held under one id in a stage: a scored component or a stored
/// operation result.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ComponentScore {
    pub id: String,
    pub points: f64,
    /// Whether the value is part of the stage total.
    pub counted: bool,
}

/// Per-stage component values of every stage that contributed to the total.
/// Serializes as the flat `"<stage>_<component>"` map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Breakdown {
    stages: Vec<(String, Vec<ComponentScore>)>,
}

impl Breakdown {
    pub(crate) fn push(&mut self, stage_id: &str, components: Vec<ComponentScore>) {
        self.stages.push((stage_id.to_string(), components));
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn get(&self, stage_id: &str, component_id: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|(id, _)| id == stage_id)
            .and_then(|(_, components)| {
                components
                    .iter()
                    .find(|component| component.id == component_id)
            })
            .map(|component| component.points)
    }

    pub fn stages(&self) -> impl Iterator<Item = (&str, &[ComponentScore])> {
        self.stages
            .iter()
            .map(|(id, components)| (id.as_str(), components.as_slice()))
    }

    pub fn flatten(&self) -> BTreeMap<String, f64> {
        self.stages
            .iter()
            .flat_map(|(stage_id, components)| {
                components
                    .iter()
                    .map(move |component| (format!("{stage_id}_{}", component.id), component.points))
            })
            .collect()
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flat = self.flatten();
        let mut map = serializer.serialize_map(Some(flat.len()))?;
        for (key, value) in &flat {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
