use crate::formula::{BonusKind, BonusRule};
use crate::scores::CandidateScores;
use serde::Serialize;

/// Points one bonus rule awarded, after its own cap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusAward {
    pub rule_id: String,
    pub kind: BonusKind,
    pub points: f64,
}

/// Olympiad rules pay the tier value of every olympiad result; certificate
/// rules pay `points` per certificate held. Every other kind pays its flat
/// `points` without looking at candidate evidence. The rule's `condition`
/// text is never matched.
pub(crate) fn award_bonuses(rules: &[BonusRule], scores: &CandidateScores) -> Vec<BonusAward> {
    rules
        .iter()
        .map(|rule| {
            let earned = match rule.kind {
                BonusKind::Olympiad => scores
                    .olympiads
                    .iter()
                    .map(|result| result.level.bonus_points())
                    .sum::<f64>(),
                BonusKind::Certificate => rule.points * scores.certificates.len() as f64,
                BonusKind::Competition
                | BonusKind::Volunteer
                | BonusKind::Sports
                | BonusKind::Other => rule.points,
            };
            let points = match rule.max_bonus {
                Some(cap) => earned.min(cap),
                None => earned,
            };
            BonusAward {
                rule_id: rule.id.clone(),
                kind: rule.kind,
                points,
            }
        })
        .collect()
}
