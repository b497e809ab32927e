use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::rounding::{descending, round_to};
use crate::models::{Candidate, Dimension, DimensionNames};

/// Points earned against the maximum for one dimension
pub trait PointsBreakdown {
    fn points(&self) -> f64;
    fn max_points(&self) -> f64;

    /// Text of the option that earned the points, when there is a single one
    fn matched_text(&self) -> Option<&str> {
        None
    }
}

/// Per-dimension view of a candidate's result, for the detail screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionStat {
    pub dimension: Dimension,
    pub dimension_name: String,
    pub match_percentage: f64,
    pub points: f64,
    pub max_points: f64,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_text: Option<String>,
}

/// Match percentage per dimension (whole numbers), best dimension first.
/// Labels come from the catalog that produced the breakdown.
pub fn dimension_stats<B: PointsBreakdown>(
    breakdown: &BTreeMap<Dimension, B>,
    names: &DimensionNames,
) -> Vec<DimensionStat> {
    let mut stats: Vec<DimensionStat> = breakdown
        .iter()
        .map(|(dimension, entry)| DimensionStat {
            dimension: *dimension,
            dimension_name: names.get(*dimension).to_string(),
            match_percentage: if entry.max_points() > 0.0 {
                round_to(entry.points() / entry.max_points() * 100.0, 0)
            } else {
                0.0
            },
            points: entry.points(),
            max_points: entry.max_points(),
            matched: entry.points() > 0.0,
            option_text: entry.matched_text().map(str::to_string),
        })
        .collect();

    // Stable: equal percentages keep dimension order
    stats.sort_by(|a, b| descending(a.match_percentage, b.match_percentage));
    stats
}

/// Running total for the leaderboard shown while a questionnaire is in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialStanding {
    pub party_code: String,
    pub party_name: String,
    pub candidate_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_primary: Option<String>,
    pub points: f64,
    pub max_points: f64,
    pub percentage: f64,
}

impl PartialStanding {
    /// Unrounded; zero while nothing has been answered
    pub fn new(candidate: &Candidate, points: f64, max_points: f64) -> Self {
        Self {
            party_code: candidate.party_code.clone(),
            party_name: candidate.party_name.clone(),
            candidate_name: candidate.candidate_name.clone(),
            color_primary: candidate.color_primary.clone(),
            points,
            max_points,
            percentage: if max_points > 0.0 {
                points / max_points * 100.0
            } else {
                0.0
            },
        }
    }
}
