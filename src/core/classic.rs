use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::profile::classic_profile;
use crate::core::rounding::{descending, round_to};
use crate::core::validation::{validate_classic, validate_roster, ValidationReport};
use crate::error::ScoringError;
use crate::models::domain::{MAX_SCORE, MIN_SCORE, NEUTRAL_SCORE};
use crate::models::{Candidate, ClassicCatalog, ClassicResponse, Dimension, DimensionScores, DimensionWeights};

/// Largest possible gap on a single Likert dimension (5 - 1)
const MAX_DIFFERENCE: f64 = MAX_SCORE - MIN_SCORE;

/// Number of leading matches returned separately
pub const DEFAULT_TOP_N: usize = 3;

/// How a single dimension compares between user and candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionMatch {
    pub user_score: f64,
    pub candidate_score: f64,
    pub difference: f64,
    pub match_percentage: f64,
}

/// Affinity between the user and one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affinity {
    pub affinity_percentage: f64,
    pub distance: f64,
    pub dimension_matches: BTreeMap<Dimension, DimensionMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassicMatch {
    pub rank: usize,
    pub candidate: Candidate,
    pub affinity_percentage: f64,
    pub overall_distance: f64,
    pub dimension_matches: BTreeMap<Dimension, DimensionMatch>,
}

/// Result of scoring a Likert session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassicMatchResult {
    pub user_scores: DimensionScores,
    pub rankings: Vec<ClassicMatch>,
    pub top_matches: Vec<ClassicMatch>,
    pub user_profile: String,
    pub validation: ValidationReport,
}

/// Average Likert responses per policy dimension; unanswered dimensions are neutral
pub fn calculate_user_scores(responses: &[ClassicResponse]) -> DimensionScores {
    DimensionScores::from_fn(|dimension| {
        let (sum, count) = responses
            .iter()
            .filter(|r| r.dimension == dimension)
            .fold((0.0, 0usize), |(sum, count), r| (sum + r.score, count + 1));

        if count > 0 {
            sum / count as f64
        } else {
            NEUTRAL_SCORE
        }
    })
}

/// Weighted Euclidean distance over the policy dimensions
#[inline]
pub fn weighted_distance(user: &DimensionScores, candidate: &DimensionScores, weights: &DimensionWeights) -> f64 {
    user.iter()
        .zip(candidate.iter())
        .map(|((dimension, u), (_, c))| weights.get(dimension) * (u - c).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Distance between two opposite-extreme profiles under the given weights
#[inline]
pub fn max_distance(weights: &DimensionWeights) -> f64 {
    Dimension::POLICY
        .iter()
        .map(|d| weights.get(*d) * MAX_DIFFERENCE.powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Per-dimension match in percent (1 decimal)
#[inline]
fn dimension_match_percentage(user_score: f64, candidate_score: f64) -> f64 {
    let difference = (user_score - candidate_score).abs();
    round_to((MAX_DIFFERENCE - difference) / MAX_DIFFERENCE * 100.0, 1)
}

/// Affinity between a user profile and a candidate profile
///
/// `affinity = (max_distance - distance) / max_distance * 100`, rounded to
/// two decimals; the distance is reported with three.
pub fn calculate_affinity(
    user: &DimensionScores,
    candidate: &DimensionScores,
    weights: Option<&DimensionWeights>,
) -> Affinity {
    let uniform = DimensionWeights::uniform();
    let weights = weights.unwrap_or(&uniform);

    let distance = weighted_distance(user, candidate, weights);
    let max = max_distance(weights);

    let affinity = if max > 0.0 {
        ((max - distance) / max * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let dimension_matches = user
        .iter()
        .zip(candidate.iter())
        .map(|((dimension, u), (_, c))| {
            (
                dimension,
                DimensionMatch {
                    user_score: round_to(u, 1),
                    candidate_score: round_to(c, 1),
                    difference: round_to((u - c).abs(), 1),
                    match_percentage: dimension_match_percentage(u, c),
                },
            )
        })
        .collect();

    Affinity {
        affinity_percentage: round_to(affinity, 2),
        distance: round_to(distance, 3),
        dimension_matches,
    }
}

/// Classic weighted-Likert matcher
///
/// # Pipeline Stages
/// 1. Validate responses, weights and roster
/// 2. Average responses into the user's dimension profile
/// 3. Weighted Euclidean affinity against every active candidate
/// 4. Rank by affinity, then distance, then candidate id
#[derive(Debug, Clone)]
pub struct ClassicMatcher {
    catalog: Arc<ClassicCatalog>,
    top_n: usize,
}

impl ClassicMatcher {
    pub fn new(catalog: Arc<ClassicCatalog>) -> Self {
        Self {
            catalog,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn catalog(&self) -> &ClassicCatalog {
        &self.catalog
    }

    pub fn validate(&self, responses: &[ClassicResponse], weights: Option<&DimensionWeights>) -> ValidationReport {
        validate_classic(responses, &self.catalog, weights)
    }

    /// Score a completed Likert session against the roster
    ///
    /// # Arguments
    /// * `responses` - One answer per question
    /// * `candidates` - Full roster; inactive candidates are skipped
    /// * `weights` - Optional user priorities, 1 per dimension when absent
    pub fn score(
        &self,
        responses: &[ClassicResponse],
        candidates: &[Candidate],
        weights: Option<&DimensionWeights>,
    ) -> Result<ClassicMatchResult, ScoringError> {
        let validation = self.validate(responses, weights).into_result()?;
        validate_roster(candidates)?;

        let user_scores = calculate_user_scores(responses);

        let mut rankings = candidates
            .iter()
            .filter(|c| c.is_active)
            .map(|candidate| {
                let profile = candidate.scores.as_ref().ok_or_else(|| ScoringError::MissingProfile {
                    party_code: candidate.party_code.clone(),
                })?;

                let affinity = calculate_affinity(&user_scores, profile, weights);

                Ok(ClassicMatch {
                    rank: 0,
                    candidate: candidate.clone(),
                    affinity_percentage: affinity.affinity_percentage,
                    overall_distance: affinity.distance,
                    dimension_matches: affinity.dimension_matches,
                })
            })
            .collect::<Result<Vec<_>, ScoringError>>()?;

        rankings.sort_by(|a, b| {
            descending(a.affinity_percentage, b.affinity_percentage)
                .then_with(|| a.overall_distance.total_cmp(&b.overall_distance))
                .then_with(|| a.candidate.id.cmp(&b.candidate.id))
                .then_with(|| a.candidate.party_code.cmp(&b.candidate.party_code))
        });

        for (index, entry) in rankings.iter_mut().enumerate() {
            entry.rank = index + 1;
        }

        let top_matches: Vec<ClassicMatch> = rankings.iter().take(self.top_n).cloned().collect();

        if let Some(best) = top_matches.first() {
            tracing::debug!(
                "Classic scoring: {} responses, {} ranked, best {} at {}%",
                responses.len(),
                rankings.len(),
                best.candidate.party_code,
                best.affinity_percentage
            );
        }

        Ok(ClassicMatchResult {
            user_profile: classic_profile(&user_scores),
            user_scores,
            rankings,
            top_matches,
            validation,
        })
    }
}
