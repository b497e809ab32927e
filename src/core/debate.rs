use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::core::classic::DEFAULT_TOP_N;
use crate::core::profile::IdeologyProfile;
use crate::core::rounding::{descending, round_to};
use crate::core::stats::{dimension_stats, DimensionStat, PartialStanding, PointsBreakdown};
use crate::core::validation::{validate_debate, validate_roster, ValidationReport};
use crate::error::ScoringError;
use crate::models::{Candidate, DebateCatalog, DebateResponse, Dimension, DimensionNames};

/// Points in one dimension plus the posture that earned them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateBreakdown {
    pub points: f64,
    pub max_points: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_text: Option<String>,
}

impl PointsBreakdown for DebateBreakdown {
    fn points(&self) -> f64 {
        self.points
    }

    fn max_points(&self) -> f64 {
        self.max_points
    }

    fn matched_text(&self) -> Option<&str> {
        self.option_text.as_deref()
    }
}

/// A posture the user shares with the candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingStance {
    pub question_id: u32,
    pub topic: String,
    pub dimension: Dimension,
    pub stance: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateScore {
    pub rank: usize,
    pub candidate: Candidate,
    pub total_points: f64,
    pub max_possible_points: f64,
    pub percentage: f64,
    pub dimension_breakdown: BTreeMap<Dimension, DebateBreakdown>,
    pub matching_stances: Vec<MatchingStance>,
}

impl DebateScore {
    pub fn dimension_stats(&self, names: &DimensionNames) -> Vec<DimensionStat> {
        dimension_stats(&self.dimension_breakdown, names)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateMatchResult {
    pub rankings: Vec<DebateScore>,
    pub top_matches: Vec<DebateScore>,
    pub user_profile: IdeologyProfile,
    pub total_questions_answered: usize,
    pub validation: ValidationReport,
}

#[derive(Debug, Default)]
struct Tally {
    points: f64,
    breakdown: BTreeMap<Dimension, DebateBreakdown>,
    stances: Vec<MatchingStance>,
}

/// Debate-posture matcher
///
/// Each answered question is worth its dimension weight, credited in full to
/// every party holding the chosen posture. Postures partition the roster, so
/// exactly one option's holders score per question.
#[derive(Debug, Clone)]
pub struct DebateMatcher {
    catalog: Arc<DebateCatalog>,
    top_n: usize,
}

impl DebateMatcher {
    pub fn new(catalog: Arc<DebateCatalog>) -> Self {
        Self {
            catalog,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn catalog(&self) -> &DebateCatalog {
        &self.catalog
    }

    pub fn validate(&self, responses: &[DebateResponse]) -> ValidationReport {
        validate_debate(responses, &self.catalog)
    }

    /// Score a completed debate session against the roster
    pub fn score(
        &self,
        responses: &[DebateResponse],
        candidates: &[Candidate],
    ) -> Result<DebateMatchResult, ScoringError> {
        let validation = self.validate(responses).into_result()?;
        validate_roster(candidates)?;

        let active: Vec<&Candidate> = candidates.iter().filter(|c| c.is_active).collect();
        let mut tallies: HashMap<&str, Tally> = active
            .iter()
            .map(|c| (c.party_code.as_str(), Tally::default()))
            .collect();

        let mut dimension_max: BTreeMap<Dimension, f64> = BTreeMap::new();
        let mut total_max = 0.0;

        for response in responses {
            let Some(question) = self.catalog.question(response.question_id) else {
                continue;
            };
            let Some(option) = response.selection().and_then(|id| question.option(id)) else {
                continue;
            };

            let dimension = question.dimension;
            let weight = self.catalog.weights.get(dimension);

            *dimension_max.entry(dimension).or_insert(0.0) += weight;
            total_max += weight;

            for party_code in &option.holders {
                let Some(tally) = tallies.get_mut(party_code.as_str()) else {
                    continue;
                };

                tally.points += weight;

                let entry = tally.breakdown.entry(dimension).or_default();
                entry.points += weight;
                entry.matched_option = Some(option.id.clone());
                entry.option_text = Some(option.stance.clone());

                tally.stances.push(MatchingStance {
                    question_id: question.id,
                    topic: question.topic.clone(),
                    dimension,
                    stance: option.stance.clone(),
                    description: option.description.clone(),
                });
            }
        }

        let mut rankings: Vec<DebateScore> = active
            .into_iter()
            .map(|candidate| {
                let mut tally = tallies.remove(candidate.party_code.as_str()).unwrap_or_default();

                for (dimension, max) in &dimension_max {
                    tally.breakdown.entry(*dimension).or_default().max_points = *max;
                }

                DebateScore {
                    rank: 0,
                    candidate: candidate.clone(),
                    total_points: tally.points,
                    max_possible_points: total_max,
                    percentage: if total_max > 0.0 {
                        round_to(tally.points / total_max * 100.0, 1)
                    } else {
                        0.0
                    },
                    dimension_breakdown: tally.breakdown,
                    matching_stances: tally.stances,
                }
            })
            .collect();

        rankings.sort_by(|a, b| {
            descending(a.percentage, b.percentage)
                .then_with(|| a.candidate.party_name.cmp(&b.candidate.party_name))
                .then_with(|| a.candidate.party_code.cmp(&b.candidate.party_code))
        });

        for (index, entry) in rankings.iter_mut().enumerate() {
            entry.rank = index + 1;
        }

        let top_matches: Vec<DebateScore> = rankings.iter().take(self.top_n).cloned().collect();

        let user_profile =
            IdeologyProfile::from_option_ids(responses.iter().filter_map(DebateResponse::selection));

        if let Some(best) = rankings.first() {
            tracing::debug!(
                "Debate scoring: {} responses, best match {} at {}%",
                responses.len(),
                best.candidate.party_code,
                best.percentage
            );
        }

        Ok(DebateMatchResult {
            rankings,
            top_matches,
            user_profile,
            total_questions_answered: responses.len(),
            validation,
        })
    }

    /// Standings over a possibly incomplete questionnaire.
    ///
    /// No validation: unknown questions and options are skipped, and a later
    /// answer to the same question replaces an earlier one. Percentages are
    /// left unrounded; entries follow roster order.
    pub fn partial_standings(&self, responses: &[DebateResponse], candidates: &[Candidate]) -> Vec<PartialStanding> {
        let latest: BTreeMap<u32, &str> = responses
            .iter()
            .filter_map(|r| r.selection().map(|option| (r.question_id, option)))
            .collect();

        let mut points: HashMap<&str, f64> = HashMap::new();
        let mut total_max = 0.0;

        for (question_id, option_id) in latest {
            let Some(question) = self.catalog.question(question_id) else {
                continue;
            };

            let weight = self.catalog.weights.get(question.dimension);
            total_max += weight;

            if let Some(option) = question.option(option_id) {
                for party_code in &option.holders {
                    *points.entry(party_code.as_str()).or_insert(0.0) += weight;
                }
            }
        }

        candidates
            .iter()
            .filter(|c| c.is_active)
            .map(|c| {
                let earned = points.get(c.party_code.as_str()).copied().unwrap_or(0.0);
                PartialStanding::new(c, earned, total_max)
            })
            .collect()
    }
}
