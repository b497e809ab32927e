use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::core::classic::DEFAULT_TOP_N;
use crate::core::profile::proposal_profile;
use crate::core::rounding::{descending, round_to};
use crate::core::stats::{dimension_stats, DimensionStat, PartialStanding, PointsBreakdown};
use crate::core::validation::{validate_proposals, validate_roster, ValidationReport};
use crate::error::ScoringError;
use crate::models::{
    Candidate, Dimension, DimensionNames, ProposalCatalog, ProposalOption, ProposalResponse,
};

/// Points a candidate earned in one dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalBreakdown {
    pub points: f64,
    pub max_points: f64,
    pub matched_options: Vec<String>,
}

impl PointsBreakdown for ProposalBreakdown {
    fn points(&self) -> f64 {
        self.points
    }

    fn max_points(&self) -> f64 {
        self.max_points
    }
}

/// A selected proposal the candidate also backs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingProposal {
    pub question_id: u32,
    pub option_id: String,
    pub option_text: String,
    pub dimension: Dimension,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalScore {
    pub rank: usize,
    pub candidate: Candidate,
    pub total_points: f64,
    pub max_possible_points: f64,
    pub percentage: f64,
    pub dimension_breakdown: BTreeMap<Dimension, ProposalBreakdown>,
    pub matching_proposals: Vec<MatchingProposal>,
}

impl ProposalScore {
    pub fn dimension_stats(&self, names: &DimensionNames) -> Vec<DimensionStat> {
        dimension_stats(&self.dimension_breakdown, names)
    }
}

/// Result of scoring a proposal-selection session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalMatchResult {
    pub rankings: Vec<ProposalScore>,
    pub top_matches: Vec<ProposalScore>,
    pub user_profile_text: String,
    pub total_questions_answered: usize,
    pub total_selected: usize,
    pub validation: ValidationReport,
}

#[derive(Debug, Default)]
struct Tally {
    points: f64,
    breakdown: BTreeMap<Dimension, ProposalBreakdown>,
    proposals: Vec<MatchingProposal>,
}

/// Proposal-coverage matcher (v2)
///
/// Every answered question is worth its dimension weight. A candidate earns
/// the share of the user's selections it supports:
/// `matched / selected * weight`.
#[derive(Debug, Clone)]
pub struct ProposalMatcher {
    catalog: Arc<ProposalCatalog>,
    top_n: usize,
}

impl ProposalMatcher {
    pub fn new(catalog: Arc<ProposalCatalog>) -> Self {
        Self {
            catalog,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn catalog(&self) -> &ProposalCatalog {
        &self.catalog
    }

    pub fn validate(&self, responses: &[ProposalResponse]) -> ValidationReport {
        validate_proposals(responses, &self.catalog)
    }

    /// Score a completed proposal session against the roster
    pub fn score(
        &self,
        responses: &[ProposalResponse],
        candidates: &[Candidate],
    ) -> Result<ProposalMatchResult, ScoringError> {
        let validation = self.validate(responses).into_result()?;
        validate_roster(candidates)?;

        let active: Vec<&Candidate> = candidates.iter().filter(|c| c.is_active).collect();
        let mut tallies: HashMap<&str, Tally> = active
            .iter()
            .map(|c| (c.party_code.as_str(), Tally::default()))
            .collect();

        let mut dimension_max: BTreeMap<Dimension, f64> = BTreeMap::new();
        let mut total_max = 0.0;
        let mut total_selected = 0;

        for response in responses {
            let Some(question) = self.catalog.question(response.question_id) else {
                continue;
            };

            let selected = response.selected_options.len();
            if selected == 0 {
                continue;
            }

            let dimension = question.dimension;
            let weight = self.catalog.weights.get(dimension);

            // One weight per answered question, however many options were picked
            *dimension_max.entry(dimension).or_insert(0.0) += weight;
            total_max += weight;
            total_selected += selected;

            let mut matched: BTreeMap<&str, Vec<&ProposalOption>> = BTreeMap::new();
            for option in response
                .selected_options
                .iter()
                .filter_map(|id| question.option(id))
            {
                for party_code in &option.supporters {
                    matched.entry(party_code.as_str()).or_default().push(option);
                }
            }

            for (party_code, options) in matched {
                let Some(tally) = tallies.get_mut(party_code) else {
                    continue;
                };

                let points = options.len() as f64 / selected as f64 * weight;
                tally.points += points;

                let entry = tally.breakdown.entry(dimension).or_default();
                entry.points += points;
                entry
                    .matched_options
                    .extend(options.iter().map(|o| o.id.clone()));

                tally
                    .proposals
                    .extend(options.iter().map(|o| MatchingProposal {
                        question_id: question.id,
                        option_id: o.id.clone(),
                        option_text: o.text.clone(),
                        dimension,
                    }));
            }
        }

        let mut rankings: Vec<ProposalScore> = active
            .into_iter()
            .map(|candidate| {
                let mut tally = tallies.remove(candidate.party_code.as_str()).unwrap_or_default();

                for (dimension, max) in &dimension_max {
                    tally.breakdown.entry(*dimension).or_default().max_points = *max;
                }

                ProposalScore {
                    rank: 0,
                    candidate: candidate.clone(),
                    total_points: round_to(tally.points, 2),
                    max_possible_points: total_max,
                    percentage: if total_max > 0.0 {
                        round_to(tally.points / total_max * 100.0, 1)
                    } else {
                        0.0
                    },
                    dimension_breakdown: tally.breakdown,
                    matching_proposals: tally.proposals,
                }
            })
            .collect();

        rankings.sort_by(|a, b| {
            descending(a.percentage, b.percentage)
                .then_with(|| descending(a.total_points, b.total_points))
                .then_with(|| a.candidate.party_name.cmp(&b.candidate.party_name))
                .then_with(|| a.candidate.party_code.cmp(&b.candidate.party_code))
        });

        for (index, entry) in rankings.iter_mut().enumerate() {
            entry.rank = index + 1;
        }

        let top_matches: Vec<ProposalScore> = rankings.iter().take(self.top_n).cloned().collect();

        tracing::debug!(
            "Proposal scoring: {} responses, {} options selected, max {} points",
            responses.len(),
            total_selected,
            total_max
        );

        Ok(ProposalMatchResult {
            user_profile_text: self.user_profile(responses),
            rankings,
            top_matches,
            total_questions_answered: responses.len(),
            total_selected,
            validation,
        })
    }

    /// Standings over a possibly incomplete questionnaire.
    ///
    /// Same proportional credit as [`ProposalMatcher::score`], without
    /// validation: unknown questions and empty selections are skipped, an
    /// unknown option still counts towards the selection size, and a later
    /// answer to the same question replaces an earlier one. Percentages are
    /// left unrounded; entries follow roster order.
    pub fn partial_standings(&self, responses: &[ProposalResponse], candidates: &[Candidate]) -> Vec<PartialStanding> {
        let latest: BTreeMap<u32, &[String]> = responses
            .iter()
            .map(|r| (r.question_id, r.selected_options.as_slice()))
            .collect();

        let mut points: HashMap<&str, f64> = HashMap::new();
        let mut total_max = 0.0;

        for (question_id, selected) in latest {
            let Some(question) = self.catalog.question(question_id) else {
                continue;
            };
            if selected.is_empty() {
                continue;
            }

            let weight = self.catalog.weights.get(question.dimension);
            total_max += weight;

            let mut matches: HashMap<&str, usize> = HashMap::new();
            for option in selected.iter().filter_map(|id| question.option(id)) {
                for party_code in &option.supporters {
                    *matches.entry(party_code.as_str()).or_insert(0) += 1;
                }
            }

            for (party_code, count) in matches {
                *points.entry(party_code).or_insert(0.0) += count as f64 / selected.len() as f64 * weight;
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

    /// Profile sentence from the catalog's keyword rules
    pub fn user_profile(&self, responses: &[ProposalResponse]) -> String {
        let mut texts: BTreeMap<Dimension, Vec<&str>> = BTreeMap::new();

        for option_id in responses.iter().flat_map(|r| r.selected_options.iter()) {
            if let Some((question, option)) = self.catalog.option(option_id) {
                texts
                    .entry(question.dimension)
                    .or_default()
                    .push(option.text.as_str());
            }
        }

        proposal_profile(&self.catalog.profile_rules, &texts)
    }
}
