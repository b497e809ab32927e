//! Read-only question catalogs for each questionnaire variant.
//!
//! Catalogs are loaded once (see `services::catalog`) and handed to the
//! matchers, which never reach for global tables.

use crate::models::domain::{Candidate, Dimension, DimensionNames, DimensionWeights, QuestionnaireVersion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One answer choice of a Likert question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikertOption {
    pub value: u8,
    pub label: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikertQuestion {
    pub id: u32,
    pub text: String,
    pub dimension: Dimension,
    pub options: Vec<LikertOption>,
}

/// Classic weighted-Likert questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicCatalog {
    pub version: QuestionnaireVersion,
    pub questions: Vec<LikertQuestion>,
}

impl ClassicCatalog {
    pub fn question(&self, id: u32) -> Option<&LikertQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// A generalized proposal and the parties that back it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub description: String,
    pub supporters: Vec<String>,
}

impl ProposalOption {
    pub fn is_supported_by(&self, party_code: &str) -> bool {
        self.supporters.iter().any(|code| code == party_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalQuestion {
    pub id: u32,
    pub text: String,
    pub dimension: Dimension,
    pub multi_select: bool,
    pub options: Vec<ProposalOption>,
}

impl ProposalQuestion {
    pub fn option(&self, option_id: &str) -> Option<&ProposalOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Keyword rule feeding the proposal questionnaire's profile sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRule {
    pub dimension: Dimension,
    pub keyword: String,
    pub phrase: String,
}

/// Proposal-selection questionnaire (v2)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalCatalog {
    pub version: QuestionnaireVersion,
    #[serde(default = "DimensionWeights::leadership_weighted")]
    pub weights: DimensionWeights,
    #[serde(default, skip_serializing_if = "DimensionNames::is_empty")]
    pub dimension_names: DimensionNames,
    #[serde(default)]
    pub profile_rules: Vec<ProfileRule>,
    pub questions: Vec<ProposalQuestion>,
}

impl ProposalCatalog {
    pub fn question(&self, id: u32) -> Option<&ProposalQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Find an option anywhere in the catalog together with its question
    pub fn option(&self, option_id: &str) -> Option<(&ProposalQuestion, &ProposalOption)> {
        self.questions
            .iter()
            .find_map(|q| q.option(option_id).map(|o| (q, o)))
    }

    /// Active candidates that back an option
    pub fn candidates_for_option<'a>(
        &self,
        option_id: &str,
        candidates: &'a [Candidate],
    ) -> Vec<&'a Candidate> {
        match self.option(option_id) {
            Some((_, option)) => candidates
                .iter()
                .filter(|c| c.is_active && option.is_supported_by(&c.party_code))
                .collect(),
            None => Vec::new(),
        }
    }

    /// How many parties back each option of a question, in catalog order
    pub fn option_support_counts(&self, question_id: u32) -> Vec<OptionSupport> {
        self.question(question_id)
            .map(|q| {
                q.options
                    .iter()
                    .map(|o| OptionSupport {
                        option_id: o.id.clone(),
                        support_count: o.supporters.len(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check the invariants scoring relies on to keep percentages within [0, 100]:
    /// positive weights, unique question and option ids, and no party backing
    /// the same option twice.
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut errors = self.weights.check();
        errors.extend(duplicate_ids(self.questions.iter().map(|q| q.id)));
        errors.extend(duplicate_option_ids(
            self.questions.iter().flat_map(|q| q.options.iter().map(|o| o.id.as_str())),
        ));

        for question in &self.questions {
            for option in &question.options {
                let duplicates = repeated(option.supporters.iter().map(String::as_str));
                if !duplicates.is_empty() {
                    errors.push(format!(
                        "Q{} option {}: duplicate supporters: {}",
                        question.id,
                        option.id,
                        duplicates.join(", ")
                    ));
                }
            }
        }

        IntegrityReport { errors }
    }
}

fn repeated<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    items.filter(|item| !seen.insert(*item)).collect()
}

fn duplicate_ids(ids: impl Iterator<Item = u32>) -> Option<String> {
    let mut seen = BTreeSet::new();
    let duplicates: Vec<String> = ids.filter(|id| !seen.insert(*id)).map(|id| id.to_string()).collect();
    (!duplicates.is_empty()).then(|| format!("duplicate question ids: {}", duplicates.join(", ")))
}

// Options are looked up catalog-wide, so ids must be unique across questions
fn duplicate_option_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Option<String> {
    let duplicates = repeated(ids);
    (!duplicates.is_empty()).then(|| format!("duplicate option ids: {}", duplicates.join(", ")))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSupport {
    pub option_id: String,
    pub support_count: usize,
}

/// A posture on a debate question; holders are disjoint across a question's options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateOption {
    pub id: String,
    pub stance: String,
    #[serde(default)]
    pub description: String,
    pub holders: Vec<String>,
}

impl DebateOption {
    pub fn is_held_by(&self, party_code: &str) -> bool {
        self.holders.iter().any(|code| code == party_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateQuestion {
    pub id: u32,
    pub topic: String,
    pub dimension: Dimension,
    pub prompt: String,
    #[serde(default)]
    pub context: String,
    pub options: Vec<DebateOption>,
}

impl DebateQuestion {
    pub fn option(&self, option_id: &str) -> Option<&DebateOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Debate-posture questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateCatalog {
    pub version: QuestionnaireVersion,
    /// Every party code that must appear exactly once per question
    pub roster: Vec<String>,
    #[serde(default = "DimensionWeights::leadership_weighted")]
    pub weights: DimensionWeights,
    #[serde(default, skip_serializing_if = "DimensionNames::is_empty")]
    pub dimension_names: DimensionNames,
    pub questions: Vec<DebateQuestion>,
}

/// A candidate's stance on one debate question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStance {
    pub stance: String,
    pub description: String,
}

impl DebateCatalog {
    pub fn question(&self, id: u32) -> Option<&DebateQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn option(&self, option_id: &str) -> Option<(&DebateQuestion, &DebateOption)> {
        self.questions
            .iter()
            .find_map(|q| q.option(option_id).map(|o| (q, o)))
    }

    pub fn candidate_stance(&self, question_id: u32, party_code: &str) -> Option<CandidateStance> {
        self.question(question_id)?
            .options
            .iter()
            .find(|o| o.is_held_by(party_code))
            .map(|o| CandidateStance {
                stance: o.stance.clone(),
                description: o.description.clone(),
            })
    }

    pub fn candidates_for_option<'a>(
        &self,
        option_id: &str,
        candidates: &'a [Candidate],
    ) -> Vec<&'a Candidate> {
        match self.option(option_id) {
            Some((_, option)) => candidates
                .iter()
                .filter(|c| c.is_active && option.is_held_by(&c.party_code))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Weights, unique ids and the roster partition
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut errors = self.weights.check();
        errors.extend(duplicate_ids(self.questions.iter().map(|q| q.id)));
        errors.extend(duplicate_option_ids(
            self.questions.iter().flat_map(|q| q.options.iter().map(|o| o.id.as_str())),
        ));
        errors.extend(self.check_partition().errors);

        IntegrityReport { errors }
    }

    /// Check that every question splits the roster across its options
    /// with no party repeated and none left out.
    pub fn check_partition(&self) -> IntegrityReport {
        let roster: BTreeSet<&str> = self.roster.iter().map(String::as_str).collect();
        let mut errors = Vec::new();

        for question in &self.questions {
            let mut seen = BTreeSet::new();
            let mut duplicates = Vec::new();
            let mut unknown = Vec::new();

            for party in question.options.iter().flat_map(|o| o.holders.iter()) {
                if !seen.insert(party.as_str()) {
                    duplicates.push(party.as_str());
                }
                if !roster.contains(party.as_str()) {
                    unknown.push(party.as_str());
                }
            }

            let missing: Vec<&str> = roster.difference(&seen).copied().collect();

            if !duplicates.is_empty() {
                errors.push(format!(
                    "Q{} ({}): duplicates: {}",
                    question.id,
                    question.dimension,
                    duplicates.join(", ")
                ));
            }
            if !missing.is_empty() {
                errors.push(format!(
                    "Q{} ({}): missing: {}",
                    question.id,
                    question.dimension,
                    missing.join(", ")
                ));
            }
            if !unknown.is_empty() {
                errors.push(format!(
                    "Q{} ({}): not in roster: {}",
                    question.id,
                    question.dimension,
                    unknown.join(", ")
                ));
            }
        }

        IntegrityReport { errors }
    }
}

/// Errors found by the catalog integrity checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
