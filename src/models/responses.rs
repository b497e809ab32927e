use serde::Serialize;
use uuid::Uuid;
use crate::core::{ClassicMatchResult, DebateMatchResult, ProposalMatchResult};
use crate::models::domain::QuestionnaireVersion;

/// Response for a scoring request; the caller persists it keyed by session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    pub version: QuestionnaireVersion,
    pub computed_at: chrono::DateTime<chrono::Utc>,
    pub result: ScoringOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScoringOutcome {
    Classic(ClassicMatchResult),
    Proposals(ProposalMatchResult),
    Debate(DebateMatchResult),
}

impl ScoringOutcome {
    /// Party codes in ranked order
    pub fn ranked_party_codes(&self) -> Vec<&str> {
        match self {
            ScoringOutcome::Classic(r) => r.rankings.iter().map(|m| m.candidate.party_code.as_str()).collect(),
            ScoringOutcome::Proposals(r) => r.rankings.iter().map(|m| m.candidate.party_code.as_str()).collect(),
            ScoringOutcome::Debate(r) => r.rankings.iter().map(|m| m.candidate.party_code.as_str()).collect(),
        }
    }
}

/// Outcome of the catalog integrity check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCheckResponse {
    pub classic_questions: usize,
    pub proposal_questions: usize,
    pub debate_questions: usize,
    pub integrity_errors: Vec<String>,
}

impl CatalogCheckResponse {
    pub fn is_consistent(&self) -> bool {
        self.integrity_errors.is_empty()
    }
}
