use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::{
    Candidate, ClassicResponse, DebateResponse, DimensionWeights, ProposalResponse,
    QuestionnaireVersion,
};

/// Request to score a completed session, tagged by questionnaire version
///
/// ```json
/// {
///   "version": "debate",
///   "sessionId": "9f1c...",
///   "responses": [{ "questionId": 1, "selectedOption": "sec-b" }],
///   "candidates": [{ "id": 1, "partyCode": "PLN", "partyName": "..." }]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum ScoringRequest {
    #[serde(rename = "v1")]
    Classic(ClassicRequest),
    #[serde(rename = "v2")]
    Proposals(ProposalRequest),
    #[serde(rename = "debate")]
    Debate(DebateRequest),
}

impl ScoringRequest {
    pub fn version(&self) -> QuestionnaireVersion {
        match self {
            ScoringRequest::Classic(_) => QuestionnaireVersion::Classic,
            ScoringRequest::Proposals(_) => QuestionnaireVersion::Proposals,
            ScoringRequest::Debate(_) => QuestionnaireVersion::Debate,
        }
    }

    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            ScoringRequest::Classic(r) => r.session_id,
            ScoringRequest::Proposals(r) => r.session_id,
            ScoringRequest::Debate(r) => r.session_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassicRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub responses: Vec<ClassicResponse>,
    pub candidates: Vec<Candidate>,
    /// Priorities the user assigned before the questionnaire
    #[serde(default, alias = "dimensionWeights")]
    pub weights: Option<DimensionWeights>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub responses: Vec<ProposalResponse>,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub responses: Vec<DebateResponse>,
    pub candidates: Vec<Candidate>,
}
