use chrono::Utc;

use crate::core::{ClassicMatcher, DebateMatcher, PartialStanding, ProposalMatcher};
use crate::error::ScoringError;
use crate::models::{ScoringOutcome, ScoringRequest, ScoringResponse};
use crate::services::catalog::CatalogStore;

/// Dispatches a scoring request to the engine for its questionnaire version
///
/// Holds one matcher per variant, all sharing the catalogs of a
/// [`CatalogStore`]. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ScoringService {
    classic: ClassicMatcher,
    proposals: ProposalMatcher,
    debate: DebateMatcher,
}

impl ScoringService {
    /// Create a service over loaded catalogs
    ///
    /// # Arguments
    /// * `catalogs` - Catalogs for the three questionnaires
    /// * `top_n` - How many leading candidates each result highlights
    pub fn new(catalogs: &CatalogStore, top_n: usize) -> Self {
        Self {
            classic: ClassicMatcher::new(catalogs.classic.clone()).with_top_n(top_n),
            proposals: ProposalMatcher::new(catalogs.proposals.clone()).with_top_n(top_n),
            debate: DebateMatcher::new(catalogs.debate.clone()).with_top_n(top_n),
        }
    }

    pub fn classic(&self) -> &ClassicMatcher {
        &self.classic
    }

    pub fn proposals(&self) -> &ProposalMatcher {
        &self.proposals
    }

    pub fn debate(&self) -> &DebateMatcher {
        &self.debate
    }

    /// Score a request and wrap the result for the caller to persist
    pub fn handle(&self, request: &ScoringRequest) -> Result<ScoringResponse, ScoringError> {
        let session_id = request.session_id();
        let version = request.version();

        tracing::info!(
            "Scoring {} session {}",
            version,
            session_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
        );

        let result = match request {
            ScoringRequest::Classic(r) => {
                ScoringOutcome::Classic(self.classic.score(&r.responses, &r.candidates, r.weights.as_ref())?)
            }
            ScoringRequest::Proposals(r) => {
                ScoringOutcome::Proposals(self.proposals.score(&r.responses, &r.candidates)?)
            }
            ScoringRequest::Debate(r) => ScoringOutcome::Debate(self.debate.score(&r.responses, &r.candidates)?),
        };

        Ok(ScoringResponse {
            session_id,
            version,
            computed_at: Utc::now(),
            result,
        })
    }

    /// Live leaderboard for an in-progress session; `None` for the classic
    /// questionnaire, which has no running totals
    pub fn standings(&self, request: &ScoringRequest) -> Option<Vec<PartialStanding>> {
        match request {
            ScoringRequest::Classic(_) => None,
            ScoringRequest::Proposals(r) => Some(self.proposals.partial_standings(&r.responses, &r.candidates)),
            ScoringRequest::Debate(r) => Some(self.debate.partial_standings(&r.responses, &r.candidates)),
        }
    }
}
