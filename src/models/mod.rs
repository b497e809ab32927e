// Model exports
pub mod catalog;
pub mod domain;
pub mod requests;
pub mod responses;

pub use catalog::{
    CandidateStance, ClassicCatalog, DebateCatalog, DebateOption, DebateQuestion, IntegrityReport,
    LikertOption, LikertQuestion, OptionSupport, ProfileRule, ProposalCatalog, ProposalOption,
    ProposalQuestion,
};
pub use domain::{
    Candidate, ClassicResponse, DebateResponse, Dimension, DimensionNames, DimensionScores,
    DimensionWeights, ProposalResponse, QuestionnaireVersion,
};
pub use requests::{ClassicRequest, DebateRequest, ProposalRequest, ScoringRequest};
pub use responses::{CatalogCheckResponse, ScoringOutcome, ScoringResponse};
