// Scoring engine exports
pub mod classic;
pub mod debate;
pub mod profile;
pub mod proposals;
pub mod rounding;
pub mod stats;
pub mod validation;

pub use classic::{calculate_affinity, ClassicMatch, ClassicMatchResult, ClassicMatcher, DEFAULT_TOP_N};
pub use debate::{DebateMatchResult, DebateMatcher, DebateScore};
pub use profile::{IdeologyProfile, Tendency};
pub use proposals::{ProposalMatchResult, ProposalMatcher, ProposalScore};
pub use stats::{dimension_stats, DimensionStat, PartialStanding};
pub use validation::{validate_classic, validate_debate, validate_proposals, ValidationReport};
