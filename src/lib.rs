//! Voto Match - candidate affinity engines for the Voto2026 questionnaires
//!
//! Three scoring engines share one dimension model:
//! - classic: weighted Euclidean distance over averaged Likert answers
//! - proposals (v2): proportional credit for backing the user's selected proposals
//! - debate: full credit for holding the user's chosen posture
//!
//! Engines are pure and deterministic. Catalogs are injected at construction
//! and persistence stays with the caller.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use self::core::{ClassicMatcher, DebateMatcher, ProposalMatcher, ValidationReport};
pub use error::{AppError, CatalogError, ScoringError};
pub use models::{Candidate, Dimension, DimensionScores, DimensionWeights, ScoringRequest, ScoringResponse};
pub use services::{CatalogStore, ScoringService};
