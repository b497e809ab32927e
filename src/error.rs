use std::path::PathBuf;
use thiserror::Error;

use crate::core::validation::ValidationReport;
use crate::models::{IntegrityReport, QuestionnaireVersion};

/// Errors returned by the matching engines
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid responses: {}", .0.errors.join("; "))]
    InvalidResponses(ValidationReport),

    #[error("no active candidates to rank")]
    EmptyRoster,

    #[error("candidate {party_code} has no dimension profile")]
    MissingProfile { party_code: String },

    #[error("candidate {party_code} is invalid: {reason}")]
    InvalidCandidate { party_code: String, reason: String },
}

impl ScoringError {
    /// Validation report behind the error, if the responses were rejected
    pub fn validation(&self) -> Option<&ValidationReport> {
        match self {
            ScoringError::InvalidResponses(report) => Some(report),
            _ => None,
        }
    }
}

/// Errors that can occur while loading question catalogs
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog declares version {found}, expected {expected}")]
    VersionMismatch {
        expected: QuestionnaireVersion,
        found: QuestionnaireVersion,
    },

    #[error("catalog integrity check failed: {}", .0.errors.join("; "))]
    Integrity(IntegrityReport),
}

/// Top-level errors surfaced by the command line
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read request {path}: {source}")]
    RequestFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid request: {0}")]
    Request(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] serde_json::Error),

    #[error("live standings are not available for {0} sessions")]
    UnsupportedVersion(QuestionnaireVersion),
}
