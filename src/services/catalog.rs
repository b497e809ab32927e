use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::CatalogSettings;
use crate::error::CatalogError;
use crate::models::{
    CatalogCheckResponse, ClassicCatalog, DebateCatalog, IntegrityReport, ProposalCatalog,
    QuestionnaireVersion,
};

const CLASSIC_JSON: &str = include_str!("../../data/catalog-classic.json");
const PROPOSALS_JSON: &str = include_str!("../../data/catalog-proposals.json");
const DEBATE_JSON: &str = include_str!("../../data/catalog-debate.json");

/// Catalogs shared by every matcher
///
/// Loaded once at startup, either from the copies compiled into the binary
/// or from JSON files named in the configuration. Catalogs that fail their
/// integrity checks are rejected: non-positive weights, repeated ids,
/// repeated supporters, or debate postures that do not partition the roster.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    pub classic: Arc<ClassicCatalog>,
    pub proposals: Arc<ProposalCatalog>,
    pub debate: Arc<DebateCatalog>,
}

/// Catalogs that declare which questionnaire they belong to
pub trait Versioned {
    fn version(&self) -> QuestionnaireVersion;
}

impl Versioned for ClassicCatalog {
    fn version(&self) -> QuestionnaireVersion {
        self.version
    }
}

impl Versioned for ProposalCatalog {
    fn version(&self) -> QuestionnaireVersion {
        self.version
    }
}

impl Versioned for DebateCatalog {
    fn version(&self) -> QuestionnaireVersion {
        self.version
    }
}

impl CatalogStore {
    /// Catalogs shipped with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_settings(&CatalogSettings::default())
    }

    /// Built-in catalogs, replaced one by one where a path is configured
    pub fn from_settings(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let store = Self::from_settings_unchecked(settings)?;
        store.verify()?;
        Ok(store)
    }

    /// Parse and version-check the configured catalogs without rejecting
    /// integrity failures, so they can be reported
    pub fn from_settings_unchecked(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let classic: ClassicCatalog = match &settings.classic_path {
            Some(path) => load(path, QuestionnaireVersion::Classic)?,
            None => parse(CLASSIC_JSON, QuestionnaireVersion::Classic)?,
        };
        let proposals: ProposalCatalog = match &settings.proposals_path {
            Some(path) => load(path, QuestionnaireVersion::Proposals)?,
            None => parse(PROPOSALS_JSON, QuestionnaireVersion::Proposals)?,
        };
        let debate: DebateCatalog = match &settings.debate_path {
            Some(path) => load(path, QuestionnaireVersion::Debate)?,
            None => parse(DEBATE_JSON, QuestionnaireVersion::Debate)?,
        };

        tracing::info!(
            "Catalogs loaded: {} classic, {} proposal, {} debate questions ({} parties)",
            classic.questions.len(),
            proposals.questions.len(),
            debate.questions.len(),
            debate.roster.len()
        );

        Ok(Self {
            classic: Arc::new(classic),
            proposals: Arc::new(proposals),
            debate: Arc::new(debate),
        })
    }

    /// Integrity errors across the proposal and debate catalogs
    pub fn integrity(&self) -> IntegrityReport {
        let mut errors: Vec<String> = self
            .proposals
            .check_integrity()
            .errors
            .into_iter()
            .map(|e| format!("v2: {}", e))
            .collect();
        errors.extend(
            self.debate
                .check_integrity()
                .errors
                .into_iter()
                .map(|e| format!("debate: {}", e)),
        );
        IntegrityReport { errors }
    }

    /// Question counts plus every integrity error, for `check-catalogs`
    pub fn check(&self) -> CatalogCheckResponse {
        CatalogCheckResponse {
            classic_questions: self.classic.questions.len(),
            proposal_questions: self.proposals.questions.len(),
            debate_questions: self.debate.questions.len(),
            integrity_errors: self.integrity().errors,
        }
    }

    fn verify(&self) -> Result<(), CatalogError> {
        let report = self.integrity();
        if !report.is_valid() {
            return Err(CatalogError::Integrity(report));
        }
        Ok(())
    }
}

/// Read a catalog file and check it declares the expected version
pub fn load<T>(path: impl AsRef<Path>, expected: QuestionnaireVersion) -> Result<T, CatalogError>
where
    T: DeserializeOwned + Versioned,
{
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: PathBuf::from(path),
        source,
    })?;

    tracing::info!("Loading {} catalog from {}", expected, path.display());
    parse(&raw, expected)
}

fn parse<T>(raw: &str, expected: QuestionnaireVersion) -> Result<T, CatalogError>
where
    T: DeserializeOwned + Versioned,
{
    let catalog: T = serde_json::from_str(raw)?;
    if catalog.version() != expected {
        return Err(CatalogError::VersionMismatch {
            expected,
            found: catalog.version(),
        });
    }
    Ok(catalog)
}
