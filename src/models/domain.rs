use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

/// Neutral Likert value used when a dimension has no responses
pub const NEUTRAL_SCORE: f64 = 3.0;

/// Lowest and highest Likert values
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 5.0;

/// Policy or profile axis along which users and candidates are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Security,
    Economy,
    Education,
    Health,
    Agriculture,
    Environment,
    Reforms,
    Social,
    Leadership,
    Experience,
    Priority,
}

impl Dimension {
    /// The eight policy axes scored by the Likert questionnaire
    pub const POLICY: [Dimension; 8] = [
        Dimension::Security,
        Dimension::Economy,
        Dimension::Education,
        Dimension::Health,
        Dimension::Agriculture,
        Dimension::Environment,
        Dimension::Reforms,
        Dimension::Social,
    ];

    pub const ALL: [Dimension; 11] = [
        Dimension::Security,
        Dimension::Economy,
        Dimension::Education,
        Dimension::Health,
        Dimension::Agriculture,
        Dimension::Environment,
        Dimension::Reforms,
        Dimension::Social,
        Dimension::Leadership,
        Dimension::Experience,
        Dimension::Priority,
    ];

    pub fn is_policy(self) -> bool {
        !matches!(
            self,
            Dimension::Leadership | Dimension::Experience | Dimension::Priority
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Security => "security",
            Dimension::Economy => "economy",
            Dimension::Education => "education",
            Dimension::Health => "health",
            Dimension::Agriculture => "agriculture",
            Dimension::Environment => "environment",
            Dimension::Reforms => "reforms",
            Dimension::Social => "social",
            Dimension::Leadership => "leadership",
            Dimension::Experience => "experience",
            Dimension::Priority => "priority",
        }
    }

    /// Label shown in the results UI
    pub fn display_name(self) -> &'static str {
        match self {
            Dimension::Security => "Seguridad y Justicia",
            Dimension::Economy => "Economía y Empleo",
            Dimension::Education => "Educación",
            Dimension::Health => "Salud",
            Dimension::Agriculture => "Sector Agropecuario",
            Dimension::Environment => "Medio Ambiente",
            Dimension::Reforms => "Reformas del Estado",
            Dimension::Social => "Política Social",
            Dimension::Leadership => "Estilo de Liderazgo",
            Dimension::Experience => "Experiencia Valorada",
            Dimension::Priority => "Prioridad Nacional",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-dimension Likert profile in [1,5] for the eight policy axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct DimensionScores {
    #[validate(range(min = 1.0, max = 5.0))]
    pub security: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub economy: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub education: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub health: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub agriculture: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub environment: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub reforms: f64,
    #[validate(range(min = 1.0, max = 5.0))]
    pub social: f64,
}

impl DimensionScores {
    pub fn neutral() -> Self {
        Self::uniform(NEUTRAL_SCORE)
    }

    pub fn uniform(value: f64) -> Self {
        Self::from_fn(|_| value)
    }

    /// Build a profile by evaluating `f` once per policy dimension
    pub fn from_fn(mut f: impl FnMut(Dimension) -> f64) -> Self {
        Self {
            security: f(Dimension::Security),
            economy: f(Dimension::Economy),
            education: f(Dimension::Education),
            health: f(Dimension::Health),
            agriculture: f(Dimension::Agriculture),
            environment: f(Dimension::Environment),
            reforms: f(Dimension::Reforms),
            social: f(Dimension::Social),
        }
    }

    /// Score for a policy dimension; `None` for the profile axes
    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::Security => Some(self.security),
            Dimension::Economy => Some(self.economy),
            Dimension::Education => Some(self.education),
            Dimension::Health => Some(self.health),
            Dimension::Agriculture => Some(self.agriculture),
            Dimension::Environment => Some(self.environment),
            Dimension::Reforms => Some(self.reforms),
            Dimension::Social => Some(self.social),
            Dimension::Leadership | Dimension::Experience | Dimension::Priority => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::POLICY
            .iter()
            .filter_map(move |&dimension| self.get(dimension).map(|score| (dimension, score)))
    }

    pub fn mean(&self) -> f64 {
        self.iter().map(|(_, score)| score).sum::<f64>() / Dimension::POLICY.len() as f64
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, score)| score.is_finite())
    }
}

/// Multiplier per dimension; dimensions without an entry weigh 1
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionWeights(BTreeMap<Dimension, f64>);

impl DimensionWeights {
    pub const DEFAULT_WEIGHT: f64 = 1.0;
    pub const LEADERSHIP_WEIGHT: f64 = 3.0;

    pub fn uniform() -> Self {
        Self::default()
    }

    /// Table used by the proposal and debate questionnaires: profile axes count triple
    pub fn leadership_weighted() -> Self {
        Self::uniform()
            .with(Dimension::Leadership, Self::LEADERSHIP_WEIGHT)
            .with(Dimension::Experience, Self::LEADERSHIP_WEIGHT)
            .with(Dimension::Priority, Self::LEADERSHIP_WEIGHT)
    }

    pub fn with(mut self, dimension: Dimension, weight: f64) -> Self {
        self.0.insert(dimension, weight);
        self
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.0
            .get(&dimension)
            .copied()
            .unwrap_or(Self::DEFAULT_WEIGHT)
    }

    /// Explicitly configured entries
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.0.iter().map(|(dimension, weight)| (*dimension, *weight))
    }

    /// One message per entry that is not a positive finite number
    pub fn check(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, weight)| !(weight.is_finite() && *weight > 0.0))
            .map(|(dimension, weight)| format!("weight for {} must be positive, got {}", dimension, weight))
            .collect()
    }
}

/// UI label per dimension for one catalog; missing entries use [`Dimension::display_name`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionNames(BTreeMap<Dimension, String>);

impl DimensionNames {
    pub fn with(mut self, dimension: Dimension, name: impl Into<String>) -> Self {
        self.0.insert(dimension, name.into());
        self
    }

    pub fn get(&self, dimension: Dimension) -> &str {
        self.0
            .get(&dimension)
            .map(String::as_str)
            .unwrap_or_else(|| dimension.display_name())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Dimension, f64)> for DimensionWeights {
    fn from_iter<I: IntoIterator<Item = (Dimension, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Presidential candidate as seeded from the official roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: u32,
    #[validate(length(min = 1))]
    pub party_code: String,
    #[validate(length(min = 1))]
    pub party_name: String,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slogan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_summary: Option<String>,
    /// Likert profile; only the classic questionnaire needs it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<DimensionScores>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Answer to one Likert question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassicResponse {
    pub question_id: u32,
    pub dimension: Dimension,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<u32>,
}

/// Options picked for one proposal question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResponse {
    pub question_id: u32,
    #[serde(default)]
    pub selected_options: Vec<String>,
}

/// Posture picked for one debate question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateResponse {
    pub question_id: u32,
    #[serde(default)]
    pub selected_option: Option<String>,
}

impl DebateResponse {
    /// The chosen option id, treating an empty string as no selection
    pub fn selection(&self) -> Option<&str> {
        self.selected_option
            .as_deref()
            .filter(|option_id| !option_id.is_empty())
    }
}

/// Questionnaire variant a session was answered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionnaireVersion {
    #[serde(rename = "v1")]
    Classic,
    #[serde(rename = "v2")]
    Proposals,
    #[serde(rename = "debate")]
    Debate,
}

impl QuestionnaireVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionnaireVersion::Classic => "v1",
            QuestionnaireVersion::Proposals => "v2",
            QuestionnaireVersion::Debate => "debate",
        }
    }
}

impl fmt::Display for QuestionnaireVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
