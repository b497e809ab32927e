//! Rule tables behind the user-profile sentences.
//!
//! Each questionnaire summarises the user differently; the rules are plain
//! data so they can be listed and tested one by one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Dimension, DimensionScores, ProfileRule};

/// Threshold band on an averaged Likert score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    AtMost(f64),
    AtLeast(f64),
}

impl Band {
    pub fn contains(self, score: f64) -> bool {
        match self {
            Band::AtMost(limit) => score <= limit,
            Band::AtLeast(limit) => score >= limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRule {
    pub dimension: Dimension,
    pub band: Band,
    pub phrase: &'static str,
}

/// Dimension highlights for the classic questionnaire, evaluated in order
pub const CLASSIC_RULES: &[ThresholdRule] = &[
    ThresholdRule {
        dimension: Dimension::Security,
        band: Band::AtMost(2.5),
        phrase: "enfoque de seguridad orientado a la prevención social",
    },
    ThresholdRule {
        dimension: Dimension::Security,
        band: Band::AtLeast(3.5),
        phrase: "enfoque de seguridad más punitivo y de mano dura",
    },
    ThresholdRule {
        dimension: Dimension::Economy,
        band: Band::AtMost(2.5),
        phrase: "preferencia por economía de mercado libre",
    },
    ThresholdRule {
        dimension: Dimension::Economy,
        band: Band::AtLeast(3.5),
        phrase: "apoyo a mayor intervención estatal en la economía",
    },
    ThresholdRule {
        dimension: Dimension::Social,
        band: Band::AtMost(2.5),
        phrase: "enfoque de responsabilidad individual en política social",
    },
    ThresholdRule {
        dimension: Dimension::Social,
        band: Band::AtLeast(3.5),
        phrase: "apoyo a programas sociales amplios y universales",
    },
];

/// Overall tendency by mean score; the first bucket whose upper bound holds wins
pub const TENDENCY_BUCKETS: &[(f64, &str)] = &[
    (2.3, "conservadora y liberal en lo económico"),
    (2.7, "moderadamente conservadora"),
    (3.3, "centrista"),
    (3.7, "moderadamente progresista"),
];

pub const TOP_TENDENCY: &str = "progresista con énfasis en el rol del Estado";

pub fn classic_tendency(mean: f64) -> &'static str {
    TENDENCY_BUCKETS
        .iter()
        .find(|(limit, _)| mean <= *limit)
        .map(|(_, label)| *label)
        .unwrap_or(TOP_TENDENCY)
}

/// Sentence describing a classic user profile
pub fn classic_profile(scores: &DimensionScores) -> String {
    let highlights: Vec<&str> = CLASSIC_RULES
        .iter()
        .filter(|rule| {
            scores
                .get(rule.dimension)
                .is_some_and(|score| rule.band.contains(score))
        })
        .map(|rule| rule.phrase)
        .collect();

    let tendency = classic_tendency(scores.mean());

    if highlights.is_empty() {
        format!("Tu perfil muestra una tendencia {}.", tendency)
    } else {
        format!(
            "Tu perfil muestra una tendencia {}, con {}.",
            tendency,
            highlights.join(", ")
        )
    }
}

pub const PROPOSAL_FALLBACK: &str =
    "Tu perfil muestra una tendencia moderada con posiciones diversas en los diferentes temas.";

/// Sentence for the proposal questionnaire: every rule whose keyword appears
/// in a selected option text of its dimension contributes its phrase once.
pub fn proposal_profile(rules: &[ProfileRule], selected_texts: &BTreeMap<Dimension, Vec<&str>>) -> String {
    let mut highlights: Vec<&str> = Vec::new();

    for rule in rules {
        let fired = selected_texts
            .get(&rule.dimension)
            .is_some_and(|texts| texts.iter().any(|text| text.contains(rule.keyword.as_str())));

        if fired && !highlights.contains(&rule.phrase.as_str()) {
            highlights.push(rule.phrase.as_str());
        }
    }

    if highlights.is_empty() {
        PROPOSAL_FALLBACK.to_string()
    } else {
        format!("Tu perfil muestra {}.", highlights.join(", "))
    }
}

/// Ideological bucket of a debate posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tendency {
    Conservative,
    Moderate,
    Progressive,
}

impl Tendency {
    /// Infer the bucket from the option id suffix (`-a`, `-b`, `-c`/`-d`).
    ///
    /// The catalog has no explicit tendency field; ids outside the
    /// convention are left unclassified.
    pub fn from_option_id(option_id: &str) -> Option<Self> {
        if option_id.ends_with("-a") {
            Some(Tendency::Conservative)
        } else if option_id.ends_with("-b") {
            Some(Tendency::Moderate)
        } else if option_id.ends_with("-c") || option_id.ends_with("-d") {
            Some(Tendency::Progressive)
        } else {
            None
        }
    }
}

/// Tri-bucket summary of a debate session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeologyProfile {
    pub conservative_count: usize,
    pub moderate_count: usize,
    pub progressive_count: usize,
    pub summary: String,
}

impl IdeologyProfile {
    pub fn from_option_ids<'a>(option_ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut profile = Self::default();
        for option_id in option_ids {
            match Tendency::from_option_id(option_id) {
                Some(Tendency::Conservative) => profile.conservative_count += 1,
                Some(Tendency::Moderate) => profile.moderate_count += 1,
                Some(Tendency::Progressive) => profile.progressive_count += 1,
                None => {}
            }
        }
        profile.summary = profile.summarize().to_string();
        profile
    }

    pub fn total(&self) -> usize {
        self.conservative_count + self.moderate_count + self.progressive_count
    }

    /// A bucket dominates only when it strictly beats both others
    pub fn summarize(&self) -> &'static str {
        let (c, m, p) = (
            self.conservative_count,
            self.moderate_count,
            self.progressive_count,
        );

        if self.total() == 0 {
            "Responde las preguntas para conocer tu perfil político."
        } else if c > m && c > p {
            "Tu perfil muestra una tendencia hacia posiciones más tradicionales y de mano firme."
        } else if p > m && p > c {
            "Tu perfil muestra una tendencia hacia posiciones progresistas y de cambio social."
        } else if m > c && m > p {
            "Tu perfil muestra una tendencia moderada y pragmática."
        } else {
            "Tu perfil es balanceado, con posiciones diversas según el tema."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_tendency_buckets() {
        assert_eq!(classic_tendency(1.0), "conservadora y liberal en lo económico");
        assert_eq!(classic_tendency(2.3), "conservadora y liberal en lo económico");
        assert_eq!(classic_tendency(2.5), "moderadamente conservadora");
        assert_eq!(classic_tendency(3.0), "centrista");
        assert_eq!(classic_tendency(3.7), "moderadamente progresista");
        assert_eq!(classic_tendency(4.2), TOP_TENDENCY);
    }

    #[test]
    fn test_classic_profile_neutral_has_no_highlights() {
        let text = classic_profile(&DimensionScores::neutral());
        assert_eq!(text, "Tu perfil muestra una tendencia centrista.");
    }

    #[test]
    fn test_classic_profile_highlights() {
        let mut scores = DimensionScores::neutral();
        scores.security = 5.0;
        scores.economy = 1.0;
        let text = classic_profile(&scores);
        assert_eq!(
            text,
            "Tu perfil muestra una tendencia centrista, con enfoque de seguridad más punitivo y de mano dura, preferencia por economía de mercado libre."
        );
    }

    #[test]
    fn test_every_classic_rule_fires_alone() {
        for rule in CLASSIC_RULES {
            let extreme = match rule.band {
                Band::AtMost(_) => 1.0,
                Band::AtLeast(_) => 5.0,
            };
            let scores = DimensionScores::from_fn(|d| if d == rule.dimension { extreme } else { 3.0 });
            assert!(classic_profile(&scores).contains(rule.phrase), "rule did not fire: {}", rule.phrase);
        }
    }

    #[test]
    fn test_proposal_profile_rules() {
        let rules = vec![
            ProfileRule {
                dimension: Dimension::Security,
                keyword: "Mano dura".into(),
                phrase: "postura firme contra el crimen".into(),
            },
            ProfileRule {
                dimension: Dimension::Social,
                keyword: "Inversión social".into(),
                phrase: "apoyo a programas sociales amplios".into(),
            },
        ];

        let mut texts = BTreeMap::new();
        texts.insert(Dimension::Security, vec!["Mano dura: endurecer penas"]);
        assert_eq!(
            proposal_profile(&rules, &texts),
            "Tu perfil muestra postura firme contra el crimen."
        );

        // Keyword only counts inside its own dimension
        let mut texts = BTreeMap::new();
        texts.insert(Dimension::Economy, vec!["Mano dura: endurecer penas"]);
        assert_eq!(proposal_profile(&rules, &texts), PROPOSAL_FALLBACK);
    }

    #[test]
    fn test_tendency_suffixes() {
        assert_eq!(Tendency::from_option_id("sec-a"), Some(Tendency::Conservative));
        assert_eq!(Tendency::from_option_id("sec-b"), Some(Tendency::Moderate));
        assert_eq!(Tendency::from_option_id("sec-c"), Some(Tendency::Progressive));
        assert_eq!(Tendency::from_option_id("sec-d"), Some(Tendency::Progressive));
        assert_eq!(Tendency::from_option_id("sec-e"), None);
    }

    #[test]
    fn test_ideology_summary() {
        let profile = IdeologyProfile::from_option_ids(["sec-a", "eco-a", "edu-b"]);
        assert_eq!(profile.conservative_count, 2);
        assert_eq!(profile.moderate_count, 1);
        assert!(profile.summary.contains("tradicionales"));

        let tied = IdeologyProfile::from_option_ids(["sec-a", "eco-c"]);
        assert!(tied.summary.contains("balanceado"));

        let empty = IdeologyProfile::from_option_ids(std::iter::empty());
        assert!(empty.summary.starts_with("Responde"));
    }
}
