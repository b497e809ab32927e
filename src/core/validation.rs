//! Response validation for the three questionnaires.
//!
//! Validation never fails hard: it returns a [`ValidationReport`] and leaves
//! the decision (reject vs. score with warnings) to the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

use crate::error::ScoringError;
use crate::models::domain::{MAX_SCORE, MIN_SCORE};
use crate::models::{
    Candidate, ClassicCatalog, ClassicResponse, DebateCatalog, DebateResponse, Dimension,
    DimensionWeights, ProposalCatalog, ProposalResponse,
};

pub const NO_RESPONSES: &str = "no responses provided";

/// Errors block scoring; warnings are reported alongside the result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    fn finish(mut self) -> Self {
        self.is_valid = self.errors.is_empty();
        self
    }

    fn empty_responses() -> Self {
        let mut report = Self::default();
        report.error(NO_RESPONSES.to_string());
        report.finish()
    }

    /// Turn an invalid report into an error, log warnings otherwise
    pub fn into_result(self) -> Result<Self, ScoringError> {
        if !self.is_valid {
            return Err(ScoringError::InvalidResponses(self));
        }
        for warning in &self.warnings {
            tracing::warn!("Scoring with incomplete responses: {}", warning);
        }
        Ok(self)
    }
}

/// Flag questions answered more than once
fn check_duplicates(report: &mut ValidationReport, question_ids: impl Iterator<Item = u32>) {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for id in question_ids {
        if !seen.insert(id) && reported.insert(id) {
            report.error(format!("question {} answered more than once", id));
        }
    }
}

/// Validate Likert responses and optional user weights
pub fn validate_classic(
    responses: &[ClassicResponse],
    catalog: &ClassicCatalog,
    weights: Option<&DimensionWeights>,
) -> ValidationReport {
    if responses.is_empty() {
        return ValidationReport::empty_responses();
    }

    let mut report = ValidationReport::default();

    check_duplicates(&mut report, responses.iter().map(|r| r.question_id));

    for (index, response) in responses.iter().enumerate() {
        if !response.score.is_finite() || response.score < MIN_SCORE || response.score > MAX_SCORE {
            report.error(format!(
                "response {} has invalid score: {}",
                index + 1,
                response.score
            ));
        }

        if !response.dimension.is_policy() {
            report.error(format!(
                "dimension {} is not scored by the classic questionnaire",
                response.dimension
            ));
            continue;
        }

        match catalog.question(response.question_id) {
            None => report.error(format!("question {} does not exist", response.question_id)),
            Some(question) if question.dimension != response.dimension => report.error(format!(
                "question {} belongs to {}, response says {}",
                response.question_id, question.dimension, response.dimension
            )),
            Some(_) => {}
        }
    }

    if let Some(weights) = weights {
        for (dimension, weight) in weights.iter() {
            if !weight.is_finite() || weight <= 0.0 {
                report.error(format!("weight for {} must be positive, got {}", dimension, weight));
            }
        }
    }

    let answered: BTreeSet<Dimension> = responses.iter().map(|r| r.dimension).collect();
    for dimension in Dimension::POLICY {
        if !answered.contains(&dimension) {
            report.warn(format!("no responses for dimension {}", dimension));
        }
    }

    report.finish()
}

/// Validate proposal selections against the v2 catalog
pub fn validate_proposals(responses: &[ProposalResponse], catalog: &ProposalCatalog) -> ValidationReport {
    if responses.is_empty() {
        return ValidationReport::empty_responses();
    }

    let mut report = ValidationReport::default();

    let answered: BTreeSet<u32> = responses.iter().map(|r| r.question_id).collect();
    for question in &catalog.questions {
        if !answered.contains(&question.id) {
            report.warn(format!("question {} was not answered", question.id));
        }
    }

    check_duplicates(&mut report, responses.iter().map(|r| r.question_id));

    for response in responses {
        let Some(question) = catalog.question(response.question_id) else {
            report.error(format!("question {} does not exist", response.question_id));
            continue;
        };

        if !question.multi_select && response.selected_options.len() > 1 {
            report.error(format!(
                "question {} does not allow multiple selections",
                response.question_id
            ));
        }

        if response.selected_options.is_empty() {
            report.warn(format!("question {} has no selected options", response.question_id));
        }

        let mut picked = BTreeSet::new();
        for option_id in &response.selected_options {
            if !picked.insert(option_id.as_str()) {
                report.error(format!("option {} selected more than once", option_id));
                continue;
            }
            match catalog.option(option_id) {
                None => report.error(format!("option {} does not exist", option_id)),
                Some((owner, _)) if owner.id != question.id => report.error(format!(
                    "option {} does not belong to question {}",
                    option_id, question.id
                )),
                Some(_) => {}
            }
        }
    }

    report.finish()
}

/// Validate debate posture picks against the debate catalog
pub fn validate_debate(responses: &[DebateResponse], catalog: &DebateCatalog) -> ValidationReport {
    if responses.is_empty() {
        return ValidationReport::empty_responses();
    }

    let mut report = ValidationReport::default();

    let answered: BTreeSet<u32> = responses.iter().map(|r| r.question_id).collect();
    for question in &catalog.questions {
        if !answered.contains(&question.id) {
            report.warn(format!("question {} was not answered", question.id));
        }
    }

    check_duplicates(&mut report, responses.iter().map(|r| r.question_id));

    for response in responses {
        let Some(question) = catalog.question(response.question_id) else {
            report.error(format!("question {} does not exist", response.question_id));
            continue;
        };

        let Some(option_id) = response.selection() else {
            report.warn(format!("question {} has no selected option", response.question_id));
            continue;
        };

        match catalog.option(option_id) {
            None => report.error(format!("option {} does not exist", option_id)),
            Some((owner, _)) if owner.id != question.id => report.error(format!(
                "option {} does not belong to question {}",
                option_id, question.id
            )),
            Some(_) => {}
        }
    }

    report.finish()
}

/// Check the roster before ranking: field rules, unique party codes and at
/// least one active candidate.
pub fn validate_roster(candidates: &[Candidate]) -> Result<(), ScoringError> {
    let mut codes = BTreeSet::new();

    for candidate in candidates {
        let invalid = |reason: String| ScoringError::InvalidCandidate {
            party_code: candidate.party_code.clone(),
            reason,
        };

        candidate.validate().map_err(|e| invalid(e.to_string()))?;

        if let Some(scores) = &candidate.scores {
            if !scores.is_finite() {
                return Err(invalid("profile contains non-finite scores".to_string()));
            }
            scores.validate().map_err(|e| invalid(e.to_string()))?;
        }

        if !codes.insert(candidate.party_code.as_str()) {
            return Err(invalid("duplicate party code".to_string()));
        }
    }

    if !candidates.iter().any(|c| c.is_active) {
        return Err(ScoringError::EmptyRoster);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DebateOption, DebateQuestion, DimensionNames, DimensionScores, LikertQuestion,
        ProposalOption, ProposalQuestion, QuestionnaireVersion,
    };

    fn classic_catalog() -> ClassicCatalog {
        ClassicCatalog {
            version: QuestionnaireVersion::Classic,
            questions: Dimension::POLICY
                .iter()
                .enumerate()
                .map(|(i, d)| LikertQuestion {
                    id: i as u32 + 1,
                    text: format!("Q{}", i + 1),
                    dimension: *d,
                    options: vec![],
                })
                .collect(),
        }
    }

    fn classic(question_id: u32, dimension: Dimension, score: f64) -> ClassicResponse {
        ClassicResponse {
            question_id,
            dimension,
            score,
            time_spent: None,
        }
    }

    fn proposal_catalog() -> ProposalCatalog {
        let option = |id: &str| ProposalOption {
            id: id.to_string(),
            text: id.to_string(),
            description: String::new(),
            supporters: vec!["AAA".into()],
        };
        ProposalCatalog {
            version: QuestionnaireVersion::Proposals,
            weights: DimensionWeights::leadership_weighted(),
            dimension_names: DimensionNames::default(),
            profile_rules: vec![],
            questions: vec![
                ProposalQuestion {
                    id: 1,
                    text: "multi".into(),
                    dimension: Dimension::Security,
                    multi_select: true,
                    options: vec![option("sec-1a"), option("sec-1b")],
                },
                ProposalQuestion {
                    id: 2,
                    text: "single".into(),
                    dimension: Dimension::Leadership,
                    multi_select: false,
                    options: vec![option("lid-2a"), option("lid-2b")],
                },
            ],
        }
    }

    fn debate_catalog() -> DebateCatalog {
        DebateCatalog {
            version: QuestionnaireVersion::Debate,
            roster: vec!["AAA".into()],
            weights: DimensionWeights::leadership_weighted(),
            dimension_names: DimensionNames::default(),
            questions: vec![DebateQuestion {
                id: 1,
                topic: "T".into(),
                dimension: Dimension::Economy,
                prompt: "?".into(),
                context: String::new(),
                options: vec![DebateOption {
                    id: "eco-a".into(),
                    stance: "A".into(),
                    description: String::new(),
                    holders: vec!["AAA".into()],
                }],
            }],
        }
    }

    #[test]
    fn test_classic_empty_responses() {
        let report = validate_classic(&[], &classic_catalog(), None);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![NO_RESPONSES.to_string()]);
    }

    #[test]
    fn test_classic_score_out_of_range() {
        let responses = vec![classic(1, Dimension::Security, 7.0)];
        let report = validate_classic(&responses, &classic_catalog(), None);
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("invalid score: 7"));
    }

    #[test]
    fn test_classic_missing_dimensions_warn() {
        let responses = vec![classic(1, Dimension::Security, 2.0)];
        let report = validate_classic(&responses, &classic_catalog(), None);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 7);
    }

    #[test]
    fn test_classic_unknown_question_and_dimension_mismatch() {
        let responses = vec![
            classic(99, Dimension::Security, 2.0),
            classic(2, Dimension::Security, 2.0),
        ];
        let report = validate_classic(&responses, &classic_catalog(), None);
        assert!(report.errors.iter().any(|e| e.contains("question 99 does not exist")));
        assert!(report.errors.iter().any(|e| e.contains("question 2 belongs to economy")));
    }

    #[test]
    fn test_classic_rejects_non_positive_weight() {
        let responses = vec![classic(1, Dimension::Security, 2.0)];
        let weights = DimensionWeights::uniform().with(Dimension::Health, 0.0);
        let report = validate_classic(&responses, &classic_catalog(), Some(&weights));
        assert!(!report.is_valid);
        assert!(report.errors[0].contains("weight for health"));
    }

    #[test]
    fn test_classic_duplicate_question() {
        let responses = vec![
            classic(1, Dimension::Security, 2.0),
            classic(1, Dimension::Security, 4.0),
        ];
        let report = validate_classic(&responses, &classic_catalog(), None);
        assert!(report.errors.contains(&"question 1 answered more than once".to_string()));
    }

    #[test]
    fn test_proposals_single_select_violation() {
        let responses = vec![ProposalResponse {
            question_id: 2,
            selected_options: vec!["lid-2a".into(), "lid-2b".into()],
        }];
        let report = validate_proposals(&responses, &proposal_catalog());
        assert!(!report.is_valid);
        assert!(report.errors.contains(&"question 2 does not allow multiple selections".to_string()));
        assert!(report.warnings.contains(&"question 1 was not answered".to_string()));
    }

    #[test]
    fn test_proposals_unknown_and_foreign_options() {
        let responses = vec![ProposalResponse {
            question_id: 1,
            selected_options: vec!["nope".into(), "lid-2a".into()],
        }];
        let report = validate_proposals(&responses, &proposal_catalog());
        assert!(report.errors.contains(&"option nope does not exist".to_string()));
        assert!(report.errors.contains(&"option lid-2a does not belong to question 1".to_string()));
    }

    #[test]
    fn test_proposals_empty_selection_warns() {
        let responses = vec![ProposalResponse {
            question_id: 1,
            selected_options: vec![],
        }];
        let report = validate_proposals(&responses, &proposal_catalog());
        assert!(report.is_valid);
        assert!(report.warnings.contains(&"question 1 has no selected options".to_string()));
    }

    #[test]
    fn test_debate_unknown_question() {
        let responses = vec![DebateResponse {
            question_id: 42,
            selected_option: Some("eco-a".into()),
        }];
        let report = validate_debate(&responses, &debate_catalog());
        assert!(!report.is_valid);
        assert!(report.errors.contains(&"question 42 does not exist".to_string()));
    }

    #[test]
    fn test_debate_missing_selection_warns() {
        let responses = vec![DebateResponse {
            question_id: 1,
            selected_option: None,
        }];
        let report = validate_debate(&responses, &debate_catalog());
        assert!(report.is_valid);
        assert_eq!(report.warnings, vec!["question 1 has no selected option".to_string()]);
    }

    #[test]
    fn test_roster_checks() {
        let candidate = |code: &str, active: bool| Candidate {
            id: 1,
            party_code: code.to_string(),
            party_name: "Partido".to_string(),
            candidate_name: String::new(),
            photo_url: None,
            logo_url: None,
            slogan: None,
            color_primary: None,
            color_secondary: None,
            website_url: None,
            plan_summary: None,
            scores: Some(DimensionScores::neutral()),
            is_active: active,
        };

        assert!(validate_roster(&[candidate("AAA", true)]).is_ok());
        assert!(matches!(validate_roster(&[]), Err(ScoringError::EmptyRoster)));
        assert!(matches!(
            validate_roster(&[candidate("AAA", false)]),
            Err(ScoringError::EmptyRoster)
        ));
        assert!(matches!(
            validate_roster(&[candidate("AAA", true), candidate("AAA", true)]),
            Err(ScoringError::InvalidCandidate { .. })
        ));
        assert!(matches!(
            validate_roster(&[candidate("", true)]),
            Err(ScoringError::InvalidCandidate { .. })
        ));

        let mut out_of_range = candidate("BBB", true);
        out_of_range.scores = Some(DimensionScores::uniform(9.0));
        assert!(matches!(
            validate_roster(&[out_of_range]),
            Err(ScoringError::InvalidCandidate { .. })
        ));
    }
}
