// Integration tests over the shipped catalogs

use std::collections::BTreeSet;
use std::io::Write;

use voto_match::config::{CatalogSettings, Settings};
use voto_match::error::{CatalogError, ScoringError};
use voto_match::models::{
    Candidate, ClassicResponse, DebateResponse, Dimension, DimensionScores, ProposalResponse,
    QuestionnaireVersion, ScoringOutcome, ScoringRequest,
};
use voto_match::services::{CatalogStore, ScoringService};

/// The full roster with a deterministic spread of classic profiles
fn create_roster(store: &CatalogStore) -> Vec<Candidate> {
    store
        .debate
        .roster
        .iter()
        .enumerate()
        .map(|(i, code)| Candidate {
            id: i as u32 + 1,
            party_code: code.clone(),
            party_name: format!("Partido {}", code),
            candidate_name: format!("Candidatura {}", code),
            photo_url: None,
            logo_url: None,
            slogan: None,
            color_primary: Some("#1f2937".to_string()),
            color_secondary: None,
            website_url: None,
            plan_summary: None,
            scores: Some(DimensionScores::from_fn(|d| {
                let seed = (i + Dimension::POLICY.iter().position(|p| *p == d).unwrap_or(0)) % 9;
                1.0 + seed as f64 * 0.5
            })),
            is_active: true,
        })
        .collect()
}

fn classic_responses(store: &CatalogStore) -> Vec<ClassicResponse> {
    store
        .classic
        .questions
        .iter()
        .map(|q| ClassicResponse {
            question_id: q.id,
            dimension: q.dimension,
            score: (q.id % 5 + 1) as f64,
            time_spent: Some(8),
        })
        .collect()
}

fn proposal_responses(store: &CatalogStore) -> Vec<ProposalResponse> {
    store
        .proposals
        .questions
        .iter()
        .map(|q| {
            let take = if q.multi_select { 2 } else { 1 };
            ProposalResponse {
                question_id: q.id,
                selected_options: q.options.iter().take(take).map(|o| o.id.clone()).collect(),
            }
        })
        .collect()
}

fn debate_responses(store: &CatalogStore) -> Vec<DebateResponse> {
    store
        .debate
        .questions
        .iter()
        .map(|q| DebateResponse {
            question_id: q.id,
            selected_option: q.options.last().map(|o| o.id.clone()),
        })
        .collect()
}

#[test]
fn test_debate_catalog_partitions_roster() {
    let store = CatalogStore::builtin().unwrap();
    let roster: BTreeSet<&str> = store.debate.roster.iter().map(String::as_str).collect();
    assert_eq!(roster.len(), 20);

    for question in &store.debate.questions {
        let holders: Vec<&str> = question
            .options
            .iter()
            .flat_map(|o| o.holders.iter().map(String::as_str))
            .collect();
        let unique: BTreeSet<&str> = holders.iter().copied().collect();

        assert_eq!(holders.len(), unique.len(), "Q{} repeats a party", question.id);
        assert_eq!(unique, roster, "Q{} does not cover the roster", question.id);
    }

    assert!(store.debate.check_partition().is_valid());
}

#[test]
fn test_catalogs_cover_expected_dimensions() {
    let store = CatalogStore::builtin().unwrap();

    let classic: BTreeSet<Dimension> = store.classic.questions.iter().map(|q| q.dimension).collect();
    assert_eq!(classic, Dimension::POLICY.into_iter().collect());

    let debate: BTreeSet<Dimension> = store.debate.questions.iter().map(|q| q.dimension).collect();
    assert_eq!(debate, Dimension::ALL.into_iter().collect());

    for question in &store.proposals.questions {
        assert_eq!(question.multi_select, question.dimension.is_policy(), "Q{}", question.id);
    }
}

#[test]
fn test_classic_end_to_end_deterministic() {
    let store = CatalogStore::builtin().unwrap();
    let service = ScoringService::new(&store, 3);
    let candidates = create_roster(&store);
    let responses = classic_responses(&store);

    let first = service.classic().score(&responses, &candidates, None).unwrap();
    let second = service.classic().score(&responses, &candidates, None).unwrap();

    assert_eq!(first.rankings, second.rankings);
    assert_eq!(first.rankings.len(), 20);
    assert_eq!(first.top_matches.len(), 3);
    assert!(first.validation.warnings.is_empty());

    for pair in first.rankings.windows(2) {
        assert!(pair[0].affinity_percentage >= pair[1].affinity_percentage);
    }
    for m in &first.rankings {
        assert!((0.0..=100.0).contains(&m.affinity_percentage));
    }
}

#[test]
fn test_proposals_end_to_end_idempotent() {
    let store = CatalogStore::builtin().unwrap();
    let service = ScoringService::new(&store, 3);
    let candidates = create_roster(&store);
    let responses = proposal_responses(&store);

    let first = service.proposals().score(&responses, &candidates).unwrap();
    let second = service.proposals().score(&responses, &candidates).unwrap();

    assert_eq!(first.rankings, second.rankings);
    assert_eq!(first.total_selected, 8 * 2 + 3);
    // 8 policy questions at weight 1, 3 profile questions at weight 3
    assert_eq!(first.rankings[0].max_possible_points, 17.0);

    for score in &first.rankings {
        assert!((0.0..=100.0).contains(&score.percentage));
    }

    // First security option starts with "Mano dura"
    assert!(first.user_profile_text.contains("postura firme contra el crimen"));
}

#[test]
fn test_debate_end_to_end() {
    let store = CatalogStore::builtin().unwrap();
    let service = ScoringService::new(&store, 3);
    let candidates = create_roster(&store);
    let responses = debate_responses(&store);

    let result = service.debate().score(&responses, &candidates).unwrap();

    assert_eq!(result.rankings.len(), 20);
    assert_eq!(result.rankings[0].max_possible_points, 17.0);
    assert!(result.validation.warnings.is_empty());

    // Postures partition the roster, so the points handed out equal the sum
    // over questions of weight * holders of the chosen option
    let handed_out: f64 = result.rankings.iter().map(|s| s.total_points).sum();
    let expected: f64 = store
        .debate
        .questions
        .iter()
        .map(|q| {
            let holders = q.options.last().map(|o| o.holders.len()).unwrap_or(0);
            store.debate.weights.get(q.dimension) * holders as f64
        })
        .sum();
    assert_eq!(handed_out, expected);

    // Every last option ends in -c or -d
    assert_eq!(result.user_profile.progressive_count, 11);

    let standings = service.debate().partial_standings(&responses, &candidates);
    for standing in &standings {
        let scored = result
            .rankings
            .iter()
            .find(|s| s.candidate.party_code == standing.party_code)
            .unwrap();
        assert_eq!(standing.points, scored.total_points);
        assert!((standing.percentage - scored.percentage).abs() < 0.05);
    }
}

#[test]
fn test_proposal_standings_match_scores() {
    let store = CatalogStore::builtin().unwrap();
    let service = ScoringService::new(&store, 3);
    let candidates = create_roster(&store);
    let responses = proposal_responses(&store);

    let result = service.proposals().score(&responses, &candidates).unwrap();
    let standings = service.proposals().partial_standings(&responses, &candidates);

    assert_eq!(standings.len(), 20);
    for standing in &standings {
        let scored = result
            .rankings
            .iter()
            .find(|s| s.candidate.party_code == standing.party_code)
            .unwrap();
        assert_eq!(standing.max_points, scored.max_possible_points);
        assert!((standing.points - scored.total_points).abs() <= 0.005 + 1e-9);
        assert!((standing.percentage - scored.percentage).abs() <= 0.05 + 1e-9);
    }
}

#[test]
fn test_request_json_dispatch() {
    let store = CatalogStore::builtin().unwrap();
    let service = ScoringService::new(&store, 3);

    let raw = r#"{
        "version": "v2",
        "sessionId": "0b7e3a52-3a8f-4bd4-9a43-6c2a5f1f8d11",
        "responses": [
            { "questionId": 1, "selectedOptions": ["sec-1a", "sec-1d"] },
            { "questionId": 9, "selectedOptions": ["lid-9a"] }
        ],
        "candidates": [
            { "id": 1, "partyCode": "PLN", "partyName": "Liberación Nacional" },
            { "id": 2, "partyCode": "PEN", "partyName": "Esperanza Nacional" },
            { "id": 3, "partyCode": "FA", "partyName": "Frente Amplio", "isActive": false }
        ]
    }"#;

    let request: ScoringRequest = serde_json::from_str(raw).unwrap();
    assert_eq!(request.version(), QuestionnaireVersion::Proposals);

    let response = service.handle(&request).unwrap();
    assert_eq!(response.session_id, request.session_id());

    // PLN: half of security + all of leadership = 3.5 / 4
    // PEN: all of security = 1 / 4
    assert_eq!(response.result.ranked_party_codes(), vec!["PLN", "PEN"]);
    match &response.result {
        ScoringOutcome::Proposals(result) => {
            assert_eq!(result.rankings[0].percentage, 87.5);
            assert_eq!(result.rankings[1].percentage, 25.0);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["version"], "v2");
    assert!(json["computedAt"].is_string());
    assert!(json["result"]["topMatches"].is_array());
}

#[test]
fn test_request_with_unknown_version_rejected() {
    let raw = r#"{ "version": "v9", "responses": [], "candidates": [] }"#;
    assert!(serde_json::from_str::<ScoringRequest>(raw).is_err());
}

#[test]
fn test_invalid_request_reports_validation() {
    let store = CatalogStore::builtin().unwrap();
    let service = ScoringService::new(&store, 3);

    let raw = r#"{
        "version": "debate",
        "responses": [{ "questionId": 99, "selectedOption": "sec-a" }],
        "candidates": [{ "id": 1, "partyCode": "PLN", "partyName": "Liberación Nacional" }]
    }"#;
    let request: ScoringRequest = serde_json::from_str(raw).unwrap();

    let err = service.handle(&request).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidResponses(_)));
    assert!(err.to_string().contains("question 99 does not exist"));
}

#[test]
fn test_catalog_override_from_file() {
    let store = CatalogStore::builtin().unwrap();

    let mut broken = (*store.debate).clone();
    broken.questions[0].options[0].holders.push("PLN".to_string());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&broken).unwrap().as_bytes()).unwrap();

    let settings = CatalogSettings {
        debate_path: Some(file.path().to_path_buf()),
        ..CatalogSettings::default()
    };

    match CatalogStore::from_settings(&settings) {
        Err(CatalogError::Integrity(report)) => {
            assert_eq!(report.errors.len(), 1);
            assert!(report.errors[0].contains("duplicates: PLN"));
        }
        other => panic!("expected integrity error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_proposal_catalog_file_integrity() {
    let store = CatalogStore::builtin().unwrap();

    let mut repeated = (*store.proposals).clone();
    repeated.questions[0].options[0].supporters = vec!["AAA".to_string(), "AAA".to_string()];
    let mut negative = (*store.proposals).clone();
    negative.weights = negative.weights.with(Dimension::Security, -1.0);

    for (catalog, expected) in [
        (repeated, "v2: Q1 option sec-1a: duplicate supporters: AAA"),
        (negative, "v2: weight for security must be positive, got -1"),
    ] {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&catalog).unwrap().as_bytes()).unwrap();

        let settings = CatalogSettings {
            proposals_path: Some(file.path().to_path_buf()),
            ..CatalogSettings::default()
        };

        match CatalogStore::from_settings(&settings) {
            Err(CatalogError::Integrity(report)) => assert_eq!(report.errors, vec![expected.to_string()]),
            other => panic!("expected integrity error, got {:?}", other.map(|_| ())),
        }

        // Still loadable for reporting
        let report = CatalogStore::from_settings_unchecked(&settings).unwrap().check();
        assert_eq!(report.integrity_errors, vec![expected.to_string()]);
    }
}

#[test]
fn test_debate_catalog_file_with_zero_weight() {
    let store = CatalogStore::builtin().unwrap();
    let mut catalog = (*store.debate).clone();
    catalog.weights = catalog.weights.with(Dimension::Leadership, 0.0);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&catalog).unwrap().as_bytes()).unwrap();

    let settings = CatalogSettings {
        debate_path: Some(file.path().to_path_buf()),
        ..CatalogSettings::default()
    };

    let err = CatalogStore::from_settings(&settings).unwrap_err();
    assert!(err.to_string().contains("debate: weight for leadership must be positive, got 0"));
}

#[test]
fn test_catalog_file_with_wrong_version() {
    let store = CatalogStore::builtin().unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&*store.classic).unwrap().as_bytes()).unwrap();

    let settings = CatalogSettings {
        proposals_path: Some(file.path().to_path_buf()),
        ..CatalogSettings::default()
    };

    // A classic catalog does not parse as a proposal catalog
    assert!(CatalogStore::from_settings(&settings).is_err());
}

#[test]
fn test_settings_drive_top_n() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[scoring]\ntop_n = 1").unwrap();

    let settings = Settings::load_from(file.path()).unwrap();
    let store = CatalogStore::from_settings(&settings.catalog).unwrap();
    let service = ScoringService::new(&store, settings.scoring.top_n);

    let result = service
        .debate()
        .score(&debate_responses(&store), &create_roster(&store))
        .unwrap();
    assert_eq!(result.top_matches.len(), 1);
}
