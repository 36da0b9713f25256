// Unit tests for Match Recommender

use chrono::{TimeZone, Utc};
use match_recommender::core::{
    build_prompt, merge_matches, normalize_football_match, parse_recommendations, rank_recommendations,
    sample_matches,
};
use match_recommender::models::{FootballMatchRaw, Match, MatchId, MatchStatus, Recommendation, Sport, UserProfile};

fn create_test_match(id: &str, sport: Sport, day: u32) -> Match {
    Match {
        id: MatchId::new(id),
        sport,
        source: "test".to_string(),
        competition: "Test Cup".to_string(),
        home_team: format!("Home {}", id),
        away_team: format!("Away {}", id),
        kickoff: Utc.with_ymd_and_hms(2025, 5, day, 19, 0, 0).single(),
        status: MatchStatus::Scheduled,
        importance: String::new(),
        stage: None,
        matchday: None,
        venue: None,
    }
}

#[test]
fn test_match_id_numeric_and_string_forms_are_equal() {
    let from_int: MatchId = serde_json::from_str("42").unwrap();
    let from_str: MatchId = serde_json::from_str("\"42\"").unwrap();
    let from_float: MatchId = serde_json::from_str("42.0").unwrap();

    assert_eq!(from_int, from_str);
    assert_eq!(from_int, from_float);
    assert_eq!(serde_json::to_string(&from_str).unwrap(), "42");
}

#[test]
fn test_match_id_keeps_non_canonical_strings() {
    let padded = MatchId::new("007");
    let composite = MatchId::new("10-11-2024-01-01T12:00:00Z");

    assert_eq!(serde_json::to_string(&padded).unwrap(), "\"007\"");
    assert_eq!(serde_json::to_string(&composite).unwrap(), "\"10-11-2024-01-01T12:00:00Z\"");
}

#[test]
fn test_stored_match_file_shape() {
    let json = r#"[{
        "id": 1,
        "sport": "football",
        "competition": "PL",
        "home_team": "A",
        "away_team": "B",
        "kickoff": "2024-01-01T12:00:00Z",
        "status": "SCHEDULED"
    }]"#;

    let matches: Vec<Match> = serde_json::from_str(json).unwrap();

    assert_eq!(matches[0].id, MatchId::from(1));
    assert_eq!(matches[0].status, MatchStatus::Scheduled);
    assert_eq!(matches[0].importance, "");
    assert_eq!(matches[0].kickoff, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single());
}

#[test]
fn test_unknown_status_tolerated() {
    let status: MatchStatus = serde_json::from_str("\"LIVE_ON_MARS\"").unwrap();
    assert_eq!(status, MatchStatus::Unknown);

    let esports: MatchStatus = serde_json::from_str("\"running\"").unwrap();
    assert_eq!(esports, MatchStatus::InPlay);
}

#[test]
fn test_prompt_contains_profile_and_all_ids() {
    let profile = UserProfile::new("Only knockout games.\nNothing after 21:00.");

    for size in [1usize, 3, 12] {
        let matches: Vec<Match> = (0..size)
            .map(|i| create_test_match(&format!("m-{}", i), Sport::Football, 1 + (i as u32 % 28)))
            .collect();

        let prompt = build_prompt(&profile, &matches, "English");

        assert!(prompt.contains(profile.as_str()));
        for m in &matches {
            assert!(prompt.contains(m.id.as_str()), "prompt misses {}", m.id);
        }
    }
}

#[test]
fn test_football_payload_normalization() {
    let raw: FootballMatchRaw = serde_json::from_str(
        r#"{
            "id": 1,
            "utcDate": "2024-01-01T12:00:00Z",
            "status": "SCHEDULED",
            "stage": "LAST_16",
            "competition": { "name": "UEFA Champions League" },
            "homeTeam": { "id": 5, "name": "FC Bayern München" },
            "awayTeam": { "id": 86, "name": "Real Madrid CF" }
        }"#,
    )
    .unwrap();

    let m = normalize_football_match(&raw);

    assert_eq!(m.importance, "UEFA Champions League | LAST_16");
    assert_eq!(m.teams(), "FC Bayern München vs Real Madrid CF");
    assert_eq!(m.status, MatchStatus::Scheduled);
}

#[test]
fn test_merge_preserves_other_sports() {
    let existing = vec![
        create_test_match("1", Sport::Cs2, 3),
        create_test_match("1", Sport::Football, 5),
    ];
    let mut refreshed = create_test_match("1", Sport::Football, 2);
    refreshed.home_team = "Refreshed".to_string();

    let merged = merge_matches(existing, vec![refreshed]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].home_team, "Refreshed");
    assert_eq!(merged[1].sport, Sport::Cs2);
}

#[test]
fn test_example_scenario() {
    let matches = vec![Match {
        id: MatchId::from(1),
        sport: Sport::Football,
        source: "test".to_string(),
        competition: "PL".to_string(),
        home_team: "A".to_string(),
        away_team: "B".to_string(),
        kickoff: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single(),
        status: MatchStatus::Scheduled,
        importance: String::new(),
        stage: None,
        matchday: None,
        venue: None,
    }];

    let output = r#"{"recommendations":[{"id":1,"score":78,"reason":"Premier League with an early kickoff."}]}"#;
    let recommendations = parse_recommendations(output).unwrap();
    let ranked = rank_recommendations(recommendations, &matches, 10).unwrap();

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].fixture.id, MatchId::from(1));
    assert!(ranked[0].score.is_finite());
    assert!(!ranked[0].reason.is_empty());
}

#[test]
fn test_ranking_order_is_non_increasing() {
    let matches = sample_matches();
    let scores = [12.0, 99.0, 45.5, 45.5, 80.0, 0.0];
    let recommendations: Vec<Recommendation> = matches
        .iter()
        .zip(scores)
        .map(|(m, score)| Recommendation {
            id: m.id.clone(),
            score,
            reason: "because".to_string(),
            teams: None,
        })
        .collect();

    let ranked = rank_recommendations(recommendations, &matches, 0).unwrap();

    assert_eq!(ranked.len(), matches.len());
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=matches.len()).collect::<Vec<_>>());
}
