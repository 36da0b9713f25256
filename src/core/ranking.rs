use crate::models::{Match, MatchId, RankedRecommendation, Recommendation, RecommendationsEnvelope};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use validator::Validate;

/// Errors raised while turning the model's answer into a ranked list
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("model output is not valid recommendation JSON: {0}")]
    MalformedResponse(String),

    #[error("model recommended match {0}, which is not in this run's fixture list")]
    UnknownMatch(MatchId),

    #[error("invalid recommendation for match {id}: {details}")]
    InvalidRecommendation { id: MatchId, details: String },
}

/// Locate the JSON document in the model's text
///
/// Markdown fences (with or without an info string, inline or on their own
/// line) and prose before the document are skipped.
fn locate_json(raw: &str) -> Option<&str> {
    raw.find(|c: char| c == '{' || c == '[').map(|start| &raw[start..])
}

/// Parse the model output into recommendations
///
/// The expected shape is `{"recommendations": [...]}`; a bare array is
/// accepted as well. Only the first JSON document is read, so a closing
/// fence or trailing prose after it is ignored.
pub fn parse_recommendations(raw: &str) -> Result<Vec<Recommendation>, RankingError> {
    let json = locate_json(raw)
        .ok_or_else(|| RankingError::MalformedResponse("no JSON document in output".to_string()))?;

    let value = serde_json::Deserializer::from_str(json)
        .into_iter::<serde_json::Value>()
        .next()
        .ok_or_else(|| RankingError::MalformedResponse("empty output".to_string()))?
        .map_err(|e| RankingError::MalformedResponse(e.to_string()))?;

    let recommendations = if value.is_array() {
        serde_json::from_value::<Vec<Recommendation>>(value)
    } else {
        serde_json::from_value::<RecommendationsEnvelope>(value).map(|e| e.recommendations)
    };

    recommendations.map_err(|e| RankingError::MalformedResponse(e.to_string()))
}

/// Join recommendations to their matches and order them by score
///
/// Every recommendation must reference a match of `matches`; an unknown id
/// is an error rather than silently dropped. The result is sorted by score,
/// descending, keeping the model's order among equal scores. When the model
/// repeats an id, only its highest scored entry is kept. A `limit` of zero
/// keeps everything.
pub fn rank_recommendations(
    recommendations: Vec<Recommendation>,
    matches: &[Match],
    limit: usize,
) -> Result<Vec<RankedRecommendation>, RankingError> {
    let by_id: HashMap<&MatchId, &Match> = matches.iter().map(|m| (&m.id, m)).collect();

    let mut joined: Vec<(Recommendation, &Match)> = Vec::with_capacity(recommendations.len());
    for mut rec in recommendations {
        rec.reason = rec.reason.trim().to_string();
        rec.validate().map_err(|e| RankingError::InvalidRecommendation {
            id: rec.id.clone(),
            details: e.to_string(),
        })?;

        let fixture = by_id
            .get(&rec.id)
            .copied()
            .ok_or_else(|| RankingError::UnknownMatch(rec.id.clone()))?;

        joined.push((rec, fixture));
    }

    joined.sort_by(|(a, _), (b, _)| b.score.total_cmp(&a.score));

    let mut seen = HashSet::new();
    joined.retain(|(rec, _)| {
        let first = seen.insert(rec.id.clone());
        if !first {
            tracing::debug!("Dropping repeated recommendation for match {}", rec.id);
        }
        first
    });

    if limit > 0 {
        joined.truncate(limit);
    }

    Ok(joined
        .into_iter()
        .enumerate()
        .map(|(idx, (rec, fixture))| RankedRecommendation {
            rank: idx + 1,
            score: rec.score,
            teams: rec
                .teams
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| fixture.teams()),
            reason: rec.reason,
            fixture: fixture.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures::sample_matches;

    fn rec(id: u64, score: f64, reason: &str) -> Recommendation {
        Recommendation {
            id: MatchId::from(id),
            score,
            reason: reason.to_string(),
            teams: None,
        }
    }

    #[test]
    fn test_parse_plain_envelope() {
        let raw = r#"{"recommendations":[{"id":1,"teams":"A vs B","score":87,"reason":"Big game."}]}"#;

        let recs = parse_recommendations(raw).unwrap();

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, MatchId::from(1));
        assert_eq!(recs[0].score, 87.0);
        assert_eq!(recs[0].teams.as_deref(), Some("A vs B"));
    }

    #[test]
    fn test_parse_fenced_and_string_ids() {
        let raw = "```json\n{\"recommendations\":[{\"id\":\"2\",\"score\":55.5,\"reason\":\"ok\"}]}\n```";

        let recs = parse_recommendations(raw).unwrap();

        assert_eq!(recs[0].id, MatchId::from(2));
        assert_eq!(recs[0].score, 55.5);
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let raw = "Here you go: {\"recommendations\": []} Enjoy!";
        assert!(parse_recommendations(raw).unwrap().is_empty());
    }

    #[test]
    fn test_parse_ignores_prose_after_object() {
        let raw = "{\"recommendations\":[{\"id\":1,\"score\":70,\"reason\":\"Derby.\"}]}\nHope this helps!";

        let recs = parse_recommendations(raw).unwrap();

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, MatchId::from(1));
    }

    #[test]
    fn test_parse_bare_array_inside_prose() {
        let raw = "Here you go: [{\"id\":1,\"score\":70,\"reason\":\"a\"},{\"id\":2,\"score\":40,\"reason\":\"b\"}] Enjoy.";

        let recs = parse_recommendations(raw).unwrap();

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].id, MatchId::from(2));
    }

    #[test]
    fn test_parse_single_line_fence() {
        let raw = "```{\"recommendations\":[{\"id\":3,\"score\":12,\"reason\":\"meh\"}]}```";

        let recs = parse_recommendations(raw).unwrap();

        assert_eq!(recs[0].id, MatchId::from(3));

        let tagged = "```json {\"recommendations\":[]}```";
        assert!(parse_recommendations(tagged).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_recommendations("not json"), Err(RankingError::MalformedResponse(_))));
        assert!(matches!(parse_recommendations("   "), Err(RankingError::MalformedResponse(_))));
        assert!(matches!(
            parse_recommendations(r#"{"picks": []}"#),
            Err(RankingError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_rank_sorts_descending_and_stable() {
        let matches = sample_matches();
        let recs = vec![
            rec(1, 60.0, "first sixty"),
            rec(2, 90.0, "ninety"),
            rec(3, 60.0, "second sixty"),
            rec(4, 75.0, "seventy five"),
        ];

        let ranked = rank_recommendations(recs, &matches, 10).unwrap();

        let scores: Vec<f64> = ranked.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![90.0, 75.0, 60.0, 60.0]);
        assert_eq!(ranked[2].reason, "first sixty");
        assert_eq!(ranked[3].reason, "second sixty");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].teams, "Real Madrid vs Barcelona");
    }

    #[test]
    fn test_rank_unknown_id_is_error() {
        let matches = sample_matches();
        let recs = vec![rec(1, 60.0, "fine"), rec(404, 99.0, "hallucinated")];

        let err = rank_recommendations(recs, &matches, 10).unwrap_err();

        assert!(matches!(err, RankingError::UnknownMatch(id) if id == MatchId::from(404)));
    }

    #[test]
    fn test_rank_rejects_out_of_range_score_and_blank_reason() {
        let matches = sample_matches();

        let too_high = rank_recommendations(vec![rec(1, 120.0, "wow")], &matches, 10);
        assert!(matches!(too_high, Err(RankingError::InvalidRecommendation { .. })));

        let blank = rank_recommendations(vec![rec(1, 50.0, "   ")], &matches, 10);
        assert!(matches!(blank, Err(RankingError::InvalidRecommendation { .. })));
    }

    #[test]
    fn test_rank_limit_and_duplicates() {
        let matches = sample_matches();
        let recs = vec![
            rec(1, 40.0, "low"),
            rec(1, 80.0, "high"),
            rec(2, 70.0, "b"),
            rec(3, 10.0, "c"),
        ];

        let ranked = rank_recommendations(recs, &matches, 2).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].fixture.id, MatchId::from(1));
        assert_eq!(ranked[0].reason, "high");
        assert_eq!(ranked[1].fixture.id, MatchId::from(2));
    }

    #[test]
    fn test_model_teams_label_preferred() {
        let matches = sample_matches();
        let mut r = rec(5, 70.0, "esports");
        r.teams = Some("NAVI vs FaZe".to_string());

        let ranked = rank_recommendations(vec![r], &matches, 0).unwrap();

        assert_eq!(ranked[0].teams, "NAVI vs FaZe");
    }
}
