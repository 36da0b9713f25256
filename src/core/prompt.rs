use crate::models::{Match, MatchId, UserProfile};
use serde::Serialize;

/// System message sent ahead of every recommendation prompt
pub const SYSTEM_PROMPT: &str =
    "You are a professional sports and esports match recommendation assistant. You always answer with strict JSON.";

/// Compact view of a match embedded in the prompt
#[derive(Debug, Serialize)]
struct PromptMatch<'a> {
    id: &'a MatchId,
    sport: String,
    competition: &'a str,
    teams: String,
    kickoff: Option<String>,
    importance: &'a str,
    status: String,
}

impl<'a> From<&'a Match> for PromptMatch<'a> {
    fn from(m: &'a Match) -> Self {
        Self {
            id: &m.id,
            sport: m.sport.to_string(),
            competition: &m.competition,
            teams: m.teams(),
            kickoff: m.kickoff.map(|k| k.to_rfc3339()),
            importance: &m.importance,
            status: m.status.to_string(),
        }
    }
}

/// Build the user prompt combining the profile and the candidate matches
///
/// The profile is embedded verbatim and every match appears in a JSON array
/// carrying its id, so the model can only answer with ids it was given.
pub fn build_prompt(profile: &UserProfile, matches: &[Match], reason_language: &str) -> String {
    let view: Vec<PromptMatch<'_>> = matches.iter().map(PromptMatch::from).collect();
    // Serializing plain strings and integers cannot fail
    let matches_json = serde_json::to_string(&view).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a senior sports and esports editor. Score and rank the matches below according to the user's interests and explain each recommendation.

[User interests]
{profile}

[Candidate matches (JSON array)]
{matches_json}

Score every match against the user's interests and sort them. Requirements:
1. Return a JSON object with a single field "recommendations" (an array).
2. Each element of "recommendations" has the fields:
   - id: the match id, exactly as given above
   - teams: the two sides formatted as "Team A vs Team B", nothing else
   - score: recommendation score, an integer from 0 to 100 (higher is more recommended)
   - reason: 1-2 sentences in {reason_language} explaining the score
3. Output only the JSON, without any extra explanation, text or code fences.
"#,
        profile = profile.as_str(),
        matches_json = matches_json,
        reason_language = reason_language,
    )
}
