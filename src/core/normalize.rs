use crate::models::{FootballMatchRaw, Match, MatchId, MatchStatus, PandaMatchRaw, PandaTournamentRaw, Sport};
use chrono::{DateTime, NaiveDateTime, Utc};

pub const FOOTBALL_SOURCE: &str = "football-data.org";
pub const ESPORTS_SOURCE: &str = "pandascore.co";

/// Parse an upstream timestamp into UTC
///
/// Accepts RFC 3339 (`2024-01-01T12:00:00Z`, `...+02:00`), the minute
/// precision form `2024-01-01T12:00Z`, and naive timestamps which are taken
/// to be UTC. Returns `None` for blank or unparseable input.
pub fn normalize_time(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset_form = match value.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_str(&offset_form, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    tracing::warn!("Unparseable kickoff time {:?}, leaving it empty", value);
    None
}

fn parse_status(value: Option<&str>) -> MatchStatus {
    value
        .and_then(|s| serde_json::from_value(serde_json::Value::String(s.to_string())).ok())
        .unwrap_or_default()
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Convert a football-data.org record into a [`Match`]
pub fn normalize_football_match(raw: &FootballMatchRaw) -> Match {
    let home = raw.home_team.clone().unwrap_or_default();
    let away = raw.away_team.clone().unwrap_or_default();
    let competition = raw.competition.clone().unwrap_or_default();

    let id = match raw.id {
        Some(id) => MatchId::from(id),
        // No id from the API: build a key that is stable across fetches
        None => MatchId::new(format!(
            "{}-{}-{}",
            home.id.map(|i| i.to_string()).unwrap_or_else(|| "None".to_string()),
            away.id.map(|i| i.to_string()).unwrap_or_else(|| "None".to_string()),
            raw.utc_date.as_deref().unwrap_or("None"),
        )),
    };

    let league_name = non_empty(competition.name.as_ref());
    let stage = non_empty(raw.stage.as_ref());

    let mut importance_parts: Vec<String> = Vec::new();
    if let Some(name) = league_name {
        importance_parts.push(name.to_string());
    }
    if let Some(stage) = stage.filter(|s| *s != "REGULAR_SEASON") {
        importance_parts.push(stage.to_string());
    }
    if let Some(matchday) = raw.matchday.filter(|d| *d > 0) {
        importance_parts.push(format!("Matchday {}", matchday));
    }
    let importance = if importance_parts.is_empty() {
        non_empty(raw.status.as_ref()).unwrap_or("scheduled").to_string()
    } else {
        importance_parts.join(" | ")
    };

    Match {
        id,
        sport: Sport::Football,
        source: FOOTBALL_SOURCE.to_string(),
        competition: league_name.unwrap_or("Football").to_string(),
        home_team: non_empty(home.name.as_ref()).unwrap_or("Home").to_string(),
        away_team: non_empty(away.name.as_ref()).unwrap_or("Away").to_string(),
        kickoff: normalize_time(raw.utc_date.as_deref()),
        status: parse_status(raw.status.as_deref()),
        importance,
        stage: stage.map(str::to_string),
        matchday: raw.matchday,
        venue: non_empty(raw.venue.as_ref()).map(str::to_string),
    }
}

/// Convert a PandaScore match into a [`Match`]
///
/// `tournament` is the "league serie" label of the enclosing tournament and
/// `importance` the tier label configured for the feed.
pub fn normalize_esports_match(raw: &PandaMatchRaw, sport: Sport, tournament: &str, importance: &str) -> Match {
    let name = non_empty(raw.name.as_ref());
    let start = raw.begin_at.as_deref().or(raw.scheduled_at.as_deref());

    let id = match raw.id {
        Some(id) => MatchId::from(id),
        None => MatchId::new(format!(
            "{}-{}",
            name.unwrap_or(&sport.to_string()),
            start.unwrap_or("None")
        )),
    };

    let team_names: Vec<&str> = raw
        .opponents
        .iter()
        .filter_map(|record| record.opponent.as_ref())
        .filter_map(|opponent| non_empty(opponent.name.as_ref()))
        .collect();

    let (home_team, away_team) = match team_names.as_slice() {
        [home, away, ..] => (home.to_string(), away.to_string()),
        _ => match name.and_then(|n| n.split_once(" vs ")) {
            Some((home, away)) => (home.trim().to_string(), away.trim().to_string()),
            None => (
                team_names
                    .first()
                    .copied()
                    .or(name)
                    .unwrap_or("TBD")
                    .to_string(),
                "TBD".to_string(),
            ),
        },
    };

    let tournament = tournament.trim();

    Match {
        id,
        sport,
        source: ESPORTS_SOURCE.to_string(),
        competition: if tournament.is_empty() {
            "Unknown Tournament".to_string()
        } else {
            tournament.to_string()
        },
        home_team,
        away_team,
        kickoff: normalize_time(start),
        status: parse_status(raw.status.as_deref()),
        importance: importance.to_string(),
        stage: non_empty(raw.round.as_ref())
            .or(non_empty(raw.phase.as_ref()))
            .map(str::to_string),
        matchday: None,
        venue: None,
    }
}

/// Flatten PandaScore tournaments into normalized matches
///
/// Matches whose pairing is still undecided (`TBD` in the name) are skipped.
pub fn normalize_esports_tournaments(
    tournaments: &[PandaTournamentRaw],
    sport: Sport,
    tiers: &[String],
) -> Vec<Match> {
    let importance = tiers
        .last()
        .map(|tier| format!("tier-{}", tier))
        .unwrap_or_else(|| "unknown".to_string());

    tournaments
        .iter()
        .flat_map(|tournament| {
            let label = format!(
                "{} {}",
                tournament.league.as_ref().and_then(|l| l.name.as_deref()).unwrap_or(""),
                tournament.serie.as_ref().and_then(|s| s.name.as_deref()).unwrap_or(""),
            );
            let importance = importance.as_str();
            tournament
                .matches
                .iter()
                .filter(|m| !m.name.as_deref().unwrap_or("").contains("TBD"))
                .map(move |m| normalize_esports_match(m, sport, &label, importance))
        })
        .collect()
}
