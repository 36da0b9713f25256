use crate::models::{Match, MatchId, MatchStatus, Sport};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("duplicate match id {0} in fixture list")]
    DuplicateMatchId(MatchId),
}

/// Built-in fixture list used by the `static` source
pub fn sample_matches() -> Vec<Match> {
    let fixture = |id: u64, sport: Sport, competition: &str, home: &str, away: &str, ts: (i32, u32, u32, u32, u32), importance: &str| {
        let (y, mo, d, h, mi) = ts;
        Match {
            id: MatchId::from(id),
            sport,
            source: "built-in".to_string(),
            competition: competition.to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            kickoff: Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single(),
            status: MatchStatus::Scheduled,
            importance: importance.to_string(),
            stage: None,
            matchday: None,
            venue: None,
        }
    };

    vec![
        fixture(1, Sport::Football, "Premier League", "Manchester City", "Liverpool", (2025, 3, 8, 17, 30), "Title race"),
        fixture(2, Sport::Football, "La Liga", "Real Madrid", "Barcelona", (2025, 3, 9, 20, 0), "El Clasico"),
        fixture(3, Sport::Football, "Serie A", "Inter", "AC Milan", (2025, 3, 9, 19, 45), "Derby della Madonnina"),
        fixture(4, Sport::Football, "Bundesliga", "Bayern Munich", "Borussia Dortmund", (2025, 3, 8, 17, 30), "Der Klassiker"),
        fixture(5, Sport::Cs2, "IEM Katowice", "Natus Vincere", "FaZe Clan", (2025, 3, 9, 15, 0), "tier-s"),
        fixture(6, Sport::Lol, "LEC Spring", "G2 Esports", "Fnatic", (2025, 3, 8, 18, 0), "tier-a"),
    ]
}

/// Reject fixture lists in which two matches share an id
///
/// Recommendations refer to matches by id alone, so ids must be unique
/// across sports within a run.
pub fn ensure_unique_ids(matches: &[Match]) -> Result<(), FixtureError> {
    let mut seen = HashSet::with_capacity(matches.len());
    for m in matches {
        if !seen.insert(&m.id) {
            return Err(FixtureError::DuplicateMatchId(m.id.clone()));
        }
    }
    Ok(())
}

/// Sort by kickoff ascending; matches without a kickoff go first
pub fn sort_by_kickoff(matches: &mut [Match]) {
    matches.sort_by(|a, b| a.kickoff.cmp(&b.kickoff));
}

/// Merge freshly fetched matches into a stored list
///
/// Entries of `existing` with the same `(sport, id)` as a fresh entry are
/// replaced; everything else, including other sports, is preserved.
pub fn merge_matches(existing: Vec<Match>, fresh: Vec<Match>) -> Vec<Match> {
    let fresh_keys: HashSet<(Sport, MatchId)> = fresh
        .iter()
        .map(|m| (m.sport, m.id.clone()))
        .collect();

    let mut combined: Vec<Match> = existing
        .into_iter()
        .filter(|m| !fresh_keys.contains(&(m.sport, m.id.clone())))
        .chain(fresh)
        .collect();

    sort_by_kickoff(&mut combined);
    combined
}

/// Drop stored entries that kicked off before `cutoff`
///
/// Entries without a kickoff are kept, they may still be played.
pub fn drop_stale(matches: Vec<Match>, cutoff: DateTime<Utc>) -> Vec<Match> {
    matches
        .into_iter()
        .filter(|m| m.kickoff.map_or(true, |k| k >= cutoff))
        .collect()
}
