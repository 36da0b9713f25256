//! Raw payloads of the upstream fixture feeds
//!
//! Only the fields the normalizer reads are modelled, everything else is
//! ignored. All fields are optional because both feeds omit keys freely.

use serde::Deserialize;

/// Envelope of football-data.org `GET /v4/matches`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FootballMatchesPayload {
    #[serde(default)]
    pub matches: Vec<FootballMatchRaw>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FootballMatchRaw {
    pub id: Option<u64>,
    pub utc_date: Option<String>,
    pub status: Option<String>,
    pub matchday: Option<u32>,
    pub stage: Option<String>,
    pub venue: Option<String>,
    pub competition: Option<FootballCompetitionRaw>,
    pub home_team: Option<FootballTeamRaw>,
    pub away_team: Option<FootballTeamRaw>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FootballCompetitionRaw {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FootballTeamRaw {
    pub id: Option<u64>,
    pub name: Option<String>,
}

/// A PandaScore tournament with its embedded matches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PandaTournamentRaw {
    pub league: Option<PandaNamedRaw>,
    pub serie: Option<PandaNamedRaw>,
    #[serde(default)]
    pub matches: Vec<PandaMatchRaw>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PandaNamedRaw {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PandaMatchRaw {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub begin_at: Option<String>,
    pub scheduled_at: Option<String>,
    pub round: Option<String>,
    pub phase: Option<String>,
    #[serde(default)]
    pub opponents: Vec<PandaOpponentRecordRaw>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PandaOpponentRecordRaw {
    pub opponent: Option<PandaNamedRaw>,
}
