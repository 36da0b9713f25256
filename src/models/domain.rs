use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use validator::Validate;

/// Identifier of a fixture within a single run
///
/// Upstream feeds hand out integer ids, composite fallbacks are strings and
/// the completion model may echo either form back. Ids compare by their
/// textual form so `1` and `"1"` refer to the same match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id as an integer if it is the canonical rendering of one
    fn as_integer(&self) -> Option<u64> {
        self.0
            .parse::<u64>()
            .ok()
            .filter(|n| n.to_string() == self.0)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for MatchId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Serialize for MatchId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(n) => serializer.serialize_u64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Integer(i64),
            Float(f64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Integer(n) => Self(n.to_string()),
            // Models occasionally emit `3.0` for an integer id
            RawId::Float(f) if f.fract() == 0.0 => Self(format!("{}", f as i64)),
            RawId::Float(f) => Self(f.to_string()),
            RawId::Text(s) => Self(s.trim().to_string()),
        })
    }
}

/// Sport or esports title a fixture belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Football,
    Cs2,
    Lol,
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sport::Football => "football",
            Sport::Cs2 => "cs2",
            Sport::Lol => "lol",
        };
        f.write_str(label)
    }
}

/// Fixture status, shared by the football and esports feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[serde(alias = "not_started")]
    Scheduled,
    Timed,
    #[serde(alias = "running")]
    InPlay,
    Paused,
    #[serde(alias = "finished")]
    Finished,
    #[serde(alias = "postponed")]
    Postponed,
    Suspended,
    #[serde(alias = "canceled")]
    Cancelled,
    Awarded,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Timed => "TIMED",
            MatchStatus::InPlay => "IN_PLAY",
            MatchStatus::Paused => "PAUSED",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Postponed => "POSTPONED",
            MatchStatus::Suspended => "SUSPENDED",
            MatchStatus::Cancelled => "CANCELLED",
            MatchStatus::Awarded => "AWARDED",
            MatchStatus::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// A normalized fixture, regardless of which feed it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub sport: Sport,
    #[serde(default)]
    pub source: String,
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub kickoff: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub importance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matchday: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl Match {
    /// "Home vs Away" label
    pub fn teams(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

/// Free-text description of what the user likes to watch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile(String);

impl UserProfile {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single entry of the model's answer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Recommendation {
    pub id: MatchId,
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: f64,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub teams: Option<String>,
}

/// A recommendation joined with the fixture it refers to
#[derive(Debug, Clone, Serialize)]
pub struct RankedRecommendation {
    pub rank: usize,
    pub score: f64,
    pub teams: String,
    pub reason: String,
    #[serde(rename = "match")]
    pub fixture: Match,
}
