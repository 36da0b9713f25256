use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration
///
/// Every key has a built-in default so the tool runs with nothing but
/// credentials in the environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub profile: ProfileSettings,
    pub fixtures: FixtureSettings,
    pub football: FootballSettings,
    pub cs2: EsportsSettings,
    pub lol: EsportsSettings,
    pub completion: CompletionSettings,
    pub display: DisplaySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub path: PathBuf,
    /// Use the built-in example profile instead of failing when the file
    /// is missing or empty
    pub fallback_to_default: bool,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("user_profile.txt"),
            fallback_to_default: false,
        }
    }
}

/// Where the fixture list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FixtureSourceKind {
    /// Built-in sample list
    Static,
    /// Previously stored `matches.json`
    File,
    /// Fetch from the fixture APIs
    #[default]
    Live,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FixtureSettings {
    pub source: FixtureSourceKind,
    pub store_path: PathBuf,
    /// Merge live results into `store_path`
    pub persist: bool,
    pub time_window_days: u32,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            source: FixtureSourceKind::Live,
            store_path: PathBuf::from("matches.json"),
            persist: true,
            time_window_days: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FootballSettings {
    pub api_url: String,
    pub api_token: Option<String>,
    /// Comma separated competition ids or codes, e.g. `PL,CL`
    pub competitions: Option<String>,
    pub statuses: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for FootballSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.football-data.org/v4/matches".to_string(),
            api_token: None,
            competitions: None,
            statuses: vec!["SCHEDULED".to_string()],
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EsportsSettings {
    pub enabled: bool,
    /// Tournament endpoint; each title falls back to its PandaScore URL
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub status: String,
    pub tiers: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for EsportsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: None,
            api_token: None,
            status: "upcoming".to_string(),
            tiers: vec!["s".to_string(), "a".to_string()],
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    /// Send `response_format = json_object`
    pub json_mode: bool,
    /// Language the model writes its reasoning in
    pub reason_language: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-5-nano".to_string(),
            timeout_secs: 120,
            json_mode: true,
            reason_language: "English".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub limit: usize,
    /// Show kickoff in the machine's time zone instead of UTC
    pub local_time: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            limit: 10,
            local_time: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCHREC__)
    /// 5. Well-known credential variables (OPENAI_API_KEY, FOOTBALL_API_TOKEN, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCHREC__FIXTURES__SOURCE -> fixtures.source
            .add_source(environment_source())
            .build()?;

        let settings = substitute_env_vars(settings, |name| std::env::var(name).ok())?;

        settings.try_deserialize()
    }

    /// Parse settings from an inline TOML document, without consulting the environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn environment_source() -> Environment {
    Environment::with_prefix("MATCHREC")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("football.statuses")
        .with_list_parse_key("cs2.tiers")
        .with_list_parse_key("lol.tiers")
}

/// Map the conventional credential variables onto their config keys
///
/// Blank values are treated as unset.
pub(crate) fn substitute_env_vars<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    const OVERRIDES: [(&str, &str); 5] = [
        ("OPENAI_API_KEY", "completion.api_key"),
        ("FOOTBALL_API_TOKEN", "football.api_token"),
        ("FOOTBALL_COMPETITIONS", "football.competitions"),
        ("CS2_API_TOKEN", "cs2.api_token"),
        ("PANDASCORE_API_TOKEN", "lol.api_token"),
    ];

    let mut builder = Config::builder().add_source(settings);

    for (var, key) in OVERRIDES {
        if let Some(value) = lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::from_toml_str("").unwrap();

        assert_eq!(settings.fixtures.source, FixtureSourceKind::Live);
        assert_eq!(settings.fixtures.time_window_days, 3);
        assert_eq!(settings.football.statuses, vec!["SCHEDULED"]);
        assert_eq!(settings.completion.model, "gpt-5-nano");
        assert_eq!(settings.display.limit, 10);
        assert!(!settings.profile.fallback_to_default);
        assert!(!settings.cs2.enabled);
        assert!(settings.football.api_token.is_none());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "compact");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [fixtures]
            source = "file"

            [lol]
            enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(settings.fixtures.source, FixtureSourceKind::File);
        assert_eq!(settings.fixtures.store_path, PathBuf::from("matches.json"));
        assert!(settings.lol.enabled);
        assert_eq!(settings.lol.status, "upcoming");
        assert_eq!(settings.lol.tiers, vec!["s", "a"]);
    }

    #[test]
    fn test_credentials_substituted() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENAI_API_KEY", "sk-test"),
            ("FOOTBALL_API_TOKEN", "  football-token  "),
            ("FOOTBALL_COMPETITIONS", "PL,CL"),
            ("CS2_API_TOKEN", ""),
        ]);

        let base = Config::builder().build().unwrap();
        let settings: Settings = substitute_env_vars(base, |name| env.get(name).map(|v| v.to_string()))
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.completion.api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.football.api_token.as_deref(), Some("football-token"));
        assert_eq!(settings.football.competitions.as_deref(), Some("PL,CL"));
        assert!(settings.cs2.api_token.is_none());
    }
}
