use crate::config::FootballSettings;
use crate::models::{FootballMatchRaw, FootballMatchesPayload};
use chrono::{Duration as DateSpan, NaiveDate};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to a fixture feed
#[derive(Debug, Error)]
pub enum FixtureApiError {
    #[error("{0} is not set; add it to your environment or .env file")]
    MissingCredential(&'static str),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("{provider} returned {status}: {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Invalid response format from {provider}: {details}")]
    InvalidResponse {
        provider: &'static str,
        details: String,
    },

    #[error("a {days} day fixture window starting {from} is out of the supported date range")]
    WindowOutOfRange { from: NaiveDate, days: u32 },
}

impl FixtureApiError {
    /// Build an `ApiError` from a non-success response, preferring the
    /// `message` field of a JSON error body
    pub(crate) async fn from_response(provider: &'static str, response: Response) -> Self {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());

        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .or_else(|| json.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.chars().take(200).collect());

        FixtureApiError::ApiError {
            provider,
            status: status.as_u16(),
            message,
        }
    }
}

const PROVIDER: &str = "football-data.org";

/// Date range sent as `dateFrom`/`dateTo`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    /// `days` days starting at `from`, both ends inclusive
    pub fn starting(from: NaiveDate, days: u32) -> Result<Self, FixtureApiError> {
        let to = from
            .checked_add_signed(DateSpan::days(i64::from(days)))
            .ok_or(FixtureApiError::WindowOutOfRange { from, days })?;

        Ok(Self { from, to })
    }
}

/// football-data.org API client
///
/// Issues one `GET /matches` per requested status, authenticated with the
/// `X-Auth-Token` header.
pub struct FootballClient {
    api_url: String,
    token: String,
    competitions: Option<String>,
    statuses: Vec<String>,
    client: Client,
}

impl FootballClient {
    /// Create a client from settings; fails when no token is configured
    pub fn from_settings(settings: &FootballSettings) -> Result<Self, FixtureApiError> {
        let token = settings
            .api_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(FixtureApiError::MissingCredential("FOOTBALL_API_TOKEN"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            api_url: settings.api_url.clone(),
            token,
            competitions: normalize_competitions(settings.competitions.as_deref()),
            statuses: settings.statuses.clone(),
            client,
        })
    }

    /// Fetch raw matches for every configured status within `window`
    pub async fn fetch_matches(&self, window: DateWindow) -> Result<Vec<FootballMatchRaw>, FixtureApiError> {
        let mut results = Vec::new();

        for status in &self.statuses {
            let mut params = vec![
                ("status", status.clone()),
                ("dateFrom", window.from.format("%Y-%m-%d").to_string()),
                ("dateTo", window.to.format("%Y-%m-%d").to_string()),
            ];
            if let Some(competitions) = &self.competitions {
                params.push(("competitions", competitions.clone()));
            }

            tracing::debug!("Fetching {} fixtures from {} ({:?})", status, self.api_url, params);

            let response = self
                .client
                .get(&self.api_url)
                .header("X-Auth-Token", &self.token)
                .query(&params)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(FixtureApiError::from_response(PROVIDER, response).await);
            }

            let body = response.text().await?;
            let payload: FootballMatchesPayload =
                serde_json::from_str(&body).map_err(|e| FixtureApiError::InvalidResponse {
                    provider: PROVIDER,
                    details: e.to_string(),
                })?;

            tracing::debug!("Received {} {} fixtures", payload.matches.len(), status);
            results.extend(payload.matches);
        }

        Ok(results)
    }
}

/// Tidy a comma separated competition list, dropping blanks
fn normalize_competitions(raw: Option<&str>) -> Option<String> {
    let list: Vec<&str> = raw?
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    if list.is_empty() {
        None
    } else {
        Some(list.join(","))
    }
}
