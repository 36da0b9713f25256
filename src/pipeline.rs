//! End-to-end recommendation run
//!
//! load profile -> obtain fixtures -> build prompt -> call model -> parse -> rank
//!
//! Every stage either succeeds or aborts the run; nothing is retried and no
//! partial result is returned.

use crate::config::{FixtureSourceKind, Settings};
use crate::core::{
    build_prompt, ensure_unique_ids, load_profile, normalize_football_match, parse_recommendations, rank_recommendations,
    sample_matches, sort_by_kickoff, FixtureError, ProfileError, RankingError, SYSTEM_PROMPT,
};
use crate::models::{Match, RankedRecommendation, Sport, UserProfile};
use crate::services::{
    CompletionClient, CompletionError, DateWindow, EsportsClient, FixtureApiError, FootballClient, MatchStore,
    StoreError,
};
use chrono::{Local, NaiveDate, NaiveTime, TimeZone, Utc};
use thiserror::Error;

/// Any failure that aborts a run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("failed to fetch fixtures: {0}")]
    FixtureApi(#[from] FixtureApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("completion request failed: {0}")]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Ranking(#[from] RankingError),

    #[error("no fixtures to recommend from")]
    NoFixtures,
}

/// Orchestrates a single recommendation run
pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Run every stage and return the ranked recommendations
    pub async fn run(&self) -> Result<Vec<RankedRecommendation>, PipelineError> {
        self.run_on(Local::now().date_naive()).await
    }

    /// Same as [`Pipeline::run`] with the fetch window anchored at `today`
    pub async fn run_on(&self, today: NaiveDate) -> Result<Vec<RankedRecommendation>, PipelineError> {
        // Credentials are checked before any network traffic
        let completion = CompletionClient::from_settings(&self.settings.completion)?;

        let profile = load_profile(&self.settings.profile.path, self.settings.profile.fallback_to_default)?;
        tracing::info!("Loaded user profile ({} chars)", profile.as_str().len());

        let matches = self.obtain_fixtures(today).await?;

        self.recommend(&completion, &profile, &matches).await
    }

    /// Produce the run's fixture list from the configured source
    pub async fn obtain_fixtures(&self, today: NaiveDate) -> Result<Vec<Match>, PipelineError> {
        let mut matches = match self.settings.fixtures.source {
            FixtureSourceKind::Static => {
                tracing::info!("Using the built-in fixture list");
                sample_matches()
            }
            FixtureSourceKind::File => {
                let store = MatchStore::new(&self.settings.fixtures.store_path);
                let matches = store.load()?;
                tracing::info!("Loaded {} fixtures from {}", matches.len(), store.path().display());
                matches
            }
            FixtureSourceKind::Live => self.fetch_live(today).await?,
        };

        sort_by_kickoff(&mut matches);
        ensure_unique_ids(&matches)?;

        if matches.is_empty() {
            return Err(PipelineError::NoFixtures);
        }

        Ok(matches)
    }

    async fn fetch_live(&self, today: NaiveDate) -> Result<Vec<Match>, PipelineError> {
        let football = FootballClient::from_settings(&self.settings.football)?;

        let mut esports = Vec::new();
        for (sport, settings) in [(Sport::Cs2, &self.settings.cs2), (Sport::Lol, &self.settings.lol)] {
            if settings.enabled {
                esports.push(EsportsClient::from_settings(sport, settings)?);
            }
        }

        let window = DateWindow::starting(today, self.settings.fixtures.time_window_days)?;
        let raw = football.fetch_matches(window).await?;
        let mut matches: Vec<Match> = raw.iter().map(normalize_football_match).collect();
        tracing::info!("Fetched {} football matches ({} to {})", matches.len(), window.from, window.to);

        for client in &esports {
            let fetched = client.fetch_matches().await?;
            tracing::info!("Fetched {} {} matches", fetched.len(), client.sport());
            matches.extend(fetched);
        }

        if self.settings.fixtures.persist {
            let window_start = Utc.from_utc_datetime(&window.from.and_time(NaiveTime::default()));
            MatchStore::new(&self.settings.fixtures.store_path).persist(&matches, window_start)?;
        }

        Ok(matches)
    }

    /// Ask the model to score `matches` for `profile` and rank its answer
    pub async fn recommend(
        &self,
        completion: &CompletionClient,
        profile: &UserProfile,
        matches: &[Match],
    ) -> Result<Vec<RankedRecommendation>, PipelineError> {
        if matches.is_empty() {
            return Err(PipelineError::NoFixtures);
        }

        let prompt = build_prompt(profile, matches, &self.settings.completion.reason_language);
        tracing::info!("Requesting recommendations for {} matches from {}", matches.len(), completion.model());

        let output = completion.complete(SYSTEM_PROMPT, &prompt).await?;
        let recommendations = parse_recommendations(&output).map_err(|e| {
            tracing::debug!("Raw model output: {}", output);
            e
        })?;

        let ranked = rank_recommendations(recommendations, matches, self.settings.display.limit)?;
        tracing::info!("Model returned {} recommendations", ranked.len());

        Ok(ranked)
    }
}
