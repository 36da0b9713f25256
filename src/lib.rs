//! Match Recommender - ranks upcoming fixtures against a personal profile
//!
//! This library fetches football (and optionally esports) fixtures, merges
//! them with a free-text preference profile and asks an LLM completion
//! endpoint to score and explain them. The run is a single linear pipeline,
//! see [`pipeline::Pipeline`].

pub mod config;
pub mod core;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod services;

// Re-export commonly used types
pub use self::config::Settings;
pub use self::core::{build_prompt, parse_recommendations, rank_recommendations};
pub use models::{Match, MatchId, RankedRecommendation, Recommendation, UserProfile};
pub use pipeline::{Pipeline, PipelineError};
