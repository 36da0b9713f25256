// Core pipeline stages (pure, no I/O besides the profile read)
pub mod fixtures;
pub mod normalize;
pub mod profile;
pub mod prompt;
pub mod ranking;

pub use fixtures::{drop_stale, ensure_unique_ids, merge_matches, sample_matches, sort_by_kickoff, FixtureError};
pub use normalize::{normalize_esports_tournaments, normalize_football_match, normalize_time};
pub use profile::{load_profile, ProfileError, DEFAULT_PROFILE};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use ranking::{parse_recommendations, rank_recommendations, RankingError};
