// Model exports
pub mod domain;
pub mod feeds;
pub mod requests;
pub mod responses;

pub use domain::{Match, MatchId, MatchStatus, RankedRecommendation, Recommendation, Sport, UserProfile};
pub use feeds::{FootballMatchRaw, FootballMatchesPayload, PandaMatchRaw, PandaTournamentRaw};
pub use requests::{ChatCompletionRequest, ChatMessage, ResponseFormat};
pub use responses::{ApiErrorResponse, ChatCompletionResponse, RecommendationsEnvelope, TokenUsage};
