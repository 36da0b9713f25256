// Service exports
pub mod completion;
pub mod esports;
pub mod football;
pub mod store;

pub use completion::{CompletionClient, CompletionError};
pub use esports::EsportsClient;
pub use football::{DateWindow, FixtureApiError, FootballClient};
pub use store::{MatchStore, PersistStats, StoreError};
