use crate::core::{drop_stale, merge_matches};
use crate::models::Match;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur with the stored fixture list
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("fixture file {0} not found; run in live mode once or create it")]
    NotFound(PathBuf),

    #[error("failed to access fixture file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture file {path} is not a valid match list: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize fixtures: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of merging fresh fixtures into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistStats {
    pub fresh: usize,
    pub preserved: usize,
    pub dropped: usize,
    pub total: usize,
}

/// Flat JSON file holding the normalized fixture list (`matches.json`)
///
/// The file is always rewritten as a whole, never patched in place.
#[derive(Debug, Clone)]
pub struct MatchStore {
    path: PathBuf,
}

impl MatchStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored list; a missing or malformed file is an error
    pub fn load(&self) -> Result<Vec<Match>, StoreError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Io {
                path: self.path.clone(),
                source,
            },
        })?;

        serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Read the stored list as the base of a merge
    ///
    /// A missing file is an empty list and a corrupt one is logged and
    /// treated as empty, since it is about to be overwritten.
    pub fn load_for_merge(&self) -> Result<Vec<Match>, StoreError> {
        match self.load() {
            Ok(matches) => Ok(matches),
            Err(StoreError::NotFound(_)) => Ok(Vec::new()),
            Err(StoreError::Malformed { path, source }) => {
                tracing::warn!("{} contained invalid JSON ({}), overwriting", path.display(), source);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite the file with `matches`
    pub fn save(&self, matches: &[Match]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(matches)?;
        std::fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Merge `fresh` into the stored list and write the result back
    ///
    /// Stored entries that kicked off before `stale_before` are dropped;
    /// fresh entries are always written.
    pub fn persist(&self, fresh: &[Match], stale_before: DateTime<Utc>) -> Result<PersistStats, StoreError> {
        let existing = self.load_for_merge()?;
        let stored = existing.len();
        let existing = drop_stale(existing, stale_before);
        let dropped = stored - existing.len();

        let merged = merge_matches(existing, fresh.to_vec());
        self.save(&merged)?;

        let stats = PersistStats {
            fresh: fresh.len(),
            preserved: merged.len() - fresh.len(),
            dropped,
            total: merged.len(),
        };

        tracing::info!(
            "Stored {} fresh matches plus {} existing entries into {} ({} stale entries dropped)",
            stats.fresh,
            stats.preserved,
            self.path.display(),
            stats.dropped
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample_matches;
    use chrono::TimeZone;

    fn long_ago() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = MatchStore::new(dir.path().join("matches.json"));
        let matches = sample_matches();

        store.save(&matches).unwrap();

        assert_eq!(store.load().unwrap(), matches);
    }

    #[test]
    fn test_load_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = MatchStore::new(dir.path().join("matches.json"));

        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));
        assert!(store.load_for_merge().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.json");
        std::fs::write(&path, "[{\"id\": 1,").unwrap();
        let store = MatchStore::new(&path);

        assert!(matches!(store.load(), Err(StoreError::Malformed { .. })));
        assert!(store.load_for_merge().unwrap().is_empty());
    }

    #[test]
    fn test_persist_overwrites_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.json");
        std::fs::write(&path, "garbage").unwrap();
        let store = MatchStore::new(&path);
        let fresh = sample_matches();

        let stats = store.persist(&fresh, long_ago()).unwrap();

        assert_eq!(stats.preserved, 0);
        assert_eq!(stats.total, fresh.len());
        assert_eq!(store.load().unwrap().len(), fresh.len());
    }

    #[test]
    fn test_persist_drops_played_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = MatchStore::new(dir.path().join("matches.json"));
        let mut stored = sample_matches();
        let mut played = stored[0].clone();
        played.id = "old-1".into();
        played.kickoff = Utc.with_ymd_and_hms(2001, 5, 5, 20, 0, 0).single();
        stored.push(played);
        store.save(&stored).unwrap();

        let cutoff = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        let stats = store.persist(&[], cutoff).unwrap();

        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.preserved, sample_matches().len());
        assert!(store.load().unwrap().iter().all(|m| m.id.as_str() != "old-1"));
    }
}
