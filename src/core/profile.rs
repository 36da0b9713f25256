use crate::models::UserProfile;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Profile used when no usable profile file exists and fallback is enabled
pub const DEFAULT_PROFILE: &str = "\
I follow the Premier League and the Champions League closely and enjoy \
top-of-the-table clashes and derbies. I also watch top-tier CS2 events. \
I prefer matches that kick off before 22:00 local time.";

/// Errors that can occur when loading the user profile
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile file {0} not found; create it and describe what you like to watch")]
    NotFound(PathBuf),

    #[error("failed to read profile file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("profile file {0} is empty; describe what you like to watch")]
    Empty(PathBuf),
}

/// Read the user's free-text preferences
///
/// Surrounding whitespace is trimmed. A missing, unreadable or blank file is
/// an error unless `fallback_to_default` is set, in which case
/// [`DEFAULT_PROFILE`] is used instead.
pub fn load_profile(path: &Path, fallback_to_default: bool) -> Result<UserProfile, ProfileError> {
    match read_profile(path) {
        Ok(profile) => Ok(profile),
        Err(e) if fallback_to_default => {
            tracing::warn!("{}; using the built-in example profile", e);
            Ok(UserProfile::new(DEFAULT_PROFILE))
        }
        Err(e) => Err(e),
    }
}

fn read_profile(path: &Path) -> Result<UserProfile, ProfileError> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ProfileError::NotFound(path.to_path_buf()),
        _ => ProfileError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let text = text.trim();
    if text.is_empty() {
        return Err(ProfileError::Empty(path.to_path_buf()));
    }

    tracing::debug!("Loaded profile from {} ({} chars)", path.display(), text.len());

    Ok(UserProfile::new(text))
}
