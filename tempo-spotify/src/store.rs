//! Durable per-user credential storage, one JSON file per user id.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SpotifyError;

/// Persisted OAuth token material for one linked Spotify account.
///
/// The record is the sole source of truth for whether a user is linked.
/// `expires_at` is absolute unix seconds and round-trips exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_at: u64,
    pub scopes: Vec<String>,
}

impl CredentialRecord {
    /// Whether the access token is expired or expires within `skew_secs`.
    pub fn is_expired(&self, now_unix: u64, skew_secs: u64) -> bool {
        self.expires_at <= now_unix.saturating_add(skew_secs)
    }
}

/// File-backed credential store keyed by user id.
///
/// Writes go to a temp file in the same directory and are atomically renamed
/// over the final path, so a concurrent reader never observes a partial
/// record. Records for different users are fully independent; callers that
/// need read-modify-write cycles serialize per user above this layer.
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the credential record for a user, or `None` when unlinked.
    pub async fn get(&self, user_id: u64) -> Result<Option<CredentialRecord>, SpotifyError> {
        let path = self.record_path(user_id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(source.into()),
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Persist a credential record, replacing any existing one atomically.
    pub async fn put(&self, user_id: u64, record: &CredentialRecord) -> Result<(), SpotifyError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let encoded = serde_json::to_vec_pretty(record)?;
        let final_path = self.record_path(user_id);
        let temp_path = self.temp_path(user_id);

        tokio::fs::write(&temp_path, &encoded).await?;
        tokio::fs::rename(&temp_path, &final_path).await?;

        Ok(())
    }

    /// Delete a user's credential record.
    ///
    /// Returns `false` when no record existed; deleting a missing record is
    /// not an error.
    pub async fn delete(&self, user_id: u64) -> Result<bool, SpotifyError> {
        match tokio::fs::remove_file(self.record_path(user_id)).await {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(source.into()),
        }
    }

    fn record_path(&self, user_id: u64) -> PathBuf {
        self.dir.join(format!("{user_id}.json"))
    }

    fn temp_path(&self, user_id: u64) -> PathBuf {
        self.dir.join(format!("{user_id}.json.tmp"))
    }
}
