//! Credential storage for the active session.
//!
//! Persists the bearer token and the cached user/persona identifiers in
//! `${PERCH_HOME}/session.json` with restricted permissions (0600).
//! Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Read/write surface the session client and the auth flow depend on.
///
/// The session token is written only by the OAuth callback handler; the
/// 401 branch of [`super::SessionClient`] deletes it. Deleting an entry
/// that is already absent is a no-op.
pub trait CredentialStore: Send + Sync {
    fn session_token(&self) -> Result<Option<String>>;
    fn set_session_token(&self, token: &str) -> Result<()>;

    fn user_id(&self) -> Result<Option<String>>;
    fn set_user_id(&self, id: &str) -> Result<()>;

    fn persona_id(&self) -> Result<Option<i64>>;
    fn set_persona_id(&self, id: i64) -> Result<()>;

    /// Removes the token and the cached identifiers.
    fn clear_session(&self) -> Result<()>;
}

/// On-disk session cache structure.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SessionCache {
    /// Bearer token proving the authenticated session.
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    /// Identifier of the signed-in user, cached from persona responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    /// Identifier of the most recently opened persona.
    #[serde(skip_serializing_if = "Option::is_none")]
    persona_id: Option<i64>,
}

/// Credential store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store backed by the given file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates a store backed by `${PERCH_HOME}/session.json`.
    pub fn open_default() -> Self {
        Self::new(paths::session_path())
    }

    /// Loads the cache from disk. A missing file means an anonymous session.
    fn load(&self) -> Result<SessionCache> {
        if !self.path.exists() {
            return Ok(SessionCache::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    /// Saves the cache to disk with restricted permissions (0600).
    fn save(&self, cache: &SessionCache) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(cache).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn session_token(&self) -> Result<Option<String>> {
        Ok(self.load()?.token)
    }

    fn set_session_token(&self, token: &str) -> Result<()> {
        let mut cache = self.load()?;
        cache.token = Some(token.to_string());
        self.save(&cache)
    }

    fn user_id(&self) -> Result<Option<String>> {
        Ok(self.load()?.user_id)
    }

    fn set_user_id(&self, id: &str) -> Result<()> {
        let mut cache = self.load()?;
        cache.user_id = Some(id.to_string());
        self.save(&cache)
    }

    fn persona_id(&self) -> Result<Option<i64>> {
        Ok(self.load()?.persona_id)
    }

    fn set_persona_id(&self, id: i64) -> Result<()> {
        let mut cache = self.load()?;
        cache.persona_id = Some(id);
        self.save(&cache)
    }

    fn clear_session(&self) -> Result<()> {
        // An anonymous session stays anonymous; still write the empty cache
        // so racing readers observe the teardown.
        self.save(&SessionCache::default())
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileCredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));
        (dir, store)
    }

    /// Test: missing file reads as an anonymous session.
    #[test]
    fn test_missing_file_is_anonymous() {
        let (_dir, store) = temp_store();
        assert!(store.session_token().unwrap().is_none());
        assert!(store.user_id().unwrap().is_none());
        assert!(store.persona_id().unwrap().is_none());
    }

    /// Test: token round-trip through the file.
    #[test]
    fn test_token_roundtrip() {
        let (_dir, store) = temp_store();
        store.set_session_token("abc123").unwrap();
        assert_eq!(store.session_token().unwrap().as_deref(), Some("abc123"));

        store.set_user_id("u-42").unwrap();
        store.set_persona_id(7).unwrap();
        // setting ids must not disturb the token
        assert_eq!(store.session_token().unwrap().as_deref(), Some("abc123"));
        assert_eq!(store.user_id().unwrap().as_deref(), Some("u-42"));
        assert_eq!(store.persona_id().unwrap(), Some(7));
    }

    /// Test: clearing removes every entry and is idempotent.
    #[test]
    fn test_clear_session_idempotent() {
        let (_dir, store) = temp_store();
        store.set_session_token("abc123").unwrap();
        store.set_user_id("u-42").unwrap();

        store.clear_session().unwrap();
        assert!(store.session_token().unwrap().is_none());
        assert!(store.user_id().unwrap().is_none());

        // clearing an already-empty store is a no-op, not an error
        store.clear_session().unwrap();
        assert!(store.session_token().unwrap().is_none());
    }

    /// Test: clearing before any write succeeds.
    #[test]
    fn test_clear_session_without_file() {
        let (_dir, store) = temp_store();
        store.clear_session().unwrap();
        assert!(store.session_token().unwrap().is_none());
    }

    /// Test: token masking.
    #[test]
    fn test_mask_token() {
        assert_eq!(
            mask_token("eyJhbGciOiJIUzI1NiJ9.payload.sig"),
            "eyJhbGciOiJI..."
        );
        assert_eq!(mask_token("short"), "***");
    }
}
