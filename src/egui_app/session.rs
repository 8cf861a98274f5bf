//! Session Credential Storage
//!
//! Owns the process-wide bearer credential: set at login, replaced on token
//! refresh, destroyed at logout. The token is persisted to a JSON file under
//! the platform config directory so a restarted client can resume its
//! session and authenticate broadcaster subscriptions without logging in
//! again. Client-side file storage, not cookies.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::shared::messaging::UserInfo;

/// Persisted session file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: UserInfo,
}

/// Shared session handle. Cloned `Arc<Session>` references are held by the
/// API client, the realtime layer and the app state; all credential access
/// goes through this type.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    inner: RwLock<Option<StoredSession>>,
}

impl Session {
    /// Create a session backed by the default storage path, loading any
    /// persisted credential from a previous run.
    pub fn load() -> Self {
        let path = default_session_path();
        Self::load_from(path)
    }

    /// Create a session backed by an explicit path (used by tests).
    pub fn load_from(path: PathBuf) -> Self {
        let stored = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str::<StoredSession>(&raw).ok());
        if stored.is_some() {
            tracing::info!("[session] restored persisted session from {}", path.display());
        }
        Self {
            path,
            inner: RwLock::new(stored),
        }
    }

    /// Current bearer token, if authenticated
    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// Current user, if authenticated
    pub fn user(&self) -> Option<UserInfo> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|s| s.user.clone())
    }

    /// Whether a credential is present
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().expect("session lock poisoned").is_some()
    }

    /// Install a new credential (login or token refresh) and persist it.
    pub fn set(&self, token: String, user: UserInfo) {
        let stored = StoredSession { token, user };
        self.persist(&stored);
        *self.inner.write().expect("session lock poisoned") = Some(stored);
    }

    /// Destroy the credential and remove the persisted file (logout).
    pub fn clear(&self) {
        *self.inner.write().expect("session lock poisoned") = None;
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!("[session] failed to remove {}: {}", self.path.display(), e);
            }
        }
        tracing::info!("[session] credential cleared");
    }

    fn persist(&self, stored: &StoredSession) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("[session] failed to create {}: {}", parent.display(), e);
                return;
            }
        }
        match serde_json::to_string_pretty(stored) {
            Ok(raw) => {
                if let Err(e) = std::fs::write(&self.path, raw) {
                    tracing::warn!("[session] failed to write {}: {}", self.path.display(), e);
                }
            }
            Err(e) => tracing::warn!("[session] failed to serialize session: {}", e),
        }
    }
}

/// Default path of the persisted session file
fn default_session_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ridelink")
        .join("session.json")
}
