//! On-disk persistence for the OAuth token.
//!
//! A single JSON blob is read once at startup and rewritten after every
//! successful token acquisition, so a restart does not force a new login.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// A delegated access token together with what is needed to renew it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp after which `access_token` is no longer valid.
    pub expires_at: i64,
}

impl StoredToken {
    /// Whether the token still has at least `leeway_secs` of life left.
    #[must_use]
    pub fn is_fresh(&self, now: i64, leeway_secs: i64) -> bool {
        self.expires_at - leeway_secs > now
    }
}

/// File-backed token store with an in-memory copy.
pub struct TokenStore {
    path: PathBuf,
    token: Mutex<Option<StoredToken>>,
}

impl TokenStore {
    /// Load the store from `path`. A missing or corrupt file starts the
    /// store empty; it is never fatal.
    #[must_use]
    pub fn load(path: PathBuf) -> Self {
        let token = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(token) => Some(token),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt token cache");
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            path,
            token: Mutex::new(token),
        }
    }

    /// Current token, if any.
    #[must_use]
    pub fn current(&self) -> Option<StoredToken> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Replace the stored token and persist it to disk.
    pub fn store(&self, token: StoredToken) -> std::io::Result<()> {
        let serialized = serde_json::to_string(&token)?;
        {
            let mut guard = self
                .token
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            *guard = Some(token);
        }
        std::fs::write(&self.path, serialized)
    }
}
