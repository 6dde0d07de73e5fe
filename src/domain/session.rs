//! Wallet Session
//!
//! The local record binding an account to an authenticated state, with a
//! fixed 24 hour expiry. A single serialized session is kept in device
//! storage so an authenticated state survives a restart; it is discarded
//! after TTL expiry or explicit logout.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::account::Account;

/// Session lifetime; the only literal expiry the design carries.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Default session store file name.
pub const DEFAULT_STORE_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse stored session: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A live authenticated session. At most one exists per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The connected account
    pub account: Account,
    /// Optional signature from the login challenge
    pub signature: Option<String>,
    /// When the session was established
    pub established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(account: Account, signature: Option<String>) -> Self {
        Self {
            account,
            signature,
            established_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.established_at
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

/// File-backed session persistence, read once at startup.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the raw stored session, if any. A corrupt record is removed
    /// and treated as absent rather than surfaced as an error.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Session>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Discarding corrupt session record: {}", e);
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Load a session that is still within its TTL. An expired record is
    /// deleted so the next load starts clean.
    pub fn load_valid(&self, ttl: Duration) -> Result<Option<Session>, SessionError> {
        match self.load()? {
            Some(session) if session.is_expired(ttl) => {
                tracing::info!(
                    "Stored session for {} expired after {}h, removing",
                    session.account.short(),
                    session.age().num_hours()
                );
                self.clear()?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        tracing::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::debug!("Session store cleared");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join(DEFAULT_STORE_FILE))
    }

    fn test_account() -> Account {
        Account::new("0xabcdef1234567890abcdef1234567890abcdef12")
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let session = Session::new(test_account(), Some("0xsig".to_string()));
        store.save(&session).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_record_removed() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::write(store.path(), "not json").unwrap();

        assert!(store.load().unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_fresh_session_not_expired() {
        let session = Session::new(test_account(), None);
        assert!(!session.is_expired(Duration::hours(SESSION_TTL_HOURS)));
    }

    #[test]
    fn test_expired_session_removed_on_load() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let mut session = Session::new(test_account(), None);
        session.established_at = Utc::now() - Duration::hours(25);
        store.save(&session).unwrap();

        let loaded = store.load_valid(Duration::hours(SESSION_TTL_HOURS)).unwrap();
        assert!(loaded.is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_session_within_ttl_restored() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let mut session = Session::new(test_account(), None);
        session.established_at = Utc::now() - Duration::hours(23);
        store.save(&session).unwrap();

        let loaded = store.load_valid(Duration::hours(SESSION_TTL_HOURS)).unwrap();
        assert_eq!(loaded.unwrap().account, test_account());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.clear().unwrap();
        store.clear().unwrap();
    }
}
