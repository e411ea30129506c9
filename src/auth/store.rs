use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::token::SessionToken;

/// Session file name inside the app's data directory.
/// The leading underscore is the namespace prefix for auth state.
const SESSION_FILE: &str = "_auth.json";

/// Application-defined user payload persisted alongside the token.
/// Immutable once written; replaced wholesale on the next sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub uid: i64,
}

/// The single persisted unit: a bearer token paired with who it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: SessionToken,
    pub identity: Identity,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session storage unavailable: {0}")]
    Unavailable(String),
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// File-backed persistence for the session record.
///
/// One namespaced key, last write wins. Other processes reading the same
/// file see writes and clears whenever the filesystem makes them visible;
/// nothing here adds synchronization on top.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Persist the record, overwriting any prior value.
    /// Either the full record lands on disk or nothing changes.
    pub fn write(&self, record: &SessionRecord) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        std::fs::write(self.session_path(), contents)?;
        Ok(())
    }

    /// Return the last-written record, or `None` if never written or cleared.
    /// A file that no longer parses reads as absent rather than failing the
    /// caller; the next sign-in overwrites it.
    pub fn read(&self) -> Result<Option<SessionRecord>, StoreError> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        match serde_json::from_str(&contents) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(error = %e, "session file is corrupt, treating as absent");
                Ok(None)
            }
        }
    }

    /// Remove the persisted record. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::demo_token;
    use chrono::{Duration, Utc};

    fn record() -> SessionRecord {
        SessionRecord {
            token: demo_token(Utc::now() + Duration::minutes(30)),
            identity: Identity {
                name: "Dia Azzawi".to_string(),
                uid: 123456,
            },
        }
    }

    #[test]
    fn read_returns_none_when_never_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        let rec = record();
        store.write(&rec).unwrap();

        let loaded = store.read().unwrap().unwrap();
        assert_eq!(loaded.token, rec.token);
        assert_eq!(loaded.identity, rec.identity);
    }

    #[test]
    fn write_overwrites_prior_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        store.write(&record()).unwrap();

        let mut replacement = record();
        replacement.identity.uid = 999;
        store.write(&replacement).unwrap();

        assert_eq!(store.read().unwrap().unwrap().identity.uid, 999);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        store.write(&record()).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join(SESSION_FILE), "{not json").unwrap();
        assert!(store.read().unwrap().is_none());
    }
}
