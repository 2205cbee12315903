//! Explicit session context.
//!
//! The signed-in user and the in-flight attempt id live behind a small
//! store interface so views never touch the persistence mechanism
//! directly, and so it can be swapped (in-memory for tests, a JSON file
//! for the desktop app). Writes are last-writer-wins; a single running
//! instance is assumed.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use prep_core::model::{AttemptId, RetrySeed, UserProfile};

use crate::error::SessionStoreError;

/// An attempt left in flight: the server-issued id plus the scope needed
/// to rebuild its question set after a relaunch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePoint {
    pub attempt: AttemptId,
    pub seed: RetrySeed,
}

/// Everything the client persists between launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: UserProfile,
    resume: Option<ResumePoint>,
}

impl Session {
    #[must_use]
    pub fn new(user: UserProfile) -> Self {
        Self { user, resume: None }
    }

    #[must_use]
    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    /// The attempt to resume after a relaunch, if one was in flight.
    #[must_use]
    pub fn resume(&self) -> Option<ResumePoint> {
        self.resume
    }

    pub fn set_resume(&mut self, resume: Option<ResumePoint>) {
        self.resume = resume;
    }
}

/// Contract for session persistence.
pub trait SessionStore: Send + Sync {
    /// The stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` when the backing store cannot be read.
    fn load(&self) -> Result<Option<Session>, SessionStoreError>;

    /// Persist the session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` when the backing store cannot be written.
    fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Forget the session (logout).
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` when the backing store cannot be cleared.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

/// Volatile store for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    inner: Arc<Mutex<Option<Session>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

//
// ─── JSON FILE STORE ───────────────────────────────────────────────────────────
//

/// File-backed store used by the desktop app.
#[derive(Clone, Debug)]
pub struct JsonFileSessionStore {
    path: PathBuf,
}

impl JsonFileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonFileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
