//! Durable storage for the `{token, user}` session pair. The store persists a
//! single JSON document under an application-specific key; the hydration flag
//! is never written, it is recomputed at process start.

use crate::api::types::User;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// File name used as the storage namespace key.
pub const STORAGE_KEY: &str = "parkease-auth-storage.json";

/// Serialized session pair as written to durable storage.
#[derive(Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub user: Option<User>,
}

/// Durable key-value backend for the session pair.
pub trait SessionStorage: Send + Sync {
    /// Load the previously saved session, `Ok(None)` when nothing was saved.
    ///
    /// # Errors
    /// Returns an error when the backend is unreadable or holds corrupt data.
    fn load(&self) -> io::Result<Option<PersistedSession>>;

    /// Overwrite the saved session with the given pair.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be written.
    fn save(&self, session: &PersistedSession) -> io::Result<()>;
}

/// JSON-file backed storage rooted at a caller-provided directory.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(STORAGE_KEY),
        }
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> io::Result<Option<PersistedSession>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        let session = serde_json::from_str(&contents)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        Ok(Some(session))
    }

    fn save(&self, session: &PersistedSession) -> io::Result<()> {
        let contents = serde_json::to_vec_pretty(session)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&self.path, contents)
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySessionStorage {
    inner: Mutex<Option<PersistedSession>>,
}

impl MemorySessionStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the backend, mimicking a previous run's save.
    #[must_use]
    pub fn seeded(session: PersistedSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> io::Result<Option<PersistedSession>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "storage lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &PersistedSession) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "storage lock poisoned"))?;
        *guard = Some(session.clone());
        Ok(())
    }
}
