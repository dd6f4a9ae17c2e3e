//! Persisted session state: the single source of truth for "who is logged in".
//!
//! The store holds the bearer token and user profile together, persists every
//! mutation through a [`SessionStorage`] backend and exposes a hydration flag so
//! route guards never redirect before the saved session has been restored. A
//! monotonically increasing generation counter lets the API client discard a
//! stale 401 that was issued before a fresh login.

pub mod storage;

pub use storage::{FileSessionStorage, MemorySessionStorage, PersistedSession, SessionStorage};

use crate::api::types::{User, UserUpdate};
use secrecy::{ExposeSecret, SecretString};
use std::sync::RwLock;
use tracing::{debug, error};

struct SessionState {
    token: Option<SecretString>,
    user: Option<User>,
    has_hydrated: bool,
    generation: u64,
}

/// Thread-safe session store shared by the UI tree and the API client.
pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    /// Create an empty, not-yet-hydrated store backed by the given storage.
    #[must_use]
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        Self {
            state: RwLock::new(SessionState {
                token: None,
                user: None,
                has_hydrated: false,
                generation: 0,
            }),
            storage,
        }
    }

    /// Restore the previously saved session, then mark the store hydrated.
    ///
    /// The hydration flag flips false to true exactly once; repeated calls are
    /// no-ops. A storage failure still completes hydration with an empty
    /// session so the UI never hangs on a broken disk.
    pub fn hydrate(&self) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        if state.has_hydrated {
            return;
        }

        match self.storage.load() {
            Ok(Some(saved)) => {
                state.token = saved.token.map(SecretString::from);
                state.user = saved.user;
                state.generation += 1;
            }
            Ok(None) => {}
            Err(err) => {
                error!("Failed to restore session: {err}");
            }
        }

        state.has_hydrated = true;
    }

    /// Replace both the token and the user, as after login or OTP verification.
    pub fn set_auth(&self, token: SecretString, user: User) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        state.token = Some(token);
        state.user = Some(user);
        state.generation += 1;
        self.persist(&state);
    }

    /// Shallow-merge profile fields into the current user.
    ///
    /// Silently does nothing when no user is logged in.
    pub fn update_user(&self, update: UserUpdate) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        let Some(user) = state.user.as_mut() else {
            return;
        };
        user.merge(update);
        self.persist(&state);
    }

    /// Clear the token and user. Idempotent.
    pub fn logout(&self) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        state.token = None;
        state.user = None;
        state.generation += 1;
        self.persist(&state);
    }

    /// Clear the session only if `generation` is still current.
    ///
    /// The API client records the generation when it sends a request; a 401
    /// arriving after a newer login must not clear the fresh session.
    pub fn invalidate(&self, generation: u64) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        if state.generation != generation {
            debug!(
                "Ignoring stale unauthorized response for generation {generation}, current {}",
                state.generation
            );
            return;
        }
        state.token = None;
        state.user = None;
        state.generation += 1;
        self.persist(&state);
    }

    /// Current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.state.read().ok().and_then(|state| state.token.clone())
    }

    /// Current user profile, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.read().ok().and_then(|state| state.user.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .map(|state| state.user.is_some())
            .unwrap_or(false)
    }

    /// True once [`SessionStore::hydrate`] has completed, successfully or not.
    #[must_use]
    pub fn has_hydrated(&self) -> bool {
        self.state
            .read()
            .map(|state| state.has_hydrated)
            .unwrap_or(false)
    }

    /// Generation counter, bumped by every login/logout transition.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state
            .read()
            .map(|state| state.generation)
            .unwrap_or(0)
    }

    fn persist(&self, state: &SessionState) {
        let snapshot = PersistedSession {
            token: state
                .token
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
            user: state.user.clone(),
        };
        // Losing persistence must never break the in-memory session.
        if let Err(err) = self.storage.save(&snapshot) {
            error!("Failed to persist session: {err}");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (user, has_hydrated, generation) = self
            .state
            .read()
            .map(|state| {
                (
                    state.user.as_ref().map(|user| user.id.clone()),
                    state.has_hydrated,
                    state.generation,
                )
            })
            .unwrap_or((None, false, 0));
        f.debug_struct("SessionStore")
            .field("token", &"***")
            .field("user", &user)
            .field("has_hydrated", &has_hydrated)
            .field("generation", &generation)
            .finish()
    }
}
