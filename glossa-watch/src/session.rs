//! Session handle
//!
//! Resolves the active session id once at startup and keeps it in sync with
//! the persisted store afterwards.

use glossa_core::domain::session::Session;
use tracing::{debug, info, warn};

use crate::error::WatchError;
use crate::repository::SessionFactory;
use crate::store::KeyValueStore;

/// Name of the persisted slot holding the last-known session id
pub const SESSION_KEY: &str = "session_id";

/// The active session id, persisted across runs
pub struct SessionHandle {
    store: Box<dyn KeyValueStore>,
    current: Option<String>,
}

impl SessionHandle {
    /// Read the persisted id once, falling back to `fallback` when nothing is stored
    ///
    /// The fallback is typically an id passed on the command line; it is
    /// used for this run but not written back.
    pub fn init(store: impl KeyValueStore + 'static, fallback: Option<String>) -> Self {
        let persisted = store.get(SESSION_KEY).filter(|id| !id.trim().is_empty());
        let current = match persisted {
            Some(id) => {
                debug!("Using persisted session {}", id);
                Some(id)
            }
            None => fallback.filter(|id| !id.trim().is_empty()),
        };

        Self {
            store: Box::new(store),
            current,
        }
    }

    /// The active session id, if any
    pub fn get(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Make `id` the active session and persist it
    pub fn set(&mut self, id: impl Into<String>) {
        let id = id.into();
        if id.trim().is_empty() {
            warn!("Ignoring empty session id");
            return;
        }
        self.store.set(SESSION_KEY, &id);
        self.current = Some(id);
    }

    /// The active session id, or [`WatchError::NoSession`]
    pub fn require(&self) -> Result<&str, WatchError> {
        self.get().ok_or(WatchError::NoSession)
    }

    /// Ask the backend for a new session and make it the active one
    ///
    /// Returns the session together with the backend's confirmation message.
    /// On failure the previously active session is left untouched.
    pub async fn create(
        &mut self,
        factory: &dyn SessionFactory,
    ) -> Result<(Session, String), WatchError> {
        let response = factory
            .create_session()
            .await
            .map_err(|e| WatchError::SessionCreation(format!("{:#}", e)))?;

        let session = response.session();
        info!("Created session {}", session.id);
        self.set(session.id.clone());

        Ok((session, response.message))
    }
}
