//! Shared state for command handlers

use std::sync::Arc;

use anyhow::Result;
use glossa_client::BackendClient;
use glossa_watch::store::{FileStore, MemoryStore};
use glossa_watch::{Config, SelectionController, SessionHandle};

pub struct AppContext {
    pub config: Config,
    pub client: Arc<BackendClient>,
    pub session: SessionHandle,
}

impl AppContext {
    /// With `ephemeral`, session changes are kept for this run only
    pub fn new(config: Config, ephemeral: bool) -> Self {
        let client = Arc::new(BackendClient::new(config.api_base_url.clone()));
        let fallback = config.session_id.clone();
        let session = if ephemeral {
            SessionHandle::init(MemoryStore::new(), fallback)
        } else {
            SessionHandle::init(FileStore::new(config.state_file.clone()), fallback)
        };

        Self {
            config,
            client,
            session,
        }
    }

    /// The active session id, or an error telling the user how to get one
    pub fn session_id(&self) -> Result<String> {
        Ok(self.session.require()?.to_string())
    }

    /// A controller bound to the active session
    pub fn controller(&self) -> Result<SelectionController> {
        Ok(SelectionController::for_backend(
            self.session_id()?,
            Arc::clone(&self.client),
            self.config.poll_interval,
        ))
    }
}
