//! Session endpoints

use glossa_core::dto::session::CreateSessionResponse;
use tracing::debug;

use crate::BackendClient;
use crate::error::Result;

impl BackendClient {
    /// Create a new session
    ///
    /// The response carries the new session id along with the backend's
    /// bookkeeping details and a confirmation message.
    pub async fn create_session(&self) -> Result<CreateSessionResponse> {
        let url = self.endpoint(&["session"])?;
        debug!("POST {}", url);
        let response = self.client.post(url).send().await?;

        self.handle_response(response).await
    }
}
