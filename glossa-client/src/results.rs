//! Result endpoint

use glossa_core::domain::result::ResultSnapshot;
use glossa_core::dto::result::ResultsResponse;
use tracing::debug;

use crate::error::Result;
use crate::{BackendClient, require_id};

impl BackendClient {
    /// Fetch the results accumulated so far for a task
    ///
    /// Each call returns the whole result set; nothing is merged client-side.
    pub async fn get_results(&self, session_id: &str, task_id: &str) -> Result<ResultSnapshot> {
        require_id("session_id", session_id)?;
        require_id("task_id", task_id)?;
        let url = self.endpoint(&["result"])?;
        debug!("GET {} (task {})", url, task_id);

        let response = self
            .client
            .get(url)
            .query(&[("session_id", session_id), ("task_id", task_id)])
            .send()
            .await?;

        let body: ResultsResponse = self.handle_response(response).await?;
        Ok(body.into_snapshot(task_id))
    }
}
