//! Task endpoints

use glossa_core::domain::task::{Task, TaskRequest};
use glossa_core::dto::task::{SubmitTask, SubmitTaskResponse, TaskListResponse};
use tracing::debug;

use crate::error::Result;
use crate::{BackendClient, require_id};

impl BackendClient {
    /// Submit a new generation task
    ///
    /// # Arguments
    /// * `session_id` - The session the task belongs to
    /// * `request` - The task form data
    ///
    /// # Returns
    /// The id assigned to the new task
    pub async fn submit_task(&self, session_id: &str, request: &TaskRequest) -> Result<String> {
        require_id("session_id", session_id)?;
        let url = self.endpoint(&["task"])?;
        debug!("POST {} ({} {} via {})", url, request.language, request.pos, request.model);

        let response = self
            .client
            .post(url)
            .json(&SubmitTask {
                session_id: session_id.to_string(),
                task_data: request.clone(),
            })
            .send()
            .await?;

        let body: SubmitTaskResponse = self.handle_response(response).await?;
        Ok(body.task_id)
    }

    /// List the tasks of a session, in backend order
    pub async fn list_tasks(&self, session_id: &str) -> Result<Vec<Task>> {
        require_id("session_id", session_id)?;
        let url = self.endpoint(&["tasks", session_id])?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let body: TaskListResponse = self.handle_response(response).await?;
        Ok(body.into_tasks())
    }
}
