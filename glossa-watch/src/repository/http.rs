//! HTTP implementations of the repository traits

use anyhow::{Context, Result};
use async_trait::async_trait;
use glossa_client::BackendClient;
use glossa_core::domain::result::ResultSnapshot;
use glossa_core::domain::task::{Task, TaskRequest};
use glossa_core::dto::session::CreateSessionResponse;

use super::{ResultFetcher, SessionFactory, TaskSource, TaskSubmitter};

#[async_trait]
impl ResultFetcher for BackendClient {
    async fn fetch_results(&self, session_id: &str, task_id: &str) -> Result<ResultSnapshot> {
        self.get_results(session_id, task_id)
            .await
            .context("Failed to fetch results")
    }
}

#[async_trait]
impl TaskSource for BackendClient {
    async fn list_tasks(&self, session_id: &str) -> Result<Vec<Task>> {
        BackendClient::list_tasks(self, session_id)
            .await
            .context("Failed to fetch tasks")
    }
}

#[async_trait]
impl TaskSubmitter for BackendClient {
    async fn submit_task(&self, session_id: &str, request: &TaskRequest) -> Result<String> {
        BackendClient::submit_task(self, session_id, request)
            .await
            .context("Failed to submit task")
    }
}

#[async_trait]
impl SessionFactory for BackendClient {
    async fn create_session(&self) -> Result<CreateSessionResponse> {
        BackendClient::create_session(self)
            .await
            .context("Failed to create session")
    }
}
