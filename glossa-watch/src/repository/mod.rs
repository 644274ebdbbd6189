//! Repository layer
//!
//! Trait seams over the generation backend. Each trait covers one concern
//! and carries no business logic, so services can be driven by in-memory
//! implementations in tests.
//!
//! [`glossa_client::BackendClient`] implements all of them.

mod http;

use anyhow::Result;
use async_trait::async_trait;
use glossa_core::domain::result::ResultSnapshot;
use glossa_core::domain::task::{Task, TaskRequest};
use glossa_core::dto::session::CreateSessionResponse;

/// Fetches the accumulated results of one task
///
/// Stateless: every call returns the full current result set.
#[async_trait]
pub trait ResultFetcher: Send + Sync {
    async fn fetch_results(&self, session_id: &str, task_id: &str) -> Result<ResultSnapshot>;
}

/// Lists the tasks of a session
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn list_tasks(&self, session_id: &str) -> Result<Vec<Task>>;
}

/// Creates new tasks
#[async_trait]
pub trait TaskSubmitter: Send + Sync {
    /// Submits the task and returns its backend id
    async fn submit_task(&self, session_id: &str, request: &TaskRequest) -> Result<String>;
}

/// Creates new sessions
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create_session(&self) -> Result<CreateSessionResponse>;
}
