//! Task DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::task::{Task, TaskRequest, TaskStatus};
use crate::domain::timestamp_from_epoch;

/// Request body of `POST /task`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTask {
    pub session_id: String,
    pub task_data: TaskRequest,
}

/// Response body of `POST /task`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTaskResponse {
    pub task_id: String,

    /// Any further fields the backend chooses to include
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `GET /tasks/{session_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub task_id: String,
    pub language: String,
    pub pos: String,
    pub model: String,
    pub count: u32,
    /// Epoch seconds
    pub created_at: f64,
    pub status: String,
}

/// Response body of `GET /tasks/{session_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub session_id: String,
    #[serde(default)]
    pub tasks: Vec<TaskSummary>,
}

impl TaskSummary {
    pub fn into_task(self, session_id: &str) -> Task {
        Task {
            id: self.task_id,
            session_id: session_id.to_string(),
            language: self.language,
            part_of_speech: self.pos,
            model: self.model,
            target_count: self.count,
            created_at: timestamp_from_epoch(self.created_at),
            status: TaskStatus::parse(&self.status),
        }
    }
}

impl TaskListResponse {
    /// Tasks in the order the backend listed them
    pub fn into_tasks(self) -> Vec<Task> {
        let session_id = self.session_id;
        self.tasks
            .into_iter()
            .map(|summary| summary.into_task(&session_id))
            .collect()
    }
}
