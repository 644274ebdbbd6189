//! Session DTOs

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::session::Session;
use crate::domain::timestamp_from_epoch;

/// Response body of `POST /session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    /// Human-readable confirmation from the backend
    #[serde(default)]
    pub message: String,

    pub session_id: String,

    pub session_details: SessionDetails,
}

/// Backend bookkeeping for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetails {
    #[serde(default)]
    pub task_queue_name: String,

    #[serde(default)]
    pub results_set_name: String,

    /// Name of the backend set holding already-generated items for the session
    #[serde(default)]
    pub exclusion_list: String,

    /// Epoch seconds
    pub created_at: f64,

    /// Seconds
    pub ttl: f64,
}

impl CreateSessionResponse {
    /// The session described by this response
    pub fn session(&self) -> Session {
        Session {
            id: self.session_id.clone(),
            created_at: timestamp_from_epoch(self.session_details.created_at),
            ttl: Duration::try_from_secs_f64(self.session_details.ttl).unwrap_or_default(),
        }
    }
}
