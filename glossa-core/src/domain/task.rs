//! Task domain types
//!
//! A task (a "job" on the backend queue) is one generation request for a
//! language, part of speech, model and item count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Languages offered by the task form
pub const LANGUAGES: &[&str] = &["Hindi", "Tamil", "Telugu", "English"];

/// Parts of speech offered by the task form
pub const PARTS_OF_SPEECH: &[&str] = &[
    "noun",
    "verb",
    "adjective",
    "adverb",
    "pronoun",
    "preposition",
    "conjunction",
    "interjection",
    "determiner",
    "article",
];

/// Generation models offered by the task form
pub const MODELS: &[&str] = &["perplexity", "gemini", "groq"];

/// Item counts offered by the task form
pub const COUNTS: &[u32] = &[10, 20, 30];

/// Item count used when none is chosen
pub const DEFAULT_COUNT: u32 = 10;

/// A submitted task as reported by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub session_id: String,
    pub language: String,
    pub part_of_speech: String,
    pub model: String,
    /// Number of result items the task is expected to produce
    pub target_count: u32,
    pub created_at: DateTime<Utc>,
    pub status: TaskStatus,
}

/// Task status as tracked by the backend
///
/// The backend reports status as free-form text; well-known values are
/// mapped onto variants and anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl TaskStatus {
    /// Parse a backend status string
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" | "pending" => TaskStatus::Queued,
            "running" | "processing" | "in_progress" => TaskStatus::Running,
            "completed" | "complete" | "done" | "finished" => TaskStatus::Completed,
            "failed" | "error" => TaskStatus::Failed,
            _ => TaskStatus::Other(raw.to_string()),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Queued => write!(f, "queued"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Task form data, sent to the backend as `task_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub language: String,
    pub pos: String,
    pub model: String,
    pub count: u32,
}

impl TaskRequest {
    pub fn new(
        language: impl Into<String>,
        pos: impl Into<String>,
        model: impl Into<String>,
        count: u32,
    ) -> Self {
        Self {
            language: language.into(),
            pos: pos.into(),
            model: model.into(),
            count,
        }
    }

    /// Names of the required fields that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.language.trim().is_empty() {
            missing.push("language");
        }
        if self.pos.trim().is_empty() {
            missing.push("pos");
        }
        if self.model.trim().is_empty() {
            missing.push("model");
        }
        missing
    }
}

impl Default for TaskRequest {
    fn default() -> Self {
        Self::new("", "", "", DEFAULT_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_values() {
        assert_eq!(TaskStatus::parse("pending"), TaskStatus::Queued);
        assert_eq!(TaskStatus::parse("Processing"), TaskStatus::Running);
        assert_eq!(TaskStatus::parse("completed"), TaskStatus::Completed);
        assert_eq!(TaskStatus::parse("failed"), TaskStatus::Failed);
    }

    #[test]
    fn test_status_parse_keeps_unknown_verbatim() {
        let status = TaskStatus::parse("Paused");
        assert_eq!(status, TaskStatus::Other("Paused".to_string()));
        assert_eq!(status.to_string(), "Paused");
    }

    #[test]
    fn test_default_request_has_default_count() {
        let req = TaskRequest::default();
        assert_eq!(req.count, DEFAULT_COUNT);
        assert_eq!(req.missing_fields(), vec!["language", "pos", "model"]);
    }

    #[test]
    fn test_complete_request_has_no_missing_fields() {
        let req = TaskRequest::new("Hindi", "noun", "groq", 10);
        assert!(req.missing_fields().is_empty());
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let req = TaskRequest::new("Hindi", "  ", "groq", 10);
        assert_eq!(req.missing_fields(), vec!["pos"]);
    }
}
