//! Result domain types

use serde_json::{Map, Value};

/// One generated item
///
/// Records are untyped: the column set depends on the task's language and is
/// only known at runtime. Key order is the order the backend sent them in.
pub type ResultRecord = Map<String, Value>;

/// Record keys that carry backend bookkeeping rather than content
pub const METADATA_KEYS: &[&str] = &["metadata", "__metadata__"];

/// Returns true when `key` is reserved for metadata
pub fn is_metadata_key(key: &str) -> bool {
    METADATA_KEYS.contains(&key)
}

/// The accumulated results of a task at one point in time
///
/// `count` never decreases between fetches for the same task. The backend
/// guarantees this; the client relies on it to decide when to stop polling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSnapshot {
    pub session_id: String,
    pub task_id: String,
    pub items: Vec<ResultRecord>,
    pub count: u32,
}

impl ResultSnapshot {
    /// Whether the snapshot satisfies a target count
    pub fn is_complete(&self, target_count: u32) -> bool {
        self.count >= target_count
    }
}
