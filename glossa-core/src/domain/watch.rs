//! Watched-target types
//!
//! Client-only state describing which task the polling engine should be
//! bound to. A target is always replaced wholesale, never patched.

/// What the client is currently watching
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WatchedTarget {
    pub session_id: String,
    pub task_id: Option<String>,
    pub target_count: u32,
    /// Whether polling should actually run for this target
    pub armed: bool,
}

impl WatchedTarget {
    /// A target with nothing selected
    pub fn idle(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Default::default()
        }
    }

    /// A selected target that should be polled
    pub fn armed(
        session_id: impl Into<String>,
        task_id: impl Into<String>,
        target_count: u32,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            task_id: Some(task_id.into()),
            target_count,
            armed: true,
        }
    }

    /// The polling identity of this target, if it should be polled at all
    pub fn key(&self) -> Option<WatchKey> {
        if !self.armed {
            return None;
        }
        WatchKey::new(
            self.session_id.clone(),
            self.task_id.clone()?,
            self.target_count,
        )
    }
}

/// Composite identity of a polling cycle
///
/// The engine restarts exactly when this value changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchKey {
    pub session_id: String,
    pub task_id: String,
    pub target_count: u32,
}

impl WatchKey {
    /// Returns `None` when either identifier is empty
    pub fn new(session_id: String, task_id: String, target_count: u32) -> Option<Self> {
        if session_id.is_empty() || task_id.is_empty() {
            return None;
        }
        Some(Self {
            session_id,
            task_id,
            target_count,
        })
    }
}

/// Which user action produced the current target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Nothing watched
    #[default]
    Idle,
    /// A task this client just created
    JustSubmitted,
    /// An existing task picked from the session's task list
    Selected,
}

impl std::fmt::Display for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionState::Idle => write!(f, "Idle"),
            SelectionState::JustSubmitted => write!(f, "JustSubmitted"),
            SelectionState::Selected => write!(f, "Selected"),
        }
    }
}
