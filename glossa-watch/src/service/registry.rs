//! Task registry
//!
//! Keeps the list of tasks belonging to the active session. The list is
//! reloaded when the session changes or when a refresh has been requested
//! since the last load; a failed reload keeps the previous list.

use std::sync::Arc;

use glossa_core::domain::task::Task;
use tracing::{debug, warn};

use crate::error::WatchError;
use crate::repository::TaskSource;

pub struct JobRegistry {
    source: Arc<dyn TaskSource>,
    tasks: Vec<Task>,
    refresh_trigger: u64,
    /// (session, trigger) of the last load attempt
    loaded_for: Option<(String, u64)>,
}

impl JobRegistry {
    pub fn new(source: Arc<dyn TaskSource>) -> Self {
        Self {
            source,
            tasks: Vec::new(),
            refresh_trigger: 0,
            loaded_for: None,
        }
    }

    /// Mark the list as stale; the next [`JobRegistry::sync`] reloads it
    pub fn request_refresh(&mut self) {
        self.refresh_trigger += 1;
    }

    /// Reload the list if the session or the refresh trigger changed
    ///
    /// Returns true when a new list was loaded. Failures are logged and the
    /// previously loaded list of the same session stays available.
    pub async fn sync(&mut self, session_id: &str) -> bool {
        match self.try_sync(session_id).await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    /// Same as [`JobRegistry::sync`], but a failed load is returned
    ///
    /// Switching to another session drops the previous session's tasks
    /// before loading, so a failed load leaves the list empty.
    pub async fn try_sync(&mut self, session_id: &str) -> Result<bool, WatchError> {
        if session_id.is_empty() {
            return Ok(false);
        }

        let wanted = (session_id.to_string(), self.refresh_trigger);
        if self.loaded_for.as_ref() == Some(&wanted) {
            return Ok(false);
        }

        let same_session = self
            .loaded_for
            .as_ref()
            .is_some_and(|(loaded, _)| loaded == session_id);
        if !same_session {
            self.tasks.clear();
        }
        self.loaded_for = Some(wanted);

        let tasks = self
            .source
            .list_tasks(session_id)
            .await
            .map_err(|e| WatchError::Fetch {
                what: "tasks",
                message: format!("{:#}", e),
            })?;

        debug!("Loaded {} task(s) for session {}", tasks.len(), session_id);
        self.tasks = tasks;
        Ok(true)
    }

    /// The last successfully loaded list, in backend order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Resolve a full task id or an unambiguous, case-insensitive id prefix
    pub fn resolve(&self, id_or_prefix: &str) -> Result<&Task, WatchError> {
        let needle = id_or_prefix.trim();
        if let Some(task) = self.find(needle) {
            return Ok(task);
        }

        let prefix = needle.to_lowercase();
        if prefix.is_empty() {
            return Err(WatchError::UnknownTask(prefix));
        }

        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.id.to_lowercase().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [] => Err(WatchError::UnknownTask(prefix)),
            [task] => Ok(task),
            _ => Err(WatchError::AmbiguousTask {
                prefix,
                matches: matches.iter().map(|task| task.id.clone()).collect(),
            }),
        }
    }
}
