//! Selection controller
//!
//! The single writer of "what is being watched". Submitting a task and
//! selecting an existing one both replace the watched target wholesale and
//! re-key the polling engine; the engine diffs the new key against the live
//! cycle and restarts only when it changed.

use std::sync::Arc;
use std::time::Duration;

use glossa_core::domain::task::{Task, TaskRequest};
use glossa_core::domain::watch::{SelectionState, WatchedTarget};
use tokio::sync::watch;
use tracing::info;

use crate::error::WatchError;
use crate::repository::{ResultFetcher, TaskSource, TaskSubmitter};
use crate::scheduler::{PollStatus, PollingEngine};
use crate::service::JobRegistry;

pub struct SelectionController {
    session_id: String,
    submitter: Arc<dyn TaskSubmitter>,
    registry: JobRegistry,
    engine: PollingEngine,
    state: SelectionState,
    target: WatchedTarget,
}

impl SelectionController {
    pub fn new(
        session_id: impl Into<String>,
        submitter: Arc<dyn TaskSubmitter>,
        registry: JobRegistry,
        engine: PollingEngine,
    ) -> Self {
        let session_id = session_id.into();
        Self {
            target: WatchedTarget::idle(session_id.clone()),
            session_id,
            submitter,
            registry,
            engine,
            state: SelectionState::Idle,
        }
    }

    /// Wire every collaborator to one backend
    pub fn for_backend<B>(session_id: impl Into<String>, backend: Arc<B>, interval: Duration) -> Self
    where
        B: ResultFetcher + TaskSource + TaskSubmitter + 'static,
    {
        let fetcher: Arc<dyn ResultFetcher> = backend.clone();
        let source: Arc<dyn TaskSource> = backend.clone();
        let submitter: Arc<dyn TaskSubmitter> = backend;
        Self::new(
            session_id,
            submitter,
            JobRegistry::new(source),
            PollingEngine::with_interval(fetcher, interval),
        )
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn target(&self) -> &WatchedTarget {
        &self.target
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Whether results are still being fetched for the watched task
    pub fn is_polling(&self) -> bool {
        self.engine.is_running()
    }

    /// Receiver notified whenever polling state changes
    pub fn subscribe(&self) -> watch::Receiver<PollStatus> {
        self.engine.subscribe()
    }

    pub fn status(&self) -> PollStatus {
        self.engine.status()
    }

    /// Switch to another session; watching stops
    pub fn set_session(&mut self, session_id: impl Into<String>) {
        let session_id = session_id.into();
        if session_id == self.session_id {
            return;
        }
        info!("Switching to session {}", session_id);
        self.session_id = session_id;
        self.clear();
    }

    /// Submit a new task and start watching it
    ///
    /// On failure nothing changes: the previous target keeps being watched
    /// and the user may resubmit.
    pub async fn submit(&mut self, request: TaskRequest) -> Result<String, WatchError> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(WatchError::InvalidTask(missing));
        }
        if self.session_id.is_empty() {
            return Err(WatchError::NoSession);
        }

        let task_id = self
            .submitter
            .submit_task(&self.session_id, &request)
            .await
            .map_err(|e| WatchError::Submission(format!("{:#}", e)))?;

        info!(
            "Submitted task {} ({} {} via {}, {} items)",
            task_id, request.language, request.pos, request.model, request.count
        );

        self.watch(
            WatchedTarget::armed(self.session_id.clone(), task_id.clone(), request.count),
            SelectionState::JustSubmitted,
        );

        self.registry.request_refresh();
        self.registry.sync(&self.session_id).await;

        Ok(task_id)
    }

    /// Start watching an existing task
    pub fn select(&mut self, task: &Task) {
        info!("Selected task {} (target {})", task.id, task.target_count);
        self.watch(
            WatchedTarget::armed(self.session_id.clone(), task.id.clone(), task.target_count),
            SelectionState::Selected,
        );
    }

    /// Select a task by full id or unambiguous prefix
    ///
    /// The task list is reloaded once if the id is not known yet.
    pub async fn select_by_id(&mut self, id_or_prefix: &str) -> Result<Task, WatchError> {
        self.registry.sync(&self.session_id).await;

        let task = match self.registry.resolve(id_or_prefix) {
            Ok(task) => task.clone(),
            Err(WatchError::UnknownTask(_)) => {
                self.registry.request_refresh();
                self.registry.sync(&self.session_id).await;
                self.registry.resolve(id_or_prefix)?.clone()
            }
            Err(e) => return Err(e),
        };

        self.select(&task);
        Ok(task)
    }

    /// Reload the task list
    pub async fn refresh_tasks(&mut self) -> bool {
        self.registry.request_refresh();
        self.registry.sync(&self.session_id).await
    }

    /// Load the task list if it has never been loaded for this session
    pub async fn load_tasks(&mut self) -> bool {
        self.registry.sync(&self.session_id).await
    }

    /// Stop watching anything
    pub fn clear(&mut self) {
        self.watch(WatchedTarget::idle(self.session_id.clone()), SelectionState::Idle);
    }

    fn watch(&mut self, target: WatchedTarget, state: SelectionState) {
        self.engine.start(target.key());
        self.target = target;
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedBackend, Step, task};
    use tokio::time;

    fn controller(backend: &Arc<ScriptedBackend>) -> SelectionController {
        SelectionController::for_backend("s1", backend.clone(), Duration::from_secs(5))
    }

    fn hindi_nouns(count: u32) -> TaskRequest {
        TaskRequest::new("Hindi", "noun", "groq", count)
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_watches_new_task_until_complete() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script("J1", [Step::Count(4), Step::Count(8), Step::Count(10)]);
        let mut controller = controller(&backend);
        let mut rx = controller.subscribe();

        let task_id = controller.submit(hindi_nouns(10)).await.unwrap();
        assert_eq!(task_id, "J1");
        assert_eq!(controller.state(), SelectionState::JustSubmitted);
        assert_eq!(controller.target(), &WatchedTarget::armed("s1", "J1", 10));

        let first = rx.wait_for(|s| s.snapshot.is_some()).await.unwrap().clone();
        assert_eq!(first.snapshot.unwrap().count, 4);
        assert!(first.loading);

        let done = rx.wait_for(|s| s.finished).await.unwrap().clone();
        assert_eq!(done.snapshot.unwrap().items.len(), 10);
        assert!(!done.loading);
        assert_eq!(backend.calls("J1"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_refreshes_registry() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script("J1", [Step::Count(10)]);
        let mut controller = controller(&backend);
        controller.load_tasks().await;
        assert!(controller.registry().tasks().is_empty());

        controller.submit(hindi_nouns(10)).await.unwrap();

        assert_eq!(controller.registry().tasks().len(), 1);
        assert_eq!(controller.registry().tasks()[0].id, "J1");
        assert_eq!(backend.list_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_form_is_rejected_without_submitting() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut controller = controller(&backend);

        let err = controller
            .submit(TaskRequest::new("Hindi", "", "", 10))
            .await
            .unwrap_err();

        assert!(matches!(err, WatchError::InvalidTask(ref f) if f == &vec!["pos", "model"]));
        assert_eq!(controller.state(), SelectionState::Idle);
        assert!(controller.registry().tasks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_without_session() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut controller =
            SelectionController::for_backend("", backend.clone(), Duration::from_secs(5));

        let err = controller.submit(hindi_nouns(10)).await.unwrap_err();
        assert!(matches!(err, WatchError::NoSession));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_submission_keeps_current_target() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script("J0", [Step::Count(1)]);
        let mut controller = controller(&backend);
        controller.select(&task("J0", 20));

        backend.fail_submission(true);
        let err = controller.submit(hindi_nouns(10)).await.unwrap_err();

        assert!(matches!(err, WatchError::Submission(ref m) if m.contains("queue full")));
        assert_eq!(controller.state(), SelectionState::Selected);
        assert_eq!(controller.target().task_id.as_deref(), Some("J0"));
        assert!(controller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_selecting_completed_task_while_polling() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script("J1", [Step::Count(4)]);
        backend.script("J0", [Step::Count(20)]);
        let mut controller = controller(&backend);
        let mut rx = controller.subscribe();

        controller.submit(hindi_nouns(10)).await.unwrap();
        rx.wait_for(|s| s.snapshot.is_some()).await.unwrap();
        let j1_calls = backend.calls("J1");

        controller.select(&task("J0", 20));
        assert_eq!(controller.state(), SelectionState::Selected);

        let done = rx.wait_for(|s| s.finished).await.unwrap().clone();
        let snapshot = done.snapshot.unwrap();
        assert_eq!(snapshot.task_id, "J0");
        assert_eq!(snapshot.count, 20);
        assert!(!done.loading);
        assert_eq!(backend.calls("J0"), 1);

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.calls("J0"), 1);
        assert_eq!(backend.calls("J1"), j1_calls);
        assert_eq!(controller.status().snapshot.unwrap().task_id, "J0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_form_twice_gives_independent_tasks() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script("J1", [Step::Count(3)]);
        backend.script("J2", [Step::Count(6)]);
        let mut controller = controller(&backend);
        let mut rx = controller.subscribe();

        let first = controller.submit(hindi_nouns(10)).await.unwrap();
        let second = controller.submit(hindi_nouns(10)).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(controller.registry().tasks().len(), 2);

        let status = rx.wait_for(|s| s.snapshot.is_some()).await.unwrap().clone();
        let snapshot = status.snapshot.unwrap();
        assert_eq!(snapshot.task_id, second);
        assert!(snapshot.items.iter().all(|r| r["task"] == second.as_str()));

        let selected = controller.select_by_id(&first).await.unwrap();
        assert_eq!(selected.id, first);
        let status = rx
            .wait_for(|s| s.snapshot.as_ref().is_some_and(|snap| snap.task_id == first))
            .await
            .unwrap()
            .clone();
        let snapshot = status.snapshot.unwrap();
        assert_eq!(snapshot.count, 3);
        assert!(snapshot.items.iter().all(|r| r["task"] == first.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_then_reselect_restarts() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script("J1", [Step::Fail("network down"), Step::Count(10)]);
        let mut controller = controller(&backend);
        let mut rx = controller.subscribe();

        controller.submit(hindi_nouns(10)).await.unwrap();
        let failed = rx.wait_for(|s| s.finished).await.unwrap().clone();
        assert!(failed.error.is_some());

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.calls("J1"), 1);

        controller.select_by_id("J1").await.unwrap();
        let done = rx
            .wait_for(|s| s.cycle != failed.cycle && s.finished)
            .await
            .unwrap()
            .clone();
        assert!(done.error.is_none());
        assert_eq!(backend.calls("J1"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_by_id_reloads_unknown_task() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script("later", [Step::Count(5)]);
        let mut controller = controller(&backend);
        controller.load_tasks().await;

        backend.add_task("later", 5);
        let task = controller.select_by_id("lat").await.unwrap();

        assert_eq!(task.id, "later");
        assert_eq!(controller.target(), &WatchedTarget::armed("s1", "later", 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_by_unknown_id_keeps_state() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut controller = controller(&backend);

        let err = controller.select_by_id("nope").await.unwrap_err();
        assert!(matches!(err, WatchError::UnknownTask(_)));
        assert_eq!(controller.state(), SelectionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_session_clears_selection() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.script("J0", [Step::Count(1)]);
        let mut controller = controller(&backend);
        controller.select(&task("J0", 20));

        controller.set_session("s2");

        assert_eq!(controller.session_id(), "s2");
        assert_eq!(controller.state(), SelectionState::Idle);
        assert_eq!(controller.target(), &WatchedTarget::idle("s2"));
        assert!(!controller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_session_cannot_select_previous_session_task() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.add_task("old-task", 10);
        backend.script("old-task", [Step::Count(1)]);
        let mut controller = controller(&backend);
        controller.load_tasks().await;
        assert_eq!(controller.registry().tasks().len(), 1);

        backend.fail_listing(true);
        controller.set_session("s2");
        controller.load_tasks().await;
        assert!(controller.registry().tasks().is_empty());

        let err = controller.select_by_id("old-task").await.unwrap_err();
        assert!(matches!(err, WatchError::UnknownTask(_)));
        assert_eq!(controller.target(), &WatchedTarget::idle("s2"));
        assert_eq!(backend.calls("old-task"), 0);
    }
}
