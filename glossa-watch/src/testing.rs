//! In-memory backend for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use glossa_core::domain::result::{ResultRecord, ResultSnapshot};
use glossa_core::domain::task::{Task, TaskRequest, TaskStatus};
use serde_json::Value;

use crate::repository::{ResultFetcher, TaskSource, TaskSubmitter};

/// One scripted answer to a result fetch
#[derive(Debug, Clone)]
pub enum Step {
    /// Answer immediately with this many items
    Count(u32),
    /// Answer with this many items after a delay
    Delayed(u32, Duration),
    /// Fail with this message
    Fail(&'static str),
}

/// Scripted results per task; the last step of a script repeats forever
#[derive(Default)]
pub struct ScriptedBackend {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    last: Mutex<HashMap<String, Step>>,
    calls: Mutex<HashMap<String, usize>>,
    tasks: Mutex<Vec<Task>>,
    list_calls: AtomicUsize,
    list_fails: AtomicBool,
    submit_fails: AtomicBool,
    submitted: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, task_id: &str, steps: impl IntoIterator<Item = Step>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(task_id.to_string(), steps.into_iter().collect());
    }

    /// Number of result fetches issued for `task_id`
    pub fn calls(&self, task_id: &str) -> usize {
        self.calls.lock().unwrap().get(task_id).copied().unwrap_or(0)
    }

    pub fn add_task(&self, id: &str, target_count: u32) {
        self.tasks.lock().unwrap().push(task(id, target_count));
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fail_listing(&self, fail: bool) {
        self.list_fails.store(fail, Ordering::SeqCst);
    }

    pub fn fail_submission(&self, fail: bool) {
        self.submit_fails.store(fail, Ordering::SeqCst);
    }

    fn next_step(&self, task_id: &str) -> Step {
        let popped = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(task_id)
            .and_then(|steps| steps.pop_front());
        let mut last = self.last.lock().unwrap();
        match popped {
            Some(step) => {
                last.insert(task_id.to_string(), step.clone());
                step
            }
            None => last
                .get(task_id)
                .cloned()
                .unwrap_or(Step::Fail("no script for task")),
        }
    }
}

pub fn task(id: &str, target_count: u32) -> Task {
    Task {
        id: id.to_string(),
        session_id: "s1".to_string(),
        language: "Hindi".to_string(),
        part_of_speech: "noun".to_string(),
        model: "groq".to_string(),
        target_count,
        created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        status: TaskStatus::Queued,
    }
}

fn records(task_id: &str, count: u32) -> Vec<ResultRecord> {
    (0..count)
        .map(|n| {
            let mut record = ResultRecord::new();
            record.insert("task".to_string(), Value::from(task_id));
            record.insert("n".to_string(), Value::from(n));
            record
        })
        .collect()
}

#[async_trait]
impl ResultFetcher for ScriptedBackend {
    async fn fetch_results(&self, session_id: &str, task_id: &str) -> anyhow::Result<ResultSnapshot> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(task_id.to_string())
            .or_default() += 1;

        let count = match self.next_step(task_id) {
            Step::Count(count) => count,
            Step::Delayed(count, delay) => {
                tokio::time::sleep(delay).await;
                count
            }
            Step::Fail(message) => anyhow::bail!("{}", message),
        };

        Ok(ResultSnapshot {
            session_id: session_id.to_string(),
            task_id: task_id.to_string(),
            items: records(task_id, count),
            count,
        })
    }
}

#[async_trait]
impl TaskSource for ScriptedBackend {
    async fn list_tasks(&self, _session_id: &str) -> anyhow::Result<Vec<Task>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.list_fails.load(Ordering::SeqCst) {
            anyhow::bail!("listing unavailable");
        }
        Ok(self.tasks.lock().unwrap().clone())
    }
}

#[async_trait]
impl TaskSubmitter for ScriptedBackend {
    async fn submit_task(&self, _session_id: &str, request: &TaskRequest) -> anyhow::Result<String> {
        if self.submit_fails.load(Ordering::SeqCst) {
            anyhow::bail!("queue full");
        }
        let n = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("J{}", n);
        self.add_task(&id, request.count);
        Ok(id)
    }
}
