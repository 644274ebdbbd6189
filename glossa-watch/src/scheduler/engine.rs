//! Polling engine
//!
//! Repeatedly fetches the results of one task until the target count is
//! reached, a fetch fails, or the cycle is superseded.
//!
//! A cycle is identified by its [`WatchKey`]. Starting the engine with a key
//! that differs from the live one cancels the old cycle before the first
//! fetch of the new one is issued, so there is never more than one timer and
//! one in-flight fetch per engine. Every status update carries the cycle id
//! and a per-cycle request sequence number; updates from a cancelled cycle or
//! older than the last applied response are dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use glossa_core::domain::result::ResultSnapshot;
use glossa_core::domain::watch::WatchKey;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::repository::ResultFetcher;

/// Observable state of the engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollStatus {
    /// Cycle this status belongs to; 0 before the first start
    pub cycle: u64,

    /// What the cycle is polling for; `None` when idle
    pub key: Option<WatchKey>,

    /// Latest applied snapshot, replaced wholesale on every fetch
    pub snapshot: Option<ResultSnapshot>,

    /// More fetches are expected
    pub loading: bool,

    /// Message of the fetch failure that ended the cycle
    pub error: Option<String>,

    /// The cycle ended; nothing further will be applied to it
    pub finished: bool,

    /// Sequence number of the last applied response in this cycle
    pub applied_seq: u64,
}

/// What a cycle should do after a response was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Next {
    Continue,
    Stop,
}

impl PollStatus {
    /// Apply one fetch outcome
    ///
    /// Returns `None` when the outcome is stale (another cycle is current,
    /// the cycle already ended, or a newer response was applied) and was
    /// therefore discarded.
    fn apply(
        &mut self,
        cycle: u64,
        seq: u64,
        outcome: Result<ResultSnapshot, String>,
        target_count: u32,
    ) -> Option<Next> {
        if cycle != self.cycle || self.finished || seq <= self.applied_seq {
            return None;
        }
        self.applied_seq = seq;

        match outcome {
            Ok(snapshot) => {
                let done = snapshot.is_complete(target_count);
                self.snapshot = Some(snapshot);
                self.error = None;
                self.loading = !done;
                self.finished = done;
                Some(if done { Next::Stop } else { Next::Continue })
            }
            Err(message) => {
                self.error = Some(message);
                self.loading = false;
                self.finished = true;
                Some(Next::Stop)
            }
        }
    }
}

/// Handle on the running cycle
struct ActiveCycle {
    key: WatchKey,
    cycle: u64,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Single-owner result poller
///
/// Must be driven from within a Tokio runtime: each cycle runs as a spawned
/// task. Dropping the engine cancels the running cycle.
pub struct PollingEngine {
    fetcher: Arc<dyn ResultFetcher>,
    interval: Duration,
    status: Arc<watch::Sender<PollStatus>>,
    active: Option<ActiveCycle>,
    next_cycle: u64,
}

impl PollingEngine {
    pub fn with_interval(fetcher: Arc<dyn ResultFetcher>, interval: Duration) -> Self {
        let (status, _) = watch::channel(PollStatus::default());
        Self {
            fetcher,
            interval,
            status: Arc::new(status),
            active: None,
            next_cycle: 0,
        }
    }

    /// Receiver notified on every applied status change
    pub fn subscribe(&self) -> watch::Receiver<PollStatus> {
        self.status.subscribe()
    }

    /// Copy of the current status
    pub fn status(&self) -> PollStatus {
        self.status.borrow().clone()
    }

    /// Whether a cycle is currently fetching or waiting for its next tick
    pub fn is_running(&self) -> bool {
        match &self.active {
            Some(active) => {
                let status = self.status.borrow();
                status.cycle == active.cycle && !status.finished
            }
            None => false,
        }
    }

    /// Start polling for `key`, superseding any other cycle
    ///
    /// `None` stops polling and leaves the engine idle. A key equal to the
    /// live cycle's key is a no-op: the timer is not reset and no extra fetch
    /// is issued. Returns true when a new cycle was started.
    pub fn start(&mut self, key: Option<WatchKey>) -> bool {
        let Some(key) = key else {
            let cycle = self.bump_cycle();
            self.status.send_modify(|status| {
                *status = PollStatus {
                    cycle,
                    ..Default::default()
                }
            });
            self.cancel_active();
            debug!("Polling idle");
            return false;
        };

        if self.active.as_ref().is_some_and(|active| active.key == key) && self.is_running() {
            debug!("Already polling task {}, ignoring restart", key.task_id);
            return false;
        }

        // The new cycle id must be visible before the old cycle is cancelled.
        let cycle = self.bump_cycle();

        self.status.send_modify(|status| {
            let same_task = status.key.as_ref().is_some_and(|previous| {
                previous.session_id == key.session_id && previous.task_id == key.task_id
            });
            *status = PollStatus {
                cycle,
                key: Some(key.clone()),
                snapshot: if same_task { status.snapshot.take() } else { None },
                loading: true,
                ..Default::default()
            };
        });
        self.cancel_active();

        info!(
            "Polling task {} (target {}, every {:?})",
            key.task_id, key.target_count, self.interval
        );

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_cycle(
            Arc::clone(&self.fetcher),
            key.clone(),
            cycle,
            self.interval,
            Arc::clone(&self.status),
            cancel.clone(),
        ));

        self.active = Some(ActiveCycle {
            key,
            cycle,
            cancel,
            handle,
        });

        true
    }

    fn bump_cycle(&mut self) -> u64 {
        self.next_cycle += 1;
        self.next_cycle
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("Cancelling poll cycle {} for task {}", active.cycle, active.key.task_id);
            active.cancel.cancel();
            active.handle.abort();
        }
    }
}

impl Drop for PollingEngine {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

/// One polling cycle: fetch on every tick until told to stop
async fn run_cycle(
    fetcher: Arc<dyn ResultFetcher>,
    key: WatchKey,
    cycle: u64,
    interval: Duration,
    status: Arc<watch::Sender<PollStatus>>,
    cancel: CancellationToken,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq = 0u64;

    loop {
        // The first tick completes immediately.
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        seq += 1;
        debug!("Fetching results for task {} (request {})", key.task_id, seq);

        let fetched = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Discarding in-flight fetch for task {}", key.task_id);
                return;
            }
            result = fetcher.fetch_results(&key.session_id, &key.task_id) => result,
        };

        let outcome = fetched.map_err(|e| format!("{:#}", e));
        let mut next = None;
        status.send_if_modified(|current| {
            next = current.apply(cycle, seq, outcome, key.target_count);
            next.is_some()
        });

        match next {
            None => {
                debug!("Poll cycle {} superseded, dropping response", cycle);
                return;
            }
            Some(Next::Stop) => {
                let current = status.borrow();
                match &current.error {
                    Some(error) => warn!("Polling task {} stopped: {}", key.task_id, error),
                    None => info!(
                        "Task {} reached {}/{}",
                        key.task_id,
                        current.snapshot.as_ref().map_or(0, |s| s.count),
                        key.target_count
                    ),
                }
                return;
            }
            Some(Next::Continue) => {}
        }
    }
}
