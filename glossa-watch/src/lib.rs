//! Glossa Watch
//!
//! Client-side coordination for generation tasks: which task is being
//! watched, when its results are fetched, and when fetching stops.
//!
//! Architecture:
//! - Configuration: backend URL, poll cadence, state file
//! - Store: best-effort persisted key-value slot for the session id
//! - Repositories: trait seams over the backend (fetch results, list and
//!   submit tasks, create sessions), implemented by `BackendClient`
//! - Scheduler: the polling engine, one live cycle at a time
//! - Services: the task registry and the selection controller
//! - View: table model for a results snapshot

pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;
pub mod session;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::WatchError;
pub use scheduler::{PollStatus, PollingEngine};
pub use service::{JobRegistry, SelectionController};
pub use session::SessionHandle;
pub use view::ResultTable;
