//! Scheduler layer
//!
//! Owns the timing side of result polling: when the next fetch happens,
//! when a cycle ends, and how a superseded cycle is torn down.

pub mod engine;

pub use engine::{PollStatus, PollingEngine};
