//! Core domain types
//!
//! These types are what the rest of the workspace reasons about. The backend
//! owns sessions and tasks; the client only reads them. The watched target is
//! the one piece of purely client-side state.

pub mod result;
pub mod session;
pub mod task;
pub mod watch;

use chrono::{DateTime, Utc};

/// Convert backend epoch seconds (possibly fractional) into a UTC timestamp
///
/// Values that cannot be represented fall back to the Unix epoch.
pub fn timestamp_from_epoch(seconds: f64) -> DateTime<Utc> {
    if !seconds.is_finite() {
        return DateTime::<Utc>::default();
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos).unwrap_or_default()
}
