//! Session domain model
//!
//! A session is the backend-issued scope that groups a user's tasks and their
//! exclusion state. The client treats it as opaque and immutable.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// A generation session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Opaque identifier, the correlation key for every task and result
    pub id: String,

    /// When the backend created the session
    pub created_at: DateTime<Utc>,

    /// How long the backend keeps the session alive
    pub ttl: Duration,
}

impl Session {
    /// When the session is expected to expire on the backend
    ///
    /// Expiry is not enforced client-side; this is informational only.
    pub fn expires_at(&self) -> DateTime<Utc> {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::zero());
        self.created_at + ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expires_at_adds_ttl() {
        let session = Session {
            id: "s1".to_string(),
            created_at: DateTime::from_timestamp(1_000, 0).unwrap(),
            ttl: Duration::from_secs(3600),
        };
        assert_eq!(session.expires_at().timestamp(), 4_600);
    }
}
