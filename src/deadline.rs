//! Deadline Module
//!
//! A point in time after which an in-flight operation must stop waiting.
//! Every cache and store operation accepts a `Deadline` supplied by the
//! caller, typically derived from the per-request operation timeout.

use std::time::Duration;

use tokio::time::Instant;

/// Caller-supplied cutoff for a single cache or store operation.
///
/// A deadline bounds only the caller's wait: work already submitted may
/// still complete after the deadline has fired.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Instant);

impl Deadline {
    /// Creates a deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    /// Creates a deadline at an explicit instant.
    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Creates a deadline that has already passed.
    pub fn expired() -> Self {
        Self(Instant::now())
    }

    /// Returns true once the deadline has been reached.
    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.0
    }

    /// The underlying instant, for use with `tokio::time::timeout_at`.
    pub fn instant(&self) -> Instant {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_after_not_elapsed() {
        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(!deadline.is_elapsed());
    }

    #[tokio::test]
    async fn test_deadline_expired_is_elapsed() {
        let deadline = Deadline::expired();
        assert!(deadline.is_elapsed());
    }

    #[tokio::test]
    async fn test_deadline_at_past_instant() {
        let deadline = Deadline::at(Instant::now() - Duration::from_millis(10));
        assert!(deadline.is_elapsed());
    }
}
