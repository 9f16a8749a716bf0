//! Tracks which conversation scope is awaiting its model response.
//!
//! A single last-write-wins cell: the turn-start signal overwrites it, the
//! response path reads it without clearing, so it stays valid until the next
//! turn begins. Correlation by request token is deliberately not attempted;
//! the host delivers turns for a given chat serially.

use crate::ScopeId;
use std::sync::{Mutex, PoisonError};

/// Process-wide "currently active scope" cell.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    active: Mutex<Option<ScopeId>>,
}

impl ScopeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new turn began for `scope`; overwrite whatever was active.
    pub fn on_turn_start(&self, scope: &str) {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *active = Some(scope.to_string());
    }

    /// The scope awaiting a response, if any. Reading does not clear.
    #[must_use]
    pub fn current(&self) -> Option<ScopeId> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset() {
        assert_eq!(ScopeTracker::new().current(), None);
    }

    #[test]
    fn last_write_wins() {
        let tracker = ScopeTracker::new();
        tracker.on_turn_start("g1");
        tracker.on_turn_start("g2");
        assert_eq!(tracker.current().as_deref(), Some("g2"));
    }

    #[test]
    fn reading_does_not_clear() {
        let tracker = ScopeTracker::new();
        tracker.on_turn_start("g1");
        assert_eq!(tracker.current().as_deref(), Some("g1"));
        assert_eq!(tracker.current().as_deref(), Some("g1"));
    }
}
