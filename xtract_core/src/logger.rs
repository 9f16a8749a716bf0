//! The log-sink seam between the character host and the extractor.
//!
//! The host keeps its logger in a swappable cell ([`SharedSink`]) so an
//! observer can wrap it and later hand the original back untouched. The core
//! owns the trait; the character crate provides the real sink, tests provide
//! recording fakes.

use std::sync::{Arc, PoisonError, RwLock};

/// Leveled log sink with variadic-style string arguments, mirroring the
/// host logger's shape. Only the first argument of `debug` is ever inspected
/// by the extractor; everything is forwarded as-is.
pub trait LogSink: Send + Sync {
    fn debug(&self, args: &[String]);
    fn info(&self, args: &[String]);
    fn warn(&self, args: &[String]);
    fn error(&self, args: &[String]);
}

/// A host logger cell whose sink can be swapped out and restored.
pub type SharedSink = Arc<RwLock<Arc<dyn LogSink>>>;

/// Wrap a sink in a swappable cell.
#[must_use]
pub fn shared_sink(sink: Arc<dyn LogSink>) -> SharedSink {
    Arc::new(RwLock::new(sink))
}

/// Current sink held by the cell.
#[must_use]
pub fn current_sink(shared: &SharedSink) -> Arc<dyn LogSink> {
    Arc::clone(&shared.read().unwrap_or_else(PoisonError::into_inner))
}

/// Swap the cell's sink, returning the previous one.
pub fn swap_sink(shared: &SharedSink, next: Arc<dyn LogSink>) -> Arc<dyn LogSink> {
    let mut guard = shared.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *guard, next)
}
