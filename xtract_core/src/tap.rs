//! Ingestion adapter: a decorator over the host's log sink.
//!
//! The character host does not hand responses to anyone; it only logs them.
//! The tap wraps the sink held in the host's [`SharedSink`] cell, forwards
//! every call unchanged, and additionally feeds `model response: …` debug
//! lines into the extractor pipeline. Teardown restores the original sink
//! exactly.

use crate::logger::{LogSink, SharedSink, swap_sink};
use crate::{Extractor, MODEL_RESPONSE_PREFIX};
use std::sync::Arc;
use tracing::info;

/// The wrapper sink swapped into the host's cell.
pub struct LogTap {
    original: Arc<dyn LogSink>,
    extractor: Arc<Extractor>,
}

impl LogSink for LogTap {
    fn debug(&self, args: &[String]) {
        // Forward first; existing host behavior is never suppressed.
        self.original.debug(args);

        let Some(payload) = args
            .first()
            .and_then(|msg| msg.strip_prefix(MODEL_RESPONSE_PREFIX))
        else {
            return;
        };

        // A response with no announced scope is dropped, not an error.
        if let Some(scope) = self.extractor.tracker().current() {
            info!("[拦截] 捕获到模型响应，群组: {scope}");
            self.extractor.process_response(&scope, payload);
        }
    }

    fn info(&self, args: &[String]) {
        self.original.info(args);
    }

    fn warn(&self, args: &[String]) {
        self.original.warn(args);
    }

    fn error(&self, args: &[String]) {
        self.original.error(args);
    }
}

/// Handle for undoing an installed tap.
pub struct TapGuard {
    shared: SharedSink,
    original: Arc<dyn LogSink>,
}

impl TapGuard {
    /// Put the original sink back. After this the cell behaves bit-for-bit
    /// as before installation.
    pub fn restore(self) {
        swap_sink(&self.shared, self.original);
    }
}

/// Swap a tap into `shared`, observing for `extractor`.
pub fn install(shared: &SharedSink, extractor: Arc<Extractor>) -> TapGuard {
    let current = crate::logger::current_sink(shared);
    let tap: Arc<dyn LogSink> = Arc::new(LogTap {
        original: Arc::clone(&current),
        extractor,
    });
    swap_sink(shared, tap);

    TapGuard {
        shared: Arc::clone(shared),
        original: current,
    }
}
