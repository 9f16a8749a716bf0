//! Production [`LogSink`] routing host log lines into `tracing`.

use tracing::{debug, error, info, warn};
use xtract_core::LogSink;

/// Sink that hands every line to the process-wide tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

fn join(args: &[String]) -> String {
    args.join(" ")
}

impl LogSink for TracingSink {
    fn debug(&self, args: &[String]) {
        debug!(target: "character", "{}", join(args));
    }

    fn info(&self, args: &[String]) {
        info!(target: "character", "{}", join(args));
    }

    fn warn(&self, args: &[String]) {
        warn!(target: "character", "{}", join(args));
    }

    fn error(&self, args: &[String]) {
        error!(target: "character", "{}", join(args));
    }
}
