//! End-to-end test of the tap → matcher → cache → render pipeline against a
//! recording fake of the host logger.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use xtract_core::{Extractor, LogSink, TagSpec, logger, shared_sink};

/// Fake host sink recording every forwarded call verbatim.
#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<(&'static str, Vec<String>)>>,
}

impl RecordingSink {
    fn calls(&self) -> Vec<(&'static str, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn debug(&self, args: &[String]) {
        self.calls.lock().unwrap().push(("debug", args.to_vec()));
    }
    fn info(&self, args: &[String]) {
        self.calls.lock().unwrap().push(("info", args.to_vec()));
    }
    fn warn(&self, args: &[String]) {
        self.calls.lock().unwrap().push(("warn", args.to_vec()));
    }
    fn error(&self, args: &[String]) {
        self.calls.lock().unwrap().push(("error", args.to_vec()));
    }
}

fn debug_line(shared: &xtract_core::SharedSink, line: &str) {
    logger::current_sink(shared).debug(&[line.to_string()]);
}

#[test]
fn turn_start_then_response_then_query() {
    let sink = Arc::new(RecordingSink::default());
    let shared = shared_sink(sink.clone());
    let extractor = Arc::new(Extractor::new("AI", vec![TagSpec::new("think")]));

    let guard = Extractor::install(&extractor, Some(&shared)).unwrap();

    extractor.on_turn_start("g1");
    debug_line(
        &shared,
        "model response: <think>plan A</think> then <think>plan B</think>",
    );

    assert_eq!(extractor.render("g1", "think"), "AI在想：\nplan A\n\nplan B");
    // A scope that never produced a response reads as no content.
    assert_eq!(extractor.render("g2", "think"), "没有 <think> 标签包裹的信息");

    guard.restore();
}

#[test]
fn every_call_is_forwarded_unchanged() {
    let sink = Arc::new(RecordingSink::default());
    let shared = shared_sink(sink.clone());
    let extractor = Arc::new(Extractor::new("AI", vec![TagSpec::new("think")]));

    let guard = Extractor::install(&extractor, Some(&shared)).unwrap();
    extractor.on_turn_start("g1");

    let current = logger::current_sink(&shared);
    current.debug(&["model response: <think>a</think>".to_string(), "extra".to_string()]);
    current.info(&["plain info".to_string()]);
    current.warn(&["a warning".to_string()]);
    current.error(&["an error".to_string()]);
    guard.restore();

    assert_eq!(
        sink.calls(),
        vec![
            (
                "debug",
                vec![
                    "model response: <think>a</think>".to_string(),
                    "extra".to_string()
                ]
            ),
            ("info", vec!["plain info".to_string()]),
            ("warn", vec!["a warning".to_string()]),
            ("error", vec!["an error".to_string()]),
        ]
    );
}

#[test]
fn response_without_active_scope_is_dropped() {
    let sink = Arc::new(RecordingSink::default());
    let shared = shared_sink(sink);
    let extractor = Arc::new(Extractor::new("AI", vec![TagSpec::new("think")]));

    let guard = Extractor::install(&extractor, Some(&shared)).unwrap();
    debug_line(&shared, "model response: <think>orphan</think>");
    guard.restore();

    assert_eq!(extractor.store().scope_count(), 0);
    assert_eq!(extractor.render("g1", "think"), "没有 <think> 标签包裹的信息");
}

#[test]
fn non_response_debug_lines_are_ignored() {
    let sink = Arc::new(RecordingSink::default());
    let shared = shared_sink(sink.clone());
    let extractor = Arc::new(Extractor::new("AI", vec![TagSpec::new("think")]));

    let guard = Extractor::install(&extractor, Some(&shared)).unwrap();
    extractor.on_turn_start("g1");
    debug_line(&shared, "prompt tokens: 123");
    // Prefix must match exactly at the start of the first argument.
    debug_line(&shared, "note: model response: <think>x</think>");
    guard.restore();

    assert_eq!(extractor.store().scope_count(), 0);
    assert_eq!(sink.calls().len(), 2);
}

#[test]
fn restore_removes_the_tap_completely() {
    let sink = Arc::new(RecordingSink::default());
    let shared = shared_sink(sink.clone());
    let extractor = Arc::new(Extractor::new("AI", vec![TagSpec::new("think")]));

    let guard = Extractor::install(&extractor, Some(&shared)).unwrap();
    guard.restore();

    extractor.on_turn_start("g1");
    debug_line(&shared, "model response: <think>after restore</think>");

    // Forwarding still works bit-for-bit, but no extraction happens.
    assert_eq!(
        sink.calls(),
        vec![(
            "debug",
            vec!["model response: <think>after restore</think>".to_string()]
        )]
    );
    assert_eq!(extractor.store().scope_count(), 0);
}

#[test]
fn without_a_host_sink_install_is_skipped() {
    let extractor = Arc::new(Extractor::new("AI", vec![TagSpec::new("think")]));
    assert!(Extractor::install(&extractor, None).is_none());
    // Queries still answer, just always with no content.
    assert_eq!(extractor.render("g1", "think"), "没有 <think> 标签包裹的信息");
}

#[test]
fn last_turn_start_wins_scope_attribution() {
    let sink = Arc::new(RecordingSink::default());
    let shared = shared_sink(sink);
    let extractor = Arc::new(Extractor::new("AI", vec![TagSpec::new("think")]));

    let guard = Extractor::install(&extractor, Some(&shared)).unwrap();
    extractor.on_turn_start("g1");
    extractor.on_turn_start("g2");
    debug_line(&shared, "model response: <think>for whom</think>");
    guard.restore();

    assert_eq!(extractor.render("g2", "think"), "AI在想：\nfor whom");
    assert_eq!(extractor.render("g1", "think"), "没有 <think> 标签包裹的信息");
}
