#![forbid(unsafe_code)]

//! Log output of a tour run: span names, levels and structured fields.
//!
//! Run:
//!   cargo test -p wayfinder-runtime --test tracing_tour_events

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use common::controller_with;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use wayfinder_runtime::{NavigationStatus, TourOptions};
use web_time::Duration;

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    fields: HashMap<String, String>,
}

#[derive(Default, Clone)]
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl Capture {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: HashMap<String, String>,
    message: String,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value = format!("{value:?}");
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .insert(field.name().to_string(), value.to_string());
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.fields,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn with_captured_tracing(f: impl FnOnce()) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

const TICK: Duration = Duration::from_millis(1);

#[test]
fn missing_anchor_abort_is_logged_at_warn() {
    let capture = with_captured_tracing(|| {
        let (mut tour, _log) = controller_with(&["a", "ghost"], &["a"], NavigationStatus::Settled);
        let _rx = tour.start(TourOptions::new(["a", "ghost"])).expect("started");
        tour.advance_time(TICK);
        tour.next().expect("a -> ghost");
        tour.advance_time(TICK);
        assert!(!tour.is_in_progress());
    });

    let warnings: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert_eq!(warnings[0].target, "wayfinder.tour");
    assert_eq!(warnings[0].fields.get("step").map(String::as_str), Some("ghost"));
    assert!(warnings[0].message.contains("no anchor registered"));

    assert!(
        capture
            .events()
            .iter()
            .any(|e| e.level == tracing::Level::DEBUG && e.message == "tour closed")
    );
}

#[test]
fn normal_completion_logs_nothing_above_debug() {
    let capture = with_captured_tracing(|| {
        let (mut tour, _log) = controller_with(&["a"], &["a"], NavigationStatus::Settled);
        let _rx = tour.start(TourOptions::new(["a"])).expect("started");
        tour.advance_time(TICK);
        tour.next().expect("a -> end");
        tour.advance_time(TICK);
    });

    assert!(
        capture
            .events()
            .iter()
            .all(|e| e.level >= tracing::Level::DEBUG),
        "unexpected warn/error: {:?}",
        capture.events()
    );

    let finished = capture
        .events()
        .into_iter()
        .find(|e| e.message == "sequence finished; closing tour")
        .expect("sequence finished event");
    assert_eq!(finished.level, tracing::Level::DEBUG);
    assert_eq!(finished.target, "wayfinder.tour");
    assert!(finished.fields.get("reason").is_some_and(|r| r.contains("outside the tour sequence")));
}

#[test]
fn start_and_show_spans_carry_fields() {
    let capture = with_captured_tracing(|| {
        let (mut tour, _log) = controller_with(&["a", "b"], &["a", "b"], NavigationStatus::Settled);
        let _rx = tour
            .start(TourOptions::new(["a", "b"]).first_step("b"))
            .expect("started");
        tour.advance_time(TICK);
    });

    let spans = capture.spans();
    let start = spans
        .iter()
        .find(|s| s.name == "tour.start")
        .expect("tour.start span");
    assert_eq!(start.fields.get("steps").map(String::as_str), Some("2"));

    let show = spans
        .iter()
        .find(|s| s.name == "tour.show")
        .expect("tour.show span");
    assert_eq!(show.fields.get("step").map(String::as_str), Some("b"));
    assert_eq!(show.fields.get("cursor").map(String::as_str), Some("1"));

    let shown = capture
        .events()
        .into_iter()
        .find(|e| e.message == "step shown")
        .expect("step shown event");
    assert_eq!(shown.target, "wayfinder.tour");
    assert_eq!(shown.fields.get("number").map(String::as_str), Some("2"));
}

#[test]
fn ignored_start_is_traced() {
    let capture = with_captured_tracing(|| {
        let (mut tour, _log) = controller_with(&["a"], &["a"], NavigationStatus::Settled);
        let _rx = tour.start(TourOptions::new(["a"])).expect("started");
        assert!(tour.start(TourOptions::new(["a"])).is_none());
    });

    assert!(capture.events().iter().any(|e| {
        e.level == tracing::Level::TRACE && e.message.starts_with("start ignored")
    }));
}
