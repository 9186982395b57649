//! Structured logging contract for touch dispatch.
//!
//! Captures spans and events with a `tracing_subscriber` registry layer and
//! checks targets, levels and key fields.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use touchslate_core::{Rect, TouchEvent, TouchPointer, TouchSurface};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

#[derive(Clone, Default)]
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn find(&self, message: &str) -> Option<CapturedEvent> {
        self.events().into_iter().find(|e| e.message() == message)
    }
}

struct Capture(CaptureHandle);

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
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
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.0.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.0.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing<F, R>(f: F) -> (R, CaptureHandle)
where
    F: FnOnce() -> R,
{
    let handle = CaptureHandle::default();
    let subscriber = tracing_subscriber::registry().with(Capture(handle.clone()));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, handle)
}

fn surface() -> TouchSurface {
    let mut surface = TouchSurface::default();
    surface.add_entity(Rect::new(100, 100, 200, 200)).unwrap();
    surface
}

#[test]
fn every_dispatch_opens_a_span() {
    let (_, capture) = with_captured_tracing(|| {
        let mut surface = surface();
        surface.dispatch(&TouchEvent::down(1, 150, 150));
        surface.dispatch(&TouchEvent::moved(vec![
            TouchPointer::new(1, 170, 150),
            TouchPointer::new(2, 0, 0),
        ]));
        surface.dispatch(&TouchEvent::up(1, 170, 150));
    });

    let spans: Vec<_> = capture
        .spans()
        .into_iter()
        .filter(|s| s.name == "touch.dispatch")
        .collect();
    assert_eq!(spans.len(), 3);
    assert_eq!(spans[0].fields.get("kind").map(String::as_str), Some("Down"));
    assert_eq!(spans[1].fields.get("pointers").map(String::as_str), Some("2"));
}

#[test]
fn applied_pan_is_logged_under_gesture_target() {
    let (_, capture) = with_captured_tracing(|| {
        let mut surface = surface();
        surface.dispatch(&TouchEvent::down(1, 150, 150));
        surface.dispatch(&TouchEvent::moved(vec![TouchPointer::new(1, 160, 170)]));
    });

    let pan = capture.find("pan applied").expect("pan event");
    assert_eq!(pan.level, tracing::Level::DEBUG);
    assert_eq!(pan.target, "touchslate.gesture");
    assert_eq!(pan.fields.get("dx").map(String::as_str), Some("10"));
    assert_eq!(pan.fields.get("dy").map(String::as_str), Some("20"));
}

#[test]
fn inconsistent_input_warns() {
    let (_, capture) = with_captured_tracing(|| {
        let mut surface = surface();
        surface.dispatch(&TouchEvent::up(9, 0, 0));
        for p in 0..4 {
            surface.dispatch(&TouchEvent::down(p, 150, 150));
        }
    });

    let unknown = capture
        .find("up for unknown pointer ignored")
        .expect("unknown-up warning");
    assert_eq!(unknown.level, tracing::Level::WARN);
    assert_eq!(unknown.target, "touchslate.pointer");
    assert_eq!(unknown.fields.get("pointer").map(String::as_str), Some("9"));

    let refused = capture
        .find("contact refused; pointer left unbound")
        .expect("overflow warning");
    assert_eq!(refused.level, tracing::Level::WARN);
    assert_eq!(refused.fields.get("rejection").map(String::as_str), Some("Full"));

    let toggled = capture.find("lock toggled").expect("lock event");
    assert_eq!(toggled.target, "touchslate.surface");
    assert_eq!(toggled.fields.get("locked").map(String::as_str), Some("true"));
}

#[test]
fn jitter_is_trace_only() {
    let (_, capture) = with_captured_tracing(|| {
        let mut surface = surface();
        surface.dispatch(&TouchEvent::down(1, 150, 150));
        surface.dispatch(&TouchEvent::moved(vec![TouchPointer::new(1, 151, 152)]));
    });

    let jitter = capture.find("jitter").expect("jitter event");
    assert_eq!(jitter.level, tracing::Level::TRACE);
    assert!(capture.find("pan applied").is_none());
    assert!(
        capture
            .events()
            .iter()
            .all(|e| e.target.starts_with("touchslate."))
    );
}
