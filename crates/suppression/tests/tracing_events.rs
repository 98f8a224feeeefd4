//! Integration tests for the events emitted under the `abi::suppression`
//! target when the `tracing` feature is enabled.

#![cfg(feature = "tracing")]

use std::fmt;
use std::sync::{Arc, Mutex};

use suppression::{kernel_abi_whitelist_suppressions, read_suppressions_from_str};
use test_support::{class_diff, struct_type};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "abi::suppression" {
            return;
        }
        let mut message = Message::default();
        event.record(&mut message);
        self.0.lock().unwrap().push(message.0);
    }
}

fn record<F: FnOnce()>(f: F) -> Vec<String> {
    let recorder = Recorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    tracing::subscriber::with_default(subscriber, f);
    recorder.messages()
}

// ============================================================================
// Reading
// ============================================================================

/// Each section is reported as accepted or rejected, in order.
#[test]
fn sections_are_traced() {
    let messages = record(|| {
        let report =
            read_suppressions_from_str("[suppress_type]\nname = A\n[suppress_type]\nbogus = 1\n")
                .unwrap();
        assert_eq!(report.errors().len(), 1);
    });
    assert_eq!(messages, ["section_accepted", "section_rejected"]);
}

/// Dropped patterns are reported as warnings.
#[test]
fn warnings_are_traced() {
    let messages = record(|| {
        read_suppressions_from_str("[suppress_type]\nname = A\nname_regexp = *abc\n").unwrap();
    });
    assert!(messages.iter().any(|m| m == "section_warning"), "{messages:?}");
}

// ============================================================================
// Evaluation
// ============================================================================

/// A suppressed diff names the suppression that hid it.
#[test]
fn suppressed_diff_is_traced() {
    let messages = record(|| {
        let set = read_suppressions_from_str("[suppress_type]\nname = A\n")
            .unwrap()
            .into_suppressions();
        let diff = class_diff(struct_type("A", &[("x", 0)]), struct_type("A", &[("x", 0)]));
        assert!(set.suppresses_diff(&diff, None));
    });
    assert_eq!(messages.last().map(String::as_str), Some("suppressed"));
}

/// Generated suppressions are reported once built.
#[test]
fn generated_suppressions_are_traced() {
    let config = ini::Config::parse("[abi_whitelist]\n  sym\n").unwrap();
    let messages = record(|| {
        assert_eq!(kernel_abi_whitelist_suppressions([&config]).len(), 2);
    });
    assert_eq!(messages, ["suppression_generated"]);
}
