use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::subscriber::Interest;
use tracing::{Event, Level, Metadata, Subscriber};

///
/// A [`Subscriber`] that keeps all events up to a given verbosity in memory, formatted
/// as `message(field=value, ...)`. Spans are accepted but not recorded.
///
/// Meant for checking what an algorithm logs, by installing it with
/// [`tracing::subscriber::with_default()`] and then inspecting [`EventRecorder::events()`].
///
/// # Example
/// ```
/// # use feanor_series::logging::*;
/// let recorder = EventRecorder::new(tracing::Level::DEBUG);
/// let events = recorder.events();
/// tracing::subscriber::with_default(recorder, || {
///     tracing::debug!(answer = 42, "computed");
///     tracing::trace!("not recorded");
/// });
/// assert_eq!(vec!["computed(answer=42)".to_owned()], events.get());
/// ```
///
pub struct EventRecorder {
    next_span_id: AtomicU64,
    max_level: Level,
    events: RecordedEvents
}

///
/// Shared view of the events recorded by an [`EventRecorder`], which stays valid after
/// the recorder itself was moved into a dispatcher.
///
#[derive(Clone, Default)]
pub struct RecordedEvents {
    events: Arc<Mutex<Vec<String>>>
}

impl RecordedEvents {

    pub fn get(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.events.lock().unwrap().iter().any(|event| event.starts_with(prefix))
    }
}

impl EventRecorder {

    pub fn new(max_level: Level) -> Self {
        Self {
            next_span_id: AtomicU64::new(1),
            max_level: max_level,
            events: RecordedEvents::default()
        }
    }

    pub fn events(&self) -> RecordedEvents {
        self.events.clone()
    }
}

struct FieldRecorder {
    message: Option<String>,
    fields: Option<String>
}

impl FieldRecorder {

    fn new() -> Self {
        Self { message: None, fields: None }
    }

    fn push_field(&mut self, name: &str, value: std::fmt::Arguments) {
        if let Some(fields) = &mut self.fields {
            _ = write!(fields, ", {}={}", name, value);
        } else {
            self.fields = Some(format!("{}={}", name, value));
        }
    }

    fn finish(self) -> String {
        match (self.message, self.fields) {
            (Some(message), Some(fields)) => format!("{}({})", message, fields),
            (Some(message), None) => message,
            (None, Some(fields)) => format!("({})", fields),
            (None, None) => String::new()
        }
    }
}

impl Visit for FieldRecorder {

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}

impl Subscriber for EventRecorder {

    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(self.next_span_id.fetch_add(1, Ordering::Relaxed))
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut recorder = FieldRecorder::new();
        event.record(&mut recorder);
        self.events.events.lock().unwrap().push(recorder.finish());
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

#[test]
fn test_records_fields_and_filters_levels() {
    let recorder = EventRecorder::new(Level::DEBUG);
    let events = recorder.events();
    tracing::subscriber::with_default(recorder, || {
        tracing::info!(name = "Z/7", count = 2, "created");
        tracing::trace!("ignored");
        tracing::debug!("plain");
    });
    assert_eq!(vec!["created(name=Z/7, count=2)".to_owned(), "plain".to_owned()], events.get());
    assert!(events.contains("plain"));
    assert!(!events.contains("ignored"));
}
