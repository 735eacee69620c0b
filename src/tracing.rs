use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write;
use std::io::stdout;
use std::num::NonZeroU64;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use thread_local::ThreadLocal;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_core::Interest;
use tracing_core::span::Current;

struct SpanData {
    parent: Option<Id>,
    /// number of live handles, the span is forgotten once this reaches zero
    handles: AtomicUsize,
    /// name of the span together with its recorded fields
    label: String,
    metadata: &'static Metadata<'static>,
    /// depth in the tree of nested spans, root spans have depth 0
    depth: usize
}

///
/// A [`tracing::Subscriber`] that prints the progress of nested algorithms
/// as a single line per root span.
///
/// Entering a span prints its name and fields, events print their message,
/// and leaving a span prints the time spent in it. Spans that are nested
/// deeper than `max_depth` are not printed, so that the output of e.g.
/// a polredabs enumeration is not drowned by the messages of every single
/// characteristic polynomial computation.
///
pub struct LogAlgorithmSubscriber {
    next_id: AtomicU64,
    spans: Mutex<HashMap<Id, SpanData>>,
    entered: ThreadLocal<RefCell<Vec<(Id, Instant)>>>,
    levels: RangeInclusive<Level>,
    max_depth: usize
}

impl LogAlgorithmSubscriber {

    fn new(levels: RangeInclusive<Level>, max_depth: usize) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            spans: Mutex::new(HashMap::new()),
            entered: ThreadLocal::new(),
            levels: levels,
            max_depth: max_depth
        }
    }

    ///
    /// Installs the subscriber as global default.
    ///
    /// Panics if a global default subscriber has already been set.
    ///
    pub fn init(levels: RangeInclusive<Level>, max_depth: usize) {
        tracing::subscriber::set_global_default(Self::new(levels, max_depth)).unwrap()
    }

    ///
    /// Installs the subscriber as global default, if no other default subscriber
    /// has been set yet. Designed to be called at the start of every test.
    ///
    pub fn init_test() {
        _ = tracing::subscriber::set_global_default(Self::new(Level::INFO..=Level::INFO, 2))
    }

    fn spans<'a>(&'a self) -> MutexGuard<'a, HashMap<Id, SpanData>> {
        // a panic while printing does not leave the map in an inconsistent state
        self.spans.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn entered_stack(&self) -> &RefCell<Vec<(Id, Instant)>> {
        self.entered.get_or(|| RefCell::new(Vec::new()))
    }

    fn current_id(&self) -> Option<Id> {
        self.entered_stack().borrow().last().map(|(id, _)| id.clone())
    }

    fn print(&self, text: &str) {
        print!("{}", text);
        _ = std::io::Write::flush(&mut stdout());
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: String
}

impl FieldCollector {

    fn finish(self, name: Option<&str>) -> String {
        let mut result = name.map(str::to_owned).or(self.message).unwrap_or_default();
        if self.fields.is_empty() {
            result.push('.');
        } else {
            _ = write!(&mut result, "({})", self.fields);
        }
        return result;
    }
}

impl Visit for FieldCollector {

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            if !self.fields.is_empty() {
                self.fields.push_str(", ");
            }
            _ = write!(&mut self.fields, "{}={:?}", field.name(), value);
        }
    }
}

impl Subscriber for LogAlgorithmSubscriber {

    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.levels.contains(metadata.level()) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.levels.contains(metadata.level())
    }

    fn current_span(&self) -> Current {
        match self.current_id() {
            Some(id) => match self.spans().get(&id) {
                Some(data) => Current::new(id.clone(), data.metadata),
                None => Current::none()
            },
            None => Current::none()
        }
    }

    fn new_span(&self, span: &Attributes<'_>) -> Id {
        let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
        let id = Id::from_non_zero_u64(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN));
        let parent = span.parent().cloned().or_else(|| if span.is_contextual() { self.current_id() } else { None });
        let mut fields = FieldCollector::default();
        span.record(&mut fields);
        let mut spans = self.spans();
        let depth = parent.as_ref().and_then(|p| spans.get(p)).map(|p| p.depth + 1).unwrap_or(0);
        spans.insert(id.clone(), SpanData {
            parent: parent,
            handles: AtomicUsize::new(1),
            label: fields.finish(Some(span.metadata().name())),
            metadata: span.metadata(),
            depth: depth
        });
        return id;
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {
        // fields are only printed once, when entering the span
    }

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let depth = self.current_id().and_then(|id| self.spans().get(&id).map(|s| s.depth));
        if depth.map(|d| d < self.max_depth).unwrap_or(true) {
            let mut fields = FieldCollector::default();
            event.record(&mut fields);
            self.print(&fields.finish(None));
        }
    }

    fn enter(&self, span: &Id) {
        let (depth, label) = match self.spans().get(span) {
            Some(data) => (data.depth, data.label.clone()),
            None => return
        };
        self.entered_stack().borrow_mut().push((span.clone(), Instant::now()));
        if depth < self.max_depth {
            self.print(&label);
        } else if depth == self.max_depth {
            self.print(&format!("{}...", label));
        }
    }

    fn exit(&self, span: &Id) {
        let started = {
            let mut stack = self.entered_stack().borrow_mut();
            match stack.iter().rposition(|(id, _)| id == span) {
                Some(index) => stack.remove(index).1,
                None => return
            }
        };
        let depth = match self.spans().get(span) {
            Some(data) => data.depth,
            None => return
        };
        if depth <= self.max_depth {
            self.print(&format!("done({}us)", started.elapsed().as_micros()));
            if depth == 0 {
                self.print("\n");
            }
        }
    }

    fn clone_span(&self, id: &Id) -> Id {
        if let Some(data) = self.spans().get(id) {
            data.handles.fetch_add(1, Ordering::Relaxed);
        }
        return id.clone();
    }

    fn try_close(&self, id: Id) -> bool {
        let mut spans = self.spans();
        let remaining = match spans.get(&id) {
            Some(data) => data.handles.fetch_sub(1, Ordering::Relaxed) - 1,
            None => return false
        };
        if remaining == 0 {
            spans.remove(&id);
            return true;
        }
        return false;
    }
}

#[cfg(test)]
use tracing::{event, span};

#[test]
fn test_nested_spans_are_tracked() {
    let subscriber = LogAlgorithmSubscriber::new(Level::INFO..=Level::INFO, 1);
    tracing::subscriber::with_default(subscriber, || {
        span!(Level::INFO, "outer", n = 3).in_scope(|| {
            span!(Level::INFO, "inner").in_scope(|| {
                event!(Level::INFO, "hidden");
            });
            event!(Level::INFO, "visible");
        });
    });
}

#[test]
fn test_field_collector_format() {
    let mut collector = FieldCollector::default();
    collector.fields = "p=5, e=4".to_owned();
    assert_eq!("ramification(p=5, e=4)", collector.finish(Some("ramification")));
    assert_eq!(".", FieldCollector::default().finish(None));
}
