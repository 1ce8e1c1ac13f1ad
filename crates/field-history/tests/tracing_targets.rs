mod common;

use common::Session;
use std::sync::{Arc, Mutex};
use tracing::dispatcher::{Dispatch, with_default};
use tracing::subscriber::Interest;
use tracing::{Metadata, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

#[derive(Clone, Default)]
struct TargetCapture {
    events: Arc<Mutex<Vec<(String, tracing::Level)>>>,
}

impl TargetCapture {
    fn events(&self) -> Arc<Mutex<Vec<(String, tracing::Level)>>> {
        self.events.clone()
    }
}

impl<S> Layer<S> for TargetCapture
where
    S: Subscriber,
{
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::always()
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push((
            event.metadata().target().to_string(),
            *event.metadata().level(),
        ));
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<(String, tracing::Level)> {
    let capture = TargetCapture::default();
    let events = capture.events();
    let subscriber = Registry::default().with(capture.with_filter(LevelFilter::TRACE));
    let dispatch = Dispatch::new(subscriber);
    with_default(&dispatch, f);
    let recorded = events.lock().unwrap().clone();
    recorded
}

#[test]
fn capture_and_replay_emit_history_and_normalizer_targets() {
    let recorded = capture(|| {
        let mut session = Session::new("abc");
        session.caret(3);
        session.type_text("d");
        session.undo();
        session.redo();
    });

    assert!(
        recorded
            .iter()
            .any(|(target, _)| target == "field_history::normalizer")
    );
    assert!(
        recorded
            .iter()
            .any(|(target, _)| target == "field_history::history")
    );
}

#[test]
fn discarded_noop_logs_at_debug() {
    let recorded = capture(|| {
        let mut session = Session::new("abc");
        session.caret(1);
        session.cut();
    });

    assert!(recorded.iter().any(|(target, level)| {
        target == "field_history::normalizer" && *level == tracing::Level::DEBUG
    }));
    assert!(
        !recorded
            .iter()
            .any(|(target, _)| target == "field_history::history")
    );
}
