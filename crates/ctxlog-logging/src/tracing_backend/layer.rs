//! `tracing-subscriber` layer that renders entry events to a sink.
//!
//! The entry itself never travels through event fields. [`dispatch_entry`]
//! parks it in a thread-local slot, fires one marker event on the logger's
//! private dispatch, and the layer takes it back out in `on_event`. The
//! marker is always emitted at `ERROR` so that `tracing`'s compile-time
//! level ceiling cannot strip it; the entry's own level is what gets
//! rendered.

use super::encoder::{Entry, EntryEncoder};
use crate::output::LogOutput;
use std::cell::RefCell;
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Target of the marker events carrying a pending entry
pub(crate) const ENTRY_TARGET: &str = "ctxlog::entry";

thread_local! {
    static PENDING: RefCell<Option<Entry>> = const { RefCell::new(None) };
}

/// Hand `entry` to the layers of `dispatch`
pub(crate) fn dispatch_entry(dispatch: &Dispatch, entry: Entry) {
    PENDING.with(|slot| *slot.borrow_mut() = Some(entry));
    tracing::dispatcher::with_default(dispatch, || {
        tracing::event!(target: ENTRY_TARGET, tracing::Level::ERROR, "entry");
    });
    // Dropped here if no layer claimed it
    PENDING.with(|slot| slot.borrow_mut().take());
}

/// Layer writing every pending entry, rendered, to one output
pub struct EntryLayer {
    encoder: EntryEncoder,
    output: LogOutput,
}

impl EntryLayer {
    pub fn new(encoder: EntryEncoder, output: LogOutput) -> Self {
        Self { encoder, output }
    }
}

impl<S> Layer<S> for EntryLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != ENTRY_TARGET {
            return;
        }
        let Some(entry) = PENDING.with(|slot| slot.borrow_mut().take()) else {
            return;
        };

        self.output
            .write_record(self.encoder.encode(&entry).as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::Formatter;
    use crate::level::LogLevel;
    use crate::logger::Fields;
    use crate::output::SharedBuffer;
    use chrono::Local;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    /// Remembers the `tracing` level of every event it sees
    #[derive(Clone, Default)]
    struct LevelRecorder {
        seen: Arc<Mutex<Vec<tracing::Level>>>,
    }

    impl<S: Subscriber> Layer<S> for LevelRecorder {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            self.seen.lock().unwrap().push(*event.metadata().level());
        }
    }

    fn entry(level: LogLevel, message: &str) -> Entry {
        Entry {
            time: Local::now(),
            level,
            message: message.to_string(),
            fields: Arc::new(Fields::new()),
            caller: None,
        }
    }

    fn dispatch(buffer: &SharedBuffer, recorder: &LevelRecorder) -> Dispatch {
        let encoder = EntryEncoder::from_formatter(&Formatter::default()).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(EntryLayer::new(encoder, buffer.output()))
            .with(recorder.clone());
        Dispatch::new(subscriber)
    }

    #[test]
    fn test_every_entry_is_carried_at_error_level() {
        let buffer = SharedBuffer::new();
        let recorder = LevelRecorder::default();
        let dispatch = dispatch(&buffer, &recorder);

        for level in [LogLevel::Debug, LogLevel::Info, LogLevel::Warn] {
            dispatch_entry(&dispatch, entry(level, "low"));
        }

        assert_eq!(*recorder.seen.lock().unwrap(), vec![tracing::Level::ERROR; 3]);
        let contents = buffer.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("level=debug"));
        assert!(lines[1].contains("level=info"));
        assert!(lines[2].contains("level=warn"));
    }

    #[test]
    fn test_foreign_events_are_ignored() {
        let buffer = SharedBuffer::new();
        let recorder = LevelRecorder::default();
        let dispatch = dispatch(&buffer, &recorder);

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::error!("not an entry");
        });

        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_unclaimed_entry_does_not_leak_into_next_event() {
        let buffer = SharedBuffer::new();
        let recorder = LevelRecorder::default();
        let bare = Dispatch::new(tracing_subscriber::registry().with(recorder.clone()));
        dispatch_entry(&bare, entry(LogLevel::Info, "unclaimed"));

        let dispatch = dispatch(&buffer, &recorder);
        tracing::dispatcher::with_default(&dispatch, || {
            tracing::event!(target: ENTRY_TARGET, tracing::Level::ERROR, "entry");
        });

        assert!(buffer.is_empty());
    }
}
