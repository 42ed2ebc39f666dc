use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::config::{PlaybackConfig, RecorderConfig};
use super::entry::{Entry, EntryKind, OperationId};
use super::observe::{Observe, Tracked};
use super::playback::Playback;
use super::time::{format_duration, Clock};
use crate::outputs::table::{StdoutTable, TableSink};
use crate::outputs::text::{LineSink, StdoutLines};

/// Error text stored on entries created from plain values.
pub const NOT_A_FUTURE: &str = "Not a promise";

/// Settlement callback: receives the outcome by reference and returns table data.
///
/// An `Err` from the callback is logged through `tracing` and discarded. It
/// never reaches the caller of `track`, and no `data` is stored for the entry.
pub type Callback<T, E> = Box<dyn FnOnce(Result<&T, &E>) -> anyhow::Result<Value> + Send>;

/// Append-only timeline of tracked operations.
///
/// Cheap to clone; clones share the same log and origin.
#[derive(Debug, Clone)]
pub struct Recorder {
    inner: Arc<RecorderInner>,
}

#[derive(Debug)]
struct RecorderInner {
    clock: Clock,
    origin_ms: u64,
    config: RecorderConfig,
    log: Mutex<Vec<Entry>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::with_config(RecorderConfig::default())
    }

    pub fn with_config(config: RecorderConfig) -> Self {
        let clock = Clock::new();
        let origin_ms = clock.now_ms();
        Self {
            inner: Arc::new(RecorderInner {
                clock,
                origin_ms,
                config,
                log: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn origin_ms(&self) -> u64 {
        self.inner.origin_ms
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    fn log(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.inner.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append(&self, entry: Entry) {
        debug!(
            operation = %entry.id,
            label = %entry.label,
            kind = ?entry.kind,
            terminal = entry.is_terminal(),
            "timeline append"
        );
        self.log().push(entry);
    }

    /// Free-standing annotation. The entry stays pending forever.
    pub fn mark(&self, label: impl Into<String>) {
        let entry = Entry::pending(
            OperationId::new(),
            label.into(),
            self.now_ms(),
            self.inner.config.label_glyph.clone(),
            EntryKind::Label,
        );
        self.append(entry);
    }

    /// Records a plain value handed over where a future was expected and
    /// returns it untouched.
    pub fn track_plain<V>(&self, label: impl Into<String>, value: V) -> V {
        self.record_plain(label.into(), &value, None::<fn(&V) -> anyhow::Result<Value>>);
        value
    }

    pub fn track_plain_with<V, C>(&self, label: impl Into<String>, value: V, callback: C) -> V
    where
        C: FnOnce(&V) -> anyhow::Result<Value>,
    {
        self.record_plain(label.into(), &value, Some(callback));
        value
    }

    fn record_plain<V, C>(&self, label: String, value: &V, callback: Option<C>)
    where
        C: FnOnce(&V) -> anyhow::Result<Value>,
    {
        let now = self.now_ms();
        let pending = Entry::pending(
            OperationId::new(),
            label,
            now,
            self.inner.config.misuse_glyph.clone(),
            EntryKind::SyncMisuse,
        );
        let data = callback.and_then(|cb| self.accept_callback(&pending, cb(value)));
        let entry = pending.settle(now, true, Some(NOT_A_FUTURE.to_string()), data);
        self.append(entry);
    }

    /// Tracks a future on its own tokio task.
    ///
    /// The pending snapshot is appended before this returns. The task drives
    /// `future` and appends the terminal snapshot the moment it settles, so
    /// timing and log order do not depend on when (or whether) the returned
    /// handle is awaited. Must be called inside a tokio runtime; the operation
    /// and its outcome therefore need to be `Send + 'static`.
    pub fn track<F, T, E>(&self, label: impl Into<String>, future: F) -> Tracked<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        self.track_inner(label.into(), future, None)
    }

    pub fn track_with<F, T, E, C>(&self, label: impl Into<String>, future: F, callback: C) -> Tracked<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
        C: FnOnce(Result<&T, &E>) -> anyhow::Result<Value> + Send + 'static,
    {
        self.track_inner(label.into(), future, Some(Box::new(callback)))
    }

    fn track_inner<F, T, E>(&self, label: String, future: F, callback: Option<Callback<T, E>>) -> Tracked<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        let glyph = self.inner.config.cycler.next();
        let pending = Entry::pending(OperationId::new(), label, self.now_ms(), glyph, EntryKind::Async);
        self.append(pending.clone());

        let recorder = self.clone();
        Tracked::spawn(Observe::new(future, move |outcome: &Result<T, E>| {
            recorder.settle(&pending, outcome, callback);
        }))
    }

    fn settle<T, E: Display>(&self, pending: &Entry, outcome: &Result<T, E>, callback: Option<Callback<T, E>>) {
        let end_ms = self.now_ms();
        let (success, error) = match outcome {
            Ok(_) => (true, None),
            Err(e) => (false, Some(describe_failure(e))),
        };
        let data = callback.and_then(|cb| self.accept_callback(pending, cb(outcome.as_ref())));
        self.append(pending.settle(end_ms, success, error, data));
    }

    fn accept_callback(&self, entry: &Entry, result: anyhow::Result<Value>) -> Option<Value> {
        match result {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(
                    operation = %entry.id,
                    label = %entry.label,
                    "timeline callback failed, data discarded: {e:#}"
                );
                None
            }
        }
    }

    /// Tracked timer labelled `Sleeping HH:MM:SS.mmm`.
    ///
    /// Must be called inside a tokio runtime. The timer starts at call time.
    pub fn sleep(&self, ms: u64) -> impl Future<Output = ()> + Send + 'static {
        self.sleep_labeled(ms, sleep_label(ms))
    }

    pub fn sleep_labeled(&self, ms: u64, label: impl Into<String>) -> impl Future<Output = ()> + Send + 'static {
        let tracked = self.track(label, timer(ms));
        async move {
            let _ = tracked.await;
        }
    }

    pub fn sleep_with<C>(&self, ms: u64, label: Option<String>, callback: C) -> impl Future<Output = ()> + Send + 'static
    where
        C: FnOnce(Result<&(), &Infallible>) -> anyhow::Result<Value> + Send + 'static,
    {
        let label = label.unwrap_or_else(|| sleep_label(ms));
        let tracked = self.track_with(label, timer(ms), callback);
        async move {
            let _ = tracked.await;
        }
    }

    /// Empties the log. In-flight operations still append when they settle.
    pub fn flush(&self) {
        let mut log = self.log();
        debug!(dropped = log.len(), "timeline flush");
        log.clear();
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.log().clone()
    }

    pub fn len(&self) -> usize {
        self.log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log().is_empty()
    }

    /// Terminal async entries whose pending snapshot is no longer in the log.
    pub fn unmatched_terminals(&self) -> Vec<Entry> {
        let log = self.log();
        log.iter()
            .filter(|e| e.kind == EntryKind::Async && e.is_terminal())
            .filter(|e| !log.iter().any(|p| p.id == e.id && p.is_pending()))
            .cloned()
            .collect()
    }

    pub fn playback(&self, config: PlaybackConfig) -> Playback<'_> {
        Playback::new(self, config)
    }

    /// Renders the timeline to stdout.
    pub fn play(&self) {
        self.play_to(&mut StdoutLines, &mut StdoutTable);
    }

    pub fn play_to(&self, lines: &mut dyn LineSink, tables: &mut dyn TableSink) {
        Playback::new(self, PlaybackConfig::default()).play(lines, tables);
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

fn sleep_label(ms: u64) -> String {
    format!("Sleeping {}", format_duration(ms))
}

fn timer(ms: u64) -> impl Future<Output = Result<(), Infallible>> + Send + 'static {
    let sleep = tokio::time::sleep(Duration::from_millis(ms));
    async move {
        sleep.await;
        Ok(())
    }
}

/// `"<name>: <message>"` for a failure, skipping empty parts.
///
/// The name is the short type name of the error. String-like failures carry
/// no type information of their own and are named `Error`.
pub fn describe_failure<E: Display + ?Sized>(error: &E) -> String {
    let name = failure_name::<E>();
    let message = error.to_string();
    [name.as_str(), message.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(": ")
}

fn failure_name<E: ?Sized>() -> String {
    let full = std::any::type_name::<E>();
    let path = full.split('<').next().unwrap_or(full);
    let short = path.rsplit("::").next().unwrap_or(path).trim_start_matches('&');
    match short {
        "str" | "String" | "Cow" | "Box" | "Arc" | "Rc" => "Error".to_string(),
        other => other.to_string(),
    }
}
