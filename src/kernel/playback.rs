use serde_json::Value;

use super::config::{Icons, PlaybackConfig};
use super::entry::{Entry, EntryKind, EntryState};
use super::recorder::Recorder;
use super::time::format_duration;
use crate::outputs::table::TableSink;
use crate::outputs::text::LineSink;

/// Read-only renderer over a recorder's log.
pub struct Playback<'a> {
    recorder: &'a Recorder,
    config: PlaybackConfig,
}

impl<'a> Playback<'a> {
    pub fn new(recorder: &'a Recorder, config: PlaybackConfig) -> Self {
        Self { recorder, config }
    }

    /// Walks the log in append order. Entry data goes to `tables` right after its line.
    pub fn play(&self, lines: &mut dyn LineSink, tables: &mut dyn TableSink) {
        let origin = self.recorder.origin_ms();
        for entry in self.recorder.entries() {
            lines.write_line(&render_entry(&entry, origin, &self.config.icons));
            match &entry.data {
                Some(Value::Null) | None => {}
                Some(data) => tables.write_table(data),
            }
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let origin = self.recorder.origin_ms();
        self.recorder
            .entries()
            .iter()
            .map(|entry| render_entry(entry, origin, &self.config.icons))
            .collect()
    }
}

/// One timeline line for `entry`, with times relative to `origin_ms`.
pub fn render_entry(entry: &Entry, origin_ms: u64, icons: &Icons) -> String {
    match &entry.state {
        EntryState::Pending => {
            let icon = match entry.kind {
                EntryKind::Label => &icons.marker,
                _ => &icons.in_flight,
            };
            format!(
                "{} {} {} {} {} {}",
                icon,
                format_duration(entry.start_ms.saturating_sub(origin_ms)),
                icons.pending_clock,
                icons.unknown_duration,
                entry.glyph,
                entry.label
            )
        }
        EntryState::Terminal { end_ms, success, error } => {
            let icon = if entry.kind == EntryKind::SyncMisuse {
                &icons.misuse
            } else if *success {
                &icons.success
            } else {
                &icons.failure
            };
            let mut line = format!(
                "{} {} {} {} {} {}",
                icon,
                format_duration(end_ms.saturating_sub(origin_ms)),
                icons.elapsed_clock,
                format_duration(end_ms.saturating_sub(entry.start_ms)),
                entry.glyph,
                entry.label
            );
            if let Some(error) = error {
                line.push_str(&format!(" [{}]", error));
            }
            line
        }
    }
}
