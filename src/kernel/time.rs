use std::time::{SystemTime, UNIX_EPOCH};
use tokio::time::Instant;

/// Renders a millisecond duration as `HH:MM:SS.mmm`.
///
/// Hours are not wrapped at 24 and grow past two digits when needed.
pub fn format_duration(ms: u64) -> String {
    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}

/// Wall-clock milliseconds since the unix epoch.
pub fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Epoch-millisecond clock anchored once, then advanced by the tokio monotonic clock.
///
/// Tying elapsed time to `tokio::time::Instant` keeps timelines monotonic and
/// lets paused-time tests produce exact durations.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch_anchor: u64,
    instant_anchor: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            epoch_anchor: epoch_ms(),
            instant_anchor: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        let elapsed = Instant::now().saturating_duration_since(self.instant_anchor);
        self.epoch_anchor + elapsed.as_millis() as u64
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
