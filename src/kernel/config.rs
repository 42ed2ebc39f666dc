use serde::{Deserialize, Serialize};

use super::bullet::BulletCycler;
use super::error::RecorderError;

pub const LABEL_GLYPH: &str = "👉";
pub const MISUSE_GLYPH: &str = "⚠️ ";

#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Reserved glyph for label entries. Never drawn from the cycler.
    pub label_glyph: String,
    /// Reserved glyph for plain-value (misuse) entries.
    pub misuse_glyph: String,
    pub cycler: BulletCycler,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            label_glyph: LABEL_GLYPH.to_string(),
            misuse_glyph: MISUSE_GLYPH.to_string(),
            cycler: BulletCycler::global(),
        }
    }
}

/// Status icons used when rendering a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Icons {
    pub marker: String,
    pub in_flight: String,
    pub misuse: String,
    pub success: String,
    pub failure: String,
    pub pending_clock: String,
    pub elapsed_clock: String,
    pub unknown_duration: String,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            marker: "📝".to_string(),
            in_flight: "✔️ ".to_string(),
            misuse: "☑️ ".to_string(),
            success: "✅".to_string(),
            failure: "❌".to_string(),
            pending_clock: "⏳".to_string(),
            elapsed_clock: "⏱️".to_string(),
            unknown_duration: "??:??:??.???".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub icons: Icons,
}

impl PlaybackConfig {
    /// Parses a JSON override; missing fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, RecorderError> {
        serde_json::from_str(raw).map_err(|e| RecorderError::ConfigParse(e.to_string()))
    }
}
