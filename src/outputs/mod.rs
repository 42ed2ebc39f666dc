//! Output sinks for timeline playback.

pub mod table;
pub mod text;
