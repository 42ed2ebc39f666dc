//! Timeline recording engine.
//!
//! A [`Recorder`](recorder::Recorder) owns an append-only log. Each tracked
//! future contributes two entries (a pending snapshot at call time and a
//! terminal snapshot at settlement) sharing one [`OperationId`](entry::OperationId).
//! Log order is append order, so terminal entries follow settlement order,
//! not call order. [`Playback`](playback::Playback) only reads the log.

pub mod bullet;
pub mod config;
pub mod entry;
pub mod error;
pub mod observe;
pub mod playback;
pub mod recorder;
pub mod time;
