pub mod glyphs;
pub mod kernel;
pub mod outputs;

pub use kernel::bullet::{BulletCycler, GlyphCatalog};
pub use kernel::config::{Icons, PlaybackConfig, RecorderConfig};
pub use kernel::entry::{Entry, EntryKind, EntryState, OperationId};
pub use kernel::error::RecorderError;
pub use kernel::observe::{Observe, Tracked};
pub use kernel::playback::Playback;
pub use kernel::recorder::{describe_failure, Recorder, NOT_A_FUTURE};
pub use kernel::time::format_duration;
pub use outputs::table::{BufferedTables, StdoutTable, TableSink};
pub use outputs::text::{BufferedLines, LineSink, StdoutLines};
