use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("glyph catalog is empty")]
    EmptyCatalog,
    #[error("glyph catalog contains {0:?} more than once")]
    DuplicateGlyph(String),
    #[error("playback config parse error: {0}")]
    ConfigParse(String),
}
