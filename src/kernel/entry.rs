use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Correlates the pending and terminal snapshots of one tracked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationId(Uuid);

impl OperationId {
    pub fn new() -> Self {
        OperationId(Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Free-standing annotation. Never terminal.
    Label,
    /// A plain value passed where a future was expected.
    SyncMisuse,
    /// Snapshot of a tracked future.
    Async,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryState {
    Pending,
    Terminal {
        end_ms: u64,
        success: bool,
        error: Option<String>,
    },
}

/// One observed state of a tracked operation, or a label marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: OperationId,
    pub label: String,
    pub start_ms: u64,
    pub glyph: String,
    pub kind: EntryKind,
    pub state: EntryState,
    pub data: Option<Value>,
}

impl Entry {
    pub(crate) fn pending(id: OperationId, label: String, start_ms: u64, glyph: String, kind: EntryKind) -> Self {
        Self {
            id,
            label,
            start_ms,
            glyph,
            kind,
            state: EntryState::Pending,
            data: None,
        }
    }

    /// Terminal copy of this snapshot, sharing id, label, start and glyph.
    pub(crate) fn settle(&self, end_ms: u64, success: bool, error: Option<String>, data: Option<Value>) -> Self {
        Self {
            state: EntryState::Terminal { end_ms, success, error },
            data,
            ..self.clone()
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, EntryState::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    pub fn end_ms(&self) -> Option<u64> {
        match self.state {
            EntryState::Terminal { end_ms, .. } => Some(end_ms),
            EntryState::Pending => None,
        }
    }

    pub fn success(&self) -> Option<bool> {
        match self.state {
            EntryState::Terminal { success, .. } => Some(success),
            EntryState::Pending => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            EntryState::Terminal { error, .. } => error.as_deref(),
            EntryState::Pending => None,
        }
    }

    /// `end - start` for terminal entries.
    pub fn duration_ms(&self) -> Option<u64> {
        self.end_ms().map(|end| end.saturating_sub(self.start_ms))
    }
}
