use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The reasons a ledger line can fail to decode into a `Transaction`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The line did not split into exactly four `|` delimited fields.
    #[error("expected 4 fields separated by '|' but found {found}")]
    FieldCount { found: usize },

    /// The first field is not a `yyyy-MM-dd HH:mm:ss` timestamp.
    #[error("invalid timestamp '{value}', expected yyyy-MM-dd HH:mm:ss")]
    Timestamp { value: String },

    /// The fourth field is not a decimal number.
    #[error("invalid amount '{value}'")]
    Amount { value: String },
}

/// What was being attempted when an `IoError` occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    Read,
    Write,
}

impl Display for IoAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IoAction::Read => f.write_str("read"),
            IoAction::Write => f.write_str("write"),
        }
    }
}

/// The ledger file could not be opened, read or written. Carries the path so that callers can
/// report which file was involved.
#[derive(Debug, thiserror::Error)]
#[error("Unable to {action} ledger file {}", .path.display())]
pub struct IoError {
    action: IoAction,
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

impl IoError {
    pub(crate) fn new(action: IoAction, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn action(&self) -> IoAction {
        self.action
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> std::io::ErrorKind {
        self.source.kind()
    }
}
