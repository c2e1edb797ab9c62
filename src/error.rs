use std::error::Error as StdError;

use thiserror::Error;

/// Lumberjack's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Lumberjack's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// The input path could not be opened by either the archive reader or the XML parser.
    ///
    /// Fatal: raised before any session starts, so there is no partial log to preserve.
    #[error("cannot read input '{path}': {reason}")]
    UnreadableInput { path: String, reason: String },

    /// The container or package XML is missing a required element or attribute.
    #[error("malformed package: {0}")]
    MalformedPackage(String),

    /// An advance was requested with no remaining unannotated unit.
    ///
    /// The session ends gracefully on this; the log written so far stays valid.
    #[error("no more units to annotate (all {total} consumed)")]
    NoMoreUnits { total: usize },

    /// A log line had fewer than the expected number of tab-separated columns.
    ///
    /// Generators skip the record, report it, and keep going.
    #[error("malformed log record on line {line}: {content:?}")]
    MalformedLogRecord { line: usize, content: String },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Other(Box::new(err))
    }
}
