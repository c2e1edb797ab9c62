//! The append-only, tab-separated log: the single source of truth that
//! survives a crashed session.
//!
//! One record per line, six tab-separated UTF-8 columns (see [`Record`]).
//! Every append is flushed before control returns to the caller, so a crash
//! loses at most the in-flight keystroke, never prior progress.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::record::Record;

/// Streams records to a writer, one flushed line at a time.
pub struct LogWriter<W: Write> {
    w: W,

    /// Whether the writer has been closed. Once closed, no further appends
    /// are allowed.
    closed: bool,
}

impl LogWriter<File> {
    /// Create (truncating) a log file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> LogWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w, closed: false }
    }

    /// Append one record as a single newline-terminated line and flush it.
    ///
    /// The flush is what makes the log crash-safe; appends are never allowed
    /// to sit in a userspace buffer between operator actions.
    pub fn append(&mut self, record: &Record) -> Result<()> {
        if self.closed {
            return Err(Error::msg("cannot append record: log is already closed"));
        }

        writeln!(&mut self.w, "{}", record.to_line())?;
        self.w.flush()?;
        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

/// Read a whole log back, in order, without failing on bad lines.
///
/// Each element is either a parsed [`Record`] or the
/// [`Error::MalformedLogRecord`] for that line, so callers can skip and
/// report bad records while keeping the rest. A final line with no trailing
/// newline parses the same as a terminated one; fully empty lines are
/// ignored.
pub fn read_all(path: &Path) -> Result<Vec<Result<Record>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        records.push(Record::parse_line(&line, idx + 1));
    }

    Ok(records)
}
