use std::path::PathBuf;

/// The destination for a converted log.
///
/// Why this exists:
/// - We want a single, strongly-typed representation of the two output
///   formats across the CLI and library code.
/// - Using an enum keeps format selection explicit and makes "exactly one
///   output" a type-level fact instead of two optional flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write one SMIL synchronization document per source file into this
    /// directory.
    SmilDirectory(PathBuf),

    /// Write a single TEI timeline document at this path.
    TimelineFile(PathBuf),
}
