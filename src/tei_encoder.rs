//! TEI timeline document generation.
//!
//! Converts a completed log into a single `<timeline>` document: one `<when>`
//! timepoint per normal record across the whole log, in log order, numbered
//! over the filtered (non-warning) sequence. Warning and malformed records
//! are reported and skipped, never fatal.

use std::fmt::Write as _;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::log_store::read_all;
use crate::record::Record;
use crate::xml_text::escape_attr;

/// Read the log at `log_path` and write the timeline document to `out_path`.
///
/// Exactly one file is produced regardless of how many distinct source files
/// the log references. The timeline's `corresp` attribute carries the base
/// name of `audio_path`.
pub fn generate(log_path: &Path, out_path: &Path, audio_path: &Path) -> Result<()> {
    let records = read_all(log_path)?;

    let audio = audio_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| audio_path.display().to_string());

    std::fs::write(out_path, render(&records, &audio))?;
    info!(path = %out_path.display(), "wrote timeline document");
    Ok(())
}

/// Render the full timeline document.
///
/// An empty (or warning-only) log still yields a well-formed document with an
/// empty timeline body.
pub fn render(records: &[Result<Record>], audio_file_name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<TEI>");
    let _ = writeln!(
        out,
        r#"  <timeline xml:id="timeline" unit="s" corresp="{}">"#,
        escape_attr(audio_file_name)
    );

    let mut index = 0usize;
    for outcome in records {
        let record = match outcome {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "skipping malformed log record");
                continue;
            }
        };

        match record {
            Record::Warning { seconds } => {
                warn!(seconds = *seconds, "skipping warning record");
            }
            Record::Normal {
                start_seconds,
                end_seconds,
                unit_id,
                ..
            } => {
                let _ = writeln!(
                    out,
                    r##"    <when xml:id="audio-{index}" corresp="#{}" from="{start_seconds}" to="{end_seconds}"/>"##,
                    escape_attr(unit_id),
                );
                index += 1;
            }
        }
    }

    let _ = writeln!(out, "  </timeline>");
    let _ = writeln!(out, "</TEI>");
    out
}
