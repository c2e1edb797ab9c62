//! EPUB3 Media-Overlay (SMIL) document generation.
//!
//! Converts a completed log into one SMIL document per distinct source file,
//! with one `<par>` clip per normal record belonging to that file. Clip order
//! and numbering follow log order, never timestamps; warning and malformed
//! records are reported and skipped, never fatal.

use std::fmt::Write as _;
use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::log_store::read_all;
use crate::record::Record;
use crate::xml_text::escape_attr;

const SMIL_HEADER: &str = concat!(
    r#"<smil xmlns="http://www.w3.org/ns/SMIL" version="3.0" "#,
    r#"profile="http://www.idpf.org/epub/30/profile/content/">"#,
    "\n  <body>\n",
);
const SMIL_FOOTER: &str = "  </body>\n</smil>\n";

/// One rendered synchronization document.
#[derive(Debug, PartialEq, Eq)]
pub struct SmilDocument {
    /// The source content document this overlay belongs to.
    pub source_file: String,
    /// Complete document text.
    pub content: String,
}

/// Read the log at `log_path` and write one `<sourceFile>.smil` per distinct
/// source file into `out_dir`.
///
/// The audio reference inside each clip is the base name of `audio_path`,
/// matching its placement next to the content documents in the package.
pub fn generate(log_path: &Path, out_dir: &Path, audio_path: &Path) -> Result<()> {
    let records = read_all(log_path)?;
    let documents = render(&records, &audio_base_name(audio_path));

    std::fs::create_dir_all(out_dir)?;
    for doc in &documents {
        // Source files are manifest-relative names; an absolute path (bare
        // XML input) must still land inside the output directory.
        let name = format!("{}.smil", doc.source_file);
        let path = out_dir.join(name.trim_start_matches('/'));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &doc.content)?;
        info!(path = %path.display(), "wrote synchronization document");
    }

    Ok(())
}

/// Render one document per distinct source file, in first-seen order.
///
/// Clips are numbered sequentially from 0 within each file by order of
/// appearance in the log. Records for one file need not be contiguous.
pub fn render(records: &[Result<Record>], audio_file_name: &str) -> Vec<SmilDocument> {
    // (source_file, rendered clips, clips written) in first-seen order.
    let mut groups: Vec<(String, String, usize)> = Vec::new();

    for outcome in records {
        let record = match outcome {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "skipping malformed log record");
                continue;
            }
        };

        let (start, end, unit_id, source_file) = match record {
            Record::Warning { seconds } => {
                warn!(seconds, "skipping warning record");
                continue;
            }
            Record::Normal {
                start_seconds,
                end_seconds,
                unit_id,
                source_file,
                ..
            } => (start_seconds, end_seconds, unit_id, source_file),
        };

        let idx = match groups.iter().position(|(file, ..)| file == source_file) {
            Some(idx) => idx,
            None => {
                groups.push((source_file.clone(), String::new(), 0));
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];

        let clip_id = format!("audio-{}-{}", file_stem(source_file), group.2);
        let _ = write!(
            group.1,
            concat!(
                "    <par id=\"{id}\">\n",
                "      <text src=\"{text_src}\"/>\n",
                "      <audio src=\"{audio}\" clipBegin=\"{begin}s\" clipEnd=\"{end}s\"/>\n",
                "    </par>\n",
            ),
            id = escape_attr(&clip_id),
            text_src = escape_attr(&format!("{source_file}#{unit_id}")),
            audio = escape_attr(audio_file_name),
            begin = start,
            end = end,
        );
        group.2 += 1;
    }

    groups
        .into_iter()
        .map(|(source_file, clips, _)| SmilDocument {
            source_file,
            content: format!("{SMIL_HEADER}{clips}{SMIL_FOOTER}"),
        })
        .collect()
}

/// Base name of the source file with its last extension removed.
fn file_stem(source_file: &str) -> &str {
    let base = source_file.rsplit('/').next().unwrap_or(source_file);
    base.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(base)
}

fn audio_base_name(audio_path: &Path) -> String {
    audio_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| audio_path.display().to_string())
}
