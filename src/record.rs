use crate::error::{Error, Result};
use crate::unit::Unit;

/// The fixed warning payload, written in place of the four unit columns.
///
/// Four tokens, so a warning line still has the full six columns and the
/// generators never have to special-case its width. A line is a warning iff
/// its third tab-separated field equals the first token.
pub const WARNING_SENTINEL: [&str; 4] = ["DANGER,", "WILL", "ROBINSON,", "DANGER!"];

/// One durable, timestamped outcome of a single operator action.
///
/// Records are append-only: the Nth `Normal` record corresponds to the Nth
/// unit consumed, independent of any interleaved `Warning` records.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// The operator marked the end of a unit's narration at `end_seconds`.
    Normal {
        start_seconds: f64,
        end_seconds: f64,
        unit_id: String,
        unit_text: String,
        source_file: String,
        sequence_index: usize,
    },

    /// The operator flagged the current position without consuming a unit.
    Warning { seconds: f64 },
}

impl Record {
    /// Build a normal record covering `[start, end)` for `unit`.
    pub fn normal(start_seconds: f64, end_seconds: f64, unit: &Unit) -> Self {
        Self::Normal {
            start_seconds,
            end_seconds,
            unit_id: unit.id.clone(),
            unit_text: unit.text.clone(),
            source_file: unit.source_file.clone(),
            sequence_index: unit.sequence_index,
        }
    }

    pub fn warning(seconds: f64) -> Self {
        Self::Warning { seconds }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning { .. })
    }

    /// Render the record as one tab-separated line, without a trailing newline.
    ///
    /// Embedded newlines in text fields are replaced by single spaces so a
    /// record never spans more than one line.
    pub fn to_line(&self) -> String {
        match self {
            Self::Normal {
                start_seconds,
                end_seconds,
                unit_id,
                unit_text,
                source_file,
                sequence_index,
            } => {
                let line = format!(
                    "{start_seconds}\t{end_seconds}\t{unit_id}\t{unit_text}\t{source_file}\t{sequence_index}"
                );
                line.replace('\n', " ")
            }
            Self::Warning { seconds } => {
                format!("{seconds}\t{seconds}\t{}", WARNING_SENTINEL.join("\t"))
            }
        }
    }

    /// Parse one log line back into a record.
    ///
    /// `line_no` is 1-based and only used for error reporting. Lines with
    /// fewer than six columns, or with non-numeric offsets, are rejected as
    /// [`Error::MalformedLogRecord`] so generators can skip them.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let malformed = || Error::MalformedLogRecord {
            line: line_no,
            content: line.to_string(),
        };

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 6 {
            return Err(malformed());
        }

        let start_seconds: f64 = fields[0].parse().map_err(|_| malformed())?;
        let end_seconds: f64 = fields[1].parse().map_err(|_| malformed())?;

        if fields[2] == WARNING_SENTINEL[0] {
            return Ok(Self::Warning {
                seconds: start_seconds,
            });
        }

        // A tab inside the unit text shifts the later columns right; joining
        // the middle back together restores the text exactly as written.
        let unit_text = fields[3..fields.len() - 2].join("\t");
        let sequence_index: usize = fields[fields.len() - 1].parse().map_err(|_| malformed())?;

        Ok(Self::Normal {
            start_seconds,
            end_seconds,
            unit_id: fields[2].to_string(),
            unit_text,
            source_file: fields[fields.len() - 2].to_string(),
            sequence_index,
        })
    }
}
