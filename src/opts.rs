use std::path::{Path, PathBuf};

use crate::output_type::OutputTarget;

/// Options that control one alignment run.
///
/// This struct represents *library-level configuration*, not CLI flags
/// directly. The CLI is responsible for mapping user input into this type so
/// that other frontends (tests, batch jobs) can construct options
/// programmatically.
#[derive(Debug, Clone)]
pub struct Opts {
    /// The EPUB package or bare XML document to index.
    pub input_path: PathBuf,

    /// The audio recording being aligned. Referenced (by base name) from the
    /// generated documents.
    pub audio_path: PathBuf,

    /// Where the converted log goes.
    pub output: OutputTarget,

    /// Where the session log is written, or which existing log to read.
    /// Defaults to `<audio path>.txt` when not overridden.
    pub log_path: PathBuf,

    /// Skip the interactive session and convert `log_path` as-is.
    pub use_existing_log: bool,

    /// Playback start offset, in seconds, for the interactive session.
    pub start_offset_seconds: f64,
}

/// The default log destination for an audio file: the audio path with `.txt`
/// appended.
///
/// The log lives next to the audio because it is the durable artifact; the
/// generated documents can always be re-derived from it.
pub fn default_log_path(audio_path: &Path) -> PathBuf {
    let mut name = audio_path.as_os_str().to_os_string();
    name.push(".txt");
    PathBuf::from(name)
}
