//! High-level API for running a full alignment with Lumberjack.
//!
//! This module is deliberately "high level": it wires up indexing → the
//! interactive session → log conversion, while keeping the lower-level
//! pieces testable in their own modules. The audio engine and event source
//! are passed in by the caller, so the whole run is driveable from tests.

use std::io::Write;

use tracing::info;

use crate::audio::AudioEngine;
use crate::error::Result;
use crate::indexer;
use crate::input::EventSource;
use crate::log_store::LogWriter;
use crate::opts::Opts;
use crate::output_type::OutputTarget;
use crate::session::Session;
use crate::{smil_encoder, tei_encoder};

/// Run one full alignment: index the input, hold the interactive session
/// (unless an existing log is being reused), then convert the log into the
/// requested output.
///
/// The log file is always produced and always converted; the generators never
/// run without a completed log. When `opts.use_existing_log` is set, indexing
/// and the session are skipped entirely and `opts.log_path` is converted
/// as-is.
pub fn run<A, P>(opts: &Opts, engine: A, events: &mut dyn EventSource, prompt: P) -> Result<()>
where
    A: AudioEngine,
    P: Write,
{
    if !opts.use_existing_log {
        let units = indexer::index(&opts.input_path)?;
        info!(
            units = units.len(),
            input = %opts.input_path.display(),
            "indexed input"
        );

        let writer = LogWriter::create(&opts.log_path)?;
        let mut session = Session::new(&units, writer, engine, prompt);
        let end = session.run(events, opts.start_offset_seconds)?;
        info!(?end, consumed = session.units_consumed(), "session ended");
    }

    match &opts.output {
        OutputTarget::SmilDirectory(dir) => {
            smil_encoder::generate(&opts.log_path, dir, &opts.audio_path)
        }
        OutputTarget::TimelineFile(path) => {
            tei_encoder::generate(&opts.log_path, path, &opts.audio_path)
        }
    }
}
