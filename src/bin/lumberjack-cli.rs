use anyhow::Result;
use clap::{ArgGroup, Parser};

use std::io;
use std::path::PathBuf;

use lumberjack::audio::WallClockEngine;
use lumberjack::input::{EventSource, KeyAction, SessionEvent, TerminalEvents};
use lumberjack::lumberjack::run;
use lumberjack::opts::{Opts, default_log_path};
use lumberjack::output_type::OutputTarget;

fn main() -> Result<()> {
    lumberjack::logging::init();
    let params = get_params()?;
    let opts = params.into_opts();

    if opts.use_existing_log {
        // No session, no terminal takeover: just convert the existing log.
        run(&opts, WallClockEngine::new(), &mut Idle, io::sink())?;
    } else {
        let mut events = TerminalEvents::new()?;
        let stdout = io::stdout();
        run(&opts, WallClockEngine::new(), &mut events, stdout.lock())?;
    }

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "lumberjack")]
#[command(about = "Align an audio recording with the sections of an EPUB or TEI XML document")]
#[command(group(ArgGroup::new("output").required(true)))]
struct Params {
    /// EPUB file, or a bare TEI XML document.
    input: PathBuf,

    /// The audio recording being aligned.
    audio: PathBuf,

    /// Write one SMIL synchronization document per content file into this directory.
    #[arg(long = "smil-dir", group = "output", value_name = "DIR")]
    smil_dir: Option<PathBuf>,

    /// Write a single TEI timeline document at this path.
    #[arg(long = "timeline", group = "output", value_name = "FILE")]
    timeline: Option<PathBuf>,

    /// Log destination (defaults to '<audio>.txt').
    #[arg(long = "logto", value_name = "FILE")]
    log_to: Option<PathBuf>,

    /// Convert an existing log instead of holding an interactive session.
    #[arg(long = "uselog", value_name = "FILE")]
    use_log: Option<PathBuf>,

    /// Playback start offset in seconds.
    #[arg(long = "start", default_value_t = 0.0, value_name = "SECONDS")]
    start: f64,
}

impl Params {
    fn into_opts(self) -> Opts {
        let output = match (self.smil_dir, self.timeline) {
            (Some(dir), _) => OutputTarget::SmilDirectory(dir),
            (None, Some(path)) => OutputTarget::TimelineFile(path),
            // clap's arg group guarantees exactly one output flag.
            (None, None) => unreachable!("output group is required"),
        };

        let use_existing_log = self.use_log.is_some();
        let log_path = self
            .use_log
            .or(self.log_to)
            .unwrap_or_else(|| default_log_path(&self.audio));

        Opts {
            input_path: self.input,
            audio_path: self.audio,
            output,
            log_path,
            use_existing_log,
            start_offset_seconds: self.start,
        }
    }
}

fn get_params() -> Result<Params> {
    Ok(Params::parse())
}

/// Event source for non-interactive runs; never actually polled because the
/// session is skipped when reusing an existing log.
struct Idle;

impl EventSource for Idle {
    fn next_event(&mut self) -> lumberjack::Result<SessionEvent> {
        Ok(SessionEvent::Key(KeyAction::Quit))
    }
}
