//! The interactive synchronization session.
//!
//! A session steps the operator through the unit list while audio plays,
//! turning a keypress stream into append-only log records. The session object
//! explicitly owns everything a keypress needs to touch: the unit counter,
//! the previous offset, the open log writer, and the current state.
//!
//! Every record is appended and flushed before the next event is read, so a
//! crash mid-session loses at most the in-flight keystroke.

use std::io::Write;

use tracing::{info, warn};

use crate::audio::AudioEngine;
use crate::error::{Error, Result};
use crate::input::{EventSource, KeyAction, SessionEvent};
use crate::log_store::LogWriter;
use crate::record::{Record, WARNING_SENTINEL};
use crate::unit::Unit;

/// Session state. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Paused,
    Stopped,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The operator pressed quit.
    Quit,
    /// An advance arrived with no units left; the log so far stays valid.
    UnitsExhausted,
}

/// One interactive session over a fixed unit list.
///
/// `W` is the log sink, `A` the audio collaborator, `P` the operator-facing
/// prompt sink (stdout in the CLI, a buffer in tests).
pub struct Session<'a, W: Write, A: AudioEngine, P: Write> {
    units: &'a [Unit],
    log: LogWriter<W>,
    engine: A,
    prompt: P,

    /// Index of the next unconsumed unit; equals the number of normal
    /// records written so far.
    unit_counter: usize,
    prev_offset_seconds: f64,
    state: SessionState,
}

impl<'a, W: Write, A: AudioEngine, P: Write> Session<'a, W, A, P> {
    pub fn new(units: &'a [Unit], log: LogWriter<W>, engine: A, prompt: P) -> Self {
        Self {
            units,
            log,
            engine,
            prompt,
            unit_counter: 0,
            prev_offset_seconds: 0.0,
            state: SessionState::Running,
        }
    }

    /// Drive the session to completion.
    ///
    /// Starts playback at `start_offset_seconds`, then blocks on `events`
    /// until the operator quits or the unit list runs out. The log is flushed
    /// and closed on every exit path, so it is always syntactically complete.
    pub fn run(
        &mut self,
        events: &mut dyn EventSource,
        start_offset_seconds: f64,
    ) -> Result<SessionEnd> {
        self.engine.play(start_offset_seconds)?;
        self.prev_offset_seconds = start_offset_seconds;
        self.state = SessionState::Running;

        self.banner()?;

        let end = loop {
            match events.next_event()? {
                SessionEvent::Key(KeyAction::Quit) => break SessionEnd::Quit,

                SessionEvent::Key(KeyAction::Advance) => match self.advance() {
                    Ok(()) => {}
                    Err(Error::NoMoreUnits { total }) => {
                        info!(total, "all units annotated, ending session");
                        writeln!(self.prompt, "all {total} sections logged\r")?;
                        break SessionEnd::UnitsExhausted;
                    }
                    Err(err) => {
                        self.stop()?;
                        return Err(err);
                    }
                },

                SessionEvent::Key(KeyAction::TogglePause) => match self.state {
                    SessionState::Running => {
                        self.engine.pause();
                        self.state = SessionState::Paused;
                    }
                    SessionState::Paused => {
                        self.engine.resume();
                        self.state = SessionState::Running;
                    }
                    SessionState::Stopped => unreachable!("event loop exited on stop"),
                },

                SessionEvent::Key(KeyAction::Other) => self.warn_mark()?,

                // Focus changes only touch the engine's playing status, never
                // the session state: an operator pause survives a focus
                // round-trip, and quit keeps working while unfocused because
                // it arrives on this same event stream.
                SessionEvent::FocusLost => self.engine.pause(),
                SessionEvent::FocusGained => {
                    if self.state == SessionState::Running {
                        self.engine.resume();
                    }
                }
            }
        };

        self.stop()?;
        Ok(end)
    }

    /// Index of the next unconsumed unit.
    pub fn units_consumed(&self) -> usize {
        self.unit_counter
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn position_seconds(&self) -> f64 {
        self.engine.position_millis() as f64 / 1000.0
    }

    /// Log the end of the current unit's narration at the current position.
    fn advance(&mut self) -> Result<()> {
        if self.unit_counter >= self.units.len() {
            return Err(Error::NoMoreUnits {
                total: self.units.len(),
            });
        }

        let pos = self.position_seconds();
        let unit = &self.units[self.unit_counter];
        self.log
            .append(&Record::normal(self.prev_offset_seconds, pos, unit))?;

        self.prev_offset_seconds = pos;
        self.unit_counter += 1;

        writeln!(
            self.prompt,
            "logged at {pos}s (section {})\r",
            self.unit_counter
        )?;
        if let Some(next) = self.units.get(self.unit_counter) {
            writeln!(self.prompt, "\t{} (file {})\r", next.text, next.source_file)?;
        }
        self.prompt.flush()?;

        Ok(())
    }

    /// Log a warning record at the current position without consuming a unit.
    fn warn_mark(&mut self) -> Result<()> {
        let pos = self.position_seconds();
        self.log.append(&Record::warning(pos))?;

        warn!(seconds = pos, "warning mark logged");
        writeln!(self.prompt, "{} at {pos}s\r", WARNING_SENTINEL.join(" "))?;
        self.prompt.flush()?;

        Ok(())
    }

    /// Move to the terminal state, flushing and closing the log.
    fn stop(&mut self) -> Result<()> {
        self.state = SessionState::Stopped;
        self.log.close()
    }

    fn banner(&mut self) -> Result<()> {
        writeln!(self.prompt, "lumberjack: starting to log\r")?;
        writeln!(
            self.prompt,
            "press space to log the end of the current section\r"
        )?;
        writeln!(self.prompt, "press q to quit, p to pause\r")?;
        writeln!(
            self.prompt,
            "press any other key to log a warning with the current timestamp\r"
        )?;
        if let Some(first) = self.units.first() {
            writeln!(
                self.prompt,
                "\t{} (file {})\r",
                first.text, first.source_file
            )?;
        }
        self.prompt.flush()?;
        Ok(())
    }
}
