//! Playback-position tracking behind a pluggable engine trait.
//!
//! The session only needs four things from audio playback: start at an
//! offset, pause, resume, and report the current position. Real decoding and
//! output-device handling live behind this seam, which also keeps the session
//! state machine fully testable with a scripted engine.

use std::time::{Duration, Instant};

use crate::error::Result;

/// The audio collaborator consumed by the session.
pub trait AudioEngine {
    /// Begin playback `start_offset_seconds` into the recording.
    fn play(&mut self, start_offset_seconds: f64) -> Result<()>;

    /// Suspend playback, freezing the reported position.
    fn pause(&mut self);

    /// Continue playback from the frozen position.
    fn resume(&mut self);

    /// Current playback position in milliseconds since the start of the
    /// recording (not since `play`).
    fn position_millis(&self) -> u64;
}

/// An [`AudioEngine`] that tracks narration time against the wall clock.
///
/// It performs no playback itself; the operator plays the recording in an
/// external player started together with the session, and this engine keeps
/// the matching position. Pause freezes the clock, resume restarts it.
#[derive(Debug, Default)]
pub struct WallClockEngine {
    /// Position accumulated up to the last pause (or the start offset).
    base: Duration,

    /// When the clock last started running; `None` while paused or before
    /// `play`.
    running_since: Option<Instant>,
}

impl WallClockEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioEngine for WallClockEngine {
    fn play(&mut self, start_offset_seconds: f64) -> Result<()> {
        self.base = Duration::from_secs_f64(start_offset_seconds.max(0.0));
        self.running_since = Some(Instant::now());
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.base += since.elapsed();
        }
    }

    fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    fn position_millis(&self) -> u64 {
        let running = self
            .running_since
            .map(|since| since.elapsed())
            .unwrap_or_default();
        (self.base + running).as_millis() as u64
    }
}
