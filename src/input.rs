//! Keyboard and focus events consumed by the session.
//!
//! The session reads from a single blocking [`EventSource`] stream in which
//! focus changes arrive interleaved with keypresses. That single stream is
//! what keeps a quit keypress from ever being swallowed while waiting for
//! focus to return.

use crate::error::Result;

/// Classification of a single operator keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Mark the end of the current unit's narration (space).
    Advance,
    /// End the session (q).
    Quit,
    /// Pause or resume playback (p).
    TogglePause,
    /// Any other key: log a warning record at the current position.
    Other,
}

/// One event from the operator's terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Key(KeyAction),
    FocusLost,
    FocusGained,
}

/// Blocking source of session events.
///
/// `next_event` blocks the session thread entirely; there is nothing else to
/// do until the operator acts.
pub trait EventSource {
    fn next_event(&mut self) -> Result<SessionEvent>;
}

#[cfg(feature = "cli")]
pub use terminal::TerminalEvents;

#[cfg(feature = "cli")]
mod terminal {
    use std::io::stdout;

    use crossterm::event::{
        DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEventKind, KeyModifiers, read,
    };
    use crossterm::{execute, terminal};

    use super::{EventSource, KeyAction, SessionEvent};
    use crate::error::Result;

    /// Crossterm-backed event source.
    ///
    /// Puts the terminal into raw mode with focus-change reporting for the
    /// lifetime of the value and restores it on drop.
    pub struct TerminalEvents {
        _private: (),
    }

    impl TerminalEvents {
        pub fn new() -> Result<Self> {
            terminal::enable_raw_mode()?;
            execute!(stdout(), EnableFocusChange)?;
            Ok(Self { _private: () })
        }
    }

    impl Drop for TerminalEvents {
        fn drop(&mut self) {
            let _ = execute!(stdout(), DisableFocusChange);
            let _ = terminal::disable_raw_mode();
        }
    }

    impl EventSource for TerminalEvents {
        fn next_event(&mut self) -> Result<SessionEvent> {
            loop {
                match read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        // Raw mode disables the usual Ctrl+C handling, so we map it
                        // to quit ourselves.
                        let ctrl_c = key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL);

                        let action = match key.code {
                            _ if ctrl_c => KeyAction::Quit,
                            KeyCode::Char(' ') => KeyAction::Advance,
                            KeyCode::Char('q') => KeyAction::Quit,
                            KeyCode::Char('p') => KeyAction::TogglePause,
                            _ => KeyAction::Other,
                        };
                        return Ok(SessionEvent::Key(action));
                    }
                    Event::FocusLost => return Ok(SessionEvent::FocusLost),
                    Event::FocusGained => return Ok(SessionEvent::FocusGained),
                    // Releases, repeats, resizes, mouse events: not operator actions.
                    _ => continue,
                }
            }
        }
    }
}
