//! Password entry state machine.

use log::{debug, info};

use crate::auth::Authenticator;
use crate::input::{Key, PasswordBuffer};
use crate::session::Session;

/// Glyph drawn in place of every buffered character by default.
pub const DEFAULT_MASK_CHAR: char = '#';

/// Where the lock is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPhase {
    /// Accepting key presses.
    Idle,
    /// A verification just failed; key presses that were queued while it
    /// ran are being discarded until the backend reports the queue empty.
    Draining,
    /// The password was accepted. Terminal.
    Unlocked,
}

/// What a key press did, so the backend knows whether to paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing changed; no repaint.
    Ignored,
    /// The password line must be repainted.
    Repaint,
    /// The session is unlocked; stop the event loop.
    Unlocked,
}

/// Input state for one lock session.
///
/// Owns the password buffer and decides, for every key press, whether to
/// edit it, submit it, or ignore the key. Verification runs synchronously on
/// the caller's thread.
#[derive(Debug)]
pub struct LockState {
    buffer: PasswordBuffer,
    mask_char: char,
    phase: LockPhase,
    /// Whether the password line needs to be repainted
    pub needs_redraw: bool,
}

impl LockState {
    /// Creates an idle lock with an empty buffer of `max_len` characters.
    ///
    /// The first frame always needs painting, so `needs_redraw` starts true.
    pub fn new(max_len: usize, mask_char: char) -> Self {
        Self {
            buffer: PasswordBuffer::new(max_len),
            mask_char,
            phase: LockPhase::Idle,
            needs_redraw: true,
        }
    }

    pub fn phase(&self) -> LockPhase {
        self.phase
    }

    pub fn is_unlocked(&self) -> bool {
        self.phase == LockPhase::Unlocked
    }

    pub fn is_draining(&self) -> bool {
        self.phase == LockPhase::Draining
    }

    /// Number of characters currently buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The text shown on the password line: one mask glyph per buffered character.
    pub fn mask_text(&self) -> String {
        std::iter::repeat_n(self.mask_char, self.buffer.len()).collect()
    }

    /// Applies one key press.
    pub fn on_key_press<A>(&mut self, key: Key, session: &Session, auth: &A) -> KeyOutcome
    where
        A: Authenticator + ?Sized,
    {
        match self.phase {
            LockPhase::Unlocked => return KeyOutcome::Ignored,
            LockPhase::Draining => {
                debug!("Discarding {} key queued during verification", key.log_name());
                return KeyOutcome::Ignored;
            }
            LockPhase::Idle => {}
        }

        debug!("Key pressed: {}", key.log_name());
        let outcome = match key {
            Key::Char(c) => {
                if self.buffer.push(c) {
                    KeyOutcome::Repaint
                } else {
                    debug!("Password buffer full ({} chars)", self.buffer.max_len());
                    KeyOutcome::Ignored
                }
            }
            Key::Backspace => {
                self.buffer.pop();
                KeyOutcome::Repaint
            }
            Key::Escape => {
                self.buffer.clear();
                KeyOutcome::Repaint
            }
            Key::Return => self.submit(session, auth),
            Key::Unknown => KeyOutcome::Ignored,
        };

        if outcome == KeyOutcome::Repaint {
            self.needs_redraw = true;
        }
        outcome
    }

    /// Ends the drain phase once the backend has flushed every queued event.
    pub fn finish_drain(&mut self) {
        if self.phase == LockPhase::Draining {
            debug!("Input queue drained; accepting keys again");
            self.phase = LockPhase::Idle;
        }
    }

    fn submit<A>(&mut self, session: &Session, auth: &A) -> KeyOutcome
    where
        A: Authenticator + ?Sized,
    {
        debug!("Verifying {} buffered chars", self.buffer.len());
        let accepted = {
            let candidate = self.buffer.secret();
            auth.verify(session.identity(), &candidate)
        };
        self.buffer.clear();

        if accepted {
            info!("Password accepted for '{}'", session.identity());
            self.phase = LockPhase::Unlocked;
            KeyOutcome::Unlocked
        } else {
            info!("Password rejected");
            self.phase = LockPhase::Draining;
            KeyOutcome::Repaint
        }
    }
}
