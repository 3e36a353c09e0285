//! Keyboard input handling and the password entry state machine.
//!
//! The backend classifies native key events into [`Key`] values and feeds
//! them to [`LockState`], which edits the [`PasswordBuffer`], submits it to
//! the authenticator, and reports whether the screen must be repainted.

pub mod buffer;
pub mod events;
pub mod state;

pub use buffer::{DEFAULT_MAX_LEN, PasswordBuffer};
pub use events::Key;
pub use state::{DEFAULT_MASK_CHAR, KeyOutcome, LockPhase, LockState};
