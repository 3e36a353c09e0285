mod core;
mod render;
#[cfg(test)]
mod tests;

pub use self::core::{DEFAULT_MASK_CHAR, KeyOutcome, LockPhase, LockState};
pub use render::{banner_top, mask_line, render_lock_screen};
