//! Lock session identity.

mod identity;

pub use identity::{DEFAULT_BANNER_PREFIX, Session, SessionError};
