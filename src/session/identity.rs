//! The identity and banner a lock session is bound to.

use log::info;
use nix::unistd::{Uid, User};
use thiserror::Error;

/// Banner text shown before the upper-cased identity.
pub const DEFAULT_BANNER_PREFIX: &str = "THIS SCREEN IS LOCKED BY ";

/// Failure to determine who is being locked.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to look up uid {uid} in the account database: {source}")]
    Lookup {
        uid: u32,
        #[source]
        source: nix::Error,
    },

    #[error("uid {0} has no entry in the account database")]
    UnknownUser(u32),
}

/// Process-wide lock session.
///
/// Built once at startup; the identity never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    identity: String,
    banner: String,
}

impl Session {
    /// Creates a session for `identity`, rendering `prefix` + upper-cased identity as banner.
    pub fn new(identity: impl Into<String>, prefix: &str) -> Self {
        let identity = identity.into();
        let banner = format!("{}{}", prefix, identity.to_uppercase());
        Self { identity, banner }
    }

    /// Resolves the login name of the real user running this process.
    pub fn for_current_user(prefix: &str) -> Result<Self, SessionError> {
        let uid = Uid::current();
        let user = User::from_uid(uid)
            .map_err(|source| SessionError::Lookup {
                uid: uid.as_raw(),
                source,
            })?
            .ok_or(SessionError::UnknownUser(uid.as_raw()))?;

        info!("Locking session for '{}' (uid {})", user.name, uid);
        Ok(Self::new(user.name, prefix))
    }

    /// Login name passed to the authenticator.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// One-time banner drawn above the password line.
    pub fn banner(&self) -> &str {
        &self.banner
    }
}
