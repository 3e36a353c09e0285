//! Credential verification against the system's PAM stack.
//!
//! The only thing that crosses this boundary is success or failure. Wrong
//! passwords, locked accounts, and PAM errors all look the same to callers.

mod conversation;

pub use conversation::{MAX_QUERIES, SecretConversation};

use std::path::{Path, PathBuf};

use log::{debug, info};
use pam_client::{Context, Flag};
use thiserror::Error;

/// PAM service name used when none is configured (`/etc/pam.d/hushlock`).
pub const DEFAULT_SERVICE: &str = "hushlock";

/// Directories Linux-PAM reads service policies from, in lookup order.
pub const POLICY_DIRS: &[&str] = &["/etc/pam.d", "/usr/lib/pam.d"];

/// Returns the policy file PAM would load for `service`, if any.
///
/// Without one PAM silently falls back to the `other` policy, which denies
/// everything on many distributions.
pub fn find_policy<P: AsRef<Path>>(service: &str, dirs: &[P]) -> Option<PathBuf> {
    if service.is_empty() || service.contains('/') || service == "." || service == ".." {
        return None;
    }
    dirs.iter()
        .map(|dir| dir.as_ref().join(service))
        .find(|path| path.is_file())
}

/// Verifies an identity/password pair.
pub trait Authenticator {
    /// Returns true only if the platform accepts `candidate` for `identity`.
    fn verify(&self, identity: &str, candidate: &str) -> bool;
}

/// Reasons a PAM transaction did not succeed. Logged, never shown.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to start PAM transaction for service '{service}': {reason}")]
    Start { service: String, reason: String },

    #[error("no PAM policy for service '{service}' (looked in {searched})")]
    MissingPolicy { service: String, searched: String },

    #[error("PAM authentication rejected: {0}")]
    Rejected(String),
}

/// [`Authenticator`] backed by a fixed PAM service.
#[derive(Debug, Clone)]
pub struct PamAuthenticator {
    service: String,
}

impl PamAuthenticator {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Checks that the service has a policy file, then opens and closes a
    /// PAM transaction for `identity`.
    ///
    /// Run once before locking: a service PAM cannot find or start would
    /// otherwise leave a lock that no password can open.
    pub fn probe(&self, identity: &str) -> Result<(), AuthError> {
        self.probe_in(identity, POLICY_DIRS)
    }

    fn probe_in<P: AsRef<Path>>(&self, identity: &str, dirs: &[P]) -> Result<(), AuthError> {
        let policy = find_policy(&self.service, dirs).ok_or_else(|| AuthError::MissingPolicy {
            service: self.service.clone(),
            searched: dirs
                .iter()
                .map(|dir| dir.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })?;
        debug!("Using PAM policy {}", policy.display());

        self.start(identity, "")?;
        info!("PAM service '{}' is available", self.service);
        Ok(())
    }

    fn start(
        &self,
        identity: &str,
        candidate: &str,
    ) -> Result<Context<SecretConversation>, AuthError> {
        Context::new(
            &self.service,
            Some(identity),
            SecretConversation::new(candidate),
        )
        .map_err(|err| AuthError::Start {
            service: self.service.clone(),
            reason: err.to_string(),
        })
    }

    fn authenticate(&self, identity: &str, candidate: &str) -> Result<(), AuthError> {
        let mut context = self.start(identity, candidate)?;
        context
            .authenticate(Flag::SILENT)
            .map_err(|err| AuthError::Rejected(err.to_string()))
    }
}

impl Authenticator for PamAuthenticator {
    fn verify(&self, identity: &str, candidate: &str) -> bool {
        match self.authenticate(identity, candidate) {
            Ok(()) => true,
            Err(err) => {
                debug!("Verification failed: {}", err);
                false
            }
        }
    }
}
