// Answers PAM's questions from a password the user already typed, so the
// transaction never needs a prompt round-trip.
use std::ffi::{CStr, CString};

use log::debug;
use pam_client::{ConversationHandler, ErrorCode};
use zeroize::Zeroizing;

/// Queries answered per transaction; mirrors Linux-PAM's `PAM_MAX_NUM_MSG`.
pub const MAX_QUERIES: usize = 32;

/// Conversation that hands PAM a pre-collected secret.
///
/// Secret prompts (echo off) get the candidate password. Every other query is
/// answered with an empty response, which PAM treats as "no answer" rather
/// than a conversation failure. Once a transaction has asked more than
/// [`MAX_QUERIES`] questions every further prompt fails.
pub struct SecretConversation {
    candidate: Zeroizing<String>,
    queries: usize,
}

impl SecretConversation {
    pub fn new(candidate: &str) -> Self {
        Self {
            candidate: Zeroizing::new(candidate.to_owned()),
            queries: 0,
        }
    }

    fn admit(&mut self) -> Result<(), ErrorCode> {
        self.queries = self.queries.saturating_add(1);
        if self.queries > MAX_QUERIES {
            debug!("PAM exceeded {} queries; failing the conversation", MAX_QUERIES);
            Err(ErrorCode::CONV_ERR)
        } else {
            Ok(())
        }
    }
}

impl ConversationHandler for SecretConversation {
    fn prompt_echo_on(&mut self, _prompt: &CStr) -> Result<CString, ErrorCode> {
        self.admit()?;
        debug!("PAM asked a visible prompt; answering with nothing");
        Ok(CString::default())
    }

    fn prompt_echo_off(&mut self, _prompt: &CStr) -> Result<CString, ErrorCode> {
        self.admit()?;
        debug!("PAM asked for the secret");
        CString::new(self.candidate.as_bytes()).map_err(|_| ErrorCode::CONV_ERR)
    }

    fn text_info(&mut self, _msg: &CStr) {
        // Counts toward the limit; the next prompt fails once it is exceeded.
        let _ = self.admit();
        debug!("PAM info message ignored");
    }

    fn error_msg(&mut self, _msg: &CStr) {
        let _ = self.admit();
        debug!("PAM error message ignored");
    }

    fn binary_prompt(&mut self, _data_type: u8, _data: &[u8]) -> Result<(u8, Vec<u8>), ErrorCode> {
        self.admit()?;
        debug!("PAM binary prompt; answering with nothing");
        Ok((0, Vec::new()))
    }
}
