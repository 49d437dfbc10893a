//! One-time CSRF `state` nonces bound to host sessions
//!
//! [`StateStore::issue`] mints a random nonce for a session and remembers
//! it; [`StateStore::verify`] pops it again. A session holds at most one
//! live nonce: issuing again replaces (and so invalidates) the previous one,
//! and a nonce can be verified exactly once.

use base64::Engine as _;
use rand::RngCore as _;
use subtle::ConstantTimeEq;

use crate::error::{NetcordError, Result};
use crate::store::ShardedMap;

/// Number of random bytes in a nonce before base64url encoding.
const NONCE_BYTES: usize = 32;

/// Pending authorizations keyed by session identifier.
///
/// # Examples
///
/// ```
/// use netcord::state::StateStore;
///
/// let store = StateStore::new();
/// let nonce = store.issue("session-1");
///
/// assert!(store.verify("session-1", &nonce).is_ok());
/// // Nonces are single use.
/// assert!(store.verify("session-1", &nonce).is_err());
/// ```
#[derive(Debug, Default)]
pub struct StateStore {
    pending: ShardedMap<String>,
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a URL-safe random nonce for `session_id` and stores it,
    /// replacing any nonce previously issued for that session.
    pub fn issue(&self, session_id: &str) -> String {
        let nonce = generate_nonce();
        if self
            .pending
            .insert(session_id.to_string(), nonce.clone())
            .is_some()
        {
            tracing::debug!("replaced pending state nonce for session");
        }
        nonce
    }

    /// Consumes the nonce stored for `session_id` and compares it with
    /// `received`.
    ///
    /// The stored nonce is removed whether or not it matches, so a second
    /// call for the same session always fails.
    ///
    /// # Errors
    ///
    /// Returns [`NetcordError::Forbidden`] when no nonce is pending for the
    /// session or when it differs from `received`.
    pub fn verify(&self, session_id: &str, received: &str) -> Result<()> {
        let expected = self
            .pending
            .remove(session_id)
            .ok_or_else(|| NetcordError::Forbidden("unknown or expired session state".to_string()))?;

        let is_match: bool = expected.as_bytes().ct_eq(received.as_bytes()).into();
        if !is_match {
            tracing::warn!("state nonce mismatch on authorization callback");
            return Err(NetcordError::Forbidden("state mismatch".to_string()));
        }

        Ok(())
    }

    /// Drops the pending nonce for `session_id` without verifying it.
    pub fn discard(&self, session_id: &str) {
        self.pending.remove(session_id);
    }

    /// Number of sessions with a pending nonce.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// 32 random bytes encoded as base64url without padding.
fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
