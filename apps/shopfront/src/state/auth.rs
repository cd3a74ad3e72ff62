//! # Auth State
//!
//! Tracks the signed-in identity.
//!
//! Credential verification is delegated to an external identity provider
//! and never happens here; this state only records WHO is signed in so
//! that write commands can stamp `created_by`. Sign-in and sign-out
//! toggle presence, nothing more.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// The signed-in user, as reported by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Display name / login recorded on rows this user creates.
    pub username: String,
}

/// Current-identity state.
///
/// Reads vastly outnumber writes (every authored mutation calls
/// `require()`), hence RwLock over Mutex.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    current: Arc<RwLock<Option<Identity>>>,
}

impl AuthState {
    /// Creates a signed-out state.
    pub fn new() -> Self {
        AuthState::default()
    }

    /// Records a successful sign-in.
    pub fn sign_in(&self, username: impl Into<String>) -> Identity {
        let identity = Identity {
            username: username.into(),
        };
        *self.current.write().expect("auth lock poisoned") = Some(identity.clone());
        identity
    }

    /// Clears the signed-in identity.
    pub fn sign_out(&self) {
        *self.current.write().expect("auth lock poisoned") = None;
    }

    /// Returns the current identity, if any.
    pub fn current(&self) -> Option<Identity> {
        self.current.read().expect("auth lock poisoned").clone()
    }

    /// Returns the current identity or None for commands that must
    /// record an author.
    pub fn require(&self) -> Option<Identity> {
        self.current()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_and_out() {
        let auth = AuthState::new();
        assert!(auth.current().is_none());

        auth.sign_in("owner");
        assert_eq!(auth.current().unwrap().username, "owner");
        assert!(auth.require().is_some());

        auth.sign_out();
        assert!(auth.require().is_none());
    }
}
