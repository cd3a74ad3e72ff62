//! # Auth Commands
//!
//! Sign-in presence tracking. Credential verification happens in an
//! external identity provider; these commands only record its verdict.

use tracing::info;

use crate::error::ApiError;
use crate::state::{AuthState, Identity};
use cellshop_core::validation::validate_customer_name;

/// Records a successful sign-in.
///
/// The caller has already authenticated against the identity provider;
/// the username is recorded for `created_by` stamping only.
pub async fn sign_in(auth: &AuthState, username: String) -> Result<Identity, ApiError> {
    validate_customer_name(&username)
        .map_err(|_| ApiError::validation("username is required"))?;

    let identity = auth.sign_in(username.trim());
    info!(username = %identity.username, "User signed in");
    Ok(identity)
}

/// Clears the signed-in identity.
pub async fn sign_out(auth: &AuthState) -> Result<(), ApiError> {
    auth.sign_out();
    info!("User signed out");
    Ok(())
}

/// Returns the current identity, if any.
pub async fn current_user(auth: &AuthState) -> Result<Option<Identity>, ApiError> {
    Ok(auth.current())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_flow() {
        let auth = AuthState::new();

        assert!(current_user(&auth).await.unwrap().is_none());
        assert!(sign_in(&auth, "  ".to_string()).await.is_err());

        let identity = sign_in(&auth, "owner".to_string()).await.unwrap();
        assert_eq!(identity.username, "owner");
        assert!(current_user(&auth).await.unwrap().is_some());

        sign_out(&auth).await.unwrap();
        assert!(current_user(&auth).await.unwrap().is_none());
    }
}
