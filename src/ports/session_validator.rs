//! Session validation port for bearer token validation.
//!
//! Defines the contract for validating access tokens and extracting user
//! identity. Provider-agnostic: implementations exist for JWT validation
//! and mock testing; others (OIDC introspection, API gateways) can be
//! added without touching callers.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// HTTP middleware uses this to validate Bearer tokens. A missing or
/// invalid session aborts an analysis before any producer launches.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature and standard claims
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a bearer token and return the authenticated user.
    ///
    /// # Arguments
    ///
    /// * `token` - The raw token (without "Bearer " prefix)
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
