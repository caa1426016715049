//! Mock session validator for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Mock validator mapping fixed tokens to users.
///
/// Unknown tokens are rejected as invalid, matching the production
/// validator's behavior for unverifiable tokens.
#[derive(Default)]
pub struct MockSessionValidator {
    users: RwLock<HashMap<String, AuthenticatedUser>>,
}

impl MockSessionValidator {
    /// Creates an empty validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for the given user id and email.
    pub fn allow(self, token: impl Into<String>, user_id: &str, email: &str) -> Self {
        let user = AuthenticatedUser::new(
            UserId::new(user_id).expect("mock user id must be non-empty"),
            email,
            None,
        );
        self.users
            .write()
            .expect("MockSessionValidator: users lock poisoned")
            .insert(token.into(), user);
        self
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.users
            .read()
            .expect("MockSessionValidator: users lock poisoned")
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
