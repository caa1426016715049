//! Authentication configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// JWT validation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret.
    pub jwt_secret: Secret<String>,

    /// Expected token issuer.
    pub issuer: String,

    /// Expected token audience.
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_audience() -> String {
    "bizsight-api".to_string()
}

impl AuthConfig {
    /// Validate auth configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.issuer.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        if self.audience.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_passes() {
        let config = AuthConfig {
            jwt_secret: Secret::new("secret".to_string()),
            issuer: "https://auth.example.com".to_string(),
            audience: default_audience(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_issuer_is_rejected() {
        let config = AuthConfig {
            jwt_secret: Secret::new("secret".to_string()),
            issuer: String::new(),
            audience: default_audience(),
        };
        assert!(config.validate().is_err());
    }
}
