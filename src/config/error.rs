//! Configuration error types.

use thiserror::Error;

/// Errors loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The underlying config source failed.
    #[error("configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

/// Errors validating loaded configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required value is missing or empty.
    #[error("missing required configuration: {0}")]
    MissingRequired(&'static str),

    /// A value is present but unusable.
    #[error("invalid configuration for {field}: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why it is invalid.
        reason: String,
    },
}

impl ValidationError {
    /// Creates an invalid value error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
