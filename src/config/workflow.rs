//! Workflow engine configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Workflow engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Full URL of the workflow trigger webhook.
    pub trigger_url: String,

    /// Shared secret signing the result callbacks.
    pub webhook_secret: Secret<String>,

    /// Trigger request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl WorkflowConfig {
    /// Get timeout as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate workflow configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.trigger_url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("WORKFLOW__TRIGGER_URL"));
        }
        if !self.trigger_url.starts_with("http://") && !self.trigger_url.starts_with("https://") {
            return Err(ValidationError::invalid(
                "workflow.trigger_url",
                "must start with http:// or https://",
            ));
        }
        if self.webhook_secret.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("WORKFLOW__WEBHOOK_SECRET"));
        }
        Ok(())
    }
}
