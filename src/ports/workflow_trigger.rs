//! Workflow Trigger Port - Fire-and-forget workflow invocation.
//!
//! The delayed analysis producer is triggered with a multipart form
//! (business fields, the uploaded document, and the session correlation
//! token). The trigger response only acknowledges receipt; the analytical
//! result arrives later through the event bus, keyed by the token.

use async_trait::async_trait;

use crate::domain::analysis::AttachedFile;
use crate::domain::foundation::CorrelationToken;

/// Port for triggering the asynchronous workflow producer.
#[async_trait]
pub trait WorkflowTrigger: Send + Sync {
    /// Submits the trigger request.
    ///
    /// A successful return means the workflow engine accepted the request,
    /// nothing more; the result is delivered out-of-band. An error means
    /// the trigger itself was rejected and no result will ever arrive.
    async fn trigger(&self, request: TriggerRequest) -> Result<TriggerAck, WorkflowError>;
}

/// The multipart payload sent to the workflow engine.
#[derive(Debug, Clone)]
pub struct TriggerRequest {
    /// Correlation token the engine must echo back in its callback.
    pub token: CorrelationToken,
    /// Plain form fields (business input).
    pub fields: Vec<(String, String)>,
    /// Attached document, forwarded verbatim.
    pub attachment: Option<AttachedFile>,
}

impl TriggerRequest {
    /// Creates a request for the given correlation token.
    pub fn new(token: CorrelationToken) -> Self {
        Self {
            token,
            fields: Vec::new(),
            attachment: None,
        }
    }

    /// Adds a plain form field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Attaches a document.
    pub fn with_attachment(mut self, attachment: AttachedFile) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Acknowledgement of an accepted trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerAck {
    /// Token the workflow engine will key its callback on.
    pub token: CorrelationToken,
}

/// Workflow trigger errors.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// The engine rejected the trigger with a non-success status.
    #[error("workflow engine returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text, where available.
        body: String,
    },

    /// Network error before the trigger was accepted.
    #[error("network error: {0}")]
    Network(String),
}

impl WorkflowError {
    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn WorkflowTrigger) {}

    #[test]
    fn trigger_request_builder_collects_fields() {
        let token = CorrelationToken::new();
        let request = TriggerRequest::new(token)
            .with_field("business_description", "A bakery chain")
            .with_attachment(AttachedFile::new(
                "plan.txt",
                "text/plain",
                b"expand east".to_vec(),
            ));

        assert_eq!(request.token, token);
        assert_eq!(request.fields.len(), 1);
        assert!(request.attachment.is_some());
    }

    #[test]
    fn workflow_error_displays_status() {
        let err = WorkflowError::status(503, "busy");
        assert_eq!(err.to_string(), "workflow engine returned status 503: busy");
    }
}
