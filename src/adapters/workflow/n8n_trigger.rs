//! Multipart trigger adapter for an n8n-style workflow engine.
//!
//! Submits the business fields, the attached document, and the session
//! correlation token as one multipart form. The engine replies with a bare
//! acknowledgement; its analytical result comes back later through the
//! signed callback webhook.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

use crate::ports::{TriggerAck, TriggerRequest, WorkflowError, WorkflowTrigger};

/// Configuration for the workflow trigger adapter.
#[derive(Debug, Clone)]
pub struct N8nTriggerConfig {
    /// Full URL of the workflow's trigger webhook.
    pub trigger_url: String,
    /// Request timeout for the trigger call.
    pub timeout: Duration,
}

impl N8nTriggerConfig {
    /// Creates a configuration for the given trigger URL.
    pub fn new(trigger_url: impl Into<String>) -> Self {
        Self {
            trigger_url: trigger_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Workflow trigger adapter over HTTP multipart.
pub struct N8nTrigger {
    config: N8nTriggerConfig,
    client: Client,
}

impl N8nTrigger {
    /// Creates a new trigger adapter with the given configuration.
    pub fn new(config: N8nTriggerConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn build_form(request: &TriggerRequest) -> Form {
        let mut form = Form::new().text("correlation_token", request.token.to_string());
        for (name, value) in &request.fields {
            form = form.text(name.clone(), value.clone());
        }
        if let Some(attachment) = &request.attachment {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.content_type)
                .unwrap_or_else(|_| {
                    Part::bytes(attachment.bytes.clone())
                        .file_name(attachment.file_name.clone())
                });
            form = form.part("document", part);
        }
        form
    }
}

#[async_trait]
impl WorkflowTrigger for N8nTrigger {
    async fn trigger(&self, request: TriggerRequest) -> Result<TriggerAck, WorkflowError> {
        let token = request.token;
        let form = Self::build_form(&request);

        let response = self
            .client
            .post(&self.config.trigger_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| WorkflowError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WorkflowError::status(status.as_u16(), body));
        }

        // The trigger response carries no payload worth reading; receipt
        // is the whole contract.
        Ok(TriggerAck { token })
    }
}
