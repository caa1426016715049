//! Mock AI provider for testing.
//!
//! Provides a configurable mock implementation of the `AiProvider` port,
//! allowing tests to run without calling real completion APIs.
//!
//! # Features
//!
//! - Pre-configured replies, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call capture for verification

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AiError, AiProvider, CompletionRequest, CompletionResponse, TokenUsage};

/// A scripted mock reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return a successful completion with this content.
    Content(String),
    /// Return a status error.
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// Return a network error.
    Network(String),
}

/// Mock AI provider.
///
/// Replies are consumed in order; a call with no scripted reply fails
/// with a network error so a misconfigured test surfaces loudly.
#[derive(Debug, Clone)]
pub struct MockAiProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    delay: Duration,
}

impl MockAiProvider {
    /// Creates a mock with no scripted replies.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// Queues a successful completion.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockReply::Content(content.into()));
        self
    }

    /// Queues a status error.
    pub fn with_error_status(self, status: u16, body: impl Into<String>) -> Self {
        self.push(MockReply::Status {
            status,
            body: body.into(),
        });
        self
    }

    /// Queues a network error.
    pub fn with_network_error(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Network(message.into()));
        self
    }

    /// Sets a simulated latency applied to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the captured requests.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .expect("MockAiProvider: calls lock poisoned")
            .clone()
    }

    fn push(&self, reply: MockReply) {
        self.replies
            .lock()
            .expect("MockAiProvider: replies lock poisoned")
            .push_back(reply);
    }

    fn pop(&self) -> Option<MockReply> {
        self.replies
            .lock()
            .expect("MockAiProvider: replies lock poisoned")
            .pop_front()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        if self.delay > Duration::ZERO {
            sleep(self.delay).await;
        }

        self.calls
            .lock()
            .expect("MockAiProvider: calls lock poisoned")
            .push(request);

        match self.pop() {
            Some(MockReply::Content(content)) => Ok(CompletionResponse {
                content,
                model: "mock".to_string(),
                usage: TokenUsage::new(10, 10),
            }),
            Some(MockReply::Status { status, body }) => Err(AiError::status(status, body)),
            Some(MockReply::Network(message)) => Err(AiError::network(message)),
            None => Err(AiError::network("no scripted reply configured")),
        }
    }

    fn default_model(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let provider = MockAiProvider::new()
            .with_response("first")
            .with_error_status(500, "boom");

        let first = provider
            .complete(CompletionRequest::new("a"))
            .await
            .unwrap();
        assert_eq!(first.content, "first");

        let second = provider.complete(CompletionRequest::new("b")).await;
        assert!(matches!(second, Err(AiError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn exhausted_script_fails_loudly() {
        let provider = MockAiProvider::new();
        assert!(provider
            .complete(CompletionRequest::new("a"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn calls_are_captured() {
        let provider = MockAiProvider::new().with_response("ok");
        provider
            .complete(CompletionRequest::new("the prompt"))
            .await
            .unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "the prompt");
    }
}
