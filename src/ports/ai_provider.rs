//! AI Provider Port - Interface for LLM completion services.
//!
//! Abstracts the direct-call analysis producer: one prompt in, one
//! free-form completion out. The application layer is responsible for
//! decoding the JSON embedded in the completion text; this port only
//! moves text.
//!
//! # Design
//!
//! - Provider-agnostic request format (model, prompt, generation options)
//! - A structured-output flag for providers with a JSON response mode
//! - Token usage reporting for observability
//! - Error types for common failure modes (rate limits, timeouts, etc.)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for LLM completion calls.
///
/// Implementations connect to external completion APIs and translate
/// between the provider-specific wire format and these types.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generate a single completion for the given request.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError>;

    /// Model identifier used when the request does not override it.
    fn default_model(&self) -> &str;
}

/// Request for an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier; `None` uses the provider default.
    pub model: Option<String>,
    /// The assembled analysis prompt.
    pub prompt: String,
    /// Ask the provider for a JSON-only response where supported.
    pub structured_output: bool,
    /// Generation options.
    pub options: GenerationOptions,
}

impl CompletionRequest {
    /// Creates a request for the given prompt with default options.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            structured_output: false,
            options: GenerationOptions::default(),
        }
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Requests structured (JSON-only) output.
    pub fn with_structured_output(mut self) -> Self {
        self.structured_output = true;
        self
    }

    /// Sets the generation options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Generation options for a completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature for response randomness (0.0 = deterministic).
    pub temperature: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.2,
        }
    }
}

/// Response from an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text; expected to contain a JSON-encoded payload.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
    /// Token usage for observability.
    pub usage: TokenUsage,
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Creates zero usage.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider returned a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text, where available.
        body: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the provider's wire response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AiError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AiError::RateLimited { .. } | AiError::Network(_) | AiError::Timeout { .. }
        )
    }
}
