//! Event infrastructure for domain event publishing and handling.
//!
//! Provides the transport types used by the event bus:
//! - `EventId` - Unique identifier for events (deduplication)
//! - `EventMetadata` - Correlation context
//! - `EventEnvelope` - Transport wrapper for domain events

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

use super::{DomainError, ErrorCode, Timestamp};

/// Unique identifier for a single event instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random EventId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation context attached to every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Correlates events belonging to the same logical operation.
    pub correlation_id: Option<String>,
}

impl EventMetadata {
    /// Creates metadata with a correlation id.
    pub fn correlated(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
        }
    }
}

/// Transport wrapper for domain events.
///
/// Handlers receive envelopes and deserialize the payload into the
/// concrete event type they expect via [`EventEnvelope::payload_as`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique ID for this event instance.
    pub event_id: EventId,
    /// Event type string used for routing (e.g., "workflow.result.received").
    pub event_type: String,
    /// When the event occurred.
    pub occurred_at: Timestamp,
    /// Serialized event payload.
    pub payload: JsonValue,
    /// Correlation context.
    pub metadata: EventMetadata,
}

impl EventEnvelope {
    /// Creates a new envelope for the given event type and payload.
    pub fn new(event_type: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            occurred_at: Timestamp::now(),
            payload,
            metadata: EventMetadata::default(),
        }
    }

    /// Sets the correlation id.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.metadata.correlation_id = Some(correlation_id.into());
        self
    }

    /// Deserializes the payload into a concrete event type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError` with `ErrorCode::EventBusError` if the payload
    /// does not match the expected type.
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, DomainError> {
        serde_json::from_value(self.payload.clone()).map_err(|e| {
            DomainError::new(
                ErrorCode::EventBusError,
                format!("payload does not match expected type: {}", e),
            )
            .with_detail("event_type", self.event_type.clone())
        })
    }
}
