//! In-memory event bus.
//!
//! Synchronous, in-process delivery: `publish` awaits every subscribed
//! handler before returning. This is the notification channel between the
//! workflow callback webhook and the notification handler, and doubles as
//! a deterministic bus for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::warn;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// In-memory event bus.
///
/// Features:
/// - Synchronous delivery (deterministic for tests)
/// - Event capture for assertions
/// - Handler registration and invocation
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned.
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(Vec::new()),
        }
    }

    // === Test Helpers ===

    /// Returns all published events (for test assertions).
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .clone()
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .iter()
            .any(|e| e.event_type == event_type)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .push(event.clone());

        // Clone handlers to release the lock before await points.
        let type_handlers: Vec<Arc<dyn EventHandler>> = {
            let handlers = self
                .handlers
                .read()
                .expect("InMemoryEventBus: handlers lock poisoned");
            handlers.get(&event.event_type).cloned().unwrap_or_default()
        };

        for handler in type_handlers {
            if let Err(err) = handler.handle(event.clone()).await {
                // Handlers are isolated; one failure must not starve the rest.
                warn!(
                    handler = handler.name(),
                    event_type = %event.event_type,
                    error = %err,
                    "event handler failed"
                );
            }
        }

        Ok(())
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        self.handlers
            .write()
            .expect("InMemoryEventBus: handlers write lock poisoned")
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        count: AtomicUsize,
        fail: bool,
    }

    impl CountingHandler {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                count: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _event: EventEnvelope) -> Result<(), DomainError> {
            self.count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(DomainError::new(
                    crate::domain::foundation::ErrorCode::InternalError,
                    "handler exploded",
                ))
            } else {
                Ok(())
            }
        }

        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    #[tokio::test]
    async fn subscribed_handler_receives_matching_events() {
        let bus = InMemoryEventBus::new();
        let handler = CountingHandler::new(false);
        bus.subscribe("a.happened", handler.clone());

        bus.publish(EventEnvelope::new("a.happened", json!({})))
            .await
            .unwrap();
        bus.publish(EventEnvelope::new("b.happened", json!({})))
            .await
            .unwrap();

        assert_eq!(handler.count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.event_count(), 2);
        assert!(bus.has_event("b.happened"));
    }

    #[tokio::test]
    async fn failing_handler_does_not_starve_others() {
        let bus = InMemoryEventBus::new();
        let failing = CountingHandler::new(true);
        let healthy = CountingHandler::new(false);
        bus.subscribe("a.happened", failing.clone());
        bus.subscribe("a.happened", healthy.clone());

        bus.publish(EventEnvelope::new("a.happened", json!({})))
            .await
            .unwrap();

        assert_eq!(failing.count.load(Ordering::SeqCst), 1);
        assert_eq!(healthy.count.load(Ordering::SeqCst), 1);
    }
}
