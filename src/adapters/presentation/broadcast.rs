//! Broadcast-channel presenter fanning results out to connected clients.
//!
//! Every websocket connection subscribes to the same channel; a merged
//! report or inline error is pushed to all of them. Sending into a channel
//! with no subscribers is not an error - results simply go unobserved,
//! exactly like a dashboard nobody has open.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::analysis::{AnalysisKind, AnalysisReport};
use crate::ports::ResultPresenter;

use super::ResultUpdate;

/// Default buffer per subscriber.
const DEFAULT_CAPACITY: usize = 128;

/// Presenter backed by a tokio broadcast channel.
pub struct BroadcastPresenter {
    sender: broadcast::Sender<ResultUpdate>,
}

impl BroadcastPresenter {
    /// Creates a presenter with the given per-subscriber buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a presenter with the default capacity.
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Subscribes a new client.
    pub fn subscribe(&self) -> broadcast::Receiver<ResultUpdate> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPresenter {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl ResultPresenter for BroadcastPresenter {
    async fn present_report(&self, report: AnalysisReport) {
        let _ = self.sender.send(ResultUpdate::Report { report });
    }

    async fn present_error(&self, kind: AnalysisKind, message: String) {
        let _ = self.sender.send(ResultUpdate::Error { kind, message });
    }
}
