//! WebSocket handler streaming presented results to clients.
//!
//! Each connection subscribes to the broadcast presenter and receives
//! every subsequent report or inline error as a JSON text frame. Client
//! frames are ignored; the stream is one-way.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::adapters::presentation::BroadcastPresenter;

/// Shared state for the result stream endpoint.
#[derive(Clone)]
pub struct ResultsAppState {
    pub presenter: Arc<BroadcastPresenter>,
}

impl ResultsAppState {
    pub fn new(presenter: Arc<BroadcastPresenter>) -> Self {
        Self { presenter }
    }
}

/// Upgrade to the result stream.
///
/// GET /api/results/ws
pub async fn results_ws(
    State(state): State<ResultsAppState>,
    ws: WebSocketUpgrade,
) -> Response {
    let receiver = state.presenter.subscribe();
    ws.on_upgrade(move |socket| stream_results(socket, receiver))
}

async fn stream_results(
    socket: WebSocket,
    mut updates: tokio::sync::broadcast::Receiver<crate::adapters::presentation::ResultUpdate>,
) {
    let (mut sink, mut stream) = socket.split();

    let mut forward = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => {
                    let Ok(text) = serde_json::to_string(&update) else {
                        continue;
                    };
                    if sink.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "slow result subscriber skipped updates");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Drain (and ignore) client frames so closes are noticed promptly.
    let mut drain = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut forward => drain.abort(),
        _ = &mut drain => forward.abort(),
    }
}
