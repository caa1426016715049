//! Mock workflow trigger for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{TriggerAck, TriggerRequest, WorkflowError, WorkflowTrigger};

#[derive(Debug, Clone, Copy)]
enum Mode {
    Accept,
    Reject(u16),
}

/// Mock workflow trigger that accepts or rejects every request.
#[derive(Clone)]
pub struct MockWorkflowTrigger {
    mode: Mode,
    requests: Arc<Mutex<Vec<TriggerRequest>>>,
}

impl MockWorkflowTrigger {
    /// A trigger that acknowledges every request.
    pub fn accepting() -> Self {
        Self {
            mode: Mode::Accept,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A trigger that rejects every request with the given status.
    pub fn rejecting(status: u16) -> Self {
        Self {
            mode: Mode::Reject(status),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of trigger calls received.
    pub fn calls(&self) -> usize {
        self.lock().len()
    }

    /// The captured trigger requests.
    pub fn requests(&self) -> Vec<TriggerRequest> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TriggerRequest>> {
        self.requests
            .lock()
            .expect("MockWorkflowTrigger: requests lock poisoned")
    }
}

#[async_trait]
impl WorkflowTrigger for MockWorkflowTrigger {
    async fn trigger(&self, request: TriggerRequest) -> Result<TriggerAck, WorkflowError> {
        let token = request.token;
        self.lock().push(request);
        match self.mode {
            Mode::Accept => Ok(TriggerAck { token }),
            Mode::Reject(status) => Err(WorkflowError::status(status, "rejected by mock")),
        }
    }
}
