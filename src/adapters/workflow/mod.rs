//! Workflow engine adapters.

mod mock_trigger;
mod n8n_trigger;

pub use mock_trigger::MockWorkflowTrigger;
pub use n8n_trigger::{N8nTrigger, N8nTriggerConfig};
