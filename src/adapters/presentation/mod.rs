//! Result presentation adapters.

mod broadcast;
mod memory;
mod messages;

pub use broadcast::BroadcastPresenter;
pub use memory::MemoryPresenter;
pub use messages::ResultUpdate;
