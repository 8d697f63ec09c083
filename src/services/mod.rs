// groupmark services
// Services provide the remote store seam, the reorder engine and settings persistence.

pub mod remote_store;
pub mod reorder_engine;
pub mod settings_engine;
