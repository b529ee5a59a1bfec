pub mod chain_ops;
pub mod chat_ops;
pub mod entry_ops;
pub mod memory_ops;
pub mod relationship_ops;
