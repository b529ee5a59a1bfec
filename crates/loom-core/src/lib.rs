//! # loom-core
//!
//! Foundation crate for the Loom multi-agent memory coordination fabric.
//! Defines the shared entry/memory/chain/relationship data model, the
//! wire contracts between agent runtimes and the Store, error types, and
//! per-component configuration. Every other crate in the workspace
//! depends on this one.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod session_pointer;
pub mod traits;

pub use config::LoomConfig;
pub use errors::{LoomError, LoomResult};
