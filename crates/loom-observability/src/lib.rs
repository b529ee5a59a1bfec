//! Health/Stats (C12, §4.12): a startup + hourly health-line log, built
//! from the coordination store's lifetime counters, plus the ambient
//! `tracing-subscriber` setup and per-operation span macros every other
//! crate in the workspace logs through.

pub mod health;
pub mod tracing_setup;

pub use health::{log_health_line, run_health_loop, HealthLine};
pub use tracing_setup::init_tracing;
