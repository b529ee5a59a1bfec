pub mod import;
pub mod run_agent;
pub mod serve;
