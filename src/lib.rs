pub mod booter;
pub mod config;
pub mod core;
pub mod orchestrator;
pub mod server;
pub mod utils;
