pub mod config_store;
pub mod network;
pub mod runner;

pub use config_store::{ConfigError, ConfigUpdateResult, ProxyConfigStore};
pub use runner::{ProxyOptimizer, RunError, RunReport};
