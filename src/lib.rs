pub mod config;
pub mod errors;
pub mod middleware;

pub use config::{load_configuration, Settings};
pub use errors::ConfigError;
