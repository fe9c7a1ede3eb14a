pub mod env;
mod loader;

pub use env::{AiConfig, AiProvider, AppConfig, ConfigError, DirectoryConfig};
pub use loader::load_config;
