pub mod app;
pub mod error;
pub mod loader;

pub use crate::constants::DEFAULT_CONFIG_PATH as CONFIG_PATH;
pub use app::{AgentDefaults, AppConfig, ServerSettings};
pub use error::ConfigError;
pub use loader::{ensure_env_loaded, resolve_api_key};
