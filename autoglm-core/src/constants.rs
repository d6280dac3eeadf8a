//! Application constants
//!
//! Single source of truth for paths and defaults.

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/server.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Built front end, relative to the working directory
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";
pub const DEFAULT_MODEL_NAME: &str = "autoglm-phone-9b";
pub const DEFAULT_MAX_STEPS: usize = 100;

pub const DEFAULT_ADB_PATH: &str = "adb";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
