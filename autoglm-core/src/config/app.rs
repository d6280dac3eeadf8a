use super::error::ConfigError;
use crate::constants::{
    DEFAULT_ADB_PATH, DEFAULT_BASE_URL, DEFAULT_CORS_ORIGIN, DEFAULT_HOST, DEFAULT_MAX_STEPS,
    DEFAULT_MODEL_NAME, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_STATIC_DIR,
};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

/// Application configuration loaded from server.toml
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub agent: AgentDefaults,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration from TOML text. `origin` is only used in errors.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, origin)
    }
}

/// HTTP listener and front-end settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub static_dir: PathBuf,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|err| ConfigError::InvalidBind {
                addr: addr.clone(),
                reason: err.to_string(),
            })?
            .next()
            .ok_or_else(|| ConfigError::InvalidBind {
                addr,
                reason: "no addresses resolved".to_string(),
            })
    }
}

/// Values used when an `/api/init` request omits a field, plus settings the
/// reference phone agent needs that never travel over the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDefaults {
    pub base_url: String,
    pub model_name: String,
    pub max_steps: usize,
    /// Resolved key value, not the environment variable name.
    pub api_key: Option<String>,
    pub adb_path: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
            api_key: None,
            adb_path: PathBuf::from(DEFAULT_ADB_PATH),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
