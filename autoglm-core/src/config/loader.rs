use super::app::{AgentDefaults, AppConfig, ServerSettings};
use super::error::ConfigError;
use crate::constants::{DEFAULT_CONFIG_PATH, ENV_PATH};
use dotenvy::from_filename;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info, warn};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    agent: RawAgent,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    cors_origins: Option<Vec<String>>,
    static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawAgent {
    base_url: Option<String>,
    model_name: Option<String>,
    max_steps: Option<usize>,
    /// Name of the environment variable holding the key.
    api_key: Option<String>,
    adb_path: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        if from_filename(ENV_PATH).is_ok() {
            debug!(path = ENV_PATH, "Loaded environment file");
        }
    });
}

/// Load configuration. Without an explicit path a missing default file means
/// built-in defaults; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(path),
        None => match read_config(Path::new(DEFAULT_CONFIG_PATH)) {
            Err(ConfigError::NotFound { path }) => {
                info!(path = %path.display(), "No configuration file, using defaults");
                Ok(AppConfig::default())
            }
            other => other,
        },
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading server configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

pub(super) fn parse_config(content: &str, origin: &Path) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let server_defaults = ServerSettings::default();
    let agent_defaults = AgentDefaults::default();
    let RawConfig { server, agent } = parsed;

    let host = server.host.unwrap_or(server_defaults.host);
    if host.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "server.host",
            reason: "must not be empty".into(),
        });
    }

    let max_steps = agent.max_steps.unwrap_or(agent_defaults.max_steps);
    if max_steps == 0 {
        return Err(ConfigError::InvalidValue {
            field: "agent.max_steps",
            reason: "must be at least 1".into(),
        });
    }

    let request_timeout_secs = agent
        .request_timeout_secs
        .unwrap_or(agent_defaults.request_timeout_secs);
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "agent.request_timeout_secs",
            reason: "must be at least 1".into(),
        });
    }

    Ok(AppConfig {
        server: ServerSettings {
            host,
            port: server.port.unwrap_or(server_defaults.port),
            cors_origins: server.cors_origins.unwrap_or(server_defaults.cors_origins),
            static_dir: server
                .static_dir
                .map(|dir| expand_path(&dir))
                .unwrap_or(server_defaults.static_dir),
        },
        agent: AgentDefaults {
            base_url: agent.base_url.unwrap_or(agent_defaults.base_url),
            model_name: agent.model_name.unwrap_or(agent_defaults.model_name),
            max_steps,
            api_key: resolve_api_key(agent.api_key.as_deref()),
            adb_path: agent
                .adb_path
                .map(|path| expand_path(&path))
                .unwrap_or(agent_defaults.adb_path),
            request_timeout_secs,
        },
    })
}

/// Resolve the API key from the environment variable named in the config.
pub fn resolve_api_key(var_name: Option<&str>) -> Option<String> {
    let raw = var_name.map(str::trim).filter(|raw| !raw.is_empty())?;
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(env_var = raw, %err, "API key environment variable is not set");
            None
        }
    }
}

fn expand_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::full(raw)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    PathBuf::from(expanded)
}
