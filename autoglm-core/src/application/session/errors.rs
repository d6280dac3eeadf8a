use crate::agent::AgentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Agent not initialized. Call /api/init first.")]
    NotInitialized,
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Rejected model or agent configuration. The registry is left untouched.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("invalid base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("model_name must not be empty")]
    EmptyModelName,
    #[error("max_steps must be a positive integer, got {value}")]
    InvalidMaxSteps { value: i64 },
    #[error("failed to construct agent: {source}")]
    Construction {
        #[source]
        source: AgentError,
    },
}

impl ConfigurationError {
    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl From<AgentError> for ConfigurationError {
    fn from(source: AgentError) -> Self {
        Self::Construction { source }
    }
}
