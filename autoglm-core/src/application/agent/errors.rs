use crate::device::DeviceError;
use crate::model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("invalid agent action: {0}")]
    InvalidAction(String),
    #[error("agent exceeded the maximum of {max_steps} steps")]
    StepLimitExceeded { max_steps: usize },
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    pub fn invalid_action(reason: impl Into<String>) -> Self {
        Self::InvalidAction(reason.into())
    }
}
