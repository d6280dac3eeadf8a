//! Reference phone agent: an OpenAI-compatible vision model driving an
//! Android device over adb.

mod action;
mod agent;
mod prompt;

pub use action::{AgentAction, GridPoint, ScreenAction, parse_action};
pub use agent::PhoneAgent;

use crate::agent::{Agent, AgentError, AgentFactory};
use crate::config::AgentDefaults;
use crate::device::AdbDevice;
use crate::model::OpenAiClient;
use crate::types::{AgentConfig, ModelConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builds [`PhoneAgent`]s wired to a real model endpoint and adb.
#[derive(Debug, Clone)]
pub struct PhoneAgentFactory {
    adb_path: PathBuf,
    request_timeout: Duration,
}

impl PhoneAgentFactory {
    pub fn new(adb_path: impl Into<PathBuf>, request_timeout: Duration) -> Self {
        Self {
            adb_path: adb_path.into(),
            request_timeout,
        }
    }

    pub fn from_defaults(defaults: &AgentDefaults) -> Self {
        Self::new(
            defaults.adb_path.clone(),
            Duration::from_secs(defaults.request_timeout_secs),
        )
    }
}

impl AgentFactory for PhoneAgentFactory {
    fn create(
        &self,
        model: ModelConfig,
        agent: AgentConfig,
    ) -> Result<Box<dyn Agent>, AgentError> {
        let client = OpenAiClient::new(&model, self.request_timeout)?;
        let device = AdbDevice::new(self.adb_path.clone(), agent.device_id.clone());
        debug!(
            adb = %self.adb_path.display(),
            device = agent.device_id.as_deref(),
            "Constructed phone agent"
        );
        Ok(Box::new(PhoneAgent::new(
            Arc::new(client),
            Arc::new(device),
            agent,
        )))
    }
}
