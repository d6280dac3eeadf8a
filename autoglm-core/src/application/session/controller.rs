use super::errors::{ConfigurationError, SessionError};
use super::registry::SessionRegistry;
use crate::agent::AgentFactory;
use crate::types::{AgentConfig, ModelConfig, StatusSnapshot, TaskOutcome};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

const PREVIEW_CHARS: usize = 80;

/// Executes session commands against the registry's current agent.
///
/// The controller holds no session reference between calls; every command
/// fetches the slot fresh.
pub struct SessionController {
    registry: Arc<SessionRegistry>,
    factory: Arc<dyn AgentFactory>,
}

impl SessionController {
    pub fn new(registry: Arc<SessionRegistry>, factory: Arc<dyn AgentFactory>) -> Self {
        Self { registry, factory }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Build a new agent and install it, replacing any current session.
    ///
    /// On error the registry is unchanged and a previous session stays usable.
    pub async fn initialize(
        &self,
        model: ModelConfig,
        agent: AgentConfig,
    ) -> Result<Uuid, SessionError> {
        validate_model_config(&model)?;
        validate_agent_config(&agent)?;

        info!(
            base_url = model.base_url.as_str(),
            model = model.model_name.as_str(),
            max_steps = agent.max_steps,
            device = agent.device_id.as_deref(),
            "Initializing agent session"
        );

        let instance = self
            .factory
            .create(model, agent)
            .map_err(ConfigurationError::from)?;
        Ok(self.registry.set(instance).await)
    }

    /// Run one task episode.
    ///
    /// Agent failures are folded into [`TaskOutcome::Failed`]; only a missing
    /// session is reported as an error. The agent is reset after every run.
    pub async fn run_task(&self, task: &str) -> Result<TaskOutcome, SessionError> {
        let (session, _gate) = self
            .registry
            .acquire()
            .await
            .ok_or(SessionError::NotInitialized)?;
        let agent = session.agent();

        info!(
            session_id = %session.id(),
            task = preview(task).as_str(),
            "Running task"
        );

        let outcome = match agent.run(task).await {
            Ok(result) => {
                let steps = agent.step_count();
                info!(session_id = %session.id(), steps, "Task completed");
                TaskOutcome::Completed { result, steps }
            }
            Err(error) => {
                warn!(session_id = %session.id(), %error, "Task failed");
                TaskOutcome::Failed {
                    reason: error.to_string(),
                }
            }
        };
        agent.reset();
        Ok(outcome)
    }

    pub async fn status(&self) -> StatusSnapshot {
        match self.registry.get().await {
            Some(session) => StatusSnapshot {
                initialized: true,
                step_count: session.agent().step_count(),
            },
            None => StatusSnapshot::uninitialized(),
        }
    }

    /// Reset the current agent. A no-op without a session.
    pub async fn reset(&self) {
        let Some((session, _gate)) = self.registry.acquire().await else {
            debug!("Reset requested without an agent session");
            return;
        };
        session.agent().reset();
        info!(session_id = %session.id(), "Agent session reset");
    }
}

fn validate_model_config(model: &ModelConfig) -> Result<(), ConfigurationError> {
    let url = Url::parse(model.base_url.trim())
        .map_err(|err| ConfigurationError::invalid_base_url(&model.base_url, err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigurationError::invalid_base_url(
            &model.base_url,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(ConfigurationError::invalid_base_url(
            &model.base_url,
            "missing host",
        ));
    }
    if model.model_name.trim().is_empty() {
        return Err(ConfigurationError::EmptyModelName);
    }
    Ok(())
}

fn validate_agent_config(agent: &AgentConfig) -> Result<(), ConfigurationError> {
    if agent.max_steps == 0 {
        return Err(ConfigurationError::InvalidMaxSteps { value: 0 });
    }
    Ok(())
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
