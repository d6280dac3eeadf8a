use crate::constants::DEFAULT_MAX_STEPS;

/// Connection settings for the remote model endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub base_url: String,
    pub model_name: String,
    pub api_key: Option<String>,
}

impl ModelConfig {
    pub fn new(base_url: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model_name: model_name.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

/// Behavioural limits for one agent instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub max_steps: usize,
    /// `None` lets the device bridge pick the default device.
    pub device_id: Option<String>,
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            device_id: None,
            verbose: true,
        }
    }
}

/// Result of one task episode.
///
/// Failures are values, not errors: a task that the agent could not finish
/// is still a successfully delivered answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed { result: String, steps: usize },
    Failed { reason: String },
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Completed { .. })
    }

    pub fn result(&self) -> &str {
        match self {
            TaskOutcome::Completed { result, .. } => result,
            TaskOutcome::Failed { reason } => reason,
        }
    }

    /// Steps consumed. Always 0 for a failed task, even if the agent
    /// advanced before failing.
    pub fn steps(&self) -> usize {
        match self {
            TaskOutcome::Completed { steps, .. } => *steps,
            TaskOutcome::Failed { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub initialized: bool,
    pub step_count: usize,
}

impl StatusSnapshot {
    pub fn uninitialized() -> Self {
        Self {
            initialized: false,
            step_count: 0,
        }
    }
}
