//! Contract between the session layer and an automation agent.
//!
//! The session layer never looks inside an agent. It constructs one through
//! an [`AgentFactory`], drives it with [`Agent::run`], reads its step counter
//! and resets it between task episodes.

mod errors;

pub use errors::AgentError;

use crate::types::{AgentConfig, ModelConfig};
use async_trait::async_trait;

#[async_trait]
pub trait Agent: Send + Sync {
    /// Execute one task to completion and return the agent's final answer.
    async fn run(&self, task: &str) -> Result<String, AgentError>;

    /// Steps taken since the last reset. Readable while a task is running.
    fn step_count(&self) -> usize;

    /// Clear step counters and conversation state. Configuration is kept.
    fn reset(&self);
}

/// Builds fully constructed agents. A partially built agent is never
/// returned: construction either succeeds or reports an error.
pub trait AgentFactory: Send + Sync {
    fn create(
        &self,
        model: ModelConfig,
        agent: AgentConfig,
    ) -> Result<Box<dyn Agent>, AgentError>;
}

impl<F> AgentFactory for F
where
    F: Fn(ModelConfig, AgentConfig) -> Result<Box<dyn Agent>, AgentError> + Send + Sync,
{
    fn create(
        &self,
        model: ModelConfig,
        agent: AgentConfig,
    ) -> Result<Box<dyn Agent>, AgentError> {
        self(model, agent)
    }
}
