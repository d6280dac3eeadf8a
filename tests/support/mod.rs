// Shared fixtures for integration tests: a stub agent whose behaviour is
// chosen by the model name it was initialized with.

#![allow(dead_code)]

use async_trait::async_trait;
use autoglm_core::agent::{Agent, AgentError, AgentFactory};
use autoglm_core::session::{SessionController, SessionRegistry};
use autoglm_core::types::{AgentConfig, ModelConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Model name that makes the factory refuse to build an agent.
pub const BROKEN_MODEL: &str = "broken-model";
/// Model name whose agent fails every task after two steps.
pub const FAILING_MODEL: &str = "failing-model";
/// Model name whose agent waits on [`StubAgent::release`] mid-task.
pub const GATED_MODEL: &str = "gated-model";

pub struct StubAgent {
    model_name: String,
    device_id: Option<String>,
    steps: AtomicUsize,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl StubAgent {
    fn new(model: ModelConfig, agent: AgentConfig, gate: &TaskGate) -> Self {
        Self {
            model_name: model.model_name,
            device_id: agent.device_id,
            steps: AtomicUsize::new(0),
            started: Arc::clone(&gate.started),
            release: Arc::clone(&gate.release),
        }
    }
}

#[async_trait]
impl Agent for StubAgent {
    async fn run(&self, task: &str) -> Result<String, AgentError> {
        match self.model_name.as_str() {
            FAILING_MODEL => {
                self.steps.fetch_add(2, Ordering::SeqCst);
                Err(AgentError::Other("device went offline".into()))
            }
            GATED_MODEL => {
                self.steps.fetch_add(3, Ordering::SeqCst);
                self.started.notify_one();
                self.release.notified().await;
                self.steps.fetch_add(1, Ordering::SeqCst);
                Ok(format!("finished: {task}"))
            }
            _ => {
                let words = task.split_whitespace().count().max(1);
                self.steps.fetch_add(words, Ordering::SeqCst);
                let device = self.device_id.as_deref().unwrap_or("default device");
                Ok(format!("done '{task}' on {device}"))
            }
        }
    }

    fn step_count(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.steps.store(0, Ordering::SeqCst);
    }
}

/// Lets a test observe and release a gated task.
#[derive(Clone, Default)]
pub struct TaskGate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

pub fn stub_factory(gate: TaskGate) -> Arc<dyn AgentFactory> {
    Arc::new(
        move |model: ModelConfig, agent: AgentConfig| -> Result<Box<dyn Agent>, AgentError> {
            if model.model_name == BROKEN_MODEL {
                return Err(AgentError::Other("model weights unavailable".into()));
            }
            Ok(Box::new(StubAgent::new(model, agent, &gate)))
        },
    )
}

pub fn stub_controller() -> SessionController {
    gated_controller(TaskGate::default())
}

pub fn gated_controller(gate: TaskGate) -> SessionController {
    SessionController::new(Arc::new(SessionRegistry::new()), stub_factory(gate))
}

pub fn model(name: &str) -> ModelConfig {
    ModelConfig::new("http://localhost:8080/v1", name)
}
