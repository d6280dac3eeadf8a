use super::action::{AgentAction, parse_action};
use super::prompt;
use crate::agent::{Agent, AgentError};
use crate::device::DeviceBridge;
use crate::model::{ChatMessage, ModelClient};
use crate::types::AgentConfig;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Screenshot, ask the model, act; repeat until the model calls `finish`
/// or the step budget runs out.
pub struct PhoneAgent {
    model: Arc<dyn ModelClient>,
    device: Arc<dyn DeviceBridge>,
    config: AgentConfig,
    steps: AtomicUsize,
    context: Mutex<Vec<ChatMessage>>,
}

impl PhoneAgent {
    pub fn new(
        model: Arc<dyn ModelClient>,
        device: Arc<dyn DeviceBridge>,
        config: AgentConfig,
    ) -> Self {
        Self {
            model,
            device,
            config,
            steps: AtomicUsize::new(0),
            context: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// One observe-think-act cycle. Returns the final message once the model
    /// finishes.
    async fn step(&self, task: Option<&str>) -> Result<Option<String>, AgentError> {
        let screen = self.device.screenshot().await?;
        let text = match task {
            Some(task) => prompt::first_turn(task, screen.width, screen.height),
            None => prompt::screen_info(screen.width, screen.height),
        };

        let messages = {
            let mut context = self.lock_context();
            if context.is_empty() {
                context.push(ChatMessage::system(prompt::system_prompt()));
            }
            context.push(ChatMessage::user_with_image(text, &screen.png_base64));
            context.clone()
        };

        let reply = self.model.chat(messages).await?;
        let step = self.steps.fetch_add(1, Ordering::SeqCst) + 1;
        if self.config.verbose {
            info!(step, reply = reply.trim(), "Model replied");
        } else {
            debug!(step, "Model replied");
        }

        {
            let mut context = self.lock_context();
            if let Some(last) = context.last_mut() {
                last.strip_images();
            }
            context.push(ChatMessage::assistant(reply.clone()));
        }

        match parse_action(&reply)? {
            AgentAction::Finish { message } => Ok(Some(message)),
            AgentAction::Do(action) => {
                let device_action = action.to_device(screen.width, screen.height);
                debug!(step, action = ?device_action, "Performing device action");
                self.device.perform(&device_action).await?;
                Ok(None)
            }
        }
    }

    fn lock_context(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Agent for PhoneAgent {
    async fn run(&self, task: &str) -> Result<String, AgentError> {
        self.reset();
        let mut pending_task = Some(task);

        loop {
            if self.step_count() >= self.config.max_steps {
                return Err(AgentError::StepLimitExceeded {
                    max_steps: self.config.max_steps,
                });
            }
            if let Some(message) = self.step(pending_task.take()).await? {
                return Ok(message);
            }
        }
    }

    fn step_count(&self) -> usize {
        self.steps.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.steps.store(0, Ordering::SeqCst);
        self.lock_context().clear();
    }
}
