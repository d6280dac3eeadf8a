use crate::types::{StatusSnapshot, TaskOutcome};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Omitted fields fall back to the configured agent defaults.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InitRequest {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub max_steps: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ChatResponse {
    pub result: String,
    pub steps: usize,
    pub success: bool,
}

impl From<TaskOutcome> for ChatResponse {
    fn from(outcome: TaskOutcome) -> Self {
        let success = outcome.is_success();
        let steps = outcome.steps();
        let result = match outcome {
            TaskOutcome::Completed { result, .. } => result,
            TaskOutcome::Failed { reason } => reason,
        };
        Self {
            result,
            steps,
            success,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StatusResponse {
    pub initialized: bool,
    pub step_count: usize,
}

impl From<StatusSnapshot> for StatusResponse {
    fn from(snapshot: StatusSnapshot) -> Self {
        Self {
            initialized: snapshot.initialized,
            step_count: snapshot.step_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}
