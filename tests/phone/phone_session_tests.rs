// Phone agent session tests - the reference agent behind the session controller
//
// A scripted model and a recording device stand in for the remote endpoint
// and adb, so whole task episodes run in-process.

use async_trait::async_trait;
use autoglm_core::agent::{Agent, AgentError};
use autoglm_core::device::{DeviceAction, DeviceBridge, DeviceError, Point, Screenshot};
use autoglm_core::model::{ChatMessage, ModelClient, ModelError};
use autoglm_core::phone::PhoneAgent;
use autoglm_core::session::{SessionController, SessionRegistry};
use autoglm_core::types::{AgentConfig, ModelConfig, TaskOutcome};
use std::sync::Arc;
use tokio::sync::Mutex;

struct ScriptedModel {
    replies: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
        })
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    fn endpoint(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, _messages: Vec<ChatMessage>) -> Result<String, ModelError> {
        let mut replies = self.replies.lock().await;
        match replies.len() {
            0 => Err(ModelError::invalid_response("scripted", "script exhausted")),
            1 => Ok(replies[0].clone()),
            _ => Ok(replies.remove(0)),
        }
    }
}

#[derive(Default)]
struct RecordingDevice {
    actions: Mutex<Vec<DeviceAction>>,
}

#[async_trait]
impl DeviceBridge for RecordingDevice {
    async fn screenshot(&self) -> Result<Screenshot, DeviceError> {
        Ok(Screenshot {
            png_base64: "iVBORw0KGgo=".into(),
            width: 1080,
            height: 2400,
        })
    }

    async fn perform(&self, action: &DeviceAction) -> Result<(), DeviceError> {
        self.actions.lock().await.push(action.clone());
        Ok(())
    }
}

async fn phone_controller(
    replies: &'static [&'static str],
    device: Arc<RecordingDevice>,
    max_steps: usize,
) -> SessionController {
    let factory = move |_model: ModelConfig, agent: AgentConfig| {
        let phone: Box<dyn Agent> = Box::new(PhoneAgent::new(
            ScriptedModel::new(replies),
            device.clone(),
            agent,
        ));
        Ok::<_, AgentError>(phone)
    };
    let controller = SessionController::new(Arc::new(SessionRegistry::new()), Arc::new(factory));
    controller
        .initialize(
            ModelConfig::new("http://localhost:8080/v1", "autoglm-phone-9b"),
            AgentConfig {
                max_steps,
                device_id: None,
                verbose: false,
            },
        )
        .await
        .expect("initialize");
    controller
}

#[tokio::test]
async fn completes_a_task_and_scales_actions_to_the_screen() {
    let device = Arc::new(RecordingDevice::default());
    let controller = phone_controller(
        &[
            "<answer>do(action=\"Tap\", element=[500, 500])</answer>",
            "<answer>do(action=\"Type\", text=\"coffee\")</answer>",
            "<answer>finish(message=\"Searched for coffee\")</answer>",
        ],
        device.clone(),
        10,
    )
    .await;

    let outcome = controller.run_task("search for coffee").await.expect("run");
    assert_eq!(
        outcome,
        TaskOutcome::Completed {
            result: "Searched for coffee".into(),
            steps: 3,
        }
    );

    let actions = device.actions.lock().await.clone();
    assert_eq!(
        actions,
        vec![
            DeviceAction::Tap(Point { x: 540, y: 1200 }),
            DeviceAction::Type("coffee".into()),
        ]
    );
    assert_eq!(controller.status().await.step_count, 0);
}

#[tokio::test]
async fn step_budget_exhaustion_fails_the_task() {
    let device = Arc::new(RecordingDevice::default());
    let controller = phone_controller(
        &["<answer>do(action=\"Back\")</answer>"],
        device.clone(),
        2,
    )
    .await;

    let outcome = controller.run_task("go somewhere").await.expect("run");
    assert_eq!(
        outcome,
        TaskOutcome::Failed {
            reason: "agent exceeded the maximum of 2 steps".into(),
        }
    );
    assert_eq!(device.actions.lock().await.len(), 2);
}

#[tokio::test]
async fn unparseable_model_output_fails_the_task() {
    let device = Arc::new(RecordingDevice::default());
    let controller = phone_controller(&["I am not sure what to do."], device.clone(), 5).await;

    let outcome = controller.run_task("open mail").await.expect("run");
    assert!(!outcome.is_success());
    assert_eq!(outcome.steps(), 0);
    assert!(device.actions.lock().await.is_empty());
}
