use super::super::dto::{
    ChatRequest, ChatResponse, ErrorResponse, InitRequest, MessageResponse, StatusResponse,
};
use super::super::error::{ApiRejection, json_rejection, reject, session_rejection};
use super::super::state::ServerState;
use crate::session::{ConfigurationError, SessionError};
use crate::types::{AgentConfig, ModelConfig};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[utoipa::path(
    post,
    path = "/api/init",
    tag = "agent",
    request_body = InitRequest,
    responses(
        (status = 200, description = "Agent initialized", body = MessageResponse),
        (status = 400, description = "Invalid model or agent configuration, or malformed JSON", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 422, description = "JSON does not match the request schema", body = ErrorResponse)
    )
)]
pub async fn init_handler(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<InitRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiRejection> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(%rejection, "Rejecting undecodable /api/init body");
        json_rejection(rejection)
    })?;
    let defaults = state.defaults();
    let max_steps = match payload.max_steps {
        Some(value) => usize::try_from(value).map_err(|_| {
            let error = SessionError::from(ConfigurationError::InvalidMaxSteps { value });
            warn!(%error, "Rejecting /api/init request");
            session_rejection(&error)
        })?,
        None => defaults.max_steps,
    };

    let model = ModelConfig::new(
        payload.base_url.unwrap_or_else(|| defaults.base_url.clone()),
        payload
            .model_name
            .unwrap_or_else(|| defaults.model_name.clone()),
    )
    .with_api_key(defaults.api_key.clone());
    let agent = AgentConfig {
        max_steps,
        device_id: payload.device_id.filter(|id| !id.trim().is_empty()),
        verbose: true,
    };

    info!(
        base_url = model.base_url.as_str(),
        model = model.model_name.as_str(),
        "Received /api/init request"
    );

    match state.controller().initialize(model, agent).await {
        Ok(session_id) => {
            info!(%session_id, "Agent initialized via REST");
            Ok(Json(MessageResponse::ok("Agent initialized")))
        }
        Err(error) => {
            error!(%error, "Agent initialization failed");
            Err(session_rejection(&error))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "agent",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Task finished; `success` tells whether the agent completed it", body = ChatResponse),
        (status = 400, description = "Empty message, agent not initialized, or malformed JSON", body = ErrorResponse),
        (status = 415, description = "Body is not JSON", body = ErrorResponse),
        (status = 422, description = "JSON does not match the request schema", body = ErrorResponse)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiRejection> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(%rejection, "Rejecting undecodable /api/chat body");
        json_rejection(rejection)
    })?;
    if payload.message.trim().is_empty() {
        error!("Rejecting /api/chat request due to empty message");
        return Err(reject(StatusCode::BAD_REQUEST, "message cannot be empty"));
    }

    match state.controller().run_task(&payload.message).await {
        Ok(outcome) => Ok(Json(ChatResponse::from(outcome))),
        Err(error) => {
            warn!(%error, "Rejecting /api/chat request");
            Err(session_rejection(&error))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/status",
    tag = "agent",
    responses(
        (status = 200, description = "Current session status", body = StatusResponse)
    )
)]
pub async fn status_handler(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(StatusResponse::from(state.controller().status().await))
}

#[utoipa::path(
    post,
    path = "/api/reset",
    tag = "agent",
    responses(
        (status = 200, description = "Agent state cleared (no-op without a session)", body = MessageResponse)
    )
)]
pub async fn reset_handler(State(state): State<Arc<ServerState>>) -> Json<MessageResponse> {
    state.controller().reset().await;
    Json(MessageResponse::ok("Agent reset"))
}
