use super::dto::ErrorResponse;
use crate::session::SessionError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub(crate) type ApiRejection = (StatusCode, Json<ErrorResponse>);

pub(crate) fn reject(status: StatusCode, detail: impl Into<String>) -> ApiRejection {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}

/// Both session errors are caller mistakes: no session yet, or a bad config.
pub(crate) fn session_rejection(error: &SessionError) -> ApiRejection {
    reject(StatusCode::BAD_REQUEST, error.to_string())
}

/// Undecodable bodies keep axum's status code but answer in the API's
/// `{"detail": ...}` shape.
pub(crate) fn json_rejection(rejection: JsonRejection) -> ApiRejection {
    reject(rejection.status(), rejection.body_text())
}
