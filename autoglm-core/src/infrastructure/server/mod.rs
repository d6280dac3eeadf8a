//! REST transport: four `/api` endpoints over the session controller, the
//! OpenAPI document, and the single-page front end.

mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use dto::{
    ChatRequest, ChatResponse, ErrorResponse, InitRequest, MessageResponse, StatusResponse,
};
pub use error::ServerError;
pub use state::ServerState;

use crate::config::ServerSettings;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;

/// Assemble the application router without binding a socket.
pub fn build_router(state: Arc<ServerState>, settings: &ServerSettings) -> Router {
    router::build_router(state, settings)
}

/// Serve until Ctrl+C or SIGTERM, then drop the active session.
pub async fn serve(
    state: Arc<ServerState>,
    settings: &ServerSettings,
    addr: SocketAddr,
) -> Result<(), ServerError> {
    router::serve(state, settings, addr).await
}
