use super::dto::{
    ChatRequest, ChatResponse, ErrorResponse, InitRequest, MessageResponse, StatusResponse,
};
use super::routes;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "AutoGLM-GUI API", version = "0.1.0"),
    paths(
        routes::session::init_handler,
        routes::session::chat_handler,
        routes::session::status_handler,
        routes::session::reset_handler
    ),
    components(
        schemas(
            InitRequest,
            MessageResponse,
            ChatRequest,
            ChatResponse,
            StatusResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "agent", description = "Phone agent session control")
    )
)]
pub(super) struct ApiDoc;
