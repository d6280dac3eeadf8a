// REST API tests - exercising the four /api endpoints in-process
//
// Requests go straight through the router with `oneshot`; no socket is bound.

#[path = "../support/mod.rs"]
mod support;

use autoglm_core::config::{AgentDefaults, ServerSettings};
use autoglm_core::server::{
    ChatResponse, ErrorResponse, MessageResponse, ServerState, StatusResponse, build_router,
};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use support::{BROKEN_MODEL, FAILING_MODEL, stub_controller};
use tower::ServiceExt;

fn app() -> Router {
    let defaults = AgentDefaults {
        model_name: "stub".into(),
        ..AgentDefaults::default()
    };
    let state = Arc::new(ServerState::new(stub_controller(), defaults));
    let settings = ServerSettings {
        static_dir: PathBuf::from("/nonexistent/autoglm/frontend"),
        ..ServerSettings::default()
    };
    build_router(state, &settings)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn send_raw(
    app: &Router,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body)).expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).expect("error body is JSON");
    (status, value)
}

async fn init(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/init", Some(body)).await
}

async fn chat(app: &Router, message: &str) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/chat", Some(json!({ "message": message }))).await
}

#[tokio::test]
async fn status_is_uninitialized_at_startup() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: StatusResponse = serde_json::from_value(body).expect("status body");
    assert_eq!(
        body,
        StatusResponse {
            initialized: false,
            step_count: 0
        }
    );
}

#[tokio::test]
async fn chat_before_init_returns_client_error_with_detail() {
    let app = app();
    let (status, body) = chat(&app, "open settings").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: ErrorResponse = serde_json::from_value(body).expect("error body");
    assert_eq!(body.detail, "Agent not initialized. Call /api/init first.");
}

#[tokio::test]
async fn init_then_chat_runs_the_task() {
    let app = app();
    let (status, body) = init(&app, json!({ "device_id": "emulator-5554" })).await;
    assert_eq!(status, StatusCode::OK);
    let body: MessageResponse = serde_json::from_value(body).expect("init body");
    assert!(body.success);
    assert_eq!(body.message, "Agent initialized");

    let (status, body) = chat(&app, "open the clock").await;
    assert_eq!(status, StatusCode::OK);
    let body: ChatResponse = serde_json::from_value(body).expect("chat body");
    assert_eq!(
        body,
        ChatResponse {
            result: "done 'open the clock' on emulator-5554".into(),
            steps: 3,
            success: true,
        }
    );

    let (_, body) = send(&app, Method::GET, "/api/status", None).await;
    assert_eq!(body, json!({ "initialized": true, "step_count": 0 }));
}

#[tokio::test]
async fn failed_task_is_reported_in_the_body() {
    let app = app();
    let (status, _) = init(&app, json!({ "model_name": FAILING_MODEL })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = chat(&app, "call mom").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "result": "device went offline", "steps": 0, "success": false })
    );
}

#[tokio::test]
async fn empty_message_is_rejected() {
    let app = app();
    init(&app, json!({})).await;
    let (status, body) = chat(&app, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().is_some());
}

#[tokio::test]
async fn invalid_init_requests_are_rejected() {
    let app = app();

    let (status, body) = init(&app, json!({ "base_url": "not a url" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["detail"]
            .as_str()
            .is_some_and(|detail| detail.contains("base_url"))
    );

    let (status, _) = init(&app, json!({ "max_steps": -3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = init(&app, json!({ "model_name": BROKEN_MODEL })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/api/status", None).await;
    assert_eq!(body["initialized"], json!(false));
}

#[tokio::test]
async fn reset_always_succeeds() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Agent reset" }));

    init(&app, json!({})).await;
    let (status, _) = send(&app, Method::POST, "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, "/api/status", None).await;
    assert_eq!(body, json!({ "initialized": true, "step_count": 0 }));
}

#[tokio::test]
async fn openapi_document_lists_the_endpoints() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api-doc/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    for path in ["/api/init", "/api/chat", "/api/status", "/api/reset"] {
        assert!(body["paths"].get(path).is_some(), "missing {path}");
    }
}

#[tokio::test]
async fn unknown_path_without_front_end_is_not_found() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/dashboard", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/chat")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn undecodable_bodies_answer_with_json_detail() {
    let app = app();
    init(&app, json!({})).await;

    let cases = [
        ("/api/chat", Some("application/json"), "{\"message\": ", StatusCode::BAD_REQUEST),
        ("/api/chat", Some("application/json"), "{\"text\": \"hi\"}", StatusCode::UNPROCESSABLE_ENTITY),
        ("/api/chat", None, "{\"message\": \"hi\"}", StatusCode::UNSUPPORTED_MEDIA_TYPE),
        ("/api/init", Some("application/json"), "not json", StatusCode::BAD_REQUEST),
        ("/api/init", Some("application/json"), "{\"max_steps\": \"ten\"}", StatusCode::UNPROCESSABLE_ENTITY),
    ];

    for (uri, content_type, body, expected) in cases {
        let (status, value) = send_raw(&app, uri, content_type, body).await;
        assert_eq!(status, expected, "{uri} {body}");
        let detail = serde_json::from_value::<ErrorResponse>(value)
            .expect("ErrorResponse body")
            .detail;
        assert!(!detail.is_empty(), "{uri} {body}");
    }
}
