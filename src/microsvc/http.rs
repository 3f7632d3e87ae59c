//! HTTP transport: maps HTTP requests to command dispatch.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /datasets`: `dataset.create`
//! - `PUT /datasets`: `dataset.update`
//! - `GET /datasets`: `dataset.list`
//! - `GET /datasets/:name`: `dataset.get`
//! - `DELETE /datasets/:name`: `dataset.delete`
//! - `GET /datasets/:name/status`: `dataset.status`
//! - `GET /skill-types`: `skill_type.list`
//! - `GET /health/heartbeat`: `{ "is_alive": true }`
//! - `GET /health`: `{ "ok": true, "commands": [...] }`
//! - `POST /:command`: dispatch any command. Body = JSON input.
//!
//! Request headers become session variables on every route. A dataset name
//! with an organisation prefix is passed URL-encoded in the path
//! (`/datasets/allenai%2Fquoref`).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::service::Service;
use super::session::Session;

type Shared<L> = State<Arc<Service<L>>>;

/// Build an axum `Router` that dispatches through the given service.
pub fn router<L: Send + Sync + 'static>(service: Arc<Service<L>>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/heartbeat", get(heartbeat_handler))
        .route(
            "/datasets",
            get(list_handler).post(create_handler).put(update_handler),
        )
        .route("/datasets/:name", get(get_handler).delete(delete_handler))
        .route("/datasets/:name/status", get(status_handler))
        .route("/skill-types", get(skill_types_handler))
        .route("/:command", post(command_handler))
        .with_state(service)
}

/// Serve the service over HTTP until `shutdown` resolves.
pub async fn serve<L, F>(
    service: Arc<Service<L>>,
    addr: std::net::SocketAddr,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    L: Send + Sync + 'static,
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health_handler<L: Send + Sync + 'static>(State(service): Shared<L>) -> impl IntoResponse {
    let commands: Vec<&str> = service.commands();
    Json(json!({ "ok": true, "commands": commands }))
}

async fn heartbeat_handler() -> impl IntoResponse {
    Json(json!({ "is_alive": true }))
}

async fn create_handler<L: Send + Sync + 'static>(
    State(service): Shared<L>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Response {
    dispatch(&service, "dataset.create", input, &headers)
}

async fn update_handler<L: Send + Sync + 'static>(
    State(service): Shared<L>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Response {
    dispatch(&service, "dataset.update", input, &headers)
}

async fn list_handler<L: Send + Sync + 'static>(
    State(service): Shared<L>,
    headers: HeaderMap,
) -> Response {
    dispatch(&service, "dataset.list", json!({}), &headers)
}

async fn get_handler<L: Send + Sync + 'static>(
    State(service): Shared<L>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    dispatch(&service, "dataset.get", json!({ "name": name }), &headers)
}

async fn delete_handler<L: Send + Sync + 'static>(
    State(service): Shared<L>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    dispatch(&service, "dataset.delete", json!({ "name": name }), &headers)
}

async fn status_handler<L: Send + Sync + 'static>(
    State(service): Shared<L>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    dispatch(&service, "dataset.status", json!({ "name": name }), &headers)
}

async fn skill_types_handler<L: Send + Sync + 'static>(
    State(service): Shared<L>,
    headers: HeaderMap,
) -> Response {
    dispatch(&service, "skill_type.list", json!({}), &headers)
}

/// `POST /:command`: dispatch a command with JSON body and headers as session.
async fn command_handler<L: Send + Sync + 'static>(
    State(service): Shared<L>,
    Path(command): Path<String>,
    headers: HeaderMap,
    Json(input): Json<Value>,
) -> Response {
    dispatch(&service, &command, input, &headers)
}

fn dispatch<L: Send + Sync + 'static>(
    service: &Service<L>,
    command: &str,
    input: Value,
    headers: &HeaderMap,
) -> Response {
    match service.dispatch(command, input, session_from_headers(headers)) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// All headers, lowercased, become session variables.
fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = std::collections::HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(vars)
}
