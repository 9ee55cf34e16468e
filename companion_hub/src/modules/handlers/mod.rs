pub mod archive;
pub mod files;
pub mod problem;
pub mod tests;

use axum::{
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

pub type ErrorResponse = (StatusCode, String);

/// Run filesystem work on the blocking pool. A panicked task becomes a 500.
pub async fn run_blocking<F, T>(task: F) -> Result<T, ErrorResponse>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        tracing::error!("blocking task failed cause: {}", e);
        internal_error("unexpected error")
    })
}

pub fn internal_error(message: impl ToString) -> ErrorResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
}

/// Liveness check the browser extension sends before it posts a problem.
async fn options_ok() -> &'static str {
    tracing::info!("[OPTIONS] Health check received");
    "ok"
}

/// Answer a plain `OPTIONS /` ahead of the CORS layer, which would otherwise
/// treat it as a preflight. Real preflights carry
/// `Access-Control-Request-Method` and pass through.
pub async fn answer_options_ping<B>(req: Request<B>, next: Next<B>) -> Response {
    let is_ping = req.method() == Method::OPTIONS
        && req.uri().path() == "/"
        && !req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);
    if !is_ping {
        return next.run(req).await;
    }

    (
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        options_ok().await,
    )
        .into_response()
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
