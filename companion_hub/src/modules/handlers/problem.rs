use super::{internal_error, run_blocking, ErrorResponse};
use crate::modules::extractor::JsonBody;
use axum::{
    extract::{Extension, Path},
    Json,
};
use companion_hub_libs::{
    api::PendingRequestsResponse, model::Problem, registry::PendingRequest, CompanionHub,
};
use std::sync::Arc;

fn log_problem_received(problem: &Problem) {
    tracing::info!(
        "Problem received: name={} group={} url={} TL(ms)={} ML(MB)={} interactive={} tests={}",
        problem.name.as_deref().unwrap_or_default(),
        problem.group.as_deref().unwrap_or_default(),
        problem.url.as_deref().unwrap_or_default(),
        problem.time_limit.unwrap_or(-1),
        problem.memory_limit.unwrap_or(-1),
        problem.interactive.unwrap_or(false),
        problem.tests.len()
    );
}

/// Register the submitted problem and hold the connection until someone
/// accepts or rejects it. The answer is `ok` either way.
pub async fn submit_problem(
    Extension(hub): Extension<Arc<CompanionHub>>,
    JsonBody(problem): JsonBody<Problem>,
) -> Result<&'static str, ErrorResponse> {
    log_problem_received(&problem);

    let (request, decision) = PendingRequest::new(problem.clone());
    let id = request.id.clone();
    hub.registry.add(request).await;
    tracing::info!("Waiting for user approval of request {}", id);

    // A dropped sender means the request vanished without a decision.
    let accepted = decision.await.unwrap_or(false);
    if !accepted {
        tracing::info!("Request {} REJECTED by user", id);
        return Ok("ok");
    }

    tracing::info!("Request {} ACCEPTED by user", id);
    run_blocking(move || hub.materializer.materialize(&problem))
        .await?
        .map_err(|e| {
            let message = format!("failed to save problem: {}", e);
            tracing::error!(message);
            internal_error(message)
        })?;
    tracing::info!("Ready for next problem");

    Ok("ok")
}

pub async fn accept_request(
    Extension(hub): Extension<Arc<CompanionHub>>,
    Path(id): Path<String>,
) -> &'static str {
    if hub.registry.resolve(&id, true).await {
        "Accepted"
    } else {
        tracing::warn!("accept requested for unknown request {}", id);
        "Not found"
    }
}

pub async fn reject_request(
    Extension(hub): Extension<Arc<CompanionHub>>,
    Path(id): Path<String>,
) -> &'static str {
    if hub.registry.resolve(&id, false).await {
        "Rejected"
    } else {
        tracing::warn!("reject requested for unknown request {}", id);
        "Not found"
    }
}

pub async fn pending_requests(
    Extension(hub): Extension<Arc<CompanionHub>>,
) -> Json<PendingRequestsResponse> {
    Json(PendingRequestsResponse::from(hub.registry.list().await))
}
