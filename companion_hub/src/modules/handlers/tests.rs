use super::{internal_error, run_blocking, ErrorResponse};
use crate::modules::extractor::JsonBody;
use axum::{extract::Extension, Json};
use companion_hub_libs::{
    api::{
        ComparisonResult, TestCaseDeleteRequest, TestCaseRequest, TestCaseUpdateRequest,
        TestCasesResponse,
    },
    model::TestCase,
    CompanionHub,
};
use std::sync::Arc;

pub async fn compare_outputs(
    Extension(hub): Extension<Arc<CompanionHub>>,
) -> Result<Json<ComparisonResult>, ErrorResponse> {
    let result = run_blocking(move || hub.comparator.compare())
        .await?
        .map_err(|e| {
            tracing::error!("comparison failed cause: {}", e);
            internal_error(format!("Error comparing outputs: {}", e))
        })?;
    Ok(Json(result))
}

pub async fn list_tests(
    Extension(hub): Extension<Arc<CompanionHub>>,
) -> Result<Json<Vec<TestCase>>, ErrorResponse> {
    let tests = run_blocking(move || hub.tests.list())
        .await?
        .map_err(|e| {
            tracing::error!("failed to list test cases cause: {}", e);
            internal_error(format!("Error listing test cases: {}", e))
        })?;
    Ok(Json(tests))
}

pub async fn add_test(
    Extension(hub): Extension<Arc<CompanionHub>>,
    JsonBody(request): JsonBody<TestCaseRequest>,
) -> Result<Json<TestCasesResponse>, ErrorResponse> {
    let response = run_blocking(move || hub.tests.add(&request.input, &request.output)).await?;
    Ok(Json(response))
}

pub async fn update_test(
    Extension(hub): Extension<Arc<CompanionHub>>,
    JsonBody(request): JsonBody<TestCaseUpdateRequest>,
) -> Result<Json<TestCasesResponse>, ErrorResponse> {
    let response = run_blocking(move || {
        hub.tests
            .update(request.test_number, &request.input, &request.output)
    })
    .await?;
    Ok(Json(response))
}

pub async fn delete_test(
    Extension(hub): Extension<Arc<CompanionHub>>,
    JsonBody(request): JsonBody<TestCaseDeleteRequest>,
) -> Result<Json<TestCasesResponse>, ErrorResponse> {
    let response = run_blocking(move || hub.tests.delete(request.test_number)).await?;
    Ok(Json(response))
}
