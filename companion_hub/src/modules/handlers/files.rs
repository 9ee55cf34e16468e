use super::{run_blocking, ErrorResponse};
use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    Json,
};
use companion_hub_libs::{
    api::FileContentResponse,
    workspace::{validate_file_name, Workspace},
    CompanionHub,
};
use http::{header, StatusCode};
use std::{path::PathBuf, sync::Arc};

/// Serve a workspace file as plain text: 404 with an empty body when it is
/// missing, 500 when it cannot be read.
fn plain_text(workspace: &Workspace, path: Option<PathBuf>) -> Response {
    let Some(path) = path.filter(|path| path.is_file()) else {
        return (StatusCode::NOT_FOUND, "").into_response();
    };

    match workspace.read_file_lossy(&path) {
        Ok(content) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            content,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to serve {} cause: {}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "").into_response()
        }
    }
}

fn sample_file(workspace: &Workspace, dir: PathBuf, file_name: &str) -> Response {
    let path = validate_file_name(file_name)
        .map(|name| dir.join(name))
        .map_err(|e| tracing::warn!("rejected file request: {}", e))
        .ok();
    plain_text(workspace, path)
}

pub async fn sample_input(
    Extension(hub): Extension<Arc<CompanionHub>>,
    Path(file_name): Path<String>,
) -> Result<Response, ErrorResponse> {
    run_blocking(move || {
        sample_file(&hub.workspace, hub.workspace.sample_input_dir(), &file_name)
    })
    .await
}

pub async fn sample_output(
    Extension(hub): Extension<Arc<CompanionHub>>,
    Path(file_name): Path<String>,
) -> Result<Response, ErrorResponse> {
    run_blocking(move || {
        sample_file(&hub.workspace, hub.workspace.sample_output_dir(), &file_name)
    })
    .await
}

pub async fn problem_meta(
    Extension(hub): Extension<Arc<CompanionHub>>,
) -> Result<Response, ErrorResponse> {
    run_blocking(move || plain_text(&hub.workspace, Some(hub.workspace.problem_meta_file()))).await
}

/// Content of an actual output file, wrapped in a JSON envelope.
pub async fn file_content(
    Extension(hub): Extension<Arc<CompanionHub>>,
    Path(file_name): Path<String>,
) -> Result<Json<FileContentResponse>, ErrorResponse> {
    let response = run_blocking(move || {
        let failure = |error: String| FileContentResponse {
            success: false,
            content: String::new(),
            error,
        };

        let name = match validate_file_name(&file_name) {
            Ok(name) => name,
            Err(e) => return failure(e.to_string()),
        };
        let path = hub.workspace.output_dir().join(name);
        if !path.is_file() {
            return failure(String::from("File not found"));
        }

        match hub.workspace.read_file_lossy(&path) {
            Ok(content) => FileContentResponse {
                success: true,
                content,
                error: String::new(),
            },
            Err(e) => {
                tracing::error!("failed to read {} cause: {}", path.display(), e);
                failure(e.to_string())
            }
        }
    })
    .await?;

    Ok(Json(response))
}
