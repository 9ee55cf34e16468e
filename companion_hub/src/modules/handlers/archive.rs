use super::{run_blocking, ErrorResponse};
use crate::modules::extractor::JsonBody;
use axum::{
    extract::{Extension, Path},
    Json,
};
use companion_hub_libs::{
    api::{ArchiveListResponse, ArchiveResponse, GroupRenameRequest},
    model::Problem,
    CompanionHub,
};
use std::sync::Arc;

type ArchiveResult = Result<Json<ArchiveResponse>, ErrorResponse>;

pub async fn list_archives(
    Extension(hub): Extension<Arc<CompanionHub>>,
) -> Result<Json<ArchiveListResponse>, ErrorResponse> {
    Ok(Json(run_blocking(move || hub.archives.list()).await?))
}

pub async fn archive_problem(
    Extension(hub): Extension<Arc<CompanionHub>>,
    JsonBody(problem): JsonBody<Problem>,
) -> ArchiveResult {
    Ok(Json(
        run_blocking(move || hub.archives.archive(&problem, false)).await?,
    ))
}

pub async fn archive_problem_overwrite(
    Extension(hub): Extension<Arc<CompanionHub>>,
    JsonBody(problem): JsonBody<Problem>,
) -> ArchiveResult {
    Ok(Json(
        run_blocking(move || hub.archives.archive(&problem, true)).await?,
    ))
}

pub async fn import_archive(
    Extension(hub): Extension<Arc<CompanionHub>>,
    Path((group_name, archive_id)): Path<(String, String)>,
) -> ArchiveResult {
    Ok(Json(
        run_blocking(move || hub.archives.import(&archive_id, &group_name)).await?,
    ))
}

pub async fn delete_archive(
    Extension(hub): Extension<Arc<CompanionHub>>,
    Path((group_name, archive_id)): Path<(String, String)>,
) -> ArchiveResult {
    Ok(Json(
        run_blocking(move || hub.archives.delete(&archive_id, &group_name)).await?,
    ))
}

pub async fn delete_group(
    Extension(hub): Extension<Arc<CompanionHub>>,
    Path(group_name): Path<String>,
) -> ArchiveResult {
    Ok(Json(
        run_blocking(move || hub.archives.delete_group(&group_name)).await?,
    ))
}

pub async fn rename_group(
    Extension(hub): Extension<Arc<CompanionHub>>,
    JsonBody(request): JsonBody<GroupRenameRequest>,
) -> ArchiveResult {
    Ok(Json(
        run_blocking(move || {
            hub.archives
                .rename_group(&request.old_group_name, &request.new_group_name)
        })
        .await?,
    ))
}
