//! Project route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use taskdeck_core::ProjectId;

use crate::error::Result;
use crate::middleware::{ClientIp, TenantContext};
use crate::models::Project;
use crate::response::ApiResponse;
use crate::services::ProjectService;
use crate::services::projects::{CreateProjectRequest, UpdateProjectRequest};
use crate::state::AppState;

/// `GET /projects`
pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<ApiResponse<Vec<Project>>>> {
    let projects = ProjectService::new(state.pool()).list(&ctx).await?;
    Ok(Json(ApiResponse::data(projects)))
}

/// `POST /projects`
pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>)> {
    let project = ProjectService::new(state.pool()).create(&ctx, ip, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(project))))
}

/// `PUT /projects/:id`
pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<ProjectId>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>> {
    let project = ProjectService::new(state.pool())
        .update(&ctx, ip, id, req)
        .await?;
    Ok(Json(ApiResponse::data(project)))
}

/// `DELETE /projects/:id`
pub async fn remove(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<ProjectId>,
) -> Result<Json<ApiResponse<()>>> {
    ProjectService::new(state.pool()).delete(&ctx, ip, id).await?;
    Ok(Json(ApiResponse::message("Project deleted")))
}
