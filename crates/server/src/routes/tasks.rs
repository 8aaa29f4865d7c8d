//! Task route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use taskdeck_core::{ProjectId, TaskId};

use crate::error::Result;
use crate::middleware::{ClientIp, TenantContext};
use crate::models::Task;
use crate::response::ApiResponse;
use crate::services::TaskService;
use crate::services::tasks::{CreateTaskRequest, UpdateTaskRequest, UpdateTaskStatusRequest};
use crate::state::AppState;

/// `GET /projects/:projectId/tasks`
pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<ApiResponse<Vec<Task>>>> {
    let tasks = TaskService::new(state.pool()).list(&ctx, project_id).await?;
    Ok(Json(ApiResponse::data(tasks)))
}

/// `POST /projects/:projectId/tasks`
pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Path(project_id): Path<ProjectId>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Task>>)> {
    let task = TaskService::new(state.pool())
        .create(&ctx, ip, project_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(task))))
}

/// `PUT /tasks/:id`
pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<TaskId>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<ApiResponse<Task>>> {
    let task = TaskService::new(state.pool()).update(&ctx, ip, id, req).await?;
    Ok(Json(ApiResponse::data(task)))
}

/// `PATCH /tasks/:id/status`
pub async fn update_status(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<TaskId>,
    Json(req): Json<UpdateTaskStatusRequest>,
) -> Result<Json<ApiResponse<Task>>> {
    let task = TaskService::new(state.pool())
        .update_status(&ctx, ip, id, req)
        .await?;
    Ok(Json(ApiResponse::data(task)))
}

/// `DELETE /tasks/:id`
pub async fn remove(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<TaskId>,
) -> Result<Json<ApiResponse<()>>> {
    TaskService::new(state.pool()).delete(&ctx, ip, id).await?;
    Ok(Json(ApiResponse::message("Task deleted")))
}
