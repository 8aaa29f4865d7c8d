//! User management route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use taskdeck_core::UserId;

use crate::error::Result;
use crate::middleware::{ClientIp, TenantContext};
use crate::models::User;
use crate::response::ApiResponse;
use crate::services::UserService;
use crate::services::users::{CreateUserRequest, UpdateUserRequest};
use crate::state::AppState;

/// `GET /users`
pub async fn list(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<ApiResponse<Vec<User>>>> {
    let users = UserService::new(state.pool()).list(&ctx).await?;
    Ok(Json(ApiResponse::data(users)))
}

/// `POST /users`
pub async fn create(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>)> {
    let user = UserService::new(state.pool()).create(&ctx, ip, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(user))))
}

/// `PUT /users/:id`
pub async fn update(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<UserId>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>> {
    let user = UserService::new(state.pool()).update(&ctx, ip, id, req).await?;
    Ok(Json(ApiResponse::data(user)))
}

/// `DELETE /users/:id`
pub async fn remove(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<()>>> {
    UserService::new(state.pool()).delete(&ctx, ip, id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}
