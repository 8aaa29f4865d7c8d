//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};

use crate::error::Result;
use crate::middleware::{AuthContext, ClientIp};
use crate::response::ApiResponse;
use crate::services::AuthService;
use crate::services::auth::{
    LoginRequest, LoginResponse, MeResponse, RegisterTenantRequest, RegisterTenantResponse,
};
use crate::state::AppState;

/// `POST /auth/register-tenant`
pub async fn register_tenant(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<RegisterTenantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterTenantResponse>>)> {
    let service = AuthService::new(state.pool(), state.config());
    let response = service.register_tenant(ip, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data_with_message(
            response,
            "Tenant registered successfully",
        )),
    ))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let service = AuthService::new(state.pool(), state.config());
    let response = service.login(ip, req).await?;

    Ok(Json(ApiResponse::data(response)))
}

/// `GET /auth/me`
pub async fn me(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Result<Json<ApiResponse<MeResponse>>> {
    let service = AuthService::new(state.pool(), state.config());
    let response = service.me(ctx.user_id).await?;

    Ok(Json(ApiResponse::data(response)))
}

/// `POST /auth/logout`
pub async fn logout(
    State(state): State<AppState>,
    ctx: AuthContext,
    ClientIp(ip): ClientIp,
) -> Json<ApiResponse<()>> {
    let service = AuthService::new(state.pool(), state.config());
    service.logout(ctx.user_id, ctx.tenant_id, ip).await;

    Json(ApiResponse::message("Logged out successfully"))
}
