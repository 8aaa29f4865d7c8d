//! Tenant route handlers: self-service and platform administration.

use axum::{
    Json,
    extract::{Path, State},
};

use taskdeck_core::TenantId;

use crate::error::Result;
use crate::middleware::{ClientIp, RequireSuperAdmin, TenantContext};
use crate::models::Tenant;
use crate::response::ApiResponse;
use crate::services::TenantService;
use crate::services::tenants::{
    UpdateTenantPlanRequest, UpdateTenantRequest, UpdateTenantStatusRequest,
};
use crate::state::AppState;

/// `GET /tenants/me`
pub async fn my_tenant(
    State(state): State<AppState>,
    ctx: TenantContext,
) -> Result<Json<ApiResponse<Tenant>>> {
    let tenant = TenantService::new(state.pool()).my_tenant(&ctx).await?;
    Ok(Json(ApiResponse::data(tenant)))
}

/// `PUT /tenants/me`
pub async fn update_my_tenant(
    State(state): State<AppState>,
    ctx: TenantContext,
    ClientIp(ip): ClientIp,
    Json(req): Json<UpdateTenantRequest>,
) -> Result<Json<ApiResponse<Tenant>>> {
    let tenant = TenantService::new(state.pool())
        .update_my_tenant(&ctx, ip, req)
        .await?;
    Ok(Json(ApiResponse::data_with_message(
        tenant,
        "Tenant updated successfully",
    )))
}

/// `GET /tenants`
pub async fn list(
    State(state): State<AppState>,
    RequireSuperAdmin(_ctx): RequireSuperAdmin,
) -> Result<Json<ApiResponse<Vec<Tenant>>>> {
    let tenants = TenantService::new(state.pool()).list_all().await?;
    Ok(Json(ApiResponse::data(tenants)))
}

/// `PATCH /tenants/:id/plan`
pub async fn update_plan(
    State(state): State<AppState>,
    RequireSuperAdmin(ctx): RequireSuperAdmin,
    ClientIp(ip): ClientIp,
    Path(id): Path<TenantId>,
    Json(req): Json<UpdateTenantPlanRequest>,
) -> Result<Json<ApiResponse<Tenant>>> {
    let tenant = TenantService::new(state.pool())
        .update_plan(&ctx, ip, id, req)
        .await?;
    Ok(Json(ApiResponse::data(tenant)))
}

/// `PATCH /tenants/:id/status`
pub async fn update_status(
    State(state): State<AppState>,
    RequireSuperAdmin(ctx): RequireSuperAdmin,
    ClientIp(ip): ClientIp,
    Path(id): Path<TenantId>,
    Json(req): Json<UpdateTenantStatusRequest>,
) -> Result<Json<ApiResponse<Tenant>>> {
    let tenant = TenantService::new(state.pool())
        .update_status(&ctx, ip, id, req)
        .await?;
    Ok(Json(ApiResponse::data(tenant)))
}
