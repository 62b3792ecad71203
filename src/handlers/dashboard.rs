// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    db::dashboard_repo::StatsScope,
    middleware::{
        rbac::{PermViewDashboard, RequirePermission},
        tenancy::TenantCompany,
    },
    models::dashboard::DashboardStats,
};

#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores de todas as empresas", body = DashboardStats),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_global_stats(State(app_state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let stats = app_state.dashboard_repo.stats(StatsScope::All).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/companies/{slug}/stats",
    tag = "Dashboard",
    params(("slug" = String, Path, description = "Slug da empresa")),
    responses(
        (status = 200, description = "Indicadores da empresa", body = DashboardStats),
        (status = 403, description = "Sem permissão ou outra empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company_stats(
    State(app_state): State<AppState>,
    permission: RequirePermission<PermViewDashboard>,
    tenant: TenantCompany,
) -> Result<Json<DashboardStats>, AppError> {
    tenant.authorize(permission.user())?;

    let stats = app_state
        .dashboard_repo
        .stats(StatsScope::Company { id: tenant.0.id, name: &tenant.0.name })
        .await?;
    Ok(Json(stats))
}
