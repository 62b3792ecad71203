// src/handlers/organization.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::TenantCompany},
    models::organization::{CreateDepartmentPayload, CreateJobRolePayload, Department, JobRole},
};

#[utoipa::path(
    get,
    path = "/api/companies/{slug}/departments",
    tag = "Organization",
    params(("slug" = String, Path, description = "Slug da empresa")),
    responses((status = 200, description = "Departamentos", body = Vec<Department>)),
    security(("api_jwt" = []))
)]
pub async fn list_departments(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantCompany,
) -> Result<Json<Vec<Department>>, AppError> {
    tenant.authorize(&user)?;

    let departments = app_state.organization_repo.list_departments(tenant.0.id).await?;
    Ok(Json(departments))
}

#[utoipa::path(
    post,
    path = "/api/companies/{slug}/departments",
    tag = "Organization",
    params(("slug" = String, Path, description = "Slug da empresa")),
    request_body = CreateDepartmentPayload,
    responses(
        (status = 201, description = "Departamento criado", body = Department),
        (status = 400, description = "Referência de outra empresa"),
        (status = 409, description = "Código já usado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_department(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantCompany,
    Json(payload): Json<CreateDepartmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.authorize_manager(&user)?;

    let company_id = tenant.0.id;
    if let Some(parent_id) = payload.parent_id {
        if !app_state.organization_repo.department_in_company(parent_id, company_id).await? {
            return Err(AppError::BadRequest("Departamento pai de outra empresa.".into()));
        }
    }
    if let Some(manager_id) = payload.manager_id {
        if !app_state.user_repo.belongs_to_company(manager_id, company_id).await? {
            return Err(AppError::BadRequest("Gestor de outra empresa.".into()));
        }
    }

    let department = app_state
        .organization_repo
        .create_department(company_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    get,
    path = "/api/companies/{slug}/job-roles",
    tag = "Organization",
    params(("slug" = String, Path, description = "Slug da empresa")),
    responses((status = 200, description = "Cargos", body = Vec<JobRole>)),
    security(("api_jwt" = []))
)]
pub async fn list_job_roles(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantCompany,
) -> Result<Json<Vec<JobRole>>, AppError> {
    tenant.authorize(&user)?;

    let roles = app_state.organization_repo.list_job_roles(tenant.0.id).await?;
    Ok(Json(roles))
}

#[utoipa::path(
    post,
    path = "/api/companies/{slug}/job-roles",
    tag = "Organization",
    params(("slug" = String, Path, description = "Slug da empresa")),
    request_body = CreateJobRolePayload,
    responses(
        (status = 201, description = "Cargo criado", body = JobRole),
        (status = 400, description = "Departamento de outra empresa"),
        (status = 409, description = "Código já usado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_job_role(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantCompany,
    Json(payload): Json<CreateJobRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    tenant.authorize_manager(&user)?;

    if let Some(department_id) = payload.department_id {
        if !app_state.organization_repo.department_in_company(department_id, tenant.0.id).await? {
            return Err(AppError::BadRequest("Departamento de outra empresa.".into()));
        }
    }

    let role = app_state.organization_repo.create_job_role(tenant.0.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(role)))
}
