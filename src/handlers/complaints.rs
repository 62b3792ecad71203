// src/handlers/complaints.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{PermViewComplaints, RequirePermission},
        tenancy::{ActiveTenant, TenantCompany},
    },
    models::complaint::{Complaint, CreateComplaintPayload},
};

// Formulário público: não exige login
#[utoipa::path(
    post,
    path = "/api/companies/{slug}/complaints",
    tag = "Complaints",
    params(("slug" = String, Path, description = "Slug da empresa")),
    request_body = CreateComplaintPayload,
    responses(
        (status = 201, description = "Denúncia registrada", body = Complaint),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Empresa inexistente ou inativa")
    )
)]
pub async fn submit_complaint(
    State(app_state): State<AppState>,
    ActiveTenant(company): ActiveTenant,
    Json(payload): Json<CreateComplaintPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let complaint = app_state.complaint_service.submit(&company, &payload).await?;

    Ok((StatusCode::CREATED, Json(complaint)))
}

#[utoipa::path(
    get,
    path = "/api/companies/{slug}/complaints",
    tag = "Complaints",
    params(("slug" = String, Path, description = "Slug da empresa")),
    responses(
        (status = 200, description = "Denúncias da empresa", body = Vec<Complaint>),
        (status = 403, description = "Sem permissão ou outra empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_company_complaints(
    State(app_state): State<AppState>,
    permission: RequirePermission<PermViewComplaints>,
    tenant: TenantCompany,
) -> Result<Json<Vec<Complaint>>, AppError> {
    tenant.authorize(permission.user())?;

    let complaints = app_state.complaint_repo.list_by_company(tenant.0.id).await?;
    Ok(Json(complaints))
}

#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    responses(
        (status = 200, description = "Denúncias de todas as empresas", body = Vec<Complaint>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_all_complaints(State(app_state): State<AppState>) -> Result<Json<Vec<Complaint>>, AppError> {
    let complaints = app_state.complaint_repo.list_all().await?;
    Ok(Json(complaints))
}

#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = i64, Path, description = "ID da denúncia")),
    responses(
        (status = 200, description = "Denúncia", body = Complaint),
        (status = 403, description = "Sem permissão ou outra empresa"),
        (status = 404, description = "Denúncia não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_complaint(
    State(app_state): State<AppState>,
    permission: RequirePermission<PermViewComplaints>,
    Path(id): Path<i64>,
) -> Result<Json<Complaint>, AppError> {
    let complaint = app_state
        .complaint_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Denúncia"))?;

    if !permission.user().belongs_to(complaint.company_id) {
        return Err(AppError::Forbidden("Esta denúncia pertence a outra empresa.".into()));
    }

    Ok(Json(complaint))
}

#[utoipa::path(
    delete,
    path = "/api/complaints/{id}",
    tag = "Complaints",
    params(("id" = i64, Path, description = "ID da denúncia")),
    responses(
        (status = 204, description = "Denúncia removida"),
        (status = 404, description = "Denúncia não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_complaint(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if app_state.complaint_repo.delete(id).await? == 0 {
        return Err(AppError::NotFound("Denúncia"));
    }
    Ok(StatusCode::NO_CONTENT)
}
