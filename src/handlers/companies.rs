// src/handlers/companies.rs

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
    middleware::tenancy::ActiveTenant,
    models::company::{Company, CreateCompanyPayload, CreateCompanyResponse, UpdateCompanyPayload},
};

#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada junto com o seu usuário", body = CreateCompanyResponse),
        (status = 400, description = "Dados inválidos ou nome já usado por outra empresa"),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let created = app_state.company_service.create_company(&payload).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    responses(
        (status = 200, description = "Todas as empresas", body = Vec<Company>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_companies(State(app_state): State<AppState>) -> Result<Json<Vec<Company>>, AppError> {
    let companies = app_state.company_repo.list().await?;
    Ok(Json(companies))
}

// Identidade visual pública (portal de denúncias)
#[utoipa::path(
    get,
    path = "/api/companies/{slug}",
    tag = "Companies",
    params(("slug" = String, Path, description = "Slug da empresa")),
    responses(
        (status = 200, description = "Dados públicos da empresa", body = Company),
        (status = 404, description = "Empresa inexistente ou inativa")
    )
)]
pub async fn get_company(ActiveTenant(company): ActiveTenant) -> Json<Company> {
    Json(company)
}

#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = i64, Path, description = "ID da empresa")),
    request_body = UpdateCompanyPayload,
    responses(
        (status = 200, description = "Empresa atualizada", body = Company),
        (status = 400, description = "Nome já usado por outra empresa"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<Json<Company>, AppError> {
    payload.validate()?;

    let company = app_state.company_service.update_company(id, &payload).await?;
    Ok(Json(company))
}

#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = i64, Path, description = "ID da empresa")),
    responses(
        (status = 204, description = "Empresa e dados vinculados removidos"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_company(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.company_service.delete_company(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
