// src/handlers/nonconformities.rs

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
        auth::AuthenticatedUser,
        rbac::{PermViewNonconformities, RequirePermission},
        tenancy::{ActiveTenant, TenantCompany},
    },
    models::{
        nc_workflow::{
            CreateActionPayload, GrantPermissionPayload, NcAccessAudit, NcAction, NcPermission, NcSettings,
            UpdateActionPayload, UpdateNcSettingsPayload,
        },
        nonconformity::{
            CreateNonconformityPayload, NonconformityView, UpdateNonconformityPayload, UpdateStatusPayload,
        },
    },
};

type NcPermissionGuard = RequirePermission<PermViewNonconformities>;

// --- REGISTRO ---

// Formulário público de NC (sem login)
#[utoipa::path(
    post,
    path = "/api/companies/{slug}/nonconformities",
    tag = "Nonconformities",
    params(("slug" = String, Path, description = "Slug da empresa")),
    request_body = CreateNonconformityPayload,
    responses(
        (status = 201, description = "Não conformidade registrada", body = NonconformityView),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Empresa inexistente ou inativa")
    )
)]
pub async fn submit_public(
    State(app_state): State<AppState>,
    ActiveTenant(company): ActiveTenant,
    Json(payload): Json<CreateNonconformityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let nc = app_state.nonconformity_service.submit(&company, &payload, None).await?;
    let level = nc.confidentiality_level.anonymization();

    Ok((StatusCode::CREATED, Json(nc.into_view(level))))
}

/// Registro interno: admins escolhem a empresa, os demais registram na própria.
#[utoipa::path(
    post,
    path = "/api/nonconformities",
    tag = "Nonconformities",
    request_body = CreateNonconformityPayload,
    responses(
        (status = 201, description = "Não conformidade registrada", body = NonconformityView),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Empresa de outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_nonconformity(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateNonconformityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company_id = if user.is_admin() {
        payload
            .company_id
            .ok_or_else(|| AppError::BadRequest("Informe a empresa da não conformidade.".into()))?
    } else {
        let own = user
            .company_id
            .ok_or_else(|| AppError::Forbidden("Usuário sem empresa vinculada.".into()))?;
        if payload.company_id.is_some_and(|requested| requested != own) {
            return Err(AppError::Forbidden(
                "Só é possível registrar não conformidades na própria empresa.".into(),
            ));
        }
        own
    };

    let company = app_state
        .company_repo
        .find_by_id(&app_state.db_pool, company_id)
        .await?
        .ok_or(AppError::NotFound("Empresa"))?;

    let service = &app_state.nonconformity_service;
    let nc = service.submit(&company, &payload, Some(user.id)).await?;
    let level = service.viewer_level(&user, &nc).await?;

    Ok((StatusCode::CREATED, Json(nc.into_view(level))))
}

// --- LEITURA ---

#[utoipa::path(
    get,
    path = "/api/companies/{slug}/nonconformities",
    tag = "Nonconformities",
    params(("slug" = String, Path, description = "Slug da empresa")),
    responses(
        (status = 200, description = "NCs da empresa, já anonimizadas para o leitor", body = Vec<NonconformityView>),
        (status = 403, description = "Sem permissão ou outra empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_company_nonconformities(
    State(app_state): State<AppState>,
    permission: NcPermissionGuard,
    tenant: TenantCompany,
) -> Result<Json<Vec<NonconformityView>>, AppError> {
    tenant.authorize(permission.user())?;

    let views = app_state
        .nonconformity_service
        .list_for_company(permission.user(), tenant.0.id)
        .await?;
    Ok(Json(views))
}

#[utoipa::path(
    get,
    path = "/api/nonconformities",
    tag = "Nonconformities",
    responses(
        (status = 200, description = "NCs de todas as empresas", body = Vec<NonconformityView>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_all_nonconformities(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<NonconformityView>>, AppError> {
    let views = app_state.nonconformity_service.list_all(&user).await?;
    Ok(Json(views))
}

#[utoipa::path(
    get,
    path = "/api/nonconformities/{id}",
    tag = "Nonconformities",
    params(("id" = i64, Path, description = "ID da não conformidade")),
    responses(
        (status = 200, description = "Detalhe (leitura auditada)", body = NonconformityView),
        (status = 403, description = "Sem permissão ou outra empresa"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_nonconformity(
    State(app_state): State<AppState>,
    permission: NcPermissionGuard,
    Path(id): Path<i64>,
) -> Result<Json<NonconformityView>, AppError> {
    let view = app_state
        .nonconformity_service
        .get_for_viewer(permission.user(), id)
        .await?;
    Ok(Json(view))
}

// --- ALTERAÇÕES ---

#[utoipa::path(
    put,
    path = "/api/nonconformities/{id}",
    tag = "Nonconformities",
    params(("id" = i64, Path, description = "ID da não conformidade")),
    request_body = UpdateNonconformityPayload,
    responses(
        (status = 200, description = "Não conformidade atualizada", body = NonconformityView),
        (status = 403, description = "Sem permissão para alterar a confidencialidade"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_nonconformity(
    State(app_state): State<AppState>,
    permission: NcPermissionGuard,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNonconformityPayload>,
) -> Result<Json<NonconformityView>, AppError> {
    payload.validate()?;

    let view = app_state
        .nonconformity_service
        .update(permission.user(), id, &payload)
        .await?;
    Ok(Json(view))
}

#[utoipa::path(
    put,
    path = "/api/nonconformities/{id}/status",
    tag = "Nonconformities",
    params(("id" = i64, Path, description = "ID da não conformidade")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status alterado, auditado e notificado", body = NonconformityView),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_status(
    State(app_state): State<AppState>,
    permission: NcPermissionGuard,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<Json<NonconformityView>, AppError> {
    let view = app_state
        .nonconformity_service
        .change_status(permission.user(), id, payload.workflow_status)
        .await?;
    Ok(Json(view))
}

#[utoipa::path(
    delete,
    path = "/api/nonconformities/{id}",
    tag = "Nonconformities",
    params(("id" = i64, Path, description = "ID da não conformidade")),
    responses(
        (status = 204, description = "Removida"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_nonconformity(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.nonconformity_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/nonconformities/{id}/audit",
    tag = "Nonconformities",
    params(("id" = i64, Path, description = "ID da não conformidade")),
    responses(
        (status = 200, description = "Trilha de acesso", body = Vec<NcAccessAudit>),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_audit(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<NcAccessAudit>>, AppError> {
    let nc = app_state.nonconformity_service.find_accessible(&user, id).await?;
    let entries = app_state.nc_workflow_repo.list_audit(nc.id).await?;
    Ok(Json(entries))
}

#[utoipa::path(
    put,
    path = "/api/nonconformities/{id}/permissions",
    tag = "Nonconformities",
    params(("id" = i64, Path, description = "ID da não conformidade")),
    request_body = GrantPermissionPayload,
    responses(
        (status = 200, description = "Permissão gravada", body = NcPermission),
        (status = 400, description = "Usuário de outra empresa"),
        (status = 403, description = "Apenas a empresa ou um administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_identity_permission(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<GrantPermissionPayload>,
) -> Result<Json<NcPermission>, AppError> {
    let permission = app_state
        .nonconformity_service
        .set_identity_permission(&user, id, &payload)
        .await?;
    Ok(Json(permission))
}

// --- AÇÕES CORRETIVAS ---

#[utoipa::path(
    get,
    path = "/api/nonconformities/{id}/actions",
    tag = "Nonconformities",
    params(("id" = i64, Path, description = "ID da não conformidade")),
    responses((status = 200, description = "Ações corretivas", body = Vec<NcAction>)),
    security(("api_jwt" = []))
)]
pub async fn list_actions(
    State(app_state): State<AppState>,
    permission: NcPermissionGuard,
    Path(id): Path<i64>,
) -> Result<Json<Vec<NcAction>>, AppError> {
    let nc = app_state
        .nonconformity_service
        .find_accessible(permission.user(), id)
        .await?;
    let actions = app_state.nc_workflow_repo.list_actions(nc.id).await?;
    Ok(Json(actions))
}

#[utoipa::path(
    post,
    path = "/api/nonconformities/{id}/actions",
    tag = "Nonconformities",
    params(("id" = i64, Path, description = "ID da não conformidade")),
    request_body = CreateActionPayload,
    responses(
        (status = 201, description = "Ação criada", body = NcAction),
        (status = 400, description = "Responsável de outra empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_action(
    State(app_state): State<AppState>,
    permission: NcPermissionGuard,
    Path(id): Path<i64>,
    Json(payload): Json<CreateActionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let nc = app_state
        .nonconformity_service
        .find_accessible(permission.user(), id)
        .await?;

    if let Some(responsible) = payload.user_id {
        if !app_state.user_repo.belongs_to_company(responsible, nc.company_id).await? {
            return Err(AppError::BadRequest("O responsável não pertence a esta empresa.".into()));
        }
    }

    let action = app_state.nc_workflow_repo.create_action(nc.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(action)))
}

#[utoipa::path(
    put,
    path = "/api/nonconformities/{id}/actions/{action_id}",
    tag = "Nonconformities",
    params(
        ("id" = i64, Path, description = "ID da não conformidade"),
        ("action_id" = i64, Path, description = "ID da ação")
    ),
    request_body = UpdateActionPayload,
    responses(
        (status = 200, description = "Ação atualizada", body = NcAction),
        (status = 404, description = "Ação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_action(
    State(app_state): State<AppState>,
    permission: NcPermissionGuard,
    Path((id, action_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateActionPayload>,
) -> Result<Json<NcAction>, AppError> {
    payload.validate()?;

    let nc = app_state
        .nonconformity_service
        .find_accessible(permission.user(), id)
        .await?;

    let action = app_state
        .nc_workflow_repo
        .update_action(nc.id, action_id, &payload)
        .await?
        .ok_or(AppError::NotFound("Ação"))?;
    Ok(Json(action))
}

// --- CONFIGURAÇÕES POR EMPRESA ---

#[utoipa::path(
    get,
    path = "/api/companies/{slug}/nc-settings",
    tag = "Nonconformities",
    params(("slug" = String, Path, description = "Slug da empresa")),
    responses(
        (status = 200, description = "Configuração (ou os valores padrão)", body = NcSettings),
        (status = 403, description = "Apenas a empresa ou um administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantCompany,
) -> Result<Json<NcSettings>, AppError> {
    tenant.authorize_manager(&user)?;

    let settings = app_state
        .nc_workflow_repo
        .get_settings(&app_state.db_pool, tenant.0.id)
        .await?;
    Ok(Json(settings))
}

#[utoipa::path(
    put,
    path = "/api/companies/{slug}/nc-settings",
    tag = "Nonconformities",
    params(("slug" = String, Path, description = "Slug da empresa")),
    request_body = UpdateNcSettingsPayload,
    responses(
        (status = 200, description = "Configuração salva", body = NcSettings),
        (status = 403, description = "Apenas a empresa ou um administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantCompany,
    Json(payload): Json<UpdateNcSettingsPayload>,
) -> Result<Json<NcSettings>, AppError> {
    tenant.authorize_manager(&user)?;

    let settings = app_state
        .nc_workflow_repo
        .upsert_settings(tenant.0.id, &payload)
        .await?;
    Ok(Json(settings))
}
