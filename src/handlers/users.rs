// src/handlers/users.rs

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
    middleware::auth::AuthenticatedUser,
    models::auth::{
        ChangePasswordPayload, CreateUserPayload, NewUser, UpdatePermissionsPayload, User, UserType,
    },
};

async fn load_user(app_state: &AppState, id: i64) -> Result<User, AppError> {
    app_state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Usuário"))
}

/// Admin gerencia qualquer um; a empresa gerencia os usuários dela.
fn ensure_manages(actor: &User, target: &User) -> Result<(), AppError> {
    let allowed = actor.is_admin() || target.company_id.is_some_and(|id| actor.manages(id));
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden("Você não pode gerenciar este usuário.".into()))
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários visíveis para quem chama", body = Vec<User>),
        (status = 403, description = "Funcionários não listam usuários")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<User>>, AppError> {
    let scope = match user.user_type {
        UserType::Admin => None,
        UserType::Company => user.company_id,
        UserType::Employee => {
            return Err(AppError::Forbidden("Apenas a empresa ou um administrador.".into()));
        }
    };

    let users = app_state.user_repo.list(scope).await?;
    Ok(Json(users))
}

/// Cria um funcionário. A empresa só cria na própria; o admin informa `companyId`.
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Funcionário criado", body = User),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Sem permissão"),
        (status = 409, description = "Nome de usuário em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company_id = match actor.user_type {
        UserType::Admin => payload
            .company_id
            .ok_or_else(|| AppError::BadRequest("Informe a empresa do usuário.".into()))?,
        UserType::Company => {
            let own = actor
                .company_id
                .ok_or_else(|| AppError::Forbidden("Usuário sem empresa vinculada.".into()))?;
            if payload.company_id.is_some_and(|requested| requested != own) {
                return Err(AppError::Forbidden("Só é possível criar usuários na própria empresa.".into()));
            }
            own
        }
        UserType::Employee => {
            return Err(AppError::Forbidden("Apenas a empresa ou um administrador.".into()));
        }
    };

    let org = &app_state.organization_repo;
    if let Some(department_id) = payload.department_id {
        if !org.department_in_company(department_id, company_id).await? {
            return Err(AppError::BadRequest("Departamento de outra empresa.".into()));
        }
    }
    if let Some(job_role_id) = payload.job_role_id {
        if !org.job_role_in_company(job_role_id, company_id).await? {
            return Err(AppError::BadRequest("Cargo de outra empresa.".into()));
        }
    }
    if let Some(manager_id) = payload.manager_id {
        if !app_state.user_repo.belongs_to_company(manager_id, company_id).await? {
            return Err(AppError::BadRequest("Gestor de outra empresa.".into()));
        }
    }

    let password_hash = app_state.auth_service.hash_password(&payload.password).await?;

    let user = app_state
        .user_repo
        .create(
            &app_state.db_pool,
            &NewUser {
                username: payload.username.trim(),
                password_hash: &password_hash,
                full_name: payload.full_name.as_deref(),
                email: payload.email.as_deref(),
                user_type: UserType::Employee,
                company_id: Some(company_id),
                permissions: payload.permissions,
                department_id: payload.department_id,
                job_role_id: payload.job_role_id,
                manager_id: payload.manager_id,
            },
        )
        .await?;

    tracing::info!(user_id = user.id, company_id, actor_id = actor.id, "👤 Usuário criado");
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário", body = User),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let target = load_user(&app_state, id).await?;
    if actor.id != target.id {
        ensure_manages(&actor, &target)?;
    }
    Ok(Json(target))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 400, description = "Tentativa de remover a si mesmo"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if actor.id == id {
        return Err(AppError::BadRequest("Não é possível remover o próprio usuário.".into()));
    }
    if app_state.user_repo.delete(id).await? == 0 {
        return Err(AppError::NotFound("Usuário"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/permissions",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    request_body = UpdatePermissionsPayload,
    responses(
        (status = 200, description = "Permissões atualizadas", body = User),
        (status = 403, description = "Sem permissão"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_permissions(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePermissionsPayload>,
) -> Result<Json<User>, AppError> {
    let target = load_user(&app_state, id).await?;
    ensure_manages(&actor, &target)?;

    let updated = app_state
        .user_repo
        .update_permissions(target.id, &payload)
        .await?
        .ok_or(AppError::NotFound("Usuário"))?;

    tracing::info!(user_id = updated.id, actor_id = actor.id, "Permissões atualizadas");
    Ok(Json(updated))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/password",
    tag = "Users",
    params(("id" = i64, Path, description = "ID do usuário")),
    request_body = ChangePasswordPayload,
    responses(
        (status = 204, description = "Senha alterada"),
        (status = 401, description = "Senha atual incorreta"),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    app_state
        .auth_service
        .change_password(&actor, id, payload.current_password.as_deref(), &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
