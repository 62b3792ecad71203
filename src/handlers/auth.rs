// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, User},
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Usuário ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let (token, user) = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token, user }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado", body = User),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
