// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::User};

/// Exige um Bearer token válido e deixa o usuário nos extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let user = app_state.auth_service.validate_token(bearer.token()).await?;
    tracing::debug!(user_id = user.id, "Requisição autenticada");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Precisa rodar depois do `auth_guard`.
pub async fn admin_guard(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request.extensions().get::<User>().ok_or(AppError::InvalidToken)?;

    if !user.is_admin() {
        return Err(AppError::Forbidden("Apenas administradores.".into()));
    }
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}
