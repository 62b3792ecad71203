// src/middleware/tenancy.rs

use std::collections::HashMap;

use axum::{
    extract::{FromRef, FromRequestParts, Path},
    http::request::Parts,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        auth::User,
        company::{Company, CompanyStatus},
    },
};

// O tenant vem do segmento `{slug}` da rota.
#[derive(Debug, Clone)]
pub struct TenantCompany(pub Company);

impl TenantCompany {
    /// O usuário precisa pertencer à empresa (admins passam).
    pub fn authorize(&self, user: &User) -> Result<(), AppError> {
        if user.belongs_to(self.0.id) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Você não tem acesso a esta empresa.".into()))
        }
    }

    /// Usuário da própria empresa (tipo `company`) ou admin.
    pub fn authorize_manager(&self, user: &User) -> Result<(), AppError> {
        if user.manages(self.0.id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Apenas a empresa ou um administrador pode realizar esta ação.".into(),
            ))
        }
    }
}

async fn load_by_slug<S>(parts: &mut Parts, state: &S) -> Result<Company, AppError>
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    let app_state = AppState::from_ref(state);

    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|_| AppError::BadRequest("Identificador da empresa ausente na rota.".into()))?;

    let slug = params
        .get("slug")
        .ok_or_else(|| AppError::BadRequest("Identificador da empresa ausente na rota.".into()))?;

    app_state
        .company_repo
        .find_by_slug(slug)
        .await?
        .ok_or(AppError::NotFound("Empresa"))
}

impl<S> FromRequestParts<S> for TenantCompany
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        load_by_slug(parts, state).await.map(TenantCompany)
    }
}

/// Variante das rotas públicas: empresa inativa responde como inexistente.
#[derive(Debug, Clone)]
pub struct ActiveTenant(pub Company);

impl<S> FromRequestParts<S> for ActiveTenant
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let company = load_by_slug(parts, state).await?;
        if company.status == CompanyStatus::Inactive {
            return Err(AppError::NotFound("Empresa"));
        }
        Ok(ActiveTenant(company))
    }
}
