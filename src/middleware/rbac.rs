// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::User};

/// Uma permissão é uma das flags planas do usuário.
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
    fn granted(user: &User) -> bool;
}

/// Extrator guardião: admins passam direto, os demais precisam da flag.
/// O escopo por empresa é conferido em cada handler.
pub struct RequirePermission<T>(pub User, PhantomData<T>);

impl<T> RequirePermission<T> {
    pub fn user(&self) -> &User {
        &self.0
    }
}

pub fn check_permission<T: PermissionDef>(user: &User) -> Result<(), AppError> {
    if user.is_admin() || T::granted(user) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Você precisa da permissão '{}' para realizar esta ação.",
            T::slug()
        )))
    }
}

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        check_permission::<T>(&user)?;
        Ok(RequirePermission(user, PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermViewComplaints;
impl PermissionDef for PermViewComplaints {
    fn slug() -> &'static str { "can_view_denuncias" }
    fn granted(user: &User) -> bool { user.can_view_denuncias }
}

pub struct PermViewNonconformities;
impl PermissionDef for PermViewNonconformities {
    fn slug() -> &'static str { "can_view_nao_conformidades" }
    fn granted(user: &User) -> bool { user.can_view_nao_conformidades }
}

pub struct PermViewEvents;
impl PermissionDef for PermViewEvents {
    fn slug() -> &'static str { "can_view_eventos" }
    fn granted(user: &User) -> bool { user.can_view_eventos }
}

pub struct PermViewDashboard;
impl PermissionDef for PermViewDashboard {
    fn slug() -> &'static str { "can_view_dashboard" }
    fn granted(user: &User) -> bool { user.can_view_dashboard }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::auth::UserType;

    fn employee(can_view_denuncias: bool) -> User {
        User {
            id: 3,
            username: "joana".into(),
            password_hash: String::new(),
            full_name: None,
            email: None,
            user_type: UserType::Employee,
            company_id: Some(1),
            can_view_denuncias,
            can_view_nao_conformidades: false,
            can_view_eventos: false,
            can_view_dashboard: false,
            department_id: None,
            job_role_id: None,
            manager_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn flag_grants_permission() {
        assert!(check_permission::<PermViewComplaints>(&employee(true)).is_ok());
        let denied = check_permission::<PermViewComplaints>(&employee(false));
        assert!(matches!(denied, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn admin_bypasses_flags() {
        let mut admin = employee(false);
        admin.user_type = UserType::Admin;
        admin.company_id = None;
        assert!(check_permission::<PermViewDashboard>(&admin).is_ok());
    }
}
