// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Employee,
    Company,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[schema(example = "acme")]
    pub username: String,

    #[serde(skip_serializing)] // nunca sai na resposta
    #[schema(ignore)]
    pub password_hash: String,

    pub full_name: Option<String>,
    pub email: Option<String>,
    pub user_type: UserType,
    pub company_id: Option<i64>,

    // Permissões planas por funcionalidade
    pub can_view_denuncias: bool,
    pub can_view_nao_conformidades: bool,
    pub can_view_eventos: bool,
    pub can_view_dashboard: bool,

    pub department_id: Option<i64>,
    pub job_role_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    /// Admins enxergam todas as empresas; os demais apenas a própria.
    pub fn belongs_to(&self, company_id: i64) -> bool {
        self.is_admin() || self.company_id == Some(company_id)
    }

    /// Pode administrar usuários e configurações da empresa.
    pub fn manages(&self, company_id: i64) -> bool {
        self.is_admin()
            || (self.user_type == UserType::Company && self.company_id == Some(company_id))
    }
}

/// Dados para inserir um usuário (senha já com hash).
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub full_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub user_type: UserType,
    pub company_id: Option<i64>,
    pub permissions: UserPermissions,
    pub department_id: Option<i64>,
    pub job_role_id: Option<i64>,
    pub manager_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPermissions {
    pub can_view_denuncias: bool,
    pub can_view_nao_conformidades: bool,
    pub can_view_eventos: bool,
    pub can_view_dashboard: bool,
}

impl UserPermissions {
    pub fn all() -> Self {
        Self {
            can_view_denuncias: true,
            can_view_nao_conformidades: true,
            can_view_eventos: true,
            can_view_dashboard: true,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "O usuário é obrigatório."))]
    #[schema(example = "acme")]
    pub username: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub user_type: UserType,
    pub company_id: Option<i64>,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 3, max = 64, message = "O usuário deve ter entre 3 e 64 caracteres."))]
    pub username: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    pub full_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    /// Obrigatório para admins; usuários de empresa criam sempre na própria empresa.
    pub company_id: Option<i64>,
    #[serde(default)]
    pub permissions: UserPermissions,
    pub department_id: Option<i64>,
    pub job_role_id: Option<i64>,
    pub manager_id: Option<i64>,
}

/// Atualização parcial: apenas os campos enviados mudam.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermissionsPayload {
    pub can_view_denuncias: Option<bool>,
    pub can_view_nao_conformidades: Option<bool>,
    pub can_view_eventos: Option<bool>,
    pub can_view_dashboard: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    /// Exigida quando o próprio usuário troca a senha.
    pub current_password: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
}
