// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::attachments::is_safe_file_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CompanyStatus {
    Active,
    Inactive,
}

// A empresa é o tenant raiz; o slug é a chave de roteamento público.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i64,
    #[schema(example = "Acme Industrial")]
    pub name: String,
    #[schema(example = "acme-industrial")]
    pub slug: String,
    pub logo: Option<String>,
    #[schema(example = "#1E40AF")]
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub status: CompanyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_logo(logo: &str) -> Result<(), validator::ValidationError> {
    if is_safe_file_name(logo) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("logo");
        err.message = Some("Nome de arquivo de logo inválido.".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 2, max = 120, message = "O nome da empresa deve ter entre 2 e 120 caracteres."))]
    #[schema(example = "Acme Industrial")]
    pub name: String,
    /// Nome armazenado retornado por `POST /api/uploads`.
    #[validate(custom(function = "validate_logo"))]
    pub logo: Option<String>,
    #[validate(length(max = 20))]
    pub primary_color: Option<String>,
    #[validate(length(max = 20))]
    pub secondary_color: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyPayload {
    #[validate(length(min = 2, max = 120, message = "O nome da empresa deve ter entre 2 e 120 caracteres."))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_logo"))]
    pub logo: Option<String>,
    #[validate(length(max = 20))]
    pub primary_color: Option<String>,
    #[validate(length(max = 20))]
    pub secondary_color: Option<String>,
    pub status: Option<CompanyStatus>,
}

/// Resposta da criação: a empresa e o login gerado para ela.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyResponse {
    pub company: Company,
    #[schema(example = "acme-industrial")]
    pub username: String,
}
