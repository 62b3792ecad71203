// src/models/organization.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub company_id: i64,
    #[schema(example = "QUAL")]
    pub code: String,
    #[schema(example = "Qualidade")]
    pub name: String,
    pub parent_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobRole {
    pub id: i64,
    pub company_id: i64,
    #[schema(example = "ANL-QUAL")]
    pub code: String,
    #[schema(example = "Analista de Qualidade")]
    pub name: String,
    pub level: i64,
    pub department_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentPayload {
    #[validate(length(min = 1, max = 20, message = "O código deve ter entre 1 e 20 caracteres."))]
    pub code: String,
    #[validate(length(min = 1, max = 120, message = "O nome é obrigatório."))]
    pub name: String,
    pub parent_id: Option<i64>,
    pub manager_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRolePayload {
    #[validate(length(min = 1, max = 20, message = "O código deve ter entre 1 e 20 caracteres."))]
    pub code: String,
    #[validate(length(min = 1, max = 120, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(range(min = 1, max = 20))]
    pub level: Option<i64>,
    pub department_id: Option<i64>,
}
