// src/models/complaint.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::attachments::validate_attachment_names;

// Denúncia pública (anônima por padrão)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: i64,
    pub company_id: i64,
    pub subject: String,
    pub description: String,
    pub reporter_name: Option<String>,
    pub reporter_email: Option<String>,
    pub reporter_phone: Option<String>,
    #[schema(value_type = Vec<String>)]
    pub attachments: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintPayload {
    #[validate(length(min = 5, max = 200, message = "O assunto deve ter entre 5 e 200 caracteres."))]
    #[schema(example = "Assédio no setor de expedição")]
    pub subject: String,
    #[validate(length(min = 30, message = "A descrição deve ter no mínimo 30 caracteres."))]
    pub description: String,
    #[validate(length(max = 120))]
    pub reporter_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub reporter_email: Option<String>,
    #[validate(length(max = 30))]
    pub reporter_phone: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_attachment_names"))]
    pub attachments: Vec<String>,
}
