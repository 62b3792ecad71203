// src/models/nc_workflow.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::nonconformity::ConfidentialityLevel;

// Ações registradas na auditoria de acesso
pub const AUDIT_VIEW: &str = "VIEW";
pub const AUDIT_STATUS_CHANGE: &str = "STATUS_CHANGE";
pub const AUDIT_UPDATE: &str = "UPDATE";
pub const AUDIT_PERMISSION_CHANGE: &str = "PERMISSION_CHANGE";

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NcNotification {
    pub id: i64,
    pub nonconformity_id: i64,
    pub user_id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NcAccessAudit {
    pub id: i64,
    pub nonconformity_id: i64,
    pub user_id: Option<i64>,
    #[schema(example = "STATUS_CHANGE")]
    pub action: String,
    #[schema(example = "REPORTED -> ACKNOWLEDGED")]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NcPermission {
    pub nonconformity_id: i64,
    pub user_id: i64,
    pub can_view_identity: bool,
    pub granted_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantPermissionPayload {
    pub user_id: i64,
    pub can_view_identity: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionStatus {
    Pending,
    Done,
    Cancelled,
}

// Ação corretiva vinculada a uma não conformidade
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NcAction {
    pub id: i64,
    pub nonconformity_id: i64,
    /// Responsável pela ação.
    pub user_id: Option<i64>,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub status: ActionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionPayload {
    pub user_id: Option<i64>,
    #[validate(length(min = 5, message = "A descrição da ação deve ter no mínimo 5 caracteres."))]
    pub description: String,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActionPayload {
    #[validate(length(min = 5, message = "A descrição da ação deve ter no mínimo 5 caracteres."))]
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<ActionStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NcSettings {
    pub company_id: i64,
    pub default_confidentiality: ConfidentialityLevel,
    pub notify_on_create: bool,
    pub notify_on_status_change: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NcSettings {
    /// Configuração usada enquanto a empresa não salvou a sua.
    pub fn defaults(company_id: i64) -> Self {
        Self {
            company_id,
            default_confidentiality: ConfidentialityLevel::Restricted,
            notify_on_create: true,
            notify_on_status_change: true,
            updated_at: None,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNcSettingsPayload {
    pub default_confidentiality: Option<ConfidentialityLevel>,
    pub notify_on_create: Option<bool>,
    pub notify_on_status_change: Option<bool>,
}
