// src/models/nonconformity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{
    anonymize::{anonymize_name, mask_contact, AnonymizationLevel},
    attachments::validate_attachment_names,
};

// Qualquer status pode ir para qualquer outro; o valor só precisa ser conhecido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    Reported,
    Acknowledged,
    InProgress,
    Resolved,
    Closed,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Reported => "REPORTED",
            WorkflowStatus::Acknowledged => "ACKNOWLEDGED",
            WorkflowStatus::InProgress => "IN_PROGRESS",
            WorkflowStatus::Resolved => "RESOLVED",
            WorkflowStatus::Closed => "CLOSED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidentialityLevel {
    Public,
    Restricted,
    Confidential,
}

impl ConfidentialityLevel {
    /// Nível aplicado a quem não tem acesso privilegiado à identidade.
    pub fn anonymization(&self) -> AnonymizationLevel {
        match self {
            ConfidentialityLevel::Public => AnonymizationLevel::None,
            ConfidentialityLevel::Restricted => AnonymizationLevel::Initials,
            ConfidentialityLevel::Confidential => AnonymizationLevel::Full,
        }
    }
}

/// Linha da tabela `nonconformities`.
#[derive(Debug, Clone, FromRow)]
pub struct Nonconformity {
    pub id: i64,
    pub company_id: i64,
    pub subject: String,
    pub description: String,
    pub setor: Option<String>,
    pub reporter_name: Option<String>,
    pub reporter_email: Option<String>,
    pub target_name: Option<String>,
    pub attachments: Json<Vec<String>>,
    pub workflow_status: WorkflowStatus,
    pub severity_level: i64,
    pub probability_level: i64,
    pub confidentiality_level: ConfidentialityLevel,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn risk_score(severity_level: i64, probability_level: i64) -> i64 {
    severity_level * probability_level
}

impl Nonconformity {
    pub fn risk_score(&self) -> i64 {
        risk_score(self.severity_level, self.probability_level)
    }

    /// Monta a resposta aplicando o nível de anonimização do leitor.
    pub fn into_view(self, level: AnonymizationLevel) -> NonconformityView {
        let risk_score = self.risk_score();
        NonconformityView {
            id: self.id,
            company_id: self.company_id,
            subject: self.subject,
            description: self.description,
            setor: self.setor,
            reporter_name: anonymize_name(self.reporter_name.as_deref(), level),
            reporter_email: mask_contact(self.reporter_email.as_deref(), level),
            target_name: anonymize_name(self.target_name.as_deref(), level),
            attachments: self.attachments.0,
            workflow_status: self.workflow_status,
            severity_level: self.severity_level,
            probability_level: self.probability_level,
            risk_score,
            confidentiality_level: self.confidentiality_level,
            anonymization: level,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// O que sai na API: identidades já anonimizadas e o risco calculado.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NonconformityView {
    pub id: i64,
    pub company_id: i64,
    pub subject: String,
    pub description: String,
    pub setor: Option<String>,
    #[schema(example = "MJS")]
    pub reporter_name: String,
    pub reporter_email: Option<String>,
    pub target_name: String,
    pub attachments: Vec<String>,
    pub workflow_status: WorkflowStatus,
    pub severity_level: i64,
    pub probability_level: i64,
    #[schema(example = 12)]
    pub risk_score: i64,
    pub confidentiality_level: ConfidentialityLevel,
    pub anonymization: AnonymizationLevel,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNonconformityPayload {
    /// Usado apenas na rota administrativa; a rota pública usa o slug.
    pub company_id: Option<i64>,
    #[validate(length(min = 5, max = 200, message = "O assunto deve ter entre 5 e 200 caracteres."))]
    #[schema(example = "Falha na calibração da balança")]
    pub subject: String,
    #[validate(length(min = 30, message = "A descrição deve ter no mínimo 30 caracteres."))]
    pub description: String,
    #[validate(length(max = 80))]
    #[schema(example = "Produção")]
    pub setor: Option<String>,
    #[validate(length(max = 120))]
    pub reporter_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub reporter_email: Option<String>,
    #[validate(length(max = 120))]
    pub target_name: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_attachment_names"))]
    pub attachments: Vec<String>,
    #[validate(range(min = 1, max = 5, message = "A severidade deve estar entre 1 e 5."))]
    pub severity_level: Option<i64>,
    #[validate(range(min = 1, max = 5, message = "A probabilidade deve estar entre 1 e 5."))]
    pub probability_level: Option<i64>,
    pub confidentiality_level: Option<ConfidentialityLevel>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNonconformityPayload {
    #[validate(length(min = 5, max = 200, message = "O assunto deve ter entre 5 e 200 caracteres."))]
    pub subject: Option<String>,
    #[validate(length(min = 30, message = "A descrição deve ter no mínimo 30 caracteres."))]
    pub description: Option<String>,
    #[validate(length(max = 80))]
    pub setor: Option<String>,
    #[validate(range(min = 1, max = 5, message = "A severidade deve estar entre 1 e 5."))]
    pub severity_level: Option<i64>,
    #[validate(range(min = 1, max = 5, message = "A probabilidade deve estar entre 1 e 5."))]
    pub probability_level: Option<i64>,
    pub confidentiality_level: Option<ConfidentialityLevel>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    #[schema(example = "ACKNOWLEDGED")]
    pub workflow_status: WorkflowStatus,
}
