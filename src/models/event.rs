// src/models/event.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const CATEGORY_COMPLAINTS: &str = "Denúncias";
pub const CATEGORY_NONCONFORMITIES: &str = "Não conformidades";
pub const CATEGORY_COMPANIES: &str = "Empresas";

pub const STATUS_OPEN: &str = "aberto";
pub const STATUS_ACTIVE: &str = "ativo";

// Registro genérico da linha do tempo. `company` guarda o NOME da empresa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub date: NaiveDate,
    #[schema(example = "Não conformidades")]
    pub category: String,
    #[schema(example = "Acme Industrial")]
    pub company: String,
    #[schema(example = "aberto")]
    pub status: String,
    pub description: Option<String>,
    pub setor: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Evento a inserir, normalmente como efeito colateral de outra escrita.
#[derive(Debug, Clone)]
pub struct NewEvent<'a> {
    pub date: NaiveDate,
    pub category: &'a str,
    pub company: &'a str,
    pub status: &'a str,
    pub description: Option<&'a str>,
    pub setor: Option<&'a str>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    /// Padrão: hoje.
    pub date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 80, message = "A categoria é obrigatória."))]
    pub category: String,
    #[validate(length(min = 1, message = "A empresa é obrigatória."))]
    pub company: String,
    #[validate(length(min = 1, max = 40, message = "O status é obrigatório."))]
    pub status: String,
    pub description: Option<String>,
    pub setor: Option<String>,
}

/// Só status, categoria e descrição podem mudar.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventPayload {
    #[validate(length(min = 1, max = 80))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 40))]
    pub status: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub company: Option<String>,
}
