// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Contagem agrupada por um rótulo (categoria, status...)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountEntry {
    pub label: String,
    pub total: i64,
}

// Cards e gráficos do painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Presente apenas na visão administrativa.
    pub total_companies: Option<i64>,
    pub active_companies: Option<i64>,
    pub total_complaints: i64,
    pub total_nonconformities: i64,
    pub total_events: i64,
    pub events_by_category: Vec<CountEntry>,
    pub events_by_status: Vec<CountEntry>,
    pub nonconformities_by_status: Vec<CountEntry>,
}
