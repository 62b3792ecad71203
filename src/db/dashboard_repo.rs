// src/db/dashboard_repo.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    models::dashboard::{CountEntry, DashboardStats},
};

/// Escopo das contagens: tudo, ou uma empresa (id + nome usado nos eventos).
#[derive(Debug, Clone, Copy)]
pub enum StatsScope<'a> {
    All,
    Company { id: i64, name: &'a str },
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self, scope: StatsScope<'_>) -> Result<DashboardStats, AppError> {
        let (company_id, company_name) = match scope {
            StatsScope::All => (None, None),
            StatsScope::Company { id, name } => (Some(id), Some(name)),
        };

        // Snapshot consistente das contagens
        let mut tx = self.pool.begin().await?;

        let (total_companies, active_companies) = match scope {
            StatsScope::All => {
                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
                    .fetch_one(&mut *tx)
                    .await?;
                let active: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE status = 'active'")
                    .fetch_one(&mut *tx)
                    .await?;
                (Some(total), Some(active))
            }
            StatsScope::Company { .. } => (None, None),
        };

        let total_complaints: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM complaints WHERE (? IS NULL OR company_id = ?)")
                .bind(company_id)
                .bind(company_id)
                .fetch_one(&mut *tx)
                .await?;

        let total_nonconformities: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM nonconformities WHERE (? IS NULL OR company_id = ?)")
                .bind(company_id)
                .bind(company_id)
                .fetch_one(&mut *tx)
                .await?;

        let total_events: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE (? IS NULL OR company = ?)")
                .bind(company_name)
                .bind(company_name)
                .fetch_one(&mut *tx)
                .await?;

        let events_by_category = sqlx::query_as::<_, CountEntry>(
            r#"
            SELECT category AS label, COUNT(*) AS total
            FROM events
            WHERE (? IS NULL OR company = ?)
            GROUP BY category
            ORDER BY total DESC, label ASC
            "#,
        )
        .bind(company_name)
        .bind(company_name)
        .fetch_all(&mut *tx)
        .await?;

        let events_by_status = sqlx::query_as::<_, CountEntry>(
            r#"
            SELECT status AS label, COUNT(*) AS total
            FROM events
            WHERE (? IS NULL OR company = ?)
            GROUP BY status
            ORDER BY total DESC, label ASC
            "#,
        )
        .bind(company_name)
        .bind(company_name)
        .fetch_all(&mut *tx)
        .await?;

        let nonconformities_by_status = sqlx::query_as::<_, CountEntry>(
            r#"
            SELECT workflow_status AS label, COUNT(*) AS total
            FROM nonconformities
            WHERE (? IS NULL OR company_id = ?)
            GROUP BY workflow_status
            ORDER BY total DESC, label ASC
            "#,
        )
        .bind(company_id)
        .bind(company_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardStats {
            total_companies,
            active_companies,
            total_complaints,
            total_nonconformities,
            total_events,
            events_by_category,
            events_by_status,
            nonconformities_by_status,
        })
    }
}
