// src/db/event_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::event::{Event, EventFilter, NewEvent, UpdateEventPayload},
};

#[derive(Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, event: &NewEvent<'_>) -> Result<Event, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let created = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (date, category, company, status, description, setor, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(event.date)
        .bind(event.category)
        .bind(event.company)
        .bind(event.status)
        .bind(event.description)
        .bind(event.setor)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;
        Ok(created)
    }

    /// `company` do filtro é ignorado quando `scope` (nome da empresa do leitor) vem preenchido.
    pub async fn list(&self, filter: &EventFilter, scope: Option<&str>) -> Result<Vec<Event>, AppError> {
        let company = scope.or(filter.company.as_deref());
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE (? IS NULL OR company = ?)
              AND (? IS NULL OR category = ?)
              AND (? IS NULL OR status = ?)
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(company)
        .bind(company)
        .bind(&filter.category)
        .bind(&filter.category)
        .bind(&filter.status)
        .bind(&filter.status)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    pub async fn update(&self, id: i64, input: &UpdateEventPayload) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET
                category = COALESCE(?, category),
                status = COALESCE(?, status),
                description = COALESCE(?, description)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&input.category)
        .bind(&input.status)
        .bind(&input.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_company<'e, E>(&self, executor: E, company_name: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM events WHERE company = ?")
            .bind(company_name)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Mantém o nome desnormalizado em dia quando a empresa é renomeada.
    pub async fn rename_company<'e, E>(&self, executor: E, old_name: &str, new_name: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE events SET company = ? WHERE company = ?")
            .bind(new_name)
            .bind(old_name)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
