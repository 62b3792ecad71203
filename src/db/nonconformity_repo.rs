// src/db/nonconformity_repo.rs

use chrono::Utc;
use sqlx::{types::Json, Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::nonconformity::{
        ConfidentialityLevel, CreateNonconformityPayload, Nonconformity, UpdateNonconformityPayload,
        WorkflowStatus,
    },
};

#[derive(Clone)]
pub struct NonconformityRepository {
    pool: SqlitePool,
}

impl NonconformityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        input: &CreateNonconformityPayload,
        confidentiality: ConfidentialityLevel,
        created_by: Option<i64>,
    ) -> Result<Nonconformity, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let nc = sqlx::query_as::<_, Nonconformity>(
            r#"
            INSERT INTO nonconformities (
                company_id, subject, description, setor, reporter_name, reporter_email, target_name,
                attachments, workflow_status, severity_level, probability_level, confidentiality_level,
                created_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(input.subject.trim())
        .bind(input.description.trim())
        .bind(&input.setor)
        .bind(&input.reporter_name)
        .bind(&input.reporter_email)
        .bind(&input.target_name)
        .bind(Json(&input.attachments))
        .bind(WorkflowStatus::Reported)
        .bind(input.severity_level.unwrap_or(1))
        .bind(input.probability_level.unwrap_or(1))
        .bind(confidentiality)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;
        Ok(nc)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Nonconformity>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let nc = sqlx::query_as::<_, Nonconformity>("SELECT * FROM nonconformities WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(nc)
    }

    pub async fn list_by_company(&self, company_id: i64) -> Result<Vec<Nonconformity>, AppError> {
        let ncs = sqlx::query_as::<_, Nonconformity>(
            "SELECT * FROM nonconformities WHERE company_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ncs)
    }

    pub async fn list_all(&self) -> Result<Vec<Nonconformity>, AppError> {
        let ncs = sqlx::query_as::<_, Nonconformity>(
            "SELECT * FROM nonconformities ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(ncs)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        input: &UpdateNonconformityPayload,
    ) -> Result<Nonconformity, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Nonconformity>(
            r#"
            UPDATE nonconformities SET
                subject = COALESCE(?, subject),
                description = COALESCE(?, description),
                setor = COALESCE(?, setor),
                severity_level = COALESCE(?, severity_level),
                probability_level = COALESCE(?, probability_level),
                confidentiality_level = COALESCE(?, confidentiality_level),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(input.subject.as_deref().map(str::trim))
        .bind(input.description.as_deref().map(str::trim))
        .bind(&input.setor)
        .bind(input.severity_level)
        .bind(input.probability_level)
        .bind(input.confidentiality_level)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Não conformidade"))
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: i64,
        status: WorkflowStatus,
    ) -> Result<Nonconformity, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Nonconformity>(
            "UPDATE nonconformities SET workflow_status = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Não conformidade"))
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM nonconformities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_company<'e, E>(&self, executor: E, company_id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM nonconformities WHERE company_id = ?")
            .bind(company_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
