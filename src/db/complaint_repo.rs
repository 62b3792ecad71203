// src/db/complaint_repo.rs

use chrono::Utc;
use sqlx::{types::Json, Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::complaint::{Complaint, CreateComplaintPayload},
};

#[derive(Clone)]
pub struct ComplaintRepository {
    pool: SqlitePool,
}

impl ComplaintRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_id: i64,
        input: &CreateComplaintPayload,
    ) -> Result<Complaint, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints (
                company_id, subject, description, reporter_name, reporter_email, reporter_phone,
                attachments, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(input.subject.trim())
        .bind(input.description.trim())
        .bind(&input.reporter_name)
        .bind(&input.reporter_email)
        .bind(&input.reporter_phone)
        .bind(Json(&input.attachments))
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;
        Ok(complaint)
    }

    pub async fn list_by_company(&self, company_id: i64) -> Result<Vec<Complaint>, AppError> {
        let complaints = sqlx::query_as::<_, Complaint>(
            "SELECT * FROM complaints WHERE company_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(complaints)
    }

    pub async fn list_all(&self) -> Result<Vec<Complaint>, AppError> {
        let complaints = sqlx::query_as::<_, Complaint>(
            "SELECT * FROM complaints ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(complaints)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Complaint>, AppError> {
        let complaint = sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(complaint)
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM complaints WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_company<'e, E>(&self, executor: E, company_id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM complaints WHERE company_id = ?")
            .bind(company_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
