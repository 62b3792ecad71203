// src/db/company_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::error::AppError,
    models::company::{Company, CompanyStatus, CreateCompanyPayload, UpdateCompanyPayload},
};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn slug_exists<'e, E>(&self, executor: E, slug: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM companies WHERE slug = ?)")
            .bind(slug)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    /// Outra empresa já usa este nome (ou o slug que ele geraria)?
    pub async fn name_taken<'e, E>(
        &self,
        executor: E,
        name: &str,
        slug: &str,
        except_id: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM companies WHERE id <> ? AND (name = ? COLLATE NOCASE OR slug = ?))",
        )
        .bind(except_id)
        .bind(name)
        .bind(slug)
        .fetch_one(executor)
        .await?;
        Ok(taken)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        slug: &str,
        input: &CreateCompanyPayload,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, slug, logo, primary_color, secondary_color, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(input.name.trim())
        .bind(slug)
        .bind(&input.logo)
        .bind(&input.primary_color)
        .bind(&input.secondary_color)
        .bind(CompanyStatus::Active)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Corrida entre a checagem do slug e o INSERT
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SlugAlreadyExists(slug.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Company>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(company)
    }

    pub async fn list(&self) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    /// Atualização parcial; o slug nunca muda.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        input: &UpdateCompanyPayload,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET
                name = COALESCE(?, name),
                logo = COALESCE(?, logo),
                primary_color = COALESCE(?, primary_color),
                secondary_color = COALESCE(?, secondary_color),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(input.name.as_deref().map(str::trim))
        .bind(&input.logo)
        .bind(&input.primary_color)
        .bind(&input.secondary_color)
        .bind(input.status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("Empresa"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
