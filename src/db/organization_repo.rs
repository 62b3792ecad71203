// src/db/organization_repo.rs

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::organization::{CreateDepartmentPayload, CreateJobRolePayload, Department, JobRole},
};

// Estrutura organizacional: departamentos (árvore via parent_id) e cargos
#[derive(Clone)]
pub struct OrganizationRepository {
    pool: SqlitePool,
}

impl OrganizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_department(
        &self,
        company_id: i64,
        input: &CreateDepartmentPayload,
    ) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (company_id, code, name, parent_id, manager_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(input.code.trim())
        .bind(input.name.trim())
        .bind(input.parent_id)
        .bind(input.manager_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe um departamento com esse código."))
    }

    pub async fn list_departments(&self, company_id: i64) -> Result<Vec<Department>, AppError> {
        let departments = sqlx::query_as::<_, Department>(
            "SELECT * FROM departments WHERE company_id = ? ORDER BY code",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(departments)
    }

    pub async fn department_in_company(&self, id: i64, company_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM departments WHERE id = ? AND company_id = ?)",
        )
        .bind(id)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create_job_role(
        &self,
        company_id: i64,
        input: &CreateJobRolePayload,
    ) -> Result<JobRole, AppError> {
        sqlx::query_as::<_, JobRole>(
            r#"
            INSERT INTO job_roles (company_id, code, name, level, department_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(input.code.trim())
        .bind(input.name.trim())
        .bind(input.level.unwrap_or(1))
        .bind(input.department_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe um cargo com esse código."))
    }

    pub async fn list_job_roles(&self, company_id: i64) -> Result<Vec<JobRole>, AppError> {
        let roles = sqlx::query_as::<_, JobRole>(
            "SELECT * FROM job_roles WHERE company_id = ? ORDER BY level, code",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    pub async fn job_role_in_company(&self, id: i64, company_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM job_roles WHERE id = ? AND company_id = ?)",
        )
        .bind(id)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
