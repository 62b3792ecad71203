// src/db/user_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::auth::{NewUser, UpdatePermissionsPayload, User, UserType},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn username_exists<'e, E>(&self, executor: E, username: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = ?)")
            .bind(username)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    pub async fn admin_exists(&self) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE user_type = ?)")
            .bind(UserType::Admin)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    // Cria um novo usuário (a senha já chega com hash)
    pub async fn create<'e, E>(&self, executor: E, new_user: &NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                username, password_hash, full_name, email, user_type, company_id,
                can_view_denuncias, can_view_nao_conformidades, can_view_eventos, can_view_dashboard,
                department_id, job_role_id, manager_id, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(new_user.username)
        .bind(new_user.password_hash)
        .bind(new_user.full_name)
        .bind(new_user.email)
        .bind(new_user.user_type)
        .bind(new_user.company_id)
        .bind(new_user.permissions.can_view_denuncias)
        .bind(new_user.permissions.can_view_nao_conformidades)
        .bind(new_user.permissions.can_view_eventos)
        .bind(new_user.permissions.can_view_dashboard)
        .bind(new_user.department_id)
        .bind(new_user.job_role_id)
        .bind(new_user.manager_id)
        .bind(Utc::now())
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "Este nome de usuário já está em uso."))
    }

    /// Lista todos os usuários, ou apenas os de uma empresa.
    pub async fn list(&self, company_id: Option<i64>) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE (? IS NULL OR company_id = ?) ORDER BY username",
        )
        .bind(company_id)
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn update_permissions(
        &self,
        id: i64,
        input: &UpdatePermissionsPayload,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                can_view_denuncias = COALESCE(?, can_view_denuncias),
                can_view_nao_conformidades = COALESCE(?, can_view_nao_conformidades),
                can_view_eventos = COALESCE(?, can_view_eventos),
                can_view_dashboard = COALESCE(?, can_view_dashboard)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(input.can_view_denuncias)
        .bind(input.can_view_nao_conformidades)
        .bind(input.can_view_eventos)
        .bind(input.can_view_dashboard)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_company<'e, E>(&self, executor: E, company_id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE company_id = ?")
            .bind(company_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Quem recebe notificações de NC de uma empresa: todos os admins e os
    /// usuários da empresa que enxergam não conformidades.
    pub async fn nonconformity_recipients<'e, E>(
        &self,
        executor: E,
        company_id: i64,
    ) -> Result<Vec<i64>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM users
            WHERE user_type = ?
               OR (company_id = ? AND can_view_nao_conformidades = 1)
            ORDER BY id
            "#,
        )
        .bind(UserType::Admin)
        .bind(company_id)
        .fetch_all(executor)
        .await?;
        Ok(ids)
    }

    pub async fn belongs_to_company(&self, user_id: i64, company_id: i64) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE id = ? AND company_id = ?)",
        )
        .bind(user_id)
        .bind(company_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
