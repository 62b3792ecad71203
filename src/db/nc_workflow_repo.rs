// src/db/nc_workflow_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

use crate::{
    common::error::AppError,
    models::nc_workflow::{
        CreateActionPayload, NcAccessAudit, NcAction, NcNotification, NcPermission, NcSettings,
        UpdateActionPayload, UpdateNcSettingsPayload,
    },
};

// Notificações, auditoria, permissões, ações e configurações das NCs
#[derive(Clone)]
pub struct NcWorkflowRepository {
    pool: SqlitePool,
}

impl NcWorkflowRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // --- NOTIFICAÇÕES ---

    /// Uma notificação por destinatário, todas na mesma conexão (transação do chamador).
    pub async fn notify_many(
        &self,
        conn: &mut SqliteConnection,
        nonconformity_id: i64,
        user_ids: &[i64],
        message: &str,
    ) -> Result<usize, AppError> {
        let now = Utc::now();
        for user_id in user_ids {
            sqlx::query(
                r#"
                INSERT INTO nc_notifications (nonconformity_id, user_id, message, is_read, created_at)
                VALUES (?, ?, ?, 0, ?)
                "#,
            )
            .bind(nonconformity_id)
            .bind(user_id)
            .bind(message)
            .bind(now)
            .execute(&mut *conn)
            .await?;
        }
        Ok(user_ids.len())
    }

    pub async fn list_notifications(&self, user_id: i64) -> Result<Vec<NcNotification>, AppError> {
        let notifications = sqlx::query_as::<_, NcNotification>(
            r#"
            SELECT * FROM nc_notifications
            WHERE user_id = ?
            ORDER BY is_read ASC, created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    pub async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<Option<NcNotification>, AppError> {
        let notification = sqlx::query_as::<_, NcNotification>(
            "UPDATE nc_notifications SET is_read = 1 WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(notification)
    }

    // --- AUDITORIA ---

    pub async fn record_audit<'e, E>(
        &self,
        executor: E,
        nonconformity_id: i64,
        user_id: Option<i64>,
        action: &str,
        details: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO nc_access_audit (nonconformity_id, user_id, action, details, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(nonconformity_id)
        .bind(user_id)
        .bind(action)
        .bind(details)
        .bind(Utc::now())
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list_audit(&self, nonconformity_id: i64) -> Result<Vec<NcAccessAudit>, AppError> {
        let entries = sqlx::query_as::<_, NcAccessAudit>(
            "SELECT * FROM nc_access_audit WHERE nonconformity_id = ? ORDER BY id ASC",
        )
        .bind(nonconformity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    // --- PERMISSÕES POR NC ---

    pub async fn upsert_permission<'e, E>(
        &self,
        executor: E,
        nonconformity_id: i64,
        user_id: i64,
        can_view_identity: bool,
        granted_by: i64,
    ) -> Result<NcPermission, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let permission = sqlx::query_as::<_, NcPermission>(
            r#"
            INSERT INTO nc_permissions (nonconformity_id, user_id, can_view_identity, granted_by, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (nonconformity_id, user_id)
            DO UPDATE SET
                can_view_identity = excluded.can_view_identity,
                granted_by = excluded.granted_by
            RETURNING *
            "#,
        )
        .bind(nonconformity_id)
        .bind(user_id)
        .bind(can_view_identity)
        .bind(granted_by)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;
        Ok(permission)
    }

    pub async fn can_view_identity(&self, nonconformity_id: i64, user_id: i64) -> Result<bool, AppError> {
        let allowed: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM nc_permissions
                WHERE nonconformity_id = ? AND user_id = ? AND can_view_identity = 1
            )
            "#,
        )
        .bind(nonconformity_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(allowed)
    }

    /// IDs das NCs cuja identidade o usuário pode ver (para listagens).
    pub async fn identity_grants(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT nonconformity_id FROM nc_permissions WHERE user_id = ? AND can_view_identity = 1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    // --- AÇÕES CORRETIVAS ---

    pub async fn create_action(
        &self,
        nonconformity_id: i64,
        input: &CreateActionPayload,
    ) -> Result<NcAction, AppError> {
        let now = Utc::now();
        let action = sqlx::query_as::<_, NcAction>(
            r#"
            INSERT INTO nc_actions (nonconformity_id, user_id, description, due_date, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'PENDING', ?, ?)
            RETURNING *
            "#,
        )
        .bind(nonconformity_id)
        .bind(input.user_id)
        .bind(input.description.trim())
        .bind(input.due_date)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(action)
    }

    pub async fn list_actions(&self, nonconformity_id: i64) -> Result<Vec<NcAction>, AppError> {
        let actions = sqlx::query_as::<_, NcAction>(
            "SELECT * FROM nc_actions WHERE nonconformity_id = ? ORDER BY id ASC",
        )
        .bind(nonconformity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(actions)
    }

    pub async fn update_action(
        &self,
        nonconformity_id: i64,
        action_id: i64,
        input: &UpdateActionPayload,
    ) -> Result<Option<NcAction>, AppError> {
        let action = sqlx::query_as::<_, NcAction>(
            r#"
            UPDATE nc_actions SET
                description = COALESCE(?, description),
                due_date = COALESCE(?, due_date),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ? AND nonconformity_id = ?
            RETURNING *
            "#,
        )
        .bind(input.description.as_deref().map(str::trim))
        .bind(input.due_date)
        .bind(input.status)
        .bind(Utc::now())
        .bind(action_id)
        .bind(nonconformity_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(action)
    }

    // --- CONFIGURAÇÕES ---

    /// Sem linha salva, a empresa usa os valores padrão.
    pub async fn get_settings<'e, E>(&self, executor: E, company_id: i64) -> Result<NcSettings, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let settings = sqlx::query_as::<_, NcSettings>("SELECT * FROM nc_settings WHERE company_id = ?")
            .bind(company_id)
            .fetch_optional(executor)
            .await?;

        Ok(settings.unwrap_or_else(|| NcSettings::defaults(company_id)))
    }

    pub async fn upsert_settings(
        &self,
        company_id: i64,
        input: &UpdateNcSettingsPayload,
    ) -> Result<NcSettings, AppError> {
        let current = self.get_settings(&self.pool, company_id).await?;

        // UPSERT (Insert or Update) mesclando com o que já existia
        let settings = sqlx::query_as::<_, NcSettings>(
            r#"
            INSERT INTO nc_settings (company_id, default_confidentiality, notify_on_create, notify_on_status_change, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (company_id)
            DO UPDATE SET
                default_confidentiality = excluded.default_confidentiality,
                notify_on_create = excluded.notify_on_create,
                notify_on_status_change = excluded.notify_on_status_change,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(input.default_confidentiality.unwrap_or(current.default_confidentiality))
        .bind(input.notify_on_create.unwrap_or(current.notify_on_create))
        .bind(input.notify_on_status_change.unwrap_or(current.notify_on_status_change))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
