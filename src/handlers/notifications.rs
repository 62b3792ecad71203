// src/handlers/notifications.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::nc_workflow::NcNotification,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    responses((status = 200, description = "Notificações do usuário, não lidas primeiro", body = Vec<NcNotification>)),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<NcNotification>>, AppError> {
    let notifications = app_state.nc_workflow_repo.list_notifications(user.id).await?;
    Ok(Json(notifications))
}

// Só o destinatário marca a própria notificação
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = i64, Path, description = "ID da notificação")),
    responses(
        (status = 200, description = "Notificação marcada como lida", body = NcNotification),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_as_read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<NcNotification>, AppError> {
    let notification = app_state
        .nc_workflow_repo
        .mark_notification_read(id, user.id)
        .await?
        .ok_or(AppError::NotFound("Notificação"))?;
    Ok(Json(notification))
}
