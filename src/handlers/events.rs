// src/handlers/events.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{db_utils::today, error::AppError},
    config::AppState,
    middleware::rbac::{PermViewEvents, RequirePermission},
    models::event::{CreateEventPayload, Event, EventFilter, NewEvent, UpdateEventPayload},
};

/// Quem não é admin só enxerga os eventos da própria empresa.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(EventFilter),
    responses(
        (status = 200, description = "Linha do tempo filtrada", body = Vec<Event>),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    permission: RequirePermission<PermViewEvents>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<Vec<Event>>, AppError> {
    let user = permission.user();

    let scope = if user.is_admin() {
        None
    } else {
        let company_id = user
            .company_id
            .ok_or_else(|| AppError::Forbidden("Usuário sem empresa vinculada.".into()))?;
        let company = app_state
            .company_repo
            .find_by_id(&app_state.db_pool, company_id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;
        Some(company.name)
    };

    let events = app_state.event_repo.list(&filter, scope.as_deref()).await?;
    Ok(Json(events))
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventPayload,
    responses(
        (status = 201, description = "Evento criado", body = Event),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let event = app_state
        .event_repo
        .create(
            &app_state.db_pool,
            &NewEvent {
                date: payload.date.unwrap_or_else(today),
                category: payload.category.trim(),
                company: payload.company.trim(),
                status: payload.status.trim(),
                description: payload.description.as_deref(),
                setor: payload.setor.as_deref(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = i64, Path, description = "ID do evento")),
    request_body = UpdateEventPayload,
    responses(
        (status = 200, description = "Evento atualizado", body = Event),
        (status = 404, description = "Evento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_event(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateEventPayload>,
) -> Result<Json<Event>, AppError> {
    payload.validate()?;

    let event = app_state
        .event_repo
        .update(id, &payload)
        .await?
        .ok_or(AppError::NotFound("Evento"))?;
    Ok(Json(event))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = i64, Path, description = "ID do evento")),
    responses(
        (status = 204, description = "Evento removido"),
        (status = 404, description = "Evento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_event(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if app_state.event_repo.delete(id).await? == 0 {
        return Err(AppError::NotFound("Evento"));
    }
    Ok(StatusCode::NO_CONTENT)
}
