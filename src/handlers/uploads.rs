// src/handlers/uploads.rs

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{common::error::AppError, config::AppState, services::attachment_service::StoredFile};

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub files: Vec<StoredFile>,
}

// Público: usado pelos formulários anônimos antes do envio
#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "Uploads",
    request_body(content = String, content_type = "multipart/form-data", description = "Um ou mais arquivos"),
    responses(
        (status = 201, description = "Arquivos gravados", body = UploadResponse),
        (status = 400, description = "Nenhum arquivo ou corpo inválido")
    )
)]
pub async fn upload_files(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        // Campos de texto são ignorados
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        files.push(app_state.attachment_store.save(&original_name, &bytes).await?);
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("Nenhum arquivo enviado.".into()));
    }

    Ok((StatusCode::CREATED, Json(UploadResponse { files })))
}
