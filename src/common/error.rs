// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Já existe uma empresa com o identificador '{0}'")]
    SlugAlreadyExists(String),

    #[error("Já existe outra empresa com o nome '{0}'")]
    CompanyNameTaken(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),

    // `anyhow::Error` guarda o contexto de falhas inesperadas
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Corpo padrão de erro: `{ "error": ..., "details": ... }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::SlugAlreadyExists(_)
            | AppError::CompanyNameTaken(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                ErrorBody {
                    error: "Um ou mais campos são inválidos.".into(),
                    details: Some(Value::Object(details)),
                }
            }
            AppError::BadRequest(message) => ErrorBody { error: message, details: None },
            AppError::SlugAlreadyExists(slug) => ErrorBody {
                error: "Já existe uma empresa com este nome.".into(),
                details: Some(json!({ "slug": slug })),
            },
            AppError::CompanyNameTaken(name) => ErrorBody {
                error: "Já existe outra empresa com este nome.".into(),
                details: Some(json!({ "name": name })),
            },
            // Mesma mensagem para usuário inexistente e senha errada
            AppError::InvalidCredentials => ErrorBody {
                error: "Usuário ou senha inválidos.".into(),
                details: None,
            },
            AppError::InvalidToken => ErrorBody {
                error: "Token de autenticação inválido ou ausente.".into(),
                details: None,
            },
            AppError::Forbidden(message) => ErrorBody { error: message, details: None },
            AppError::NotFound(resource) => ErrorBody {
                error: format!("{} não encontrado(a).", resource),
                details: None,
            },
            AppError::UniqueConstraintViolation(message) => ErrorBody { error: message, details: None },

            // Todo o resto vira 500; o detalhe só vai para o log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ErrorBody {
                    error: "Ocorreu um erro inesperado.".into(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(AppError::SlugAlreadyExists("acme".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::CompanyNameTaken("Acme".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("Empresa").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::UniqueConstraintViolation("x".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
