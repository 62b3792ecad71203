// src/common/db_utils.rs

use chrono::{NaiveDate, Utc};

use crate::common::error::AppError;

/// Converte violação de chave única em um erro amigável; o resto vira `DatabaseError`.
pub(crate) fn map_unique_violation(e: sqlx::Error, message: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(message.to_string());
        }
    }
    e.into()
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
