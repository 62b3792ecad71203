// src/common/anonymize.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Quanto da identidade de uma pessoa pode ser exibido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnonymizationLevel {
    None,
    Initials,
    Full,
}

impl AnonymizationLevel {
    /// Interpreta o nível vindo de texto livre. Valores desconhecidos não anonimizam.
    #[cfg(test)]
    fn parse(level: &str) -> Self {
        match level.trim().to_ascii_uppercase().as_str() {
            "INITIALS" => AnonymizationLevel::Initials,
            "FULL" => AnonymizationLevel::Full,
            _ => AnonymizationLevel::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnonymizationLevel::None => "NONE",
            AnonymizationLevel::Initials => "INITIALS",
            AnonymizationLevel::Full => "FULL",
        }
    }
}

pub const MISSING_NAME: &str = "N/A";
pub const MASK: &str = "***";

pub fn anonymize_name(name: Option<&str>, level: AnonymizationLevel) -> String {
    let name = match name.map(str::trim) {
        Some(n) if !n.is_empty() => n,
        _ => return MISSING_NAME.to_string(),
    };

    match level {
        AnonymizationLevel::None => name.to_string(),
        AnonymizationLevel::Initials => name
            .split_whitespace()
            .filter_map(|token| token.chars().next())
            .flat_map(char::to_uppercase)
            .collect(),
        AnonymizationLevel::Full => MASK.to_string(),
    }
}

/// Contatos não têm forma "iniciais": ou aparecem inteiros ou somem.
pub fn mask_contact(value: Option<&str>, level: AnonymizationLevel) -> Option<String> {
    match level {
        AnonymizationLevel::None => value.map(str::to_string),
        _ => value.map(|_| MASK.to_string()),
    }
}
