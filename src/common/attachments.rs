// src/common/attachments.rs

use std::borrow::Cow;

use validator::ValidationError;

const MAX_NAME_LEN: usize = 255;
const MAX_EXTENSION_LEN: usize = 10;

/// Um anexo referenciado por um formulário precisa ser apenas um nome de arquivo
/// dentro do diretório de uploads.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Validador usado em `#[validate(custom(...))]` dos payloads com anexos.
pub fn validate_attachment_names(names: &[String]) -> Result<(), ValidationError> {
    if names.iter().all(|n| is_safe_file_name(n)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("attachment_name");
        err.message = Some(Cow::Borrowed("Nome de anexo inválido."));
        Err(err)
    }
}

/// Extensão normalizada (minúscula, alfanumérica) usada no nome armazenado.
pub fn sanitized_extension(original: &str) -> Option<String> {
    let (_, ext) = original.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}
