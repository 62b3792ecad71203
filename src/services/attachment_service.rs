// src/services/attachment_service.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{attachments::sanitized_extension, error::AppError};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub original_name: String,
    /// Nome a ser enviado no campo `attachments` dos formulários.
    #[schema(example = "1b4e28ba-2fa1-11d2-883f-0016d3cca427.pdf")]
    pub stored_name: String,
    pub size: u64,
}

/// Onde os anexos enviados ficam guardados.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, AppError>;

    /// Diretório servido em `/uploads`.
    fn root(&self) -> &Path;
}

pub struct LocalAttachmentStore {
    dir: PathBuf,
}

impl LocalAttachmentStore {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, AppError> {
        // O nome original nunca vira caminho: só a extensão é aproveitada
        let stored_name = match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        tokio::fs::write(self.dir.join(&stored_name), bytes).await?;
        tracing::debug!(%stored_name, size = bytes.len(), "Anexo salvo");

        Ok(StoredFile {
            original_name: original_name.to_string(),
            stored_name,
            size: bytes.len() as u64,
        })
    }

    fn root(&self) -> &Path {
        &self.dir
    }
}
