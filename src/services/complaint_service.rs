// src/services/complaint_service.rs

use sqlx::SqlitePool;

use crate::{
    common::{db_utils::today, error::AppError},
    db::{ComplaintRepository, EventRepository},
    models::{
        company::Company,
        complaint::{Complaint, CreateComplaintPayload},
        event::{NewEvent, CATEGORY_COMPLAINTS, STATUS_OPEN},
    },
};

#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
    event_repo: EventRepository,
    pool: SqlitePool,
}

impl ComplaintService {
    pub fn new(complaint_repo: ComplaintRepository, event_repo: EventRepository, pool: SqlitePool) -> Self {
        Self { complaint_repo, event_repo, pool }
    }

    /// Grava a denúncia e o evento espelho ("Denúncias", "aberto") juntos.
    pub async fn submit(&self, company: &Company, input: &CreateComplaintPayload) -> Result<Complaint, AppError> {
        let mut tx = self.pool.begin().await?;

        let complaint = self.complaint_repo.create(&mut *tx, company.id, input).await?;

        self.event_repo
            .create(
                &mut *tx,
                &NewEvent {
                    date: today(),
                    category: CATEGORY_COMPLAINTS,
                    company: &company.name,
                    status: STATUS_OPEN,
                    description: Some(&complaint.subject),
                    setor: None,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(complaint_id = complaint.id, company_id = company.id, "📨 Denúncia recebida");
        Ok(complaint)
    }
}
