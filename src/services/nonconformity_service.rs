// src/services/nonconformity_service.rs

use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::{
    common::{anonymize::AnonymizationLevel, db_utils::today, error::AppError},
    db::{EventRepository, NcWorkflowRepository, NonconformityRepository, UserRepository},
    models::{
        auth::User,
        company::Company,
        event::{NewEvent, CATEGORY_NONCONFORMITIES, STATUS_OPEN},
        nc_workflow::{
            GrantPermissionPayload, NcPermission, AUDIT_PERMISSION_CHANGE, AUDIT_STATUS_CHANGE,
            AUDIT_UPDATE, AUDIT_VIEW,
        },
        nonconformity::{
            CreateNonconformityPayload, Nonconformity, NonconformityView, UpdateNonconformityPayload,
            WorkflowStatus,
        },
    },
};

#[derive(Clone)]
pub struct NonconformityService {
    nc_repo: NonconformityRepository,
    event_repo: EventRepository,
    user_repo: UserRepository,
    workflow_repo: NcWorkflowRepository,
    pool: SqlitePool,
}

impl NonconformityService {
    pub fn new(
        nc_repo: NonconformityRepository,
        event_repo: EventRepository,
        user_repo: UserRepository,
        workflow_repo: NcWorkflowRepository,
        pool: SqlitePool,
    ) -> Self {
        Self { nc_repo, event_repo, user_repo, workflow_repo, pool }
    }

    /// Registro da NC: linha em `nonconformities`, evento espelho e notificações,
    /// tudo na mesma transação.
    pub async fn submit(
        &self,
        company: &Company,
        input: &CreateNonconformityPayload,
        created_by: Option<i64>,
    ) -> Result<Nonconformity, AppError> {
        let mut tx = self.pool.begin().await?;

        let settings = self.workflow_repo.get_settings(&mut *tx, company.id).await?;
        let confidentiality = input
            .confidentiality_level
            .unwrap_or(settings.default_confidentiality);

        let nc = self
            .nc_repo
            .create(&mut *tx, company.id, input, confidentiality, created_by)
            .await?;

        self.event_repo
            .create(
                &mut *tx,
                &NewEvent {
                    date: today(),
                    category: CATEGORY_NONCONFORMITIES,
                    company: &company.name,
                    status: STATUS_OPEN,
                    description: Some(&nc.subject),
                    setor: nc.setor.as_deref(),
                },
            )
            .await?;

        if settings.notify_on_create {
            let recipients = self
                .user_repo
                .nonconformity_recipients(&mut *tx, company.id)
                .await?;
            let message = format!("Nova não conformidade #{}: {}", nc.id, nc.subject);
            self.workflow_repo
                .notify_many(&mut *tx, nc.id, &recipients, &message)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(nc_id = nc.id, company_id = company.id, "📋 Não conformidade registrada");
        Ok(nc)
    }

    /// Admins e quem recebeu permissão explícita veem a identidade; os demais
    /// recebem o nível derivado da confidencialidade da NC.
    pub async fn viewer_level(&self, viewer: &User, nc: &Nonconformity) -> Result<AnonymizationLevel, AppError> {
        if viewer.is_admin() || self.workflow_repo.can_view_identity(nc.id, viewer.id).await? {
            return Ok(AnonymizationLevel::None);
        }
        Ok(nc.confidentiality_level.anonymization())
    }

    async fn views_for(&self, viewer: &User, ncs: Vec<Nonconformity>) -> Result<Vec<NonconformityView>, AppError> {
        let grants: HashSet<i64> = if viewer.is_admin() {
            HashSet::new()
        } else {
            self.workflow_repo.identity_grants(viewer.id).await?.into_iter().collect()
        };

        Ok(ncs
            .into_iter()
            .map(|nc| {
                let level = if viewer.is_admin() || grants.contains(&nc.id) {
                    AnonymizationLevel::None
                } else {
                    nc.confidentiality_level.anonymization()
                };
                nc.into_view(level)
            })
            .collect())
    }

    pub async fn list_for_company(&self, viewer: &User, company_id: i64) -> Result<Vec<NonconformityView>, AppError> {
        let ncs = self.nc_repo.list_by_company(company_id).await?;
        self.views_for(viewer, ncs).await
    }

    pub async fn list_all(&self, viewer: &User) -> Result<Vec<NonconformityView>, AppError> {
        let ncs = self.nc_repo.list_all().await?;
        self.views_for(viewer, ncs).await
    }

    /// Carrega a NC garantindo que o leitor pertence à empresa dela.
    pub async fn find_accessible(&self, viewer: &User, id: i64) -> Result<Nonconformity, AppError> {
        let nc = self
            .nc_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Não conformidade"))?;

        if !viewer.belongs_to(nc.company_id) {
            return Err(AppError::Forbidden("Esta não conformidade pertence a outra empresa.".into()));
        }
        Ok(nc)
    }

    /// Leitura detalhada; toda leitura fica registrada na auditoria.
    pub async fn get_for_viewer(&self, viewer: &User, id: i64) -> Result<NonconformityView, AppError> {
        let nc = self.find_accessible(viewer, id).await?;
        let level = self.viewer_level(viewer, &nc).await?;

        self.workflow_repo
            .record_audit(&self.pool, nc.id, Some(viewer.id), AUDIT_VIEW, Some(level.as_str()))
            .await?;

        Ok(nc.into_view(level))
    }

    pub async fn update(
        &self,
        viewer: &User,
        id: i64,
        input: &UpdateNonconformityPayload,
    ) -> Result<NonconformityView, AppError> {
        let current = self.find_accessible(viewer, id).await?;

        // Rebaixar a confidencialidade expõe o relator: mesma regra da concessão de identidade
        if input.confidentiality_level.is_some() && !viewer.manages(current.company_id) {
            return Err(AppError::Forbidden(
                "Apenas a empresa ou um administrador pode alterar a confidencialidade.".into(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let updated = self.nc_repo.update(&mut *tx, current.id, input).await?;
        self.workflow_repo
            .record_audit(&mut *tx, updated.id, Some(viewer.id), AUDIT_UPDATE, None)
            .await?;
        tx.commit().await?;

        let level = self.viewer_level(viewer, &updated).await?;
        Ok(updated.into_view(level))
    }

    /// Qualquer status pode ir para qualquer outro; a mudança é auditada e notificada.
    pub async fn change_status(
        &self,
        viewer: &User,
        id: i64,
        status: WorkflowStatus,
    ) -> Result<NonconformityView, AppError> {
        self.find_accessible(viewer, id).await?;

        let mut tx = self.pool.begin().await?;

        // Status anterior lido dentro da transação
        let current = self
            .nc_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Não conformidade"))?;
        let details = format!("{} -> {}", current.workflow_status.as_str(), status.as_str());

        let updated = self.nc_repo.update_status(&mut *tx, current.id, status).await?;
        self.workflow_repo
            .record_audit(&mut *tx, updated.id, Some(viewer.id), AUDIT_STATUS_CHANGE, Some(&details))
            .await?;

        let settings = self.workflow_repo.get_settings(&mut *tx, updated.company_id).await?;
        if settings.notify_on_status_change {
            let recipients: Vec<i64> = self
                .user_repo
                .nonconformity_recipients(&mut *tx, updated.company_id)
                .await?
                .into_iter()
                .filter(|user_id| *user_id != viewer.id)
                .collect();
            let message = format!("Não conformidade #{} mudou: {}", updated.id, details);
            self.workflow_repo
                .notify_many(&mut *tx, updated.id, &recipients, &message)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(nc_id = updated.id, user_id = viewer.id, %details, "Status de NC alterado");

        let level = self.viewer_level(viewer, &updated).await?;
        Ok(updated.into_view(level))
    }

    /// Concede (ou revoga) a visão da identidade do relator para um usuário da empresa.
    pub async fn set_identity_permission(
        &self,
        actor: &User,
        id: i64,
        input: &GrantPermissionPayload,
    ) -> Result<NcPermission, AppError> {
        let nc = self.find_accessible(actor, id).await?;

        if !actor.manages(nc.company_id) {
            return Err(AppError::Forbidden(
                "Apenas a empresa ou um administrador pode conceder acesso à identidade.".into(),
            ));
        }
        if !self.user_repo.belongs_to_company(input.user_id, nc.company_id).await? {
            return Err(AppError::BadRequest("O usuário não pertence a esta empresa.".into()));
        }

        let details = format!("user {} can_view_identity={}", input.user_id, input.can_view_identity);

        let mut tx = self.pool.begin().await?;
        let permission = self
            .workflow_repo
            .upsert_permission(&mut *tx, nc.id, input.user_id, input.can_view_identity, actor.id)
            .await?;
        self.workflow_repo
            .record_audit(&mut *tx, nc.id, Some(actor.id), AUDIT_PERMISSION_CHANGE, Some(&details))
            .await?;
        tx.commit().await?;

        Ok(permission)
    }

    /// Remoção administrativa; dependentes caem por cascata.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.nc_repo.delete(id).await? == 0 {
            return Err(AppError::NotFound("Não conformidade"));
        }
        tracing::info!(nc_id = id, "🗑️ Não conformidade removida");
        Ok(())
    }
}
