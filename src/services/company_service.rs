// src/services/company_service.rs

use sqlx::SqlitePool;

use crate::{
    common::{db_utils::today, error::AppError, slug::slugify},
    db::{ComplaintRepository, CompanyRepository, EventRepository, NonconformityRepository, UserRepository},
    models::{
        auth::{NewUser, UserPermissions, UserType},
        company::{Company, CreateCompanyPayload, CreateCompanyResponse, UpdateCompanyPayload},
        event::{NewEvent, CATEGORY_COMPANIES, STATUS_ACTIVE},
    },
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
    user_repo: UserRepository,
    event_repo: EventRepository,
    complaint_repo: ComplaintRepository,
    nonconformity_repo: NonconformityRepository,
    auth_service: AuthService,
    default_company_password: String,
    pool: SqlitePool, // Usamos a pool para iniciar transações
}

impl CompanyService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        company_repo: CompanyRepository,
        user_repo: UserRepository,
        event_repo: EventRepository,
        complaint_repo: ComplaintRepository,
        nonconformity_repo: NonconformityRepository,
        auth_service: AuthService,
        default_company_password: String,
        pool: SqlitePool,
    ) -> Self {
        Self {
            company_repo,
            user_repo,
            event_repo,
            complaint_repo,
            nonconformity_repo,
            auth_service,
            default_company_password,
            pool,
        }
    }

    /// Cria a empresa, o usuário de login da empresa (username = slug) e o
    /// evento de cadastro, atomicamente.
    pub async fn create_company(&self, input: &CreateCompanyPayload) -> Result<CreateCompanyResponse, AppError> {
        let slug = slugify(&input.name);
        if slug.is_empty() {
            return Err(AppError::BadRequest(
                "O nome da empresa precisa conter letras ou números.".into(),
            ));
        }

        // Hash fora da transação: não toca no banco
        let password_hash = self.auth_service.hash_password(&self.default_company_password).await?;

        let mut tx = self.pool.begin().await?;

        if self.company_repo.slug_exists(&mut *tx, &slug).await?
            || self.user_repo.username_exists(&mut *tx, &slug).await?
        {
            return Err(AppError::SlugAlreadyExists(slug));
        }

        let company = self.company_repo.create(&mut *tx, &slug, input).await?;

        let user = self
            .user_repo
            .create(
                &mut *tx,
                &NewUser {
                    username: &slug,
                    password_hash: &password_hash,
                    full_name: Some(&company.name),
                    email: None,
                    user_type: UserType::Company,
                    company_id: Some(company.id),
                    permissions: UserPermissions::all(),
                    department_id: None,
                    job_role_id: None,
                    manager_id: None,
                },
            )
            .await?;

        let description = format!("Empresa {} cadastrada", company.name);
        self.event_repo
            .create(
                &mut *tx,
                &NewEvent {
                    date: today(),
                    category: CATEGORY_COMPANIES,
                    company: &company.name,
                    status: STATUS_ACTIVE,
                    description: Some(&description),
                    setor: None,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(company_id = company.id, slug = %company.slug, "🏢 Empresa criada");

        Ok(CreateCompanyResponse { company, username: user.username })
    }

    /// Renomear a empresa também renomeia os eventos (que guardam o nome).
    pub async fn update_company(&self, id: i64, input: &UpdateCompanyPayload) -> Result<Company, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .company_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;

        // Eventos são ligados pelo nome: dois nomes iguais misturariam os eventos
        if let Some(name) = input.name.as_deref().map(str::trim) {
            if name != current.name
                && self
                    .company_repo
                    .name_taken(&mut *tx, name, &slugify(name), id)
                    .await?
            {
                return Err(AppError::CompanyNameTaken(name.to_string()));
            }
        }

        let updated = self.company_repo.update(&mut *tx, id, input).await?;

        if updated.name != current.name {
            let renamed = self
                .event_repo
                .rename_company(&mut *tx, &current.name, &updated.name)
                .await?;
            tracing::debug!(company_id = id, renamed, "Eventos renomeados");
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Remove a empresa e tudo o que pertence a ela numa única transação.
    pub async fn delete_company(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let company = self
            .company_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;

        let events = self.event_repo.delete_by_company(&mut *tx, &company.name).await?;
        let complaints = self.complaint_repo.delete_by_company(&mut *tx, company.id).await?;
        // notificações, auditoria, permissões e ações caem junto (ON DELETE CASCADE)
        let nonconformities = self.nonconformity_repo.delete_by_company(&mut *tx, company.id).await?;
        let users = self.user_repo.delete_by_company(&mut *tx, company.id).await?;
        self.company_repo.delete(&mut *tx, company.id).await?;

        tx.commit().await?;

        tracing::info!(
            company_id = company.id,
            events,
            complaints,
            nonconformities,
            users,
            "🗑️ Empresa removida"
        );
        Ok(())
    }
}
