// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    db::{
        CompanyRepository, ComplaintRepository, DashboardRepository, EventRepository,
        NcWorkflowRepository, NonconformityRepository, OrganizationRepository, UserRepository,
    },
    services::{
        attachment_service::{AttachmentStore, LocalAttachmentStore},
        auth::AuthService,
        company_service::CompanyService,
        complaint_service::ComplaintService,
        nonconformity_service::NonconformityService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub bcrypt_cost: u32,
    pub token_ttl_hours: i64,
    /// Senha do usuário criado junto com cada empresa.
    pub default_company_password: String,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} tem um valor inválido: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env_or("DATABASE_URL", "sqlite:events.db?mode=rwc"),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:3000"),
            upload_dir: env_or("UPLOAD_DIR", "uploads"),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            bcrypt_cost: env_parse("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            token_ttl_hours: env_parse("TOKEN_TTL_HOURS", 24 * 7)?,
            default_company_password: env_or("DEFAULT_COMPANY_PASSWORD", "mudar123"),
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<AppConfig>,

    // Serviços (regras com transação)
    pub auth_service: AuthService,
    pub company_service: CompanyService,
    pub complaint_service: ComplaintService,
    pub nonconformity_service: NonconformityService,

    // Repositórios usados direto pelos handlers de leitura
    pub company_repo: CompanyRepository,
    pub user_repo: UserRepository,
    pub event_repo: EventRepository,
    pub complaint_repo: ComplaintRepository,
    pub nc_workflow_repo: NcWorkflowRepository,
    pub organization_repo: OrganizationRepository,
    pub dashboard_repo: DashboardRepository,

    pub attachment_store: Arc<dyn AttachmentStore>,
}

impl AppState {
    /// Abre o banco, aplica as migrações e monta o gráfico de dependências.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(connect_options)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        crate::db::run_migrations(&db_pool)
            .await
            .context("Falha ao rodar as migrações do banco de dados.")?;

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        let store = LocalAttachmentStore::new(&config.upload_dir).await?;
        let state = Self::from_parts(db_pool, config, Arc::new(store));

        if let (Some(username), Some(password)) =
            (&state.config.admin_username, &state.config.admin_password)
        {
            state
                .auth_service
                .seed_admin(&state.db_pool, username, password)
                .await?;
        }

        Ok(state)
    }

    /// Monta o estado sobre uma pool já migrada.
    pub fn from_parts(db_pool: SqlitePool, config: AppConfig, attachment_store: Arc<dyn AttachmentStore>) -> Self {
        let company_repo = CompanyRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let event_repo = EventRepository::new(db_pool.clone());
        let complaint_repo = ComplaintRepository::new(db_pool.clone());
        let nonconformity_repo = NonconformityRepository::new(db_pool.clone());
        let nc_workflow_repo = NcWorkflowRepository::new(db_pool.clone());
        let organization_repo = OrganizationRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            config.jwt_secret.clone(),
            config.token_ttl_hours,
            config.bcrypt_cost,
        );

        let company_service = CompanyService::new(
            company_repo.clone(),
            user_repo.clone(),
            event_repo.clone(),
            complaint_repo.clone(),
            nonconformity_repo.clone(),
            auth_service.clone(),
            config.default_company_password.clone(),
            db_pool.clone(),
        );

        let complaint_service =
            ComplaintService::new(complaint_repo.clone(), event_repo.clone(), db_pool.clone());

        let nonconformity_service = NonconformityService::new(
            nonconformity_repo,
            event_repo.clone(),
            user_repo.clone(),
            nc_workflow_repo.clone(),
            db_pool.clone(),
        );

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            company_service,
            complaint_service,
            nonconformity_service,
            company_repo,
            user_repo,
            event_repo,
            complaint_repo,
            nc_workflow_repo,
            organization_repo,
            dashboard_repo,
            attachment_store,
        }
    }
}
