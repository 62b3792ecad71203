pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod complaint_repo;
pub use complaint_repo::ComplaintRepository;
pub mod nonconformity_repo;
pub use nonconformity_repo::NonconformityRepository;
pub mod nc_workflow_repo;
pub use nc_workflow_repo::NcWorkflowRepository;
pub mod organization_repo;
pub use organization_repo::OrganizationRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

/// Migrações versionadas de `migrations/`; as já aplicadas ficam em `_sqlx_migrations`.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
