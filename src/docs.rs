// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common::anonymize;
use crate::handlers;
use crate::models;
use crate::services::attachment_service;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Companies ---
        handlers::companies::create_company,
        handlers::companies::list_companies,
        handlers::companies::get_company,
        handlers::companies::update_company,
        handlers::companies::delete_company,

        // --- Complaints ---
        handlers::complaints::submit_complaint,
        handlers::complaints::list_company_complaints,
        handlers::complaints::list_all_complaints,
        handlers::complaints::get_complaint,
        handlers::complaints::delete_complaint,

        // --- Nonconformities ---
        handlers::nonconformities::submit_public,
        handlers::nonconformities::create_nonconformity,
        handlers::nonconformities::list_company_nonconformities,
        handlers::nonconformities::list_all_nonconformities,
        handlers::nonconformities::get_nonconformity,
        handlers::nonconformities::update_nonconformity,
        handlers::nonconformities::change_status,
        handlers::nonconformities::delete_nonconformity,
        handlers::nonconformities::list_audit,
        handlers::nonconformities::set_identity_permission,
        handlers::nonconformities::list_actions,
        handlers::nonconformities::create_action,
        handlers::nonconformities::update_action,
        handlers::nonconformities::get_settings,
        handlers::nonconformities::update_settings,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_as_read,

        // --- Events ---
        handlers::events::list_events,
        handlers::events::create_event,
        handlers::events::update_event,
        handlers::events::delete_event,

        // --- Dashboard ---
        handlers::dashboard::get_global_stats,
        handlers::dashboard::get_company_stats,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::delete_user,
        handlers::users::update_permissions,
        handlers::users::change_password,

        // --- Organization ---
        handlers::organization::list_departments,
        handlers::organization::create_department,
        handlers::organization::list_job_roles,
        handlers::organization::create_job_role,

        // --- Uploads ---
        handlers::uploads::upload_files,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserType,
            models::auth::User,
            models::auth::UserPermissions,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdatePermissionsPayload,
            models::auth::ChangePasswordPayload,

            // --- Companies ---
            models::company::CompanyStatus,
            models::company::Company,
            models::company::CreateCompanyPayload,
            models::company::UpdateCompanyPayload,
            models::company::CreateCompanyResponse,

            // --- Complaints ---
            models::complaint::Complaint,
            models::complaint::CreateComplaintPayload,

            // --- Nonconformities ---
            anonymize::AnonymizationLevel,
            models::nonconformity::WorkflowStatus,
            models::nonconformity::ConfidentialityLevel,
            models::nonconformity::NonconformityView,
            models::nonconformity::CreateNonconformityPayload,
            models::nonconformity::UpdateNonconformityPayload,
            models::nonconformity::UpdateStatusPayload,
            models::nc_workflow::NcNotification,
            models::nc_workflow::NcAccessAudit,
            models::nc_workflow::NcPermission,
            models::nc_workflow::GrantPermissionPayload,
            models::nc_workflow::ActionStatus,
            models::nc_workflow::NcAction,
            models::nc_workflow::CreateActionPayload,
            models::nc_workflow::UpdateActionPayload,
            models::nc_workflow::NcSettings,
            models::nc_workflow::UpdateNcSettingsPayload,

            // --- Events ---
            models::event::Event,
            models::event::CreateEventPayload,
            models::event::UpdateEventPayload,

            // --- Dashboard ---
            models::dashboard::CountEntry,
            models::dashboard::DashboardStats,

            // --- Organization ---
            models::organization::Department,
            models::organization::JobRole,
            models::organization::CreateDepartmentPayload,
            models::organization::CreateJobRolePayload,

            // --- Uploads ---
            attachment_service::StoredFile,
            handlers::uploads::UploadResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Login e usuário atual"),
        (name = "Companies", description = "Cadastro de empresas (tenants)"),
        (name = "Complaints", description = "Denúncias públicas"),
        (name = "Nonconformities", description = "Não conformidades, fluxo, auditoria e ações"),
        (name = "Notifications", description = "Notificações de não conformidades"),
        (name = "Events", description = "Linha do tempo de eventos"),
        (name = "Dashboard", description = "Indicadores"),
        (name = "Users", description = "Usuários e permissões"),
        (name = "Organization", description = "Departamentos e cargos"),
        (name = "Uploads", description = "Envio de anexos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
