// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::{admin_guard, auth_guard},
};

/// Monta o router completo. Os grupos usam caminhos absolutos e são
/// combinados com `merge`, porque o mesmo caminho pode ser público num
/// método e protegido em outro.
pub fn build_router(app_state: AppState) -> Router {
    // Sem login: login, identidade visual, formulários públicos e upload
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/companies/{slug}", get(handlers::companies::get_company))
        .route("/api/companies/{slug}/complaints", post(handlers::complaints::submit_complaint))
        .route(
            "/api/companies/{slug}/nonconformities",
            post(handlers::nonconformities::submit_public),
        )
        .route("/api/uploads", post(handlers::uploads::upload_files));

    // Qualquer usuário autenticado; flags e empresa são conferidas nos handlers
    let user_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_me))
        .route("/api/companies/{slug}/stats", get(handlers::dashboard::get_company_stats))
        .route(
            "/api/companies/{slug}/complaints",
            get(handlers::complaints::list_company_complaints),
        )
        .route("/api/complaints/{id}", get(handlers::complaints::get_complaint))
        .route(
            "/api/companies/{slug}/nonconformities",
            get(handlers::nonconformities::list_company_nonconformities),
        )
        .route(
            "/api/companies/{slug}/nc-settings",
            get(handlers::nonconformities::get_settings).put(handlers::nonconformities::update_settings),
        )
        .route(
            "/api/companies/{slug}/departments",
            get(handlers::organization::list_departments).post(handlers::organization::create_department),
        )
        .route(
            "/api/companies/{slug}/job-roles",
            get(handlers::organization::list_job_roles).post(handlers::organization::create_job_role),
        )
        .route("/api/nonconformities", post(handlers::nonconformities::create_nonconformity))
        .route(
            "/api/nonconformities/{id}",
            get(handlers::nonconformities::get_nonconformity).put(handlers::nonconformities::update_nonconformity),
        )
        .route("/api/nonconformities/{id}/status", put(handlers::nonconformities::change_status))
        .route(
            "/api/nonconformities/{id}/permissions",
            put(handlers::nonconformities::set_identity_permission),
        )
        .route(
            "/api/nonconformities/{id}/actions",
            get(handlers::nonconformities::list_actions).post(handlers::nonconformities::create_action),
        )
        .route(
            "/api/nonconformities/{id}/actions/{action_id}",
            put(handlers::nonconformities::update_action),
        )
        .route("/api/notifications", get(handlers::notifications::list_notifications))
        .route("/api/notifications/{id}/read", put(handlers::notifications::mark_as_read))
        .route("/api/events", get(handlers::events::list_events))
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/api/users/{id}", get(handlers::users::get_user))
        .route("/api/users/{id}/permissions", put(handlers::users::update_permissions))
        .route("/api/users/{id}/password", put(handlers::users::change_password))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Só administradores
    let admin_routes = Router::new()
        .route(
            "/api/companies",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route(
            "/api/companies/{slug}",
            put(handlers::companies::update_company).delete(handlers::companies::delete_company),
        )
        .route("/api/complaints", get(handlers::complaints::list_all_complaints))
        .route("/api/complaints/{id}", axum::routing::delete(handlers::complaints::delete_complaint))
        .route("/api/nonconformities", get(handlers::nonconformities::list_all_nonconformities))
        .route(
            "/api/nonconformities/{id}",
            axum::routing::delete(handlers::nonconformities::delete_nonconformity),
        )
        .route("/api/nonconformities/{id}/audit", get(handlers::nonconformities::list_audit))
        .route("/api/events", post(handlers::events::create_event))
        .route(
            "/api/events/{id}",
            put(handlers::events::update_event).delete(handlers::events::delete_event),
        )
        .route("/api/stats", get(handlers::dashboard::get_global_stats))
        .route("/api/users/{id}", axum::routing::delete(handlers::users::delete_user))
        // A última camada adicionada roda primeiro: autentica, depois exige admin
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let uploads_dir = app_state.attachment_store.root().to_path_buf();
    let max_upload_bytes = app_state.config.max_upload_bytes;

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
        .with_state(app_state)
}
