#![allow(dead_code)]

use std::{str::FromStr, sync::Arc};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;
use tower::ServiceExt;

use conformidade_backend::{
    config::{AppConfig, AppState},
    db::run_migrations,
    routes::build_router,
    services::attachment_service::LocalAttachmentStore,
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-secreto";
pub const COMPANY_PASSWORD: &str = "mudar123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub uploads: TempDir,
}

/// Banco em memória com uma única conexão (cada conexão seria um banco novo).
pub async fn spawn_app() -> TestApp {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();

    let uploads = tempfile::tempdir().unwrap();
    let config = AppConfig {
        database_url: "sqlite::memory:".into(),
        jwt_secret: "segredo-de-teste".into(),
        bind_addr: "127.0.0.1:0".into(),
        upload_dir: uploads.path().to_string_lossy().into_owned(),
        max_upload_bytes: 1024 * 1024,
        bcrypt_cost: 4,
        token_ttl_hours: 1,
        default_company_password: COMPANY_PASSWORD.into(),
        admin_username: None,
        admin_password: None,
    };

    let store = LocalAttachmentStore::new(uploads.path()).await.unwrap();
    let state = AppState::from_parts(pool, config, Arc::new(store));
    state
        .auth_service
        .seed_admin(&state.db_pool, ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .unwrap();

    TestApp { router: build_router(state.clone()), state, uploads }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post("/api/auth/login", None, json!({ "username": username, "password": password }))
            .await;
        assert_eq!(status, StatusCode::OK, "login de {} falhou: {}", username, body);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Cria a empresa como admin e devolve (id, slug).
    pub async fn create_company(&self, admin_token: &str, name: &str) -> (i64, String) {
        let (status, body) = self
            .post("/api/companies", Some(admin_token), json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        (
            body["company"]["id"].as_i64().unwrap(),
            body["company"]["slug"].as_str().unwrap().to_string(),
        )
    }

    /// Funcionário criado pelo usuário da empresa.
    pub async fn create_employee(&self, company_token: &str, username: &str, permissions: Value) -> i64 {
        let (status, body) = self
            .post(
                "/api/users",
                Some(company_token),
                json!({ "username": username, "password": "senha-func", "permissions": permissions }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar(sql).fetch_one(&self.state.db_pool).await.unwrap()
    }
}

pub fn complaint_body() -> Value {
    json!({
        "subject": "Assédio no setor de expedição",
        "description": "Relato detalhado do ocorrido durante o turno da noite na expedição.",
        "reporterName": "Fulano de Tal"
    })
}

pub fn nonconformity_body() -> Value {
    json!({
        "subject": "Falha na calibração da balança",
        "description": "A balança da linha 2 está fora da tolerância há pelo menos uma semana.",
        "setor": "Produção",
        "reporterName": "Maria José Silva",
        "reporterEmail": "maria@acme.com",
        "targetName": "Carlos Souza",
        "severityLevel": 3,
        "probabilityLevel": 4
    })
}
