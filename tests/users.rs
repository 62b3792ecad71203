mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{complaint_body, spawn_app, ADMIN_USERNAME, COMPANY_PASSWORD};

#[tokio::test]
async fn wrong_password_and_unknown_user_get_the_same_answer() {
    let app = spawn_app().await;

    let (wrong_status, wrong) = app
        .post("/api/auth/login", None, json!({ "username": ADMIN_USERNAME, "password": "errada" }))
        .await;
    let (unknown_status, unknown) = app
        .post("/api/auth/login", None, json!({ "username": "ninguem", "password": "errada" }))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
    assert!(wrong.get("token").is_none());
}

#[tokio::test]
async fn login_returns_token_and_user_without_password() {
    let app = spawn_app().await;

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "username": ADMIN_USERNAME, "password": "admin-secreto" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["userType"], "admin");
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn invalid_or_missing_token_is_unauthorized() {
    let app = spawn_app().await;

    let (status, _) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/auth/me", Some("nao-e-um-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn permission_update_persists_and_unlocks_the_feature() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let company = app.login("acme", COMPANY_PASSWORD).await;
    let employee_id = app.create_employee(&company, "joana", json!({})).await;
    let employee = app.login("joana", "senha-func").await;

    app.post("/api/companies/acme/complaints", None, complaint_body()).await;

    let (status, _) = app.get("/api/companies/acme/complaints", Some(&employee)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .put(
            &format!("/api/users/{}/permissions", employee_id),
            Some(&company),
            json!({ "canViewDenuncias": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["canViewDenuncias"], true);
    assert_eq!(updated["canViewEventos"], false);

    let (status, fetched) = app.get(&format!("/api/users/{}", employee_id), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["canViewDenuncias"], true);

    // O token antigo continua valendo: as flags são lidas do banco a cada requisição
    let (status, list) = app.get("/api/companies/acme/complaints", Some(&employee)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn users_of_another_company_are_out_of_reach() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    app.create_company(&admin, "Outra").await;
    let acme = app.login("acme", COMPANY_PASSWORD).await;
    let outra = app.login("outra", COMPANY_PASSWORD).await;
    let employee_id = app.create_employee(&acme, "joana", json!({ "canViewDenuncias": true })).await;

    let (status, _) = app.get(&format!("/api/users/{}", employee_id), Some(&outra)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(
            &format!("/api/users/{}/permissions", employee_id),
            Some(&outra),
            json!({ "canViewDashboard": true }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, list) = app.get("/api/users", Some(&outra)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().iter().all(|u| u["username"] != "joana"));

    // Funcionário com a flag, mas de outra empresa
    let joana = app.login("joana", "senha-func").await;
    let (status, _) = app.get("/api/companies/outra/complaints", Some(&joana)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let company = app.login("acme", COMPANY_PASSWORD).await;
    app.create_employee(&company, "joana", json!({})).await;

    let (status, _) = app
        .post("/api/users", Some(&company), json!({ "username": "joana", "password": "outra-senha" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let company = app.login("acme", COMPANY_PASSWORD).await;
    let employee_id = app.create_employee(&company, "joana", json!({})).await;
    let employee = app.login("joana", "senha-func").await;
    let uri = format!("/api/users/{}/password", employee_id);

    let (status, _) = app
        .put(&uri, Some(&employee), json!({ "currentPassword": "errada", "newPassword": "nova-senha" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .put(&uri, Some(&employee), json!({ "currentPassword": "senha-func", "newPassword": "nova-senha" }))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    app.login("joana", "nova-senha").await;

    // Admin redefine sem a senha atual
    let (status, _) = app.put(&uri, Some(&admin), json!({ "newPassword": "definida-pelo-admin" })).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    app.login("joana", "definida-pelo-admin").await;
}

#[tokio::test]
async fn admin_deletes_users_but_not_itself() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let company = app.login("acme", COMPANY_PASSWORD).await;
    let employee_id = app.create_employee(&company, "joana", json!({})).await;

    let (status, _) = app.delete(&format!("/api/users/{}", employee_id), Some(&company)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&format!("/api/users/{}", employee_id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, me) = app.get("/api/auth/me", Some(&admin)).await;
    let admin_id = me["id"].as_i64().unwrap();
    let (status, _) = app.delete(&format!("/api/users/{}", admin_id), Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
