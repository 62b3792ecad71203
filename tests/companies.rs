mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{complaint_body, nonconformity_body, spawn_app, COMPANY_PASSWORD};

#[tokio::test]
async fn creating_a_company_creates_its_login_and_event() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/companies",
            Some(&admin),
            json!({ "name": "Acme Indústria", "primaryColor": "#1E40AF" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["company"]["slug"], "acme-industria");
    assert_eq!(body["company"]["status"], "active");
    assert_eq!(body["username"], "acme-industria");

    // O usuário da empresa entra com a senha padrão
    let token = app.login("acme-industria", COMPANY_PASSWORD).await;
    let (status, me) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["userType"], "company");
    assert_eq!(me["companyId"], body["company"]["id"]);
    assert_eq!(me["canViewDenuncias"], true);

    let events = app
        .count("SELECT COUNT(*) FROM events WHERE category = 'Empresas' AND status = 'ativo' AND company = 'Acme Indústria'")
        .await;
    assert_eq!(events, 1);
}

#[tokio::test]
async fn name_with_existing_slug_is_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;

    let (status, body) = app.post("/api/companies", Some(&admin), json!({ "name": "ACME!" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["slug"], "acme");
    assert_eq!(app.count("SELECT COUNT(*) FROM companies").await, 1);
}

#[tokio::test]
async fn name_without_letters_or_digits_is_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, _) = app.post("/api/companies", Some(&admin), json!({ "name": "!!!" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_admins_manage_companies() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let company = app.login("acme", COMPANY_PASSWORD).await;

    let (status, _) = app.post("/api/companies", None, json!({ "name": "Outra" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post("/api/companies", Some(&company), json!({ "name": "Outra" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/companies", Some(&company)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_a_company_removes_everything_it_owns() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (acme_id, _) = app.create_company(&admin, "Acme").await;
    let (other_id, _) = app.create_company(&admin, "Outra").await;

    for slug in ["acme", "outra"] {
        let (status, _) = app
            .post(&format!("/api/companies/{}/complaints", slug), None, complaint_body())
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = app
            .post(&format!("/api/companies/{}/nonconformities", slug), None, nonconformity_body())
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = app.delete(&format!("/api/companies/{}", acme_id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(app.count("SELECT COUNT(*) FROM events WHERE company = 'Acme'").await, 0);
    assert_eq!(
        app.count(&format!("SELECT COUNT(*) FROM complaints WHERE company_id = {}", acme_id)).await,
        0
    );
    assert_eq!(
        app.count(&format!("SELECT COUNT(*) FROM nonconformities WHERE company_id = {}", acme_id)).await,
        0
    );
    assert_eq!(
        app.count(&format!("SELECT COUNT(*) FROM users WHERE company_id = {}", acme_id)).await,
        0
    );
    // Só sobram as notificações da NC da outra empresa (admin + usuário da empresa)
    assert_eq!(app.count("SELECT COUNT(*) FROM nc_notifications").await, 2);

    // A outra empresa continua intacta
    assert_eq!(app.count("SELECT COUNT(*) FROM events WHERE company = 'Outra'").await, 3);
    assert_eq!(
        app.count(&format!("SELECT COUNT(*) FROM complaints WHERE company_id = {}", other_id)).await,
        1
    );

    let (status, _) = app.delete(&format!("/api/companies/{}", acme_id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inactive_company_is_hidden_from_public_routes() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (id, _) = app.create_company(&admin, "Acme").await;

    let (status, body) = app.get("/api/companies/acme", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme");

    let (status, _) = app
        .put(&format!("/api/companies/{}", id), Some(&admin), json!({ "status": "inactive" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/companies/acme", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.post("/api/companies/acme/complaints", None, complaint_body()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn renaming_a_company_keeps_its_events_attached() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (id, _) = app.create_company(&admin, "Acme").await;

    let (status, body) = app
        .put(&format!("/api/companies/{}", id), Some(&admin), json!({ "name": "Acme Global" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme Global");
    assert_eq!(body["slug"], "acme");

    assert_eq!(app.count("SELECT COUNT(*) FROM events WHERE company = 'Acme'").await, 0);
    assert_eq!(app.count("SELECT COUNT(*) FROM events WHERE company = 'Acme Global'").await, 1);
}

#[tokio::test]
async fn renaming_to_another_company_name_is_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let (beta_id, _) = app.create_company(&admin, "Beta").await;
    let (status, _) = app.post("/api/companies/acme/complaints", None, complaint_body()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.count("SELECT COUNT(*) FROM events WHERE company = 'Acme'").await, 2);

    let uri = format!("/api/companies/{}", beta_id);
    for name in ["Acme", "acme", "ÁCME"] {
        let (status, body) = app.put(&uri, Some(&admin), json!({ "name": name })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", name);
        assert_eq!(body["details"]["name"], name);
    }

    // Manter o próprio nome não conflita
    let (status, _) = app.put(&uri, Some(&admin), json!({ "name": "Beta" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.count("SELECT COUNT(*) FROM events WHERE company = 'Acme'").await, 2);
    assert_eq!(app.count("SELECT COUNT(*) FROM events WHERE company = 'Beta'").await, 0);
}
