mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{complaint_body, nonconformity_body, spawn_app, COMPANY_PASSWORD};

#[tokio::test]
async fn staff_only_see_events_of_their_company() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    app.create_company(&admin, "Outra").await;
    app.post("/api/companies/acme/complaints", None, complaint_body()).await;
    app.post("/api/companies/outra/complaints", None, complaint_body()).await;
    let acme = app.login("acme", COMPANY_PASSWORD).await;

    let (status, all) = app.get("/api/events", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 4);

    // O filtro de empresa enviado por quem não é admin é ignorado
    let (status, own) = app.get("/api/events?company=Outra", Some(&acme)).await;
    assert_eq!(status, StatusCode::OK);
    let own = own.as_array().unwrap();
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|e| e["company"] == "Acme"));

    let (_, filtered) = app.get("/api/events?status=aberto", Some(&acme)).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn events_need_the_view_flag() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let acme = app.login("acme", COMPANY_PASSWORD).await;
    app.create_employee(&acme, "joana", json!({ "canViewEventos": false })).await;
    let joana = app.login("joana", "senha-func").await;

    let (status, body) = app.get("/api/events", Some(&joana)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("can_view_eventos"));
}

#[tokio::test]
async fn admin_manages_events_by_hand() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let acme = app.login("acme", COMPANY_PASSWORD).await;

    let (status, event) = app
        .post(
            "/api/events",
            Some(&admin),
            json!({ "category": "Auditoria", "company": "Acme", "status": "agendado", "date": "2030-05-10" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", event);
    assert_eq!(event["date"], "2030-05-10");
    let uri = format!("/api/events/{}", event["id"]);

    let (status, _) = app.put(&uri, Some(&acme), json!({ "status": "concluído" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app.put(&uri, Some(&admin), json!({ "status": "concluído" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "concluído");
    assert_eq!(updated["category"], "Auditoria");

    let (status, _) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_counts_global_and_per_company() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    app.create_company(&admin, "Outra").await;
    app.post("/api/companies/acme/complaints", None, complaint_body()).await;
    app.post("/api/companies/acme/nonconformities", None, nonconformity_body()).await;
    app.post("/api/companies/outra/nonconformities", None, nonconformity_body()).await;
    let acme = app.login("acme", COMPANY_PASSWORD).await;

    let (status, global) = app.get("/api/stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(global["totalCompanies"], 2);
    assert_eq!(global["activeCompanies"], 2);
    assert_eq!(global["totalComplaints"], 1);
    assert_eq!(global["totalNonconformities"], 2);
    assert_eq!(global["totalEvents"], 5);
    assert_eq!(global["nonconformitiesByStatus"][0]["label"], "REPORTED");
    assert_eq!(global["nonconformitiesByStatus"][0]["total"], 2);

    let (status, _) = app.get("/api/stats", Some(&acme)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, own) = app.get("/api/companies/acme/stats", Some(&acme)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(own["totalCompanies"].is_null());
    assert_eq!(own["totalNonconformities"], 1);
    assert_eq!(own["totalEvents"], 3);

    let (status, _) = app.get("/api/companies/outra/stats", Some(&acme)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = spawn_app().await;

    let (status, _) = app.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, doc) = app.get("/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/companies/{slug}/nonconformities"].is_object());
}
