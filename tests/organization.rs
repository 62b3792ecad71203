mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{spawn_app, COMPANY_PASSWORD};

#[tokio::test]
async fn departments_and_job_roles_belong_to_their_company() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    app.create_company(&admin, "Outra").await;
    let acme = app.login("acme", COMPANY_PASSWORD).await;
    let outra = app.login("outra", COMPANY_PASSWORD).await;

    let (status, quality) = app
        .post("/api/companies/acme/departments", Some(&acme), json!({ "code": "QUAL", "name": "Qualidade" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", quality);
    let quality_id = quality["id"].as_i64().unwrap();

    let (status, _) = app
        .post("/api/companies/acme/departments", Some(&acme), json!({ "code": "QUAL", "name": "Repetido" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Mesmo código em outra empresa é permitido
    let (status, _) = app
        .post("/api/companies/outra/departments", Some(&outra), json!({ "code": "QUAL", "name": "Qualidade" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Departamento pai de outra empresa
    let (status, _) = app
        .post(
            "/api/companies/outra/departments",
            Some(&outra),
            json!({ "code": "LAB", "name": "Laboratório", "parentId": quality_id }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, role) = app
        .post(
            "/api/companies/acme/job-roles",
            Some(&acme),
            json!({ "code": "ANL", "name": "Analista", "level": 2, "departmentId": quality_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", role);
    assert_eq!(role["level"], 2);

    let (status, roles) = app.get("/api/companies/acme/job-roles", Some(&acme)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roles.as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/companies/acme/departments", Some(&outra)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn employees_cannot_change_the_structure() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let acme = app.login("acme", COMPANY_PASSWORD).await;
    app.create_employee(&acme, "joana", json!({})).await;
    let joana = app.login("joana", "senha-func").await;

    let (status, _) = app
        .post("/api/companies/acme/departments", Some(&joana), json!({ "code": "TI", "name": "TI" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/companies/acme/departments", Some(&joana)).await;
    assert_eq!(status, StatusCode::OK);
}
