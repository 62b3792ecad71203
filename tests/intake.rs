mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use common::{complaint_body, nonconformity_body, spawn_app, COMPANY_PASSWORD};

#[tokio::test]
async fn public_complaint_creates_complaint_and_mirror_event() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (acme_id, slug) = app.create_company(&admin, "Acme").await;
    assert_eq!(slug, "acme");

    let (status, body) = app.post("/api/companies/acme/complaints", None, complaint_body()).await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["companyId"], acme_id);
    assert_eq!(body["attachments"], json!([]));
    assert_eq!(app.count("SELECT COUNT(*) FROM complaints").await, 1);
    assert_eq!(
        app.count("SELECT COUNT(*) FROM events WHERE category = 'Denúncias' AND status = 'aberto' AND company = 'Acme'")
            .await,
        1
    );
}

#[tokio::test]
async fn complaint_with_short_description_reports_field_errors() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;

    let (status, body) = app
        .post(
            "/api/companies/acme/complaints",
            None,
            json!({ "subject": "Oi", "description": "curta" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["subject"].is_array());
    assert!(body["details"]["description"].is_array());
    assert_eq!(app.count("SELECT COUNT(*) FROM complaints").await, 0);
    assert_eq!(app.count("SELECT COUNT(*) FROM events WHERE category = 'Denúncias'").await, 0);
}

#[tokio::test]
async fn attachment_names_must_be_plain_file_names() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;

    let mut body = complaint_body();
    body["attachments"] = json!(["../../etc/passwd"]);
    let (status, _) = app.post("/api/companies/acme/complaints", None, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_company_returns_not_found() {
    let app = spawn_app().await;

    let (status, body) = app.post("/api/companies/nao-existe/complaints", None, complaint_body()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn nonconformity_creates_exactly_one_row_and_one_event() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;

    let (status, body) = app
        .post("/api/companies/acme/nonconformities", None, nonconformity_body())
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["workflowStatus"], "REPORTED");
    assert_eq!(body["confidentialityLevel"], "RESTRICTED");
    assert_eq!(body["riskScore"], 12);
    assert_eq!(app.count("SELECT COUNT(*) FROM nonconformities").await, 1);
    assert_eq!(
        app.count("SELECT COUNT(*) FROM events WHERE category = 'Não conformidades'").await,
        1
    );
    assert_eq!(
        app.count(
            "SELECT COUNT(*) FROM events WHERE category = 'Não conformidades' AND status = 'aberto' \
             AND company = 'Acme' AND setor = 'Produção' AND description = 'Falha na calibração da balança'"
        )
        .await,
        1
    );
}

#[tokio::test]
async fn nonconformity_notifies_admins_and_company_viewers() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    app.create_company(&admin, "Acme").await;
    let company = app.login("acme", COMPANY_PASSWORD).await;
    app.create_employee(&company, "sem-acesso", json!({})).await;

    app.post("/api/companies/acme/nonconformities", None, nonconformity_body()).await;

    // admin + usuário da empresa; o funcionário sem a flag fica de fora
    assert_eq!(app.count("SELECT COUNT(*) FROM nc_notifications").await, 2);

    let (status, list) = app.get("/api/notifications", Some(&company)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["isRead"], false);

    let id = list[0]["id"].as_i64().unwrap();
    let (status, read) = app.put(&format!("/api/notifications/{}/read", id), Some(&company), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["isRead"], true);

    // Notificação de outro usuário não pode ser marcada
    let (status, _) = app.put(&format!("/api/notifications/{}/read", id), Some(&admin), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn internal_nonconformity_records_author_and_stays_in_own_company() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (acme_id, _) = app.create_company(&admin, "Acme").await;
    let (other_id, _) = app.create_company(&admin, "Outra").await;
    let company = app.login("acme", COMPANY_PASSWORD).await;

    let mut body = nonconformity_body();
    let (status, created) = app.post("/api/nonconformities", Some(&company), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["companyId"], acme_id);
    assert!(created["createdBy"].is_i64());

    body["companyId"] = json!(other_id);
    let (status, _) = app.post("/api/nonconformities", Some(&company), body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin precisa dizer a empresa
    body.as_object_mut().unwrap().remove("companyId");
    let (status, _) = app.post("/api/nonconformities", Some(&admin), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uploaded_files_are_stored_and_served() {
    let app = spawn_app().await;

    let boundary = "limite-de-teste";
    let payload = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"evidencia.PDF\"\r\n\
         Content-Type: application/pdf\r\n\r\n%PDF-1.4\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/uploads")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(payload))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let stored = body["files"][0]["storedName"].as_str().unwrap().to_string();
    assert!(stored.ends_with(".pdf"));
    assert_eq!(body["files"][0]["originalName"], "evidencia.PDF");
    assert!(app.uploads.path().join(&stored).exists());

    let (status, _) = app.get(&format!("/uploads/{}", stored), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn upload_without_files_is_rejected() {
    let app = spawn_app().await;

    let boundary = "limite";
    let payload = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"nota\"\r\n\r\nsem arquivo\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/uploads")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(payload))
        .unwrap();

    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
