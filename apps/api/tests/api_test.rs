use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use shared_utils::test_utils::test_state;
use telemed_api::router::BANNER;
use telemed_api::create_router;

fn app() -> Router {
    create_router(test_state())
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
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

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

/// Registers an account and returns `(token, user_id)`.
async fn register(app: &Router, email: &str, full_name: &str, role: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": "correct horse battery staple",
            "full_name": full_name,
            "role": role
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    (
        body["access_token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_root_banner() {
    let (status, body) = send(&app(), "GET", "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String(BANNER.to_string()));
}

#[tokio::test]
async fn test_login_and_profile_through_api_prefix() {
    let app = app();
    register(&app, "pat@example.com", "Pat", "patient").await;

    let (status, login) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "pat@example.com", "password": "correct horse battery staple"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["token_type"], "bearer");

    let token = login["access_token"].as_str().unwrap();
    let (status, me) = send(&app, "GET", "/api/users/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "pat@example.com");
    assert_eq!(me["role"], "patient");
}

#[tokio::test]
async fn test_doctor_directory_is_protected() {
    let app = app();
    let (token, doctor_id) = register(&app, "doc@example.com", "Dr Who", "doctor").await;

    let (status, _) = send(&app, "GET", "/api/users/doctors", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, doctors) = send(&app, "GET", "/api/users/doctors", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doctors[0]["id"], doctor_id.as_str());
    assert_eq!(doctors[0]["specialization"], "General Practice");
}

#[tokio::test]
async fn test_chat_scenario_end_to_end() {
    let app = app();
    let (patient_token, patient_id) = register(&app, "p@example.com", "Patient P", "patient").await;
    let (doctor_token, doctor_id) = register(&app, "d@example.com", "Doctor D", "doctor").await;

    let (status, chat) = send(
        &app,
        "POST",
        &format!("/api/chats?doctor_id={}", doctor_id),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let chat_id = chat["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/chats/{}/messages?content=hello", chat_id),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, messages) = send(
        &app,
        "GET",
        &format!("/api/chats/{}/messages", chat_id),
        Some(&doctor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "hello");
    assert_eq!(messages[0]["sender_id"], patient_id.as_str());
}

#[tokio::test]
async fn test_prescription_scenario_end_to_end() {
    let app = app();
    let (_, patient_id) = register(&app, "p@example.com", "Patient P", "patient").await;
    let (doctor_token, _) = register(&app, "d@example.com", "Doctor D", "doctor").await;
    let (pharmacy_token, pharmacy_id) = register(&app, "rx@example.com", "Corner Pharmacy", "pharmacy").await;

    let (status, prescription) = send(
        &app,
        "POST",
        &format!(
            "/api/prescriptions?patient_id={}&diagnosis=Flu&instructions=Rest",
            patient_id
        ),
        Some(&doctor_token),
        Some(json!([
            {"name": "Oseltamivir", "dosage": "75mg"},
            {"name": "Paracetamol", "dosage": "500mg"}
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prescription["medications"].as_array().unwrap().len(), 2);

    let (_, queue) = send(&app, "GET", "/api/prescriptions", Some(&pharmacy_token), None).await;
    assert_eq!(queue[0]["status"], "pending");

    let (status, ack) = send(
        &app,
        "PATCH",
        &format!("/api/prescriptions/{}/dispense", prescription["id"].as_str().unwrap()),
        Some(&pharmacy_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["message"], "Prescription dispensed successfully");

    let (_, queue) = send(&app, "GET", "/api/prescriptions", Some(&pharmacy_token), None).await;
    assert_eq!(queue[0]["status"], "dispensed");
    assert_eq!(queue[0]["pharmacy_id"], pharmacy_id.as_str());
}

#[tokio::test]
async fn test_websocket_route_is_mounted_at_root() {
    let app = app();

    let (status, _) = send(&app, "GET", "/ws/someone", None, None).await;
    assert_ne!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/ws/someone", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
