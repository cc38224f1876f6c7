use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server_http::{build_app, AppState};
use shared::config::{CacheBackend, Config, StoreBackend};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`
use tower_http::normalize_path::NormalizePath;

type App = NormalizePath<Router>;

fn test_config(dir: &TempDir) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        http_port: 0,
        data_dir: dir.path().to_string_lossy().into_owned(),
        store: StoreBackend::Memory,
        cache_backend: CacheBackend::Ttl,
        cache_ttl: Duration::from_secs(300),
        session_ttl: Duration::from_secs(3600),
        admin_username: "admin".to_string(),
        admin_password: "admin123".to_string(),
        allowed_origins: vec!["*".to_string()],
        seed_sample_data: false,
    }
}

async fn test_app(dir: &TempDir) -> App {
    let config = test_config(dir);
    let state = AppState::from_config(&config).await.unwrap();
    build_app(state, &config)
}

async fn send(
    app: &App,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
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
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

async fn login(app: &App, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    format!("Bearer {}", body["token"].as_str().unwrap())
}

fn laptop() -> Value {
    json!({ "id": 1, "name": "Laptop", "quantity": 10, "location": "Warehouse A", "price": 999.99 })
}

fn mouse() -> Value {
    json!({ "id": 2, "name": "Mouse", "quantity": 50, "location": "Warehouse B", "price": 19.99 })
}

#[tokio::test]
async fn test_health_is_public() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_protected_routes_require_credentials() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    let (status, body) = send(&app, Method::GET, "/inventory", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::GET, "/orders", Some("Bearer nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let basic = format!("Basic {}", STANDARD.encode("admin:wrong-password1"));
    let (status, _) = send(&app, Method::GET, "/inventory", Some(&basic), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let basic = format!("Basic {}", STANDARD.encode("admin:admin123"));
    let (status, _) = send(&app, Method::GET, "/inventory", Some(&basic), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_inventory_crud() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = send(&app, Method::POST, "/inventory", Some(&admin), Some(laptop())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Laptop");

    let (status, body) = send(&app, Method::POST, "/inventory", Some(&admin), Some(laptop())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("1"));

    let (status, body) = send(&app, Method::GET, "/inventory", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let update = json!({ "name": "Laptop Pro", "quantity": 4, "location": "Warehouse C", "price": 1299.0 });
    let (status, body) = send(&app, Method::PUT, "/inventory/1", Some(&admin), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Warehouse C");

    // the cached list reflects the update
    let (_, body) = send(&app, Method::GET, "/inventory", Some(&admin), None).await;
    assert_eq!(body[0]["name"], "Laptop Pro");

    let (status, _) = send(&app, Method::GET, "/inventory/abc", Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let invalid = json!({ "id": 9, "name": "Broken", "quantity": -3 });
    let (status, _) = send(&app, Method::POST, "/inventory", Some(&admin), Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, "/inventory/1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, "/inventory/1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("1"));

    let (status, _) = send(&app, Method::GET, "/inventory/1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/inventory", Some(&admin), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unreadable_bodies_are_bad_requests() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;
    let admin = login(&app, "admin", "admin123").await;

    let missing_fields = json!({ "id": 9 });
    let (status, body) =
        send(&app, Method::POST, "/inventory", Some(&admin), Some(missing_fields)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let wrong_type = json!({ "customerName": "Alex", "items": "laptop" });
    let (status, body) = send(&app, Method::POST, "/orders", Some(&admin), Some(wrong_type)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": "casey" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // nothing was written
    let (_, body) = send(&app, Method::GET, "/inventory", Some(&admin), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_trailing_slash_is_normalised() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;
    let admin = login(&app, "admin", "admin123").await;

    let (status, _) = send(&app, Method::GET, "/inventory/", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_orders_and_summaries() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;
    let admin = login(&app, "admin", "admin123").await;

    send(&app, Method::POST, "/inventory", Some(&admin), Some(laptop())).await;
    send(&app, Method::POST, "/inventory", Some(&admin), Some(mouse())).await;

    let order = json!({
        "orderId": 5,
        "customerName": "Samir",
        "orderPlaced": "2025-04-05T00:00:00Z",
        "items": [{ "itemId": 1, "quantity": 2 }, { "itemId": 2, "quantity": 5 }]
    });
    let (status, body) = send(&app, Method::POST, "/orders", Some(&admin), Some(order.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["orderId"], 5);

    let (status, _) = send(&app, Method::POST, "/orders", Some(&admin), Some(order)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, "/orders/5", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "Laptop");

    let (status, body) =
        send(&app, Method::GET, "/inventory/OrderSummary/5", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderId"], 5);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::GET, "/inventory/OrderSummary", Some(&admin), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let unknown_item = json!({
        "orderId": 6,
        "customerName": "Alex",
        "items": [{ "itemId": 99, "quantity": 1 }]
    });
    let (status, _) = send(&app, Method::POST, "/orders", Some(&admin), Some(unknown_item)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // referenced items cannot be deleted
    let (status, _) = send(&app, Method::DELETE, "/inventory/1", Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, "/orders/999", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/orders/5", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/inventory/OrderSummary", Some(&admin), None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) =
        send(&app, Method::GET, "/inventory/OrderSummary/5", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_roles_gate_writes() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;
    let admin = login(&app, "admin", "admin123").await;

    let registration = json!({ "username": "clerk", "email": "clerk@example.com", "password": "forklift9" });
    let (status, body) =
        send(&app, Method::POST, "/auth/register", None, Some(registration.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "clerk");

    let (status, _) = send(&app, Method::POST, "/auth/register", None, Some(registration)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let clerk = login(&app, "clerk", "forklift9").await;

    let (status, _) = send(&app, Method::GET, "/inventory", Some(&clerk), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/inventory", Some(&clerk), Some(laptop())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    let promote = json!({ "username": "clerk" });
    let (status, _) = send(
        &app,
        Method::POST,
        "/admin/roles/assign-manager",
        Some(&clerk),
        Some(promote.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/roles/assign-manager",
        Some(&admin),
        Some(promote),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role_ids"].as_array().unwrap().len(), 2);

    // the existing session picks up the new role
    let (status, _) = send(&app, Method::POST, "/inventory", Some(&clerk), Some(laptop())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/admin/roles/assign-manager",
        Some(&admin),
        Some(json!({ "username": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_reports_session_expiry() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "admin");
    assert!(body["expires_in"].as_u64().unwrap() > 0);
    assert!(body["expires_at"].is_string());
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir).await;
    let admin = login(&app, "admin", "admin123").await;

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/inventory", Some(&admin), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sample_data_seeding() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.seed_sample_data = true;
    let state = AppState::from_config(&config).await.unwrap();
    let app = build_app(state, &config);
    let admin = login(&app, "admin", "admin123").await;

    let (_, body) = send(&app, Method::GET, "/inventory", Some(&admin), None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::GET, "/orders/1", Some(&admin), None).await;
    assert_eq!(body["customerName"], "John Doe");
}
