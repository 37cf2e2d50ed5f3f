//! Authentication integration tests.
//!
//! Tests verify:
//! - Protected routes reject requests without a token
//! - Bad tokens are rejected on every route, public ones included
//! - Register, login and logout flows and their cookies

use axum::http::StatusCode;
use serde_json::json;

use qrcode_service::token::{SigningKey, TokenService};
use qrcode_service::SymbolStore;

use super::test_utils::{body_bytes, body_json, set_cookies, TestApp, EMAIL, PASSWORD};

const GATE_ERROR: &str = "Invalid or expired token";

// =============================================================================
// Gate
// =============================================================================

#[tokio::test]
async fn test_protected_route_without_cookie() {
    let app = TestApp::with_user().await;

    let response = app.get("/api/qrcode/generate?contents=test", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({"error": GATE_ERROR}));
}

#[tokio::test]
async fn test_all_protected_routes_require_principal() {
    let app = TestApp::with_user().await;
    let id = uuid::Uuid::new_v4();

    let responses = [
        app.get("/api/qrcode", None).await,
        app.get(&format!("/api/qrcode/{}", id), None).await,
        app.delete(&format!("/api/qrcode/{}", id), None).await,
        app.post_json("/api/qrcode", None, json!({"content": "c", "name": "Name"}))
            .await,
        app.put_json(
            &format!("/api/qrcode/{}", id),
            None,
            json!({"content": "c", "name": "Name"}),
        )
        .await,
    ];

    for response in responses {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], GATE_ERROR);
    }
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app = TestApp::with_user().await;

    let response = app
        .get("/api/qrcode/generate?contents=test", Some("token=not.a.token"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({"error": GATE_ERROR}));
}

#[tokio::test]
async fn test_bad_token_rejected_on_public_route() {
    let app = TestApp::with_user().await;

    let response = app.get("/api/health", Some("token=garbage")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], GATE_ERROR);
}

#[tokio::test]
async fn test_token_from_other_key_rejected() {
    let app = TestApp::with_user().await;
    let foreign = TokenService::new(SigningKey::generate())
        .issue(EMAIL)
        .unwrap();

    let response = app
        .get(
            "/api/qrcode/generate?contents=test",
            Some(&format!("token={}", foreign)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::with_user().await;
    let expired = app.state.tokens.issue_at(EMAIL, 1_000).unwrap();

    let response = app
        .get(
            "/api/qrcode/generate?contents=test",
            Some(&format!("token={}", expired)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], GATE_ERROR);
}

#[tokio::test]
async fn test_token_for_unregistered_user_rejected() {
    let app = TestApp::with_user().await;
    let cookie = app.cookie_for("ghost@example.com");

    let response = app
        .get("/api/qrcode/generate?contents=test", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejected_request_has_no_side_effects() {
    let app = TestApp::with_user().await;

    let response = app
        .post_json(
            "/api/qrcode",
            Some("token=garbage"),
            json!({"content": "c", "name": "Sneaky"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let stored = app.state.store.find_all(EMAIL).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_public_routes_without_cookie() {
    let app = TestApp::new();

    let response = app.get("/api/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

// =============================================================================
// Register / Login / Logout
// =============================================================================

#[tokio::test]
async fn test_register_login_generate_flow() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/auth/register",
            None,
            json!({"email": "new@example.com", "password": "secret", "name": "New"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "User registered successfully"})
    );

    let response = app
        .post_json(
            "/api/auth/login",
            None,
            json!({"email": "new@example.com", "password": "secret"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    let cookie = &cookies[0];
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(cookie.contains("SameSite=Lax"));
    assert_eq!(
        body_json(response).await,
        json!({"message": "User logged in successfully"})
    );

    // Replay just the name=value pair, as a browser would
    let pair = cookie.split(';').next().unwrap().to_string();
    let response = app
        .get("/api/qrcode/generate?contents=test", Some(&pair))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::with_user().await;

    let response = app
        .post_json(
            "/api/auth/register",
            None,
            json!({"email": EMAIL, "password": "other"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await,
        json!({"error": format!("Email '{}' already exists", EMAIL)})
    );
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = TestApp::new();

    let response = app.post_json("/api/auth/register", None, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Email is required, Password is required"
    );
}

#[tokio::test]
async fn test_register_malformed_body() {
    let app = TestApp::new();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body: "));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::with_user().await;

    let response = app
        .post_json(
            "/api/auth/login",
            None,
            json!({"email": EMAIL, "password": "wrong"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
    assert_eq!(
        body_json(response).await,
        json!({"error": "Invalid email or password"})
    );
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::with_user().await;

    let response = app
        .post_json(
            "/api/auth/login",
            None,
            json!({"email": "nobody@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Invalid email or password"
    );
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::with_user().await;
    let cookie = app.cookie_for(EMAIL);

    let response = app.post_json("/api/auth/logout", Some(&cookie), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("token=;"));
    assert!(cookies[0].contains("Max-Age=0"));
    assert!(cookies[0].contains("HttpOnly"));
    assert!(cookies[0].contains("Path=/"));
}

#[tokio::test]
async fn test_logout_without_cookie() {
    let app = TestApp::new();

    let response = app.post_json("/api/auth/logout", None, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookies(&response).len(), 1);
}
