//! Shared helpers for integration tests.

use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use qrcode_service::token::{SigningKey, TokenService, SIGNING_KEY_LEN};
use qrcode_service::{create_router, AppState, RouterConfig, SymbolImageGenerator};

pub const EMAIL: &str = "test@example.com";
pub const PASSWORD: &str = "password123";

/// A router over fresh in-memory state, plus the token service behind it.
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let tokens = TokenService::new(SigningKey::from_bytes([7u8; SIGNING_KEY_LEN]));
        let state = AppState::in_memory(tokens, SymbolImageGenerator::new());
        let router = create_router(state.clone(), RouterConfig::new().with_tracing(false));

        Self { router, state }
    }

    /// App with one registered user.
    pub async fn with_user() -> Self {
        let app = Self::new();
        app.state
            .accounts
            .register(EMAIL, PASSWORD, Some("Test User".to_string()))
            .await
            .unwrap();
        app
    }

    /// `Cookie` header value carrying a fresh token for `email`.
    pub fn cookie_for(&self, email: &str) -> String {
        format!("token={}", self.state.tokens.issue(email).unwrap())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(build(Method::GET, uri, cookie, None)).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(build(Method::DELETE, uri, cookie, None)).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        cookie: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.send(build(Method::POST, uri, cookie, Some(body))).await
    }

    pub async fn put_json(
        &self,
        uri: &str,
        cookie: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        self.send(build(Method::PUT, uri, cookie, Some(body))).await
    }
}

fn build(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub fn content_type(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
}

/// All `Set-Cookie` header values.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// PNG signature check.
pub fn is_png(data: &[u8]) -> bool {
    data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
}
