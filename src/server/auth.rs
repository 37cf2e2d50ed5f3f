//! Cookie-based bearer token authentication.
//!
//! Every request passes through [`auth_middleware`], which reads the `token`
//! cookie and reaches one of three decisions:
//!
//! ```text
//! no token cookie                       -> Anonymous      (continue, no principal)
//! token, subject known, verify() true   -> Authenticated  (continue with principal)
//! anything else                         -> Rejected       (401, handlers never run)
//! ```
//!
//! Routes that need a caller are additionally wrapped in
//! [`require_principal`], which turns an anonymous request into the same
//! 401 response.
//!
//! # Cookie Attributes
//!
//! ```text
//! login:  token=<jwt>; HttpOnly; SameSite=Lax; Secure; Path=/; Max-Age=86400
//! logout: token=;      HttpOnly; Secure; Path=/; Max-Age=0
//! ```
//!
//! # Security Properties
//!
//! - **Uniform rejection**: malformed, forged, expired and orphaned tokens
//!   all produce the same response body
//! - **No leaks**: token values are never logged
//! - **Stateless**: the only shared state is the signing key and the user
//!   directory

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use cookie::{Cookie, SameSite};
use thiserror::Error;
use tracing::{debug, warn};

use super::handlers::ErrorResponse;
use crate::directory::UserDirectory;
use crate::token::{TokenService, TOKEN_TTL_SECS};

/// Name of the cookie carrying the bearer token.
pub const TOKEN_COOKIE: &str = "token";

// =============================================================================
// Types
// =============================================================================

/// Identity resolved from a verified token.
///
/// Lives in the request extensions for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    pub email: String,
}

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Token missing where required, or rejected by the gate
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Login with an unknown email or a wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let message = self.to_string();

        match self {
            AuthError::InvalidToken => {
                debug!(status = status.as_u16(), "Authentication failed: {}", message);
            }
            AuthError::InvalidCredentials => {
                warn!(status = status.as_u16(), "Login failed: {}", message);
            }
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Outcome of inspecting one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No token presented; continue without a principal
    Anonymous,

    /// Token verified; continue with this principal
    Authenticated(AuthenticatedPrincipal),

    /// Token presented but unusable; respond 401 now
    Rejected,
}

// =============================================================================
// Authentication Gate
// =============================================================================

/// Resolves request cookies to a [`GateDecision`].
#[derive(Debug, Clone)]
pub struct AuthGate {
    tokens: TokenService,
    directory: Arc<dyn UserDirectory>,
}

impl AuthGate {
    pub fn new(tokens: TokenService, directory: Arc<dyn UserDirectory>) -> Self {
        Self { tokens, directory }
    }

    /// Inspect the request headers. Never fails; every problem is a rejection.
    pub async fn decide(&self, headers: &HeaderMap) -> GateDecision {
        let Some(token) = token_from_headers(headers) else {
            return GateDecision::Anonymous;
        };

        let Some(subject) = self.tokens.extract_subject(&token) else {
            debug!("Rejected token: bad signature or format");
            return GateDecision::Rejected;
        };

        let user = match self.directory.find_by_email(&subject).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("Rejected token: subject is not a registered user");
                return GateDecision::Rejected;
            }
            Err(e) => {
                warn!(error = %e, "Rejected token: user lookup failed");
                return GateDecision::Rejected;
            }
        };

        if !self.tokens.verify(&token, &user.email) {
            debug!("Rejected token: expired");
            return GateDecision::Rejected;
        }

        GateDecision::Authenticated(AuthenticatedPrincipal { email: user.email })
    }
}

// =============================================================================
// Cookies
// =============================================================================

/// First `token` cookie across all `Cookie` headers.
///
/// Unparseable pairs are skipped; an empty value counts as absent.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Cookie set on successful login.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(true)
        .path("/")
        .max_age(time::Duration::seconds(TOKEN_TTL_SECS as i64))
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that clears the session on logout.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, ""))
        .http_only(true)
        .secure(true)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Gate middleware, installed over every route.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware};
/// use qrcode_service::server::auth::{auth_middleware, AuthGate};
///
/// let gate = AuthGate::new(tokens, directory);
/// let app = Router::new()
///     .route("/api/health", get(health_handler))
///     .layer(middleware::from_fn_with_state(gate, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match gate.decide(request.headers()).await {
        GateDecision::Anonymous => {}
        GateDecision::Authenticated(principal) => {
            request.extensions_mut().insert(principal);
        }
        GateDecision::Rejected => return Err(AuthError::InvalidToken),
    }

    Ok(next.run(request).await)
}

/// Reject requests that reached a protected route without a principal.
pub async fn require_principal(request: Request, next: Next) -> Result<Response, AuthError> {
    if request
        .extensions()
        .get::<AuthenticatedPrincipal>()
        .is_none()
    {
        return Err(AuthError::InvalidToken);
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

// =============================================================================
// Tests
// =============================================================================
