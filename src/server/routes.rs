//! Router configuration for the QR code service.
//!
//! This module defines the HTTP routes and applies middleware for
//! authentication and CORS.
//!
//! # Route Structure
//!
//! ```text
//! /api/health                 - Health check (public)
//! /api/auth/register          - Create account (public)
//! /api/auth/login             - Login (public)
//! /api/auth/logout            - Logout (public)
//! /api/qrcode/generate        - Render an image (protected)
//! /api/qrcode                 - Save / list definitions (protected)
//! /api/qrcode/{id}            - Fetch / replace / delete (protected)
//! ```
//!
//! The token gate runs on every route. A presented-but-bad token is
//! rejected even on public routes; protected routes additionally require
//! that a principal was resolved.
//!
//! # Example
//!
//! ```no_run
//! use qrcode_service::server::{create_router, AppState, RouterConfig};
//! use qrcode_service::symbol::SymbolImageGenerator;
//! use qrcode_service::token::{SigningKey, TokenService};
//!
//! # async fn run() -> std::io::Result<()> {
//! let tokens = TokenService::new(SigningKey::generate());
//! let state = AppState::in_memory(tokens, SymbolImageGenerator::new());
//!
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//! let router = create_router(state, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{auth_middleware, require_principal, AuthGate};
use super::handlers::{
    create_symbol_handler, delete_symbol_handler, generate_handler, get_symbol_handler,
    health_handler, list_symbols_handler, login_handler, logout_handler, register_handler,
    update_symbol_handler, AppState,
};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Credentials (the `token` cookie) are only allowed for listed origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (health, auth)
/// - Protected routes (generation and saved definitions)
/// - The token gate over all of them
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router(state: AppState, config: RouterConfig) -> Router {
    let gate = AuthGate::new(state.tokens.clone(), state.accounts.directory().clone());
    let cors = build_cors_layer(&config);

    let protected_routes = Router::new()
        .route("/api/qrcode/generate", get(generate_handler))
        .route(
            "/api/qrcode",
            post(create_symbol_handler).get(list_symbols_handler),
        )
        .route(
            "/api/qrcode/{id}",
            get(get_symbol_handler)
                .put(update_symbol_handler)
                .delete(delete_symbol_handler),
        )
        .route_layer(middleware::from_fn(require_principal));

    let public_routes = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler));

    let router = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .with_state(state)
        .layer(middleware::from_fn_with_state(gate, auth_middleware))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins).allow_credentials(true)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
