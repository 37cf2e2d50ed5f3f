//! HTTP server layer for the QR code service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                  GET /api/qrcode/generate?...                   │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │(token gate) │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{
    auth_middleware, clear_session_cookie, require_principal, session_cookie, token_from_headers,
    AuthError, AuthGate, AuthenticatedPrincipal, GateDecision, TOKEN_COOKIE,
};
pub use handlers::{
    create_symbol_handler, delete_symbol_handler, generate_handler, get_symbol_handler,
    health_handler, list_symbols_handler, login_handler, logout_handler, register_handler,
    update_symbol_handler, ApiError, AppState, ErrorResponse, GenerateQueryParams, HealthResponse,
    LoginRequest, MessageResponse, RegisterRequest, SymbolResponse,
};
pub use routes::{create_router, RouterConfig};
