//! HTTP request handlers for the QR code API.
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check
//! - `POST /api/auth/register` - Create an account
//! - `POST /api/auth/login` - Exchange credentials for a `token` cookie
//! - `POST /api/auth/logout` - Clear the `token` cookie
//! - `GET /api/qrcode/generate` - Render a symbol image
//! - `POST /api/qrcode`, `GET /api/qrcode` - Save / list symbol definitions
//! - `GET|PUT|DELETE /api/qrcode/{id}` - Fetch / replace / delete one definition

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::auth::{clear_session_cookie, session_cookie, AuthError, AuthenticatedPrincipal};
use crate::directory::{AccountService, InMemoryUserDirectory};
use crate::error::{DirectoryError, GenerationError, StoreError, ValidationError};
use crate::store::{InMemorySymbolStore, SavedSymbol, SymbolDraft, SymbolStore};
use crate::symbol::{
    GenerationRequest, SymbolImageGenerator, DEFAULT_BACKGROUND, DEFAULT_CORRECTION,
    DEFAULT_FOREGROUND, DEFAULT_FORMAT, DEFAULT_MARGIN, DEFAULT_SIZE,
};
use crate::token::{TokenError, TokenService};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Issues tokens on login and verifies them in the gate
    pub tokens: TokenService,

    /// Registration, login and the user directory behind them
    pub accounts: AccountService,

    /// Saved symbol definitions
    pub store: Arc<dyn SymbolStore>,

    /// Image generation pipeline
    pub generator: Arc<SymbolImageGenerator>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        accounts: AccountService,
        store: Arc<dyn SymbolStore>,
        generator: SymbolImageGenerator,
    ) -> Self {
        Self {
            tokens,
            accounts,
            store,
            generator: Arc::new(generator),
        }
    }

    /// State backed by in-memory users and symbols.
    pub fn in_memory(tokens: TokenService, generator: SymbolImageGenerator) -> Self {
        Self::new(
            tokens,
            AccountService::with_argon2(Arc::new(InMemoryUserDirectory::new())),
            Arc::new(InMemorySymbolStore::new()),
            generator,
        )
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for image generation.
///
/// Values are kept as strings so that non-numeric sizes and margins can be
/// reported with the offending value.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateQueryParams {
    pub contents: Option<String>,
    pub size: Option<String>,
    pub correction: Option<String>,
    #[serde(rename = "type")]
    pub format: Option<String>,
    pub fcolor: Option<String>,
    pub bcolor: Option<String>,
    pub margin: Option<String>,
}

impl GenerateQueryParams {
    /// Apply defaults and decode colors.
    ///
    /// Absent or empty optional values take their default. Colors are
    /// percent-decoded once more, so `%2523FF0000` arrives as `#FF0000`.
    pub fn into_request(self) -> Result<GenerationRequest, ValidationError> {
        let size = parse_int("size", self.size, DEFAULT_SIZE)?;
        let margin = parse_int("margin", self.margin, DEFAULT_MARGIN)?;

        Ok(GenerationRequest {
            content: self.contents,
            size,
            correction: Some(or_default(self.correction, DEFAULT_CORRECTION)),
            format: Some(or_default(self.format, DEFAULT_FORMAT)),
            foreground: Some(decode_color(or_default(self.fcolor, DEFAULT_FOREGROUND))),
            background: Some(decode_color(or_default(self.bcolor, DEFAULT_BACKGROUND))),
            margin,
        })
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn parse_int(name: &'static str, value: Option<String>, default: i32) -> Result<i32, ValidationError> {
    match value {
        Some(value) if !value.is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidParameterValue { name, value }),
        _ => Ok(default),
    }
}

fn decode_color(value: String) -> String {
    match urlencoding::decode(&value) {
        Ok(Cow::Owned(decoded)) => decoded,
        _ => value,
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Confirmation body for account operations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// A saved symbol definition as returned to its owner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolResponse {
    pub id: Uuid,
    pub content: String,
    pub name: String,
    pub description: Option<String>,
    pub size: Option<i32>,
    pub format: Option<String>,
    pub foreground_color: Option<String>,
    pub background_color: Option<String>,
    pub margin: Option<i32>,
    pub error_correction: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SavedSymbol> for SymbolResponse {
    fn from(saved: SavedSymbol) -> Self {
        Self {
            id: saved.id,
            content: saved.content,
            name: saved.name,
            description: saved.description,
            size: saved.size,
            format: saved.format,
            foreground_color: saved.foreground_color,
            background_color: saved.background_color,
            margin: saved.margin,
            error_correction: saved.error_correction,
            created_at: saved.created_at,
            updated_at: saved.updated_at,
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Every error a handler can return.
#[derive(Debug)]
pub enum ApiError {
    Generation(GenerationError),
    Auth(AuthError),
    Directory(DirectoryError),
    Store(StoreError),
    Token(TokenError),
    /// Request body could not be parsed
    InvalidBody(String),
    /// Query string could not be parsed
    InvalidQuery(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Generation(GenerationError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Generation(GenerationError::ImageProcessing { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Directory(DirectoryError::EmailAlreadyExists(_)) => StatusCode::CONFLICT,
            ApiError::Directory(DirectoryError::InvalidRegistration(_)) => StatusCode::BAD_REQUEST,
            ApiError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::InvalidDraft(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidBody(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message placed in the response body.
    ///
    /// Internal failures other than image processing are reported
    /// generically; the detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Generation(err) => err.to_string(),
            ApiError::Auth(err) => err.to_string(),
            ApiError::Directory(
                err @ (DirectoryError::EmailAlreadyExists(_) | DirectoryError::InvalidRegistration(_)),
            ) => err.to_string(),
            ApiError::Directory(_) => "Internal server error".to_string(),
            ApiError::Store(StoreError::Unavailable(_)) => "Internal server error".to_string(),
            ApiError::Store(err) => err.to_string(),
            ApiError::Token(_) => "Internal server error".to_string(),
            ApiError::InvalidBody(detail) => format!("Invalid request body: {}", detail),
            ApiError::InvalidQuery(detail) => format!("Invalid query string: {}", detail),
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Generation(GenerationError::ImageProcessing { message }) => message.clone(),
            ApiError::Generation(err) => err.to_string(),
            ApiError::Auth(err) => err.to_string(),
            ApiError::Directory(err) => err.to_string(),
            ApiError::Store(err) => err.to_string(),
            ApiError::Token(err) => err.to_string(),
            ApiError::InvalidBody(detail) | ApiError::InvalidQuery(detail) => detail.clone(),
        }
    }
}

/// Convert ApiError to HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 5xx errors are logged at ERROR level
/// - 404s are logged at DEBUG level
/// - other 4xx errors are logged at WARN level
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Auth(err) = self {
            return err.into_response();
        }

        let status = self.status();
        let message = self.public_message();

        if status.is_server_error() {
            error!(status = status.as_u16(), "Server error: {}", self.detail());
        } else if status == StatusCode::NOT_FOUND {
            debug!(status = status.as_u16(), "Resource not found: {}", message);
        } else {
            warn!(status = status.as_u16(), "Client error: {}", message);
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        ApiError::Generation(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Generation(GenerationError::Validation(err))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        ApiError::Directory(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Token(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

fn parse_id(raw: String) -> Result<Uuid, ApiError> {
    Uuid::parse_str(&raw).map_err(|_| {
        ApiError::from(ValidationError::InvalidParameterValue {
            name: "id",
            value: raw,
        })
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /api/health`
///
/// # Response
///
/// Always returns `200 OK` with service status and version.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle symbol image generation.
///
/// # Endpoint
///
/// `GET /api/qrcode/generate`
///
/// # Query Parameters
///
/// - `contents`: Text to encode (required, non-blank)
/// - `size`: Image size in pixels, 150-350 (default: 250)
/// - `correction`: Error correction level L, M, Q or H (default: L)
/// - `type`: png, jpeg or gif (default: png)
/// - `fcolor`: Foreground color, hex or palette name (default: #000000)
/// - `bcolor`: Background color, hex or palette name (default: #FFFFFF)
/// - `margin`: Quiet zone in modules, 0-50 (default: 4)
///
/// # Response
///
/// - `200 OK`: Image bytes with the matching `Content-Type`
/// - `400 Bad Request`: First failing parameter, or an unparseable query string
/// - `401 Unauthorized`: No authenticated caller
/// - `500 Internal Server Error`: Content too long or encoder failure
pub async fn generate_handler(
    State(state): State<AppState>,
    query: Result<Query<GenerateQueryParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let request = query.into_request()?;
    let image = state.generator.generate(&request)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, image.media_type())],
        image.data,
    )
        .into_response())
}

/// Handle account registration.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Response
///
/// - `200 OK`: `{"message": "User registered successfully"}`
/// - `400 Bad Request`: Missing or malformed fields
/// - `409 Conflict`: Email already registered
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = payload?;

    state
        .accounts
        .register(&body.email, &body.password, body.name)
        .await?;

    Ok(Json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

/// Handle login.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Response
///
/// - `200 OK`: `{"message": "User logged in successfully"}` plus a `token` cookie
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;

    let user = state
        .accounts
        .authenticate(&body.email, &body.password)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let token = state.tokens.issue(&user.email)?;
    info!(email = %user.email, "User logged in");

    Ok((
        [(header::SET_COOKIE, session_cookie(token).to_string())],
        Json(MessageResponse {
            message: "User logged in successfully".to_string(),
        }),
    )
        .into_response())
}

/// Handle logout.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
///
/// # Response
///
/// `200 OK` with a `token` cookie that expires immediately.
pub async fn logout_handler() -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie().to_string())],
    )
        .into_response()
}

/// Save a symbol definition for the caller.
///
/// # Endpoint
///
/// `POST /api/qrcode`
pub async fn create_symbol_handler(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    payload: Result<Json<SymbolDraft>, JsonRejection>,
) -> Result<Json<SymbolResponse>, ApiError> {
    let Json(draft) = payload?;
    let saved = state.store.save(&principal.email, draft).await?;

    debug!(id = %saved.id, "Saved symbol");
    Ok(Json(saved.into()))
}

/// List the caller's symbol definitions.
///
/// # Endpoint
///
/// `GET /api/qrcode`
pub async fn list_symbols_handler(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
) -> Result<Json<Vec<SymbolResponse>>, ApiError> {
    let saved = state.store.find_all(&principal.email).await?;
    Ok(Json(saved.into_iter().map(SymbolResponse::from).collect()))
}

/// Fetch one symbol definition.
///
/// # Endpoint
///
/// `GET /api/qrcode/{id}`
///
/// # Response
///
/// - `200 OK`: The definition
/// - `400 Bad Request`: `id` is not a UUID
/// - `404 Not Found`: Unknown, deleted, or owned by another user
pub async fn get_symbol_handler(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<String>,
) -> Result<Json<SymbolResponse>, ApiError> {
    let id = parse_id(id)?;
    let saved = state.store.find(&principal.email, id).await?;
    Ok(Json(saved.into()))
}

/// Replace a symbol definition's fields.
///
/// # Endpoint
///
/// `PUT /api/qrcode/{id}`
pub async fn update_symbol_handler(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<String>,
    payload: Result<Json<SymbolDraft>, JsonRejection>,
) -> Result<Json<SymbolResponse>, ApiError> {
    let id = parse_id(id)?;
    let Json(draft) = payload?;
    let saved = state.store.update(&principal.email, id, draft).await?;
    Ok(Json(saved.into()))
}

/// Soft-delete a symbol definition.
///
/// # Endpoint
///
/// `DELETE /api/qrcode/{id}`
///
/// # Response
///
/// - `204 No Content`: Deleted
/// - `404 Not Found`: Unknown, already deleted, or owned by another user
pub async fn delete_symbol_handler(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(id)?;
    state.store.soft_delete(&principal.email, id).await?;

    debug!(%id, "Deleted symbol");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Tests
// =============================================================================
