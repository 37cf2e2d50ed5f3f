//! # QR Code Service
//!
//! An HTTP service that renders QR codes on demand, gated by cookie-based
//! bearer tokens.
//!
//! ## Features
//!
//! - **On-demand rendering**: PNG, JPEG or GIF with configurable size,
//!   error correction, colors and quiet zone
//! - **Strict validation**: parameters are checked in a fixed order and the
//!   first violation is reported
//! - **Token authentication**: HMAC-SHA256 signed tokens in an `HttpOnly`
//!   cookie, with a key generated per process
//! - **Saved definitions**: users can store named symbol parameters
//!
//! ## Architecture
//!
//! - [`token`] - Signing key and token issue/verify
//! - [`symbol`] - Parameter validation, matrix encoding and raster output
//! - [`directory`] - User accounts and password hashing
//! - [`store`] - Saved symbol definitions with soft delete
//! - [`server`] - Axum handlers, token gate and router
//! - [`config`] - CLI and environment configuration
//!
//! ## Example
//!
//! ```rust
//! use qrcode_service::{GenerationRequest, SymbolImageGenerator};
//!
//! let generator = SymbolImageGenerator::new();
//! let image = generator
//!     .generate(&GenerationRequest::new("hello").with_format("gif"))
//!     .unwrap();
//!
//! assert_eq!(image.media_type(), "image/gif");
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod server;
pub mod store;
pub mod symbol;
pub mod token;

// Re-export commonly used types
pub use config::Config;
pub use directory::{
    AccountService, Argon2Hasher, InMemoryUserDirectory, NewUser, PasswordHasher, User,
    UserDirectory,
};
pub use error::{DirectoryError, GenerationError, StoreError, ValidationError};
pub use server::{
    auth_middleware, create_router, require_principal, ApiError, AppState, AuthError, AuthGate,
    AuthenticatedPrincipal, ErrorResponse, GateDecision, RouterConfig,
};
pub use store::{InMemorySymbolStore, SavedSymbol, SymbolDraft, SymbolStore};
pub use symbol::{
    Color, CorrectionLevel, GeneratedImage, GenerationParameters, GenerationRequest, NamedColor,
    OutputFormat, SymbolImageGenerator,
};
pub use token::{Claims, SigningKey, TokenError, TokenService};
