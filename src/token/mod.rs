//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs signed under a [`SigningKey`] that lives for the
//! lifetime of the process. Claims are `{"sub", "iat", "exp"}` in Unix
//! seconds. Only HS256 headers are accepted.
//!
//! # Security Properties
//!
//! - **Integrity**: any change to the subject or timestamps invalidates the signature
//! - **Time-limited**: tokens expire 24 hours after issuance, with no revocation list
//! - **Process-scoped**: the key is regenerated on every start, so tokens never
//!   survive a restart
//!
//! # Example
//!
//! ```rust
//! use qrcode_service::token::{SigningKey, TokenService};
//!
//! let tokens = TokenService::new(SigningKey::generate());
//!
//! let token = tokens.issue("alice@example.com").unwrap();
//! assert!(tokens.verify(&token, "alice@example.com"));
//! assert_eq!(tokens.extract_subject(&token).as_deref(), Some("alice@example.com"));
//! ```

mod key;
mod service;

pub use key::{SigningKey, SIGNING_KEY_LEN};
pub use service::{Claims, TokenError, TokenService, TOKEN_TTL_SECS};
