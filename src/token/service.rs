use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::key::SigningKey;

/// Token lifetime in seconds (24 hours).
pub const TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

// =============================================================================
// Types
// =============================================================================

/// Claims carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,

    /// Issued at (Unix epoch seconds)
    pub iat: u64,

    /// Expires at (Unix epoch seconds)
    pub exp: u64,
}

/// Reasons a token fails to encode or decode.
///
/// Decode failures are never surfaced to clients; the public API collapses
/// them to `false` / `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not a well-formed JWT
    #[error("Malformed token")]
    Malformed,

    /// Header names an algorithm other than HS256
    #[error("Unsupported algorithm")]
    UnsupportedAlgorithm,

    /// Signature does not match the header and claims
    #[error("Invalid signature")]
    InvalidSignature,

    /// Claims could not be signed
    #[error("Failed to issue token: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => TokenError::UnsupportedAlgorithm,
            _ => TokenError::Malformed,
        }
    }
}

// =============================================================================
// Token Service
// =============================================================================

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

/// Issues and verifies HS256 JWTs under a shared [`SigningKey`].
///
/// Cloning is cheap; all clones share the same key.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl TokenService {
    pub fn new(key: SigningKey) -> Self {
        // Expiry is checked against an explicit clock in `verify_at`
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(key.as_bytes()),
                decoding: DecodingKey::from_secret(key.as_bytes()),
                validation,
            }),
        }
    }

    /// Issue a token for `subject`, valid for [`TOKEN_TTL_SECS`] from now.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, now_secs())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(&self, subject: &str, issued_at: u64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Check that `token` is authentic, belongs to `expected_subject`, and has
    /// not expired. Never fails; any problem yields `false`.
    pub fn verify(&self, token: &str, expected_subject: &str) -> bool {
        self.verify_at(token, expected_subject, now_secs())
    }

    /// [`verify`](Self::verify) against an explicit current time.
    ///
    /// A token is expired from the instant `now == exp` onward.
    pub fn verify_at(&self, token: &str, expected_subject: &str, now: u64) -> bool {
        match self.decode(token) {
            Ok(claims) => claims.sub == expected_subject && now < claims.exp,
            Err(_) => false,
        }
    }

    /// Return the subject of an authentic token without checking expiry.
    pub fn extract_subject(&self, token: &str) -> Option<String> {
        self.decode(token).ok().map(|claims| claims.sub)
    }

    /// Verify the signature and parse the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.keys.validation)?;
        Ok(data.claims)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// =============================================================================
// Tests
// =============================================================================
