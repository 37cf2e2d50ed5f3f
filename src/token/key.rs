//! Process-wide signing key.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

/// Length of the signing key in bytes.
pub const SIGNING_KEY_LEN: usize = 32;

/// Symmetric secret used to sign and verify tokens.
///
/// Generated once at startup and shared read-only by every request. It is
/// never persisted and its bytes are never printed, including by `Debug`.
#[derive(Clone)]
pub struct SigningKey {
    bytes: [u8; SIGNING_KEY_LEN],
}

impl SigningKey {
    /// Generate a fresh key from the operating system's RNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SIGNING_KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Build a key from known bytes.
    pub fn from_bytes(bytes: [u8; SIGNING_KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}
