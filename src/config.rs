//! Configuration management for the QR code service.
//!
//! Configuration comes from:
//! - Command-line arguments via clap
//! - Environment variables with `QRCODE_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! - `QRCODE_HOST` - Server bind address (default: 0.0.0.0)
//! - `QRCODE_PORT` - Server port (default: 8080)
//! - `QRCODE_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)
//! - `QRCODE_JPEG_QUALITY` - JPEG output quality (default: 75)
//!
//! The token signing key is not configurable. It is generated at startup,
//! so every restart invalidates all outstanding tokens.

use clap::Parser;

use crate::symbol::{is_valid_quality, DEFAULT_JPEG_QUALITY};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// CLI Arguments
// =============================================================================

/// QR code service - renders QR codes behind cookie-based token authentication.
#[derive(Parser, Debug, Clone)]
#[command(name = "qrcode-service")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "QRCODE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "QRCODE_PORT")]
    pub port: u16,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin without credentials.
    #[arg(long, env = "QRCODE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Image Configuration
    // =========================================================================
    /// JPEG quality for `type=jpeg` output (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "QRCODE_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty. Set --host or QRCODE_HOST".to_string());
        }

        if !is_valid_quality(self.jpeg_quality) {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        if let Some(origins) = &self.cors_origins {
            if let Some(bad) = origins.iter().find(|o| o.trim().is_empty()) {
                return Err(format!("Invalid CORS origin: '{}'", bad));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
