use thiserror::Error;
use uuid::Uuid;

/// Parameter validation failures, reported in a fixed check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Content is missing or whitespace only
    #[error("Contents cannot be null or blank")]
    InvalidContent,

    /// Image size outside 150..=350
    #[error("Image size must be between 150 and 350 pixels")]
    InvalidSize,

    /// Correction level is not one of L, M, Q, H
    #[error("Permitted error correction levels are L, M, Q, H")]
    InvalidCorrectionLevel,

    /// Output format is not png, jpeg or gif
    #[error("Only png, jpeg and gif image types are supported")]
    InvalidFormat,

    /// Color is neither `#RRGGBB` nor a known color name
    #[error("Color must be a valid color name or hex code (#RRGGBB)")]
    InvalidColor,

    /// Margin outside 0..=50
    #[error("Margin must be between 0 and 50 pixels")]
    InvalidMargin,

    /// Query value could not be converted to the parameter's type
    #[error("Invalid parameter value '{value}' for '{name}'")]
    InvalidParameterValue { name: &'static str, value: String },
}

/// Errors produced while generating a symbol image.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// A request parameter was rejected by the validator
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Matrix encoding or raster encoding failed
    #[error("Error during image processing")]
    ImageProcessing { message: String },
}

/// Errors raised by a user directory.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Registration with an email that is already taken
    #[error("Email '{0}' already exists")]
    EmailAlreadyExists(String),

    /// Registration fields failed validation
    #[error("{0}")]
    InvalidRegistration(String),

    /// Password could not be hashed
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Backing storage could not be reached
    #[error("User directory unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a symbol store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No visible symbol with this id for the owner
    #[error("QR code with ID '{0}' not found")]
    NotFound(Uuid),

    /// Draft fields failed validation
    #[error("{0}")]
    InvalidDraft(String),

    /// Backing storage could not be reached
    #[error("Symbol store unavailable: {0}")]
    Unavailable(String),
}
