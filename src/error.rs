//! Error types for the enrollment portal
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI
//!
//! Per-field validation messages are form state, not errors; they never
//! appear here. Generation and picture failures are errors internally
//! and become user-visible notices at the form boundary.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // Picture errors (2xx)
    PictureUnsupported = 200,
    PictureTooLarge = 201,
    PictureDecodeFailed = 202,

    // Bio generation errors (3xx)
    CredentialMissing = 300,
    GenerationRequestFailed = 301,
    GenerationUpstreamError = 302,
    GenerationMalformedResponse = 303,

    // IO errors (4xx)
    IoRead = 400,
    IoWrite = 401,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // Picture errors
            300..=399 => 30, // Generation errors
            400..=499 => 40, // IO errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the portal
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation {
        message: String,
        field: Option<String>,
    },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // Picture Errors
    // ─────────────────────────────────────────────────────────────

    /// Byte stream is not a recognized image format
    #[error("Unsupported picture format: {message}")]
    PictureUnsupported { message: String },

    /// Picture exceeds the configured size ceiling
    #[error("Picture too large: {size_bytes} bytes (maximum {max_bytes} bytes)")]
    PictureTooLarge { size_bytes: usize, max_bytes: usize },

    /// Preview derivation failed
    #[error("Failed to derive picture preview: {message}")]
    PictureDecodeFailed { message: String },

    // ─────────────────────────────────────────────────────────────
    // Bio Generation Errors
    // ─────────────────────────────────────────────────────────────

    /// No API credential in the process environment at call time
    #[error("API credential not set (checked {checked})")]
    CredentialMissing { checked: String },

    /// The HTTP request itself failed (network, timeout)
    #[error("Bio generation request failed: {message}")]
    GenerationRequestFailed { message: String },

    /// The upstream API returned an error status
    #[error("Bio generation API error {status}: {message}")]
    GenerationUpstreamError { status: u16, message: String },

    /// The upstream API returned a body we could not use
    #[error("Bio generation returned an unusable response: {message}")]
    GenerationMalformedResponse { message: String },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::PictureUnsupported { .. } => ErrorCode::PictureUnsupported,
            Error::PictureTooLarge { .. } => ErrorCode::PictureTooLarge,
            Error::PictureDecodeFailed { .. } => ErrorCode::PictureDecodeFailed,

            Error::CredentialMissing { .. } => ErrorCode::CredentialMissing,
            Error::GenerationRequestFailed { .. } => ErrorCode::GenerationRequestFailed,
            Error::GenerationUpstreamError { .. } => ErrorCode::GenerationUpstreamError,
            Error::GenerationMalformedResponse { .. } => ErrorCode::GenerationMalformedResponse,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(_) => ErrorCode::IoRead,
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Check if this error is a bio generation failure
    ///
    /// All generation failures are presented uniformly to the user and
    /// are never retried automatically.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            Error::CredentialMissing { .. }
                | Error::GenerationRequestFailed { .. }
                | Error::GenerationUpstreamError { .. }
                | Error::GenerationMalformedResponse { .. }
        )
    }

    /// Check if the error is fatal (the CLI should exit)
    ///
    /// Only startup concerns are fatal; every failure produced during a
    /// form session becomes user-visible state instead.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound { .. }
                | Error::ConfigParse { .. }
                | Error::ConfigValidation { .. }
                | Error::Internal(_)
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'enroll config init' to create a default configuration file.",
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'enroll config validate' to see details.",
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values.",
            ),

            Error::PictureUnsupported { .. } => Some(
                "Use a PNG, JPEG, GIF, or WebP image for the profile picture.",
            ),
            Error::PictureTooLarge { .. } => Some(
                "Use a smaller image, or raise 'max_bytes' under [picture] in the config.",
            ),

            Error::CredentialMissing { .. } => Some(
                "Set the GEMINI_API_KEY environment variable and try again.",
            ),
            Error::GenerationRequestFailed { .. } => Some(
                "Check your network connection, then retry the generation manually.",
            ),
            Error::GenerationUpstreamError { .. } => Some(
                "The generation service rejected the request. Verify your API key and model name.",
            ),

            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", code.as_str(), self);

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        let code = self.code();
        format!("[{}] {}", code.as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors (for ergonomic error creation)
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound { path: path.into() }
    }

    /// Create a config validation error
    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an unsupported picture error
    pub fn picture_unsupported(message: impl Into<String>) -> Self {
        Error::PictureUnsupported {
            message: message.into(),
        }
    }

    /// Create a generation request failure
    pub fn generation_request_failed(message: impl Into<String>) -> Self {
        Error::GenerationRequestFailed {
            message: message.into(),
        }
    }

    /// Create a malformed-response failure
    pub fn generation_malformed(message: impl Into<String>) -> Self {
        Error::GenerationMalformedResponse {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
