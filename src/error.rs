//! Error types for `y1themes`
//!
//! One error enum per concern (manifest, theme config, site generation,
//! remote transfer), aggregated into [`Y1ThemesError`] which maps every
//! failure onto a process exit code.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `y1themes` CLI operations.
///
/// Per-item failures (one theme page, one downloaded file) never reach
/// these; they are logged and counted by the command that hit them.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Manifest, theme config or site config could not be read or parsed
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Remote listing or download failed
    pub const REMOTE_ERROR: i32 = 4;

    /// Validation failed, or `--check` found drift
    pub const VALIDATION_FAILED: i32 = 5;

    /// Usage error (invalid arguments, unknown theme)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `y1themes` operations.
#[derive(Debug, Error)]
pub enum Y1ThemesError {
    /// Manifest loading or saving error
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Theme or site configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Site generation error
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Remote listing or transfer error
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Validation reported errors
    #[error("validation failed: {0} error(s)")]
    ValidationFailed(usize),

    /// Invalid invocation
    #[error("{0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Y1ThemesError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Manifest(_) | Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Site(_) => ExitCode::ERROR,
            Self::Remote(_) => ExitCode::REMOTE_ERROR,
            Self::ValidationFailed(_) => ExitCode::VALIDATION_FAILED,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Manifest Errors
// ============================================================================

/// Errors reading or writing the shared theme manifest (`themes.json`).
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest file does not exist
    #[error("manifest not found: {path}")]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Manifest is not valid JSON or has the wrong shape
    #[error("parse error in {path}: {message}")]
    Parse {
        /// Path to the manifest
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Reading or writing the manifest failed
    #[error("manifest I/O error on {path}: {source}")]
    Io {
        /// Path to the manifest
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Per-theme `config.json` and site configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file is not valid JSON/YAML
    #[error("parse error in {path}: {message}")]
    Parse {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Site Generation Errors
// ============================================================================

/// Errors while writing generated site artifacts.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Writing an output file failed
    #[error("failed to write {path}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A required template theme is missing
    #[error("template theme not found: {0}")]
    MissingTemplate(PathBuf),

    /// Image decoding or encoding failed
    #[error("image error on {path}: {message}")]
    Image {
        /// Image path
        path: PathBuf,
        /// Error message from the codec
        message: String,
    },

    /// The site URL could not be used to build page URLs
    #[error("invalid site URL '{0}'")]
    InvalidSiteUrl(String),
}

// ============================================================================
// Remote Errors
// ============================================================================

/// Errors talking to the remote content-listing API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection or protocol failure
    #[error("request to {url} failed: {message}")]
    Network {
        /// Request URL
        url: String,
        /// Error message
        message: String,
    },

    /// Non-success HTTP status
    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        /// Request URL
        url: String,
        /// Status code
        status: u16,
    },

    /// Response body could not be parsed
    #[error("invalid response from {url}: {message}")]
    InvalidResponse {
        /// Request URL
        url: String,
        /// Error message
        message: String,
    },

    /// Theme folder listing came back empty
    #[error("theme '{0}' has no files")]
    EmptyTheme(String),

    /// Local write while installing or packing failed
    #[error("local I/O error on {path}: {source}")]
    Io {
        /// Local path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// ZIP packing failed
    #[error("archive error: {0}")]
    Archive(String),
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single issue reported by `validate`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationIssue {
    /// Theme folder or file the issue applies to
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Prevents the site from being built correctly
    Error,
    /// Worth fixing, does not break the build
    Warning,
}

// ============================================================================
// Tests
// ============================================================================
