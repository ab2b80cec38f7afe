//! # Session Error Types
//!
//! Errors raised by the session shell, and the shape the UI receives.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  krs-core                     krs-session                  UI           │
//! │  ────────                     ───────────                  ──           │
//! │                                                                         │
//! │  CatalogError ──► RegistrationError ──► SessionError ──► ApiError      │
//! │                                            ▲              { code,       │
//! │                     NotAuthenticated ──────┤                message }  │
//! │                     SelectionLocked ───────┤                            │
//! │                     config / catalog I/O ──┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use krs_core::workflow::WorkflowStage;
use krs_core::{CatalogError, RegistrationError};

use crate::session::ContextKind;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    // =========================================================================
    // Gate Errors
    // =========================================================================
    /// The identity collaborator has not admitted the user.
    #[error("Login required before registering courses")]
    NotAuthenticated,

    /// The selection can only change while its workflow is editing.
    #[error("{context} selection is locked while submission is {stage}")]
    SelectionLocked {
        context: ContextKind,
        stage: WorkflowStage,
    },

    /// The mode switch is only available while both contexts are editing.
    #[error("Mode cannot change while the {context} submission is {stage}")]
    ModeLocked {
        context: ContextKind,
        stage: WorkflowStage,
    },

    /// No course with this id in the loaded catalog.
    #[error("Course not found: {0}")]
    CourseNotFound(String),

    /// Submitting needs a tokio runtime to run the reset timer on.
    #[error("Submission requires a running tokio runtime")]
    NoRuntime,

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// The configured catalog file could not be read.
    #[error("Failed to read catalog file: {0}")]
    CatalogLoadFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CatalogError> for SessionError {
    fn from(err: CatalogError) -> Self {
        SessionError::Registration(RegistrationError::Catalog(err))
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SessionError {
    fn from(err: toml::de::Error) -> Self {
        SessionError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SessionError {
    fn from(err: toml::ser::Error) -> Self {
        SessionError::ConfigSaveFailed(err.to_string())
    }
}

impl SessionError {
    /// Machine-readable code for the frontend.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NotAuthenticated => "NOT_AUTHENTICATED",
            SessionError::SelectionLocked { .. } => "SELECTION_LOCKED",
            SessionError::ModeLocked { .. } => "MODE_LOCKED",
            SessionError::CourseNotFound(_) => "NOT_FOUND",
            SessionError::NoRuntime => "NO_RUNTIME",
            SessionError::Registration(e) => e.code(),
            SessionError::InvalidConfig(_)
            | SessionError::ConfigLoadFailed(_)
            | SessionError::ConfigSaveFailed(_) => "CONFIG_ERROR",
            SessionError::CatalogLoadFailed(_) => "INVALID_CATALOG",
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidConfig(_)
                | SessionError::ConfigLoadFailed(_)
                | SessionError::ConfigSaveFailed(_)
        )
    }
}

// =============================================================================
// API Error
// =============================================================================

/// What the frontend receives when an operation is refused.
///
/// ```json
/// {
///   "code": "CREDIT_LIMIT_EXCEEDED",
///   "message": "Credit limit exceeded: 28 SKS selected, maximum is 24 SKS"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: &'static str,
    pub message: String,
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        if err.is_config_error() {
            tracing::error!(error = %err, "Session configuration failure");
        }
        ApiError {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        SessionError::from(err).into()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
