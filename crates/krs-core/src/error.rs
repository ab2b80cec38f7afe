//! # Error Types
//!
//! Domain-specific error types for krs-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  krs-core errors (this file)                                           │
//! │  ├── RegistrationError - Guarded transitions refused                   │
//! │  └── CatalogError      - Course data failed integrity checks           │
//! │                                                                         │
//! │  krs-session errors (separate crate)                                   │
//! │  └── SessionError      - Auth gate, locked selection, config I/O       │
//! │                                                                         │
//! │  Flow: CatalogError → RegistrationError → SessionError → UI message    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Every condition is recoverable: the caller shows a message and the
//!    state it guarded is left untouched
//! 2. Each variant has a stable machine-readable code for the UI
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::Weekday;
use crate::workflow::WorkflowStage;

// =============================================================================
// Registration Error
// =============================================================================

/// A refused registration operation.
///
/// ## User Workflow
/// ```text
/// Click "Ajukan KRS" (open review)
///      │
///      ├── nothing selected ──────► EmptySelection
///      ├── 28 / 24 SKS ───────────► CreditLimitExceeded { total: 28, max: 24 }
///      │
///      ▼
/// Review dialog ── "Konfirmasi" without ticking the terms box
///      │
///      └──────────────────────────► TermsNotAccepted
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The course is already part of the selection.
    #[error("Course {course_code} is already selected")]
    DuplicateSelection { course_code: String },

    /// Review requested with nothing selected.
    #[error("Select at least one course before submitting")]
    EmptySelection,

    /// Review requested while the credit load is above the cap.
    #[error("Credit limit exceeded: {total} SKS selected, maximum is {max} SKS")]
    CreditLimitExceeded { total: u32, max: u32 },

    /// Confirm requested before the terms were acknowledged.
    #[error("Terms and conditions must be accepted before confirming")]
    TermsNotAccepted,

    /// The workflow is not in a stage that accepts this action.
    #[error("Cannot {action} while submission is {stage}")]
    InvalidTransition {
        stage: WorkflowStage,
        action: &'static str,
    },

    /// Catalog data integrity failure.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl RegistrationError {
    /// Machine-readable code for the frontend.
    pub fn code(&self) -> &'static str {
        match self {
            RegistrationError::DuplicateSelection { .. } => "DUPLICATE_SELECTION",
            RegistrationError::EmptySelection => "EMPTY_SELECTION",
            RegistrationError::CreditLimitExceeded { .. } => "CREDIT_LIMIT_EXCEEDED",
            RegistrationError::TermsNotAccepted => "TERMS_NOT_ACCEPTED",
            RegistrationError::InvalidTransition { .. } => "INVALID_TRANSITION",
            RegistrationError::Catalog(e) => e.code(),
        }
    }
}

// =============================================================================
// Catalog Error
// =============================================================================

/// Course data that cannot be accepted into a catalog.
///
/// These are raised once, when the catalog is loaded. A catalog that loaded
/// successfully never produces them again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A schedule slot whose start is not before its end.
    #[error("Course {course_code} has an invalid time range on {day}: {start}-{end}")]
    InvalidTimeRange {
        course_code: String,
        day: Weekday,
        start: String,
        end: String,
    },

    /// Two slots of the same course overlap each other.
    #[error("Course {course_code} has overlapping schedule entries on {day}")]
    SelfOverlappingSchedule { course_code: String, day: Weekday },

    /// A course without any meeting.
    #[error("Course {course_code} has no schedule")]
    EmptySchedule { course_code: String },

    #[error("Course {course_code} must be worth at least one credit")]
    ZeroCredits { course_code: String },

    /// More credits than any single course can carry.
    #[error("Course {course_code} is worth {credits} SKS, maximum per course is {max}")]
    ExcessiveCredits {
        course_code: String,
        credits: u32,
        max: u32,
    },

    #[error("Course {course_code} has a negative cost")]
    NegativeCost { course_code: String },

    /// A required text field is blank.
    #[error("{field} is required")]
    Required { field: String },

    #[error("Duplicate course id '{0}'")]
    DuplicateId(String),

    #[error("Duplicate course code '{0}'")]
    DuplicateCode(String),

    #[error("Unknown day '{0}'")]
    UnknownDay(String),

    #[error("Unknown section code '{0}'")]
    UnknownSection(String),

    /// A time that is not `HH:MM` within a single day.
    #[error("Malformed time '{0}', expected HH:MM")]
    MalformedTime(String),

    /// The catalog document itself could not be parsed.
    #[error("Failed to parse catalog: {0}")]
    Parse(String),
}

impl CatalogError {
    /// Machine-readable code for the frontend.
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::InvalidTimeRange { .. } => "INVALID_TIME_RANGE",
            _ => "INVALID_CATALOG",
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with RegistrationError.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Convenience type alias for catalog loading.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RegistrationError::CreditLimitExceeded { total: 28, max: 24 };
        assert_eq!(
            err.to_string(),
            "Credit limit exceeded: 28 SKS selected, maximum is 24 SKS"
        );

        let err = RegistrationError::InvalidTransition {
            stage: WorkflowStage::Editing,
            action: "confirm",
        };
        assert_eq!(err.to_string(), "Cannot confirm while submission is editing");
    }

    #[test]
    fn test_catalog_error_messages() {
        let err = CatalogError::InvalidTimeRange {
            course_code: "IF-101".to_string(),
            day: Weekday::Mon,
            start: "10:30".to_string(),
            end: "08:00".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Course IF-101 has an invalid time range on Mon: 10:30-08:00"
        );
    }

    #[test]
    fn test_catalog_converts_to_registration_error() {
        let err: RegistrationError = CatalogError::DuplicateCode("IF-101".to_string()).into();
        assert!(matches!(err, RegistrationError::Catalog(_)));
        assert_eq!(err.code(), "INVALID_CATALOG");
    }

    #[test]
    fn test_codes() {
        assert_eq!(RegistrationError::EmptySelection.code(), "EMPTY_SELECTION");
        assert_eq!(RegistrationError::TermsNotAccepted.code(), "TERMS_NOT_ACCEPTED");
        let err: RegistrationError = CatalogError::InvalidTimeRange {
            course_code: "X".to_string(),
            day: Weekday::Fri,
            start: "09:00".to_string(),
            end: "09:00".to_string(),
        }
        .into();
        assert_eq!(err.code(), "INVALID_TIME_RANGE");
    }
}
