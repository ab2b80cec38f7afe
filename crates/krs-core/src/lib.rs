//! # krs-core: Pure Registration Logic
//!
//! This crate is the **heart** of the course-registration (KRS) tool. It
//! holds every rule about what a student may select and submit, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     KRS Registration Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (course pages)                      │   │
//! │  │   Course list ──► Class picker ──► Timetable ──► Review dialog  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 krs-session (imperative shell)                  │   │
//! │  │     owns current values, config, ledger, reset timer            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ krs-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐ │   │
//! │  │  │ catalog  │ │selection │ │ conflict │ │aggregate │ │workflow│ │   │
//! │  │  │ Catalog  │ │Selection │ │Timetable │ │ Snapshot │ │ stages │ │   │
//! │  │  └──────────┘ └──────────┘ └──────────┘ └──────────┘ └───────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO LOGGING SINKS • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Course, SelectionEntry, Mode, Weekday, SectionCode
//! - [`schedule`] - TimeSlot and the half-open overlap rule
//! - [`money`] - Integer Rupiah amounts
//! - [`catalog`] - Validated course catalog and search
//! - [`selection`] - Immutable selection values (both flavors)
//! - [`conflict`] - Clash detection and the weekly timetable grid
//! - [`aggregate`] - Credit/cost totals and the credit cap
//! - [`workflow`] - Review → confirm → commit state machine
//! - [`validation`] - Catalog integrity checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use krs_core::aggregate::{AggregateCalculator, CostVisibility};
//! use krs_core::catalog::{Catalog, CatalogProvider};
//! use krs_core::conflict::has_conflict;
//! use krs_core::selection::CourseSelection;
//! use krs_core::workflow::SubmissionWorkflow;
//! use krs_core::Mode;
//!
//! let catalog = Catalog::builtin();
//! let selection = CourseSelection::new()
//!     .toggle(catalog.find_by_code("IF-101").unwrap())
//!     .toggle(catalog.find_by_code("IF-102").unwrap());
//!
//! assert!(!has_conflict(&selection));
//!
//! let snapshot = AggregateCalculator::default().snapshot(&selection, CostVisibility::Shown);
//! assert_eq!(snapshot.total_credits, 7);
//!
//! let mut workflow = SubmissionWorkflow::new();
//! workflow.open_review(&snapshot, Mode::Committed).unwrap();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod catalog;
pub mod conflict;
pub mod error;
pub mod money;
pub mod schedule;
pub mod selection;
pub mod types;
pub mod validation;
pub mod workflow;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{AggregateCalculator, AggregateSnapshot, CostVisibility};
pub use catalog::{Catalog, CatalogProvider};
pub use error::{CatalogError, RegistrationError, RegistrationResult};
pub use money::Money;
pub use schedule::TimeSlot;
pub use selection::{CourseSelection, SectionSelection, Selectable, Selection};
pub use types::*;
pub use workflow::{CommitRecord, SubmissionWorkflow, WorkflowStage};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum credit units (SKS) a student may register for in one term.
///
/// ## Business Reason
/// Academic regulation caps the per-term load at 24 SKS. Sessions read the
/// cap from configuration; this is the fallback.
pub const DEFAULT_MAX_CREDITS: u32 = 24;

/// Most credit units a single catalog course may carry.
///
/// ## Business Reason
/// No course outweighs a full term. Anything above this is a data entry
/// error and is rejected when the catalog loads.
pub const MAX_COURSE_CREDITS: u32 = 24;

/// First hour shown on the weekly timetable (07:00).
pub const GRID_FIRST_HOUR: u16 = 7;

/// Hour the weekly timetable ends at (17:00, exclusive).
pub const GRID_LAST_HOUR: u16 = 17;

/// Longest search query kept by the course list filter.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;
