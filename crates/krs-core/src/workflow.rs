//! # Submission Workflow
//!
//! The state machine between "editing a selection" and "submitted".
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌─────────┐  open_review   ┌───────────────┐  confirm  ┌───────────┐ │
//! │   │ Editing │ ─────────────► │ ReviewPending │ ────────► │Committing │ │
//! │   └─────────┘  count > 0 &&  └───────────────┘  terms    └─────┬─────┘ │
//! │        ▲       !over_limit          │           accepted       │       │
//! │        │                            │ cancel                   │finish │
//! │        ├────────────────────────────┘                          ▼       │
//! │        │                                                 ┌───────────┐ │
//! │        └──────────────── auto_reset (fixed delay) ────── │  Success  │ │
//! │                                                          └───────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Refused transitions return a [`RegistrationError`] and leave the workflow
//! exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::aggregate::AggregateSnapshot;
use crate::error::{RegistrationError, RegistrationResult};
use crate::money::Money;
use crate::selection::{Selectable, Selection};
use crate::types::{Mode, SectionCode};

// =============================================================================
// Workflow Stage
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    /// Selection may be changed.
    #[default]
    Editing,
    /// Review dialog is open, waiting for terms and confirmation.
    ReviewPending,
    /// Confirmed; the commit is being recorded.
    Committing,
    /// Recorded; showing the success screen until the reset fires.
    Success,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStage::Editing => write!(f, "editing"),
            WorkflowStage::ReviewPending => write!(f, "review pending"),
            WorkflowStage::Committing => write!(f, "committing"),
            WorkflowStage::Success => write!(f, "success"),
        }
    }
}

// =============================================================================
// Commit Record
// =============================================================================

/// One line of a finalized registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommitEntry {
    pub course_id: String,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub section: Option<SectionCode>,
    pub cost: Money,
}

/// What leaves the engine when a submission finishes.
///
/// In `Committed` mode this is the student's registration. In `WhatIf` mode
/// it is a simulation snapshot that can be dropped without touching the
/// registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub id: String,
    pub mode: Mode,
    pub entries: Vec<CommitEntry>,
    pub total_credits: u32,
    pub total_cost: Money,
    #[ts(as = "String")]
    pub committed_at: DateTime<Utc>,
}

impl CommitRecord {
    fn from_selection<E: Selectable>(
        mode: Mode,
        selection: &Selection<E>,
        snapshot: &AggregateSnapshot,
        committed_at: DateTime<Utc>,
    ) -> Self {
        let entries = selection
            .entries()
            .iter()
            .map(|entry| {
                let course = entry.course();
                CommitEntry {
                    course_id: course.id.clone(),
                    code: course.code.clone(),
                    name: course.name.clone(),
                    credits: course.credits,
                    section: entry.section(),
                    cost: course.cost,
                }
            })
            .collect();

        CommitRecord {
            id: Uuid::new_v4().to_string(),
            mode,
            entries,
            total_credits: snapshot.total_credits,
            total_cost: snapshot.total_cost,
            committed_at,
        }
    }

    /// Toast text shown once the record is stored.
    pub fn success_message(&self) -> &'static str {
        success_message(self.mode)
    }
}

/// Mode-dependent confirmation text.
pub fn success_message(mode: Mode) -> &'static str {
    match mode {
        Mode::WhatIf => "KRS simulation saved",
        Mode::Committed => "KRS submitted",
    }
}

// =============================================================================
// Submission Workflow
// =============================================================================

/// Gates review, agreement and commit for one registration context.
///
/// The mode is captured when the review opens and is the only mode the
/// finished record can carry: flipping the global mode switch afterwards
/// cannot turn a simulation into a registration mid-review.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionWorkflow {
    stage: WorkflowStage,
    terms_accepted: bool,
    review_mode: Option<Mode>,
}

impl SubmissionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    /// Mode of the submission in flight, if any.
    pub fn review_mode(&self) -> Option<Mode> {
        self.review_mode
    }

    pub fn is_editing(&self) -> bool {
        self.stage == WorkflowStage::Editing
    }

    fn expect_stage(&self, expected: WorkflowStage, action: &'static str) -> RegistrationResult<()> {
        if self.stage != expected {
            return Err(RegistrationError::InvalidTransition {
                stage: self.stage,
                action,
            });
        }
        Ok(())
    }

    /// Editing → ReviewPending.
    ///
    /// ## Guards
    /// - at least one course selected, else `EmptySelection`
    /// - not over the credit cap, else `CreditLimitExceeded`
    pub fn open_review(&mut self, snapshot: &AggregateSnapshot, mode: Mode) -> RegistrationResult<()> {
        self.expect_stage(WorkflowStage::Editing, "open review")?;

        if snapshot.course_count == 0 {
            return Err(RegistrationError::EmptySelection);
        }
        if snapshot.over_limit {
            return Err(RegistrationError::CreditLimitExceeded {
                total: snapshot.total_credits,
                max: snapshot.max_credits,
            });
        }

        self.stage = WorkflowStage::ReviewPending;
        self.terms_accepted = false;
        self.review_mode = Some(mode);
        Ok(())
    }

    /// Ticks or unticks the terms checkbox in the review dialog.
    pub fn set_terms_accepted(&mut self, accepted: bool) -> RegistrationResult<()> {
        self.expect_stage(WorkflowStage::ReviewPending, "change terms acceptance")?;
        self.terms_accepted = accepted;
        Ok(())
    }

    /// ReviewPending → Editing. The selection is not touched; the terms box
    /// must be ticked again on the next review.
    pub fn cancel(&mut self) -> RegistrationResult<()> {
        self.expect_stage(WorkflowStage::ReviewPending, "cancel")?;
        self.stage = WorkflowStage::Editing;
        self.terms_accepted = false;
        self.review_mode = None;
        Ok(())
    }

    /// ReviewPending → Committing, only once the terms are accepted.
    pub fn confirm(&mut self) -> RegistrationResult<()> {
        self.expect_stage(WorkflowStage::ReviewPending, "confirm")?;
        if !self.terms_accepted {
            return Err(RegistrationError::TermsNotAccepted);
        }
        self.stage = WorkflowStage::Committing;
        Ok(())
    }

    /// Committing → Success, producing the record for the commit sink.
    pub fn finish<E: Selectable>(
        &mut self,
        selection: &Selection<E>,
        snapshot: &AggregateSnapshot,
        committed_at: DateTime<Utc>,
    ) -> RegistrationResult<CommitRecord> {
        self.expect_stage(WorkflowStage::Committing, "finish")?;

        let mode = self.review_mode.unwrap_or_default();
        let record = CommitRecord::from_selection(mode, selection, snapshot, committed_at);

        self.stage = WorkflowStage::Success;
        Ok(record)
    }

    /// Success → Editing. Clears the terms flag; the selection stays as it is.
    pub fn auto_reset(&mut self) -> RegistrationResult<()> {
        self.expect_stage(WorkflowStage::Success, "reset")?;
        self.stage = WorkflowStage::Editing;
        self.terms_accepted = false;
        self.review_mode = None;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
