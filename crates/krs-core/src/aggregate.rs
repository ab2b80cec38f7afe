//! # Aggregate Calculator
//!
//! Derives the credit load and tuition of a selection and checks the cap.
//!
//! ## Where the Snapshot Goes
//! ```text
//! Selection ──► AggregateCalculator::snapshot() ──► AggregateSnapshot
//!                                                        │
//!                 ┌──────────────────────────────────────┼─────────────┐
//!                 ▼                                      ▼             ▼
//!        Footer "18/24 SKS"              SubmissionWorkflow     Review dialog
//!        (red when over limit)           open_review() guard    total cost
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::selection::{Selectable, Selection};
use crate::DEFAULT_MAX_CREDITS;

/// Whether tuition is part of this registration context.
///
/// Regular registration does not show fees, so its snapshot reports zero
/// cost and the UI hides the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CostVisibility {
    Shown,
    #[default]
    Hidden,
}

/// Totals for one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    pub total_credits: u32,
    pub total_cost: Money,
    pub course_count: usize,
    /// `total_credits > max_credits`
    pub over_limit: bool,
    /// The cap this snapshot was evaluated against.
    pub max_credits: u32,
}

impl AggregateSnapshot {
    /// Credits still available before the cap (0 when at or over it).
    pub fn remaining_credits(&self) -> u32 {
        self.max_credits.saturating_sub(self.total_credits)
    }

    /// `18/24 SKS`
    pub fn credit_label(&self) -> String {
        format!("{}/{} SKS", self.total_credits, self.max_credits)
    }

    pub fn is_empty(&self) -> bool {
        self.course_count == 0
    }
}

/// Computes snapshots against a fixed credit cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateCalculator {
    max_credits: u32,
}

impl Default for AggregateCalculator {
    fn default() -> Self {
        AggregateCalculator::new(DEFAULT_MAX_CREDITS)
    }
}

impl AggregateCalculator {
    pub fn new(max_credits: u32) -> Self {
        AggregateCalculator { max_credits }
    }

    pub fn max_credits(&self) -> u32 {
        self.max_credits
    }

    /// Sums credits and cost over the selection.
    ///
    /// Entries are unique by course id, so each course counts once.
    pub fn snapshot<E: Selectable>(
        &self,
        selection: &Selection<E>,
        visibility: CostVisibility,
    ) -> AggregateSnapshot {
        let total_credits = total_credits(selection);
        let total_cost = match visibility {
            CostVisibility::Shown => selection.courses().map(|c| c.cost).sum(),
            CostVisibility::Hidden => Money::zero(),
        };

        AggregateSnapshot {
            total_credits,
            total_cost,
            course_count: selection.len(),
            over_limit: total_credits > self.max_credits,
            max_credits: self.max_credits,
        }
    }
}

/// Sum of credits over the selected courses.
///
/// Saturates at `u32::MAX`, which is always over any cap.
pub fn total_credits<E: Selectable>(selection: &Selection<E>) -> u32 {
    selection
        .courses()
        .fold(0u32, |acc, c| acc.saturating_add(c.credits))
}

// =============================================================================
// Unit Tests
// =============================================================================
