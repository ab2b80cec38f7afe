//! # Commit Ledger
//!
//! Where finished submissions go.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Committing ──finish──► CommitRecord ──► CommitSink::record()           │
//! │                                               │                         │
//! │                         ┌─────────────────────┴──────────────┐          │
//! │                         ▼                                    ▼          │
//! │               mode = committed                      mode = what_if      │
//! │        submitted[context] = record          simulations.push(record)    │
//! │        (replaces the previous one)          (discardable at any time)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The in-memory [`Ledger`] lives as long as the session. Anything durable
//! implements [`CommitSink`] itself.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use krs_core::workflow::CommitRecord;
use krs_core::Mode;

use crate::session::ContextKind;

/// Receiver of finalized submissions.
pub trait CommitSink: Send {
    fn record(&mut self, context: ContextKind, record: CommitRecord);
}

/// A stored simulation snapshot and the context it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationEntry {
    pub context: ContextKind,
    pub record: CommitRecord,
}

/// Session-lifetime commit storage.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    submitted: HashMap<ContextKind, CommitRecord>,
    simulations: Vec<SimulationEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current registration for `context`, if one was submitted.
    pub fn submitted(&self, context: ContextKind) -> Option<&CommitRecord> {
        self.submitted.get(&context)
    }

    /// All saved simulations, oldest first.
    pub fn simulations(&self) -> &[SimulationEntry] {
        &self.simulations
    }

    pub fn simulations_for(&self, context: ContextKind) -> impl Iterator<Item = &CommitRecord> {
        self.simulations
            .iter()
            .filter(move |entry| entry.context == context)
            .map(|entry| &entry.record)
    }

    /// Drops every simulation of `context`. Submitted registrations are
    /// never affected. Returns how many were dropped.
    pub fn discard_simulations(&mut self, context: ContextKind) -> usize {
        let before = self.simulations.len();
        self.simulations.retain(|entry| entry.context != context);
        let dropped = before - self.simulations.len();
        debug!(%context, dropped, "Simulations discarded");
        dropped
    }
}

impl CommitSink for Ledger {
    fn record(&mut self, context: ContextKind, record: CommitRecord) {
        match record.mode {
            Mode::Committed => {
                info!(
                    %context,
                    record_id = %record.id,
                    credits = record.total_credits,
                    courses = record.entries.len(),
                    "Registration submitted"
                );
                self.submitted.insert(context, record);
            }
            Mode::WhatIf => {
                info!(
                    %context,
                    record_id = %record.id,
                    credits = record.total_credits,
                    "Simulation saved"
                );
                self.simulations.push(SimulationEntry { context, record });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use krs_core::Money;

    fn record(mode: Mode, credits: u32) -> CommitRecord {
        CommitRecord {
            id: format!("rec-{}-{}", mode, credits),
            mode,
            entries: vec![],
            total_credits: credits,
            total_cost: Money::zero(),
            committed_at: Utc::now(),
        }
    }

    #[test]
    fn test_committed_replaces_previous() {
        let mut ledger = Ledger::new();
        ledger.record(ContextKind::Regular, record(Mode::Committed, 18));
        ledger.record(ContextKind::Regular, record(Mode::Committed, 21));

        assert_eq!(ledger.submitted(ContextKind::Regular).unwrap().total_credits, 21);
        assert!(ledger.submitted(ContextKind::ShortTerm).is_none());
        assert!(ledger.simulations().is_empty());
    }

    #[test]
    fn test_discarding_simulations_keeps_registration() {
        let mut ledger = Ledger::new();
        ledger.record(ContextKind::Regular, record(Mode::Committed, 18));
        ledger.record(ContextKind::Regular, record(Mode::WhatIf, 24));
        ledger.record(ContextKind::Regular, record(Mode::WhatIf, 12));
        ledger.record(ContextKind::ShortTerm, record(Mode::WhatIf, 6));

        assert_eq!(ledger.simulations_for(ContextKind::Regular).count(), 2);
        assert_eq!(ledger.discard_simulations(ContextKind::Regular), 2);

        assert_eq!(ledger.simulations().len(), 1);
        assert_eq!(ledger.simulations()[0].context, ContextKind::ShortTerm);
        assert_eq!(ledger.submitted(ContextKind::Regular).unwrap().total_credits, 18);
    }
}
