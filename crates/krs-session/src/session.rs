//! # Registration Session
//!
//! Owns the current selection values for one logged-in student and routes
//! UI events through krs-core.
//!
//! ## Session Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       RegistrationSession                               │
//! │                                                                         │
//! │   catalog (read-only)          mode: Committed | WhatIf (shared)        │
//! │                                                                         │
//! │   ┌───────────────────────────┐     ┌───────────────────────────┐       │
//! │   │ Regular ("Pemrograman KRS")│     │ ShortTerm ("KRS Sela")    │       │
//! │   │ SectionSelection           │     │ CourseSelection           │       │
//! │   │ select_with_section()      │     │ toggle()                  │       │
//! │   │ cost hidden                │     │ cost shown                │       │
//! │   │ SubmissionWorkflow         │     │ SubmissionWorkflow        │       │
//! │   └─────────────┬─────────────┘     └─────────────┬─────────────┘       │
//! │                 └────────────── CommitSink ◄──────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Event Cycle
//! Every call replaces at most one selection value, then returns a fresh
//! [`ContextView`] computed from that single value. Nothing is mutated in
//! place, so a view handed to the UI never changes under it.
//!
//! ## Thread Safety
//! [`SessionHandle`] wraps the session in `Arc<Mutex<T>>`. The post-submit
//! reset timer runs on tokio and takes the same lock when it fires.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use krs_core::aggregate::{AggregateCalculator, AggregateSnapshot, CostVisibility};
use krs_core::catalog::{Catalog, CatalogProvider};
use krs_core::conflict::{self, ConflictPair, GridSpec, Timetable};
use krs_core::error::RegistrationResult;
use krs_core::selection::{Selectable, Selection};
use krs_core::workflow::{CommitRecord, SubmissionWorkflow, WorkflowStage};
use krs_core::{Course, Mode, SectionCode, SelectionEntry, TimeSlot, Weekday};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::ledger::{CommitSink, Ledger};

// =============================================================================
// Context Kind
// =============================================================================

/// The two registration pages a student can work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// Regular-term registration: course plus class section, no fees shown.
    Regular,
    /// Short-term (between semesters) registration: plain toggle, fees shown.
    ShortTerm,
}

impl ContextKind {
    pub const ALL: [ContextKind; 2] = [ContextKind::Regular, ContextKind::ShortTerm];

    /// Page heading.
    pub fn title(&self) -> &'static str {
        match self {
            ContextKind::Regular => "Pemrograman KRS",
            ContextKind::ShortTerm => "KRS Sela/Antara",
        }
    }

    pub fn cost_visibility(&self) -> CostVisibility {
        match self {
            ContextKind::Regular => CostVisibility::Hidden,
            ContextKind::ShortTerm => CostVisibility::Shown,
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Regular => write!(f, "regular"),
            ContextKind::ShortTerm => write!(f, "short-term"),
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The login collaborator. Credentials are its business; the session only
/// asks whether the user got through.
pub trait Identity {
    fn is_authenticated(&self) -> bool;
}

impl Identity for bool {
    fn is_authenticated(&self) -> bool {
        *self
    }
}

// =============================================================================
// Views
// =============================================================================

/// One selected course as the selected-courses table shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCourse {
    pub course: Course,
    pub section: Option<SectionCode>,
}

/// Everything the UI re-renders after a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextView {
    pub context: ContextKind,
    pub title: &'static str,
    pub mode: Mode,
    pub stage: WorkflowStage,
    pub terms_accepted: bool,
    pub selected: Vec<SelectedCourse>,
    pub snapshot: AggregateSnapshot,
    pub cost_visibility: CostVisibility,
    pub has_conflict: bool,
}

impl ContextView {
    pub fn is_selected(&self, course_id: &str) -> bool {
        self.selected.iter().any(|s| s.course.id == course_id)
    }
}

/// Result of a successful confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    /// Toast text ("KRS submitted" / "KRS simulation saved").
    pub message: &'static str,
    pub record: CommitRecord,
    pub view: ContextView,
}

// =============================================================================
// Registration Context
// =============================================================================

/// One selection value plus the workflow that guards it.
#[derive(Debug, Clone)]
struct Context<E> {
    kind: ContextKind,
    selection: Selection<E>,
    workflow: SubmissionWorkflow,
}

impl<E: Selectable> Context<E> {
    fn new(kind: ContextKind) -> Self {
        Context {
            kind,
            selection: Selection::new(),
            workflow: SubmissionWorkflow::new(),
        }
    }
}

/// Flavor-independent access to a context.
trait ContextState: Send {
    fn kind(&self) -> ContextKind;
    fn workflow(&self) -> &SubmissionWorkflow;
    fn workflow_mut(&mut self) -> &mut SubmissionWorkflow;
    fn snapshot(&self, calculator: &AggregateCalculator) -> AggregateSnapshot;
    fn remove(&mut self, course_id: &str);
    fn finish(
        &mut self,
        snapshot: &AggregateSnapshot,
        committed_at: DateTime<Utc>,
    ) -> RegistrationResult<CommitRecord>;
    fn selected(&self) -> Vec<SelectedCourse>;
    fn has_conflict(&self) -> bool;
    fn conflicting_pairs(&self) -> Vec<ConflictPair>;
    fn timetable(&self, spec: &GridSpec) -> Timetable;
    fn occupants_at(&self, day: Weekday, bucket: &TimeSlot) -> Vec<&Course>;
}

impl<E: Selectable + Send> ContextState for Context<E> {
    fn kind(&self) -> ContextKind {
        self.kind
    }

    fn workflow(&self) -> &SubmissionWorkflow {
        &self.workflow
    }

    fn workflow_mut(&mut self) -> &mut SubmissionWorkflow {
        &mut self.workflow
    }

    fn snapshot(&self, calculator: &AggregateCalculator) -> AggregateSnapshot {
        calculator.snapshot(&self.selection, self.kind.cost_visibility())
    }

    fn remove(&mut self, course_id: &str) {
        self.selection = self.selection.remove(course_id);
    }

    fn finish(
        &mut self,
        snapshot: &AggregateSnapshot,
        committed_at: DateTime<Utc>,
    ) -> RegistrationResult<CommitRecord> {
        self.workflow.finish(&self.selection, snapshot, committed_at)
    }

    fn selected(&self) -> Vec<SelectedCourse> {
        self.selection
            .entries()
            .iter()
            .map(|entry| SelectedCourse {
                course: entry.course().clone(),
                section: entry.section(),
            })
            .collect()
    }

    fn has_conflict(&self) -> bool {
        conflict::has_conflict(&self.selection)
    }

    fn conflicting_pairs(&self) -> Vec<ConflictPair> {
        conflict::conflicting_pairs(&self.selection)
    }

    fn timetable(&self, spec: &GridSpec) -> Timetable {
        Timetable::build(&self.selection, spec)
    }

    fn occupants_at(&self, day: Weekday, bucket: &TimeSlot) -> Vec<&Course> {
        conflict::occupants_at(&self.selection, day, bucket)
    }
}

// =============================================================================
// Registration Session
// =============================================================================

/// One student's registration session.
///
/// Starts signed out; every operation except [`authenticate`](Self::authenticate)
/// is refused with `NotAuthenticated` until the identity collaborator admits
/// the user.
pub struct RegistrationSession<S: CommitSink = Ledger> {
    catalog: Catalog,
    authenticated: bool,
    mode: Mode,
    regular: Context<SelectionEntry>,
    short_term: Context<Course>,
    calculator: AggregateCalculator,
    grid: GridSpec,
    sink: S,
}

impl RegistrationSession<Ledger> {
    /// Session with an in-memory ledger.
    pub fn with_ledger(catalog: Catalog, config: &SessionConfig) -> Self {
        RegistrationSession::new(catalog, config, Ledger::new())
    }
}

impl<S: CommitSink> RegistrationSession<S> {
    pub fn new(catalog: Catalog, config: &SessionConfig, sink: S) -> Self {
        info!(
            courses = catalog.len(),
            max_credits = config.registration.max_credits,
            mode = %config.registration.start_mode,
            "Registration session created"
        );

        RegistrationSession {
            catalog,
            authenticated: false,
            mode: config.registration.start_mode,
            regular: Context::new(ContextKind::Regular),
            short_term: Context::new(ContextKind::ShortTerm),
            calculator: AggregateCalculator::new(config.registration.max_credits),
            grid: config.grid_spec(),
            sink,
        }
    }

    // =========================================================================
    // Identity Gate
    // =========================================================================

    /// Asks the identity collaborator whether the user may proceed.
    pub fn authenticate(&mut self, identity: &dyn Identity) -> SessionResult<()> {
        self.authenticated = identity.is_authenticated();
        if !self.authenticated {
            warn!("Authentication refused");
            return Err(SessionError::NotAuthenticated);
        }
        info!("Session authenticated");
        Ok(())
    }

    pub fn sign_out(&mut self) {
        self.authenticated = false;
        info!("Session signed out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn ensure_authenticated(&self) -> SessionResult<()> {
        if self.authenticated {
            Ok(())
        } else {
            Err(SessionError::NotAuthenticated)
        }
    }

    fn ensure_editable(&self, kind: ContextKind) -> SessionResult<()> {
        self.ensure_authenticated()?;
        let stage = self.context(kind).workflow().stage();
        if stage != WorkflowStage::Editing {
            return Err(SessionError::SelectionLocked {
                context: kind,
                stage,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    fn context(&self, kind: ContextKind) -> &dyn ContextState {
        match kind {
            ContextKind::Regular => &self.regular,
            ContextKind::ShortTerm => &self.short_term,
        }
    }

    fn context_mut(&mut self, kind: ContextKind) -> &mut dyn ContextState {
        match kind {
            ContextKind::Regular => &mut self.regular,
            ContextKind::ShortTerm => &mut self.short_term,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn grid_spec(&self) -> GridSpec {
        self.grid
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn stage(&self, kind: ContextKind) -> WorkflowStage {
        self.context(kind).workflow().stage()
    }

    /// Current state of `kind`, freshly computed.
    pub fn view(&self, kind: ContextKind) -> SessionResult<ContextView> {
        self.ensure_authenticated()?;
        Ok(self.build_view(kind))
    }

    fn build_view(&self, kind: ContextKind) -> ContextView {
        let ctx = self.context(kind);
        let workflow = ctx.workflow();
        ContextView {
            context: kind,
            title: kind.title(),
            mode: self.mode,
            stage: workflow.stage(),
            terms_accepted: workflow.terms_accepted(),
            selected: ctx.selected(),
            snapshot: ctx.snapshot(&self.calculator),
            cost_visibility: kind.cost_visibility(),
            has_conflict: ctx.has_conflict(),
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn courses(&self) -> SessionResult<&[Course]> {
        self.ensure_authenticated()?;
        Ok(self.catalog.list_courses())
    }

    pub fn search(&self, query: &str) -> SessionResult<Vec<&Course>> {
        self.ensure_authenticated()?;
        Ok(self.catalog.search(query))
    }

    fn lookup(&self, course_id: &str) -> SessionResult<Course> {
        self.catalog
            .course(course_id)
            .cloned()
            .ok_or_else(|| SessionError::CourseNotFound(course_id.to_string()))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Short-term "Pilih": adds the course, or removes it if already chosen.
    pub fn toggle(&mut self, course_id: &str) -> SessionResult<ContextView> {
        self.ensure_editable(ContextKind::ShortTerm)?;
        let course = self.lookup(course_id)?;

        self.short_term.selection = self.short_term.selection.toggle(&course);
        debug!(
            course = %course.code,
            selected = self.short_term.selection.contains(course_id),
            "Short-term selection toggled"
        );
        Ok(self.build_view(ContextKind::ShortTerm))
    }

    /// Regular "Pilih Kelas": adds the course in `section`. A course that is
    /// already selected is left as it is.
    pub fn select_with_section(
        &mut self,
        course_id: &str,
        section: SectionCode,
    ) -> SessionResult<ContextView> {
        self.ensure_editable(ContextKind::Regular)?;
        let course = self.lookup(course_id)?;

        let current = &self.regular.selection;
        if current.contains(course_id) {
            debug!(course = %course.code, "Course already selected, ignoring");
        } else {
            self.regular.selection = current.select_with_section(&course, section);
            debug!(course = %course.code, %section, "Course selected");
        }
        Ok(self.build_view(ContextKind::Regular))
    }

    /// Removes a course from either context. Unknown ids are a no-op.
    pub fn remove(&mut self, kind: ContextKind, course_id: &str) -> SessionResult<ContextView> {
        self.ensure_editable(kind)?;
        self.context_mut(kind).remove(course_id);
        debug!(context = %kind, course_id, "Course removed");
        Ok(self.build_view(kind))
    }

    // =========================================================================
    // Mode
    // =========================================================================

    /// Switches between committed and what-if mode.
    ///
    /// Refused while either context has a submission open, so a review
    /// always finishes in the mode it was opened with.
    pub fn set_mode(&mut self, mode: Mode) -> SessionResult<Mode> {
        self.ensure_authenticated()?;
        for kind in ContextKind::ALL {
            let stage = self.stage(kind);
            if stage != WorkflowStage::Editing {
                return Err(SessionError::ModeLocked {
                    context: kind,
                    stage,
                });
            }
        }

        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "Mode changed");
            self.mode = mode;
        }
        Ok(self.mode)
    }

    pub fn toggle_mode(&mut self) -> SessionResult<Mode> {
        self.set_mode(self.mode.toggled())
    }

    // =========================================================================
    // Submission Workflow
    // =========================================================================

    /// "Ajukan KRS": opens the review dialog if the selection qualifies.
    pub fn open_review(&mut self, kind: ContextKind) -> SessionResult<ContextView> {
        self.ensure_authenticated()?;
        let mode = self.mode;
        let snapshot = self.context(kind).snapshot(&self.calculator);

        if let Err(e) = self.context_mut(kind).workflow_mut().open_review(&snapshot, mode) {
            debug!(context = %kind, code = e.code(), "Review refused");
            return Err(e.into());
        }

        info!(
            context = %kind,
            %mode,
            credits = snapshot.total_credits,
            courses = snapshot.course_count,
            "Review opened"
        );
        Ok(self.build_view(kind))
    }

    pub fn set_terms_accepted(
        &mut self,
        kind: ContextKind,
        accepted: bool,
    ) -> SessionResult<ContextView> {
        self.ensure_authenticated()?;
        self.context_mut(kind)
            .workflow_mut()
            .set_terms_accepted(accepted)?;
        Ok(self.build_view(kind))
    }

    /// Closes the review dialog without submitting.
    pub fn cancel(&mut self, kind: ContextKind) -> SessionResult<ContextView> {
        self.ensure_authenticated()?;
        self.context_mut(kind).workflow_mut().cancel()?;
        debug!(context = %kind, "Review cancelled");
        Ok(self.build_view(kind))
    }

    /// "Konfirmasi": commits the selection and hands the record to the sink.
    ///
    /// On success the context sits in `Success` until [`auto_reset`](Self::auto_reset)
    /// runs. [`SessionHandle::confirm`] schedules that automatically.
    pub fn confirm(&mut self, kind: ContextKind) -> SessionResult<SubmitReceipt> {
        self.confirm_at(kind, Utc::now())
    }

    /// [`confirm`](Self::confirm) with an explicit commit timestamp.
    pub fn confirm_at(
        &mut self,
        kind: ContextKind,
        committed_at: DateTime<Utc>,
    ) -> SessionResult<SubmitReceipt> {
        self.ensure_authenticated()?;
        let snapshot = self.context(kind).snapshot(&self.calculator);

        let ctx = self.context_mut(kind);
        ctx.workflow_mut().confirm()?;
        let record = ctx.finish(&snapshot, committed_at)?;

        self.sink.record(kind, record.clone());

        Ok(SubmitReceipt {
            message: record.success_message(),
            record,
            view: self.build_view(kind),
        })
    }

    /// Success → Editing. The selection stays as submitted.
    pub fn auto_reset(&mut self, kind: ContextKind) -> SessionResult<ContextView> {
        self.context_mut(kind).workflow_mut().auto_reset()?;
        debug!(context = %kind, "Returned to editing");
        Ok(self.build_view(kind))
    }

    // =========================================================================
    // Timetable
    // =========================================================================

    pub fn timetable(&self, kind: ContextKind) -> SessionResult<Timetable> {
        self.ensure_authenticated()?;
        Ok(self.context(kind).timetable(&self.grid))
    }

    pub fn has_conflict(&self, kind: ContextKind) -> SessionResult<bool> {
        self.ensure_authenticated()?;
        Ok(self.context(kind).has_conflict())
    }

    pub fn conflicting_pairs(&self, kind: ContextKind) -> SessionResult<Vec<ConflictPair>> {
        self.ensure_authenticated()?;
        Ok(self.context(kind).conflicting_pairs())
    }

    /// Courses of `kind` meeting on `day` during `bucket`.
    pub fn occupants_at(
        &self,
        kind: ContextKind,
        day: Weekday,
        bucket: &TimeSlot,
    ) -> SessionResult<Vec<&Course>> {
        self.ensure_authenticated()?;
        Ok(self.context(kind).occupants_at(day, bucket))
    }
}

// =============================================================================
// Session Handle
// =============================================================================

/// Shared, lockable session plus the reset timer.
///
/// ## Usage
/// ```rust,ignore
/// let handle = SessionHandle::new(session, config.reset_delay());
/// let view = handle.with_session_mut(|s| s.toggle("3"))?;
/// let receipt = handle.confirm(ContextKind::ShortTerm)?; // inside a tokio runtime
/// ```
pub struct SessionHandle<S: CommitSink = Ledger> {
    session: Arc<Mutex<RegistrationSession<S>>>,
    reset_delay: Duration,
}

impl<S: CommitSink> Clone for SessionHandle<S> {
    fn clone(&self) -> Self {
        SessionHandle {
            session: Arc::clone(&self.session),
            reset_delay: self.reset_delay,
        }
    }
}

impl<S: CommitSink + 'static> SessionHandle<S> {
    pub fn new(session: RegistrationSession<S>, reset_delay: Duration) -> Self {
        SessionHandle {
            session: Arc::new(Mutex::new(session)),
            reset_delay,
        }
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RegistrationSession<S>) -> R,
    {
        let session = self.session.lock().expect("Session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut RegistrationSession<S>) -> R,
    {
        let mut session = self.session.lock().expect("Session mutex poisoned");
        f(&mut session)
    }

    /// Confirms and schedules the return to editing after the reset delay.
    ///
    /// Outside a tokio runtime nothing is submitted and
    /// [`SessionError::NoRuntime`] is returned.
    pub fn confirm(&self, kind: ContextKind) -> SessionResult<SubmitReceipt> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let receipt = self.with_session_mut(|s| s.confirm(kind))?;
        self.schedule_reset(&runtime, kind);
        Ok(receipt)
    }

    fn schedule_reset(&self, runtime: &Handle, kind: ContextKind) -> JoinHandle<()> {
        let session = Arc::clone(&self.session);
        let delay = self.reset_delay;
        debug!(context = %kind, delay_ms = delay.as_millis() as u64, "Reset scheduled");

        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let mut session = session.lock().expect("Session mutex poisoned");
            if let Err(e) = session.auto_reset(kind) {
                warn!(context = %kind, error = %e, "Scheduled reset skipped");
            }
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use krs_core::RegistrationError;

    fn session_with(config: &SessionConfig) -> RegistrationSession {
        let mut session = RegistrationSession::with_ledger(Catalog::builtin(), config);
        session.authenticate(&true).unwrap();
        session
    }

    fn session() -> RegistrationSession {
        session_with(&SessionConfig::default())
    }

    fn submit(session: &mut RegistrationSession, kind: ContextKind) -> SubmitReceipt {
        session.open_review(kind).unwrap();
        session.set_terms_accepted(kind, true).unwrap();
        session.confirm(kind).unwrap()
    }

    #[test]
    fn test_gate_before_login() {
        let mut session =
            RegistrationSession::with_ledger(Catalog::builtin(), &SessionConfig::default());

        assert!(matches!(session.toggle("1"), Err(SessionError::NotAuthenticated)));
        assert!(matches!(session.courses(), Err(SessionError::NotAuthenticated)));
        assert!(matches!(
            session.authenticate(&false),
            Err(SessionError::NotAuthenticated)
        ));

        session.authenticate(&true).unwrap();
        assert_eq!(session.courses().unwrap().len(), 8);

        session.sign_out();
        assert!(session.view(ContextKind::Regular).is_err());
    }

    #[test]
    fn test_short_term_toggle_shows_cost() {
        let mut session = session();
        let view = session.toggle("1").unwrap();
        let view2 = session.toggle("2").unwrap();

        assert!(view.is_selected("1"));
        assert_eq!(view.snapshot.total_credits, 3);
        assert_eq!(view2.snapshot.total_credits, 7);
        assert_eq!(view2.snapshot.total_cost.rupiah(), 1_050_000);
        assert_eq!(view2.cost_visibility, CostVisibility::Shown);

        let view3 = session.toggle("1").unwrap();
        assert!(!view3.is_selected("1"));
        // Earlier views are values and do not change
        assert!(view.is_selected("1"));
    }

    #[test]
    fn test_regular_sections_hide_cost() {
        let mut session = session();
        session.select_with_section("2", SectionCode::B).unwrap();
        let view = session.select_with_section("2", SectionCode::D).unwrap();

        assert_eq!(view.selected.len(), 1);
        assert_eq!(view.selected[0].section, Some(SectionCode::B));
        assert!(view.snapshot.total_cost.is_zero());
        assert_eq!(view.title, "Pemrograman KRS");
    }

    #[test]
    fn test_unknown_course() {
        let mut session = session();
        assert!(matches!(
            session.toggle("99"),
            Err(SessionError::CourseNotFound(_))
        ));
        // Removing an unknown id is not an error
        assert!(session.remove(ContextKind::Regular, "99").is_ok());
    }

    #[test]
    fn test_contexts_are_independent() {
        let mut session = session();
        session.toggle("1").unwrap();
        session.select_with_section("5", SectionCode::A).unwrap();

        let short = session.view(ContextKind::ShortTerm).unwrap();
        let regular = session.view(ContextKind::Regular).unwrap();
        assert!(short.is_selected("1") && !short.is_selected("5"));
        assert!(regular.is_selected("5") && !regular.is_selected("1"));
    }

    #[test]
    fn test_selection_locked_during_review() {
        let mut session = session();
        session.toggle("1").unwrap();
        session.open_review(ContextKind::ShortTerm).unwrap();

        assert!(matches!(
            session.toggle("2"),
            Err(SessionError::SelectionLocked {
                context: ContextKind::ShortTerm,
                stage: WorkflowStage::ReviewPending
            })
        ));
        // The other context is still editable
        assert!(session.select_with_section("2", SectionCode::A).is_ok());

        let view = session.cancel(ContextKind::ShortTerm).unwrap();
        assert_eq!(view.stage, WorkflowStage::Editing);
        assert!(view.is_selected("1"));
        assert!(session.toggle("2").is_ok());
    }

    #[test]
    fn test_review_guards() {
        let mut session = session();
        let err = session.open_review(ContextKind::Regular).unwrap_err();
        assert_eq!(err.code(), "EMPTY_SELECTION");

        for id in ["1", "2", "3", "4", "5", "6", "7", "8"] {
            session.toggle(id).unwrap();
        }
        assert!(matches!(
            session.open_review(ContextKind::ShortTerm),
            Err(SessionError::Registration(RegistrationError::CreditLimitExceeded {
                total: 27,
                max: 24
            }))
        ));
        assert_eq!(session.stage(ContextKind::ShortTerm), WorkflowStage::Editing);
    }

    #[test]
    fn test_configured_credit_cap() {
        let mut config = SessionConfig::default();
        config.registration.max_credits = 6;
        let mut session = session_with(&config);

        session.toggle("1").unwrap();
        let view = session.toggle("2").unwrap();
        assert!(view.snapshot.over_limit);
        assert_eq!(view.snapshot.credit_label(), "7/6 SKS");
        assert!(session.open_review(ContextKind::ShortTerm).is_err());
    }

    #[test]
    fn test_confirm_requires_terms() {
        let mut session = session();
        session.toggle("1").unwrap();
        session.open_review(ContextKind::ShortTerm).unwrap();

        let err = session.confirm(ContextKind::ShortTerm).unwrap_err();
        assert_eq!(err.code(), "TERMS_NOT_ACCEPTED");
        assert_eq!(session.stage(ContextKind::ShortTerm), WorkflowStage::ReviewPending);
        assert!(session.sink().submitted(ContextKind::ShortTerm).is_none());
    }

    #[test]
    fn test_committed_submission_reaches_ledger() {
        let mut session = session();
        session.select_with_section("1", SectionCode::A).unwrap();
        session.select_with_section("4", SectionCode::C).unwrap();

        let receipt = submit(&mut session, ContextKind::Regular);
        assert_eq!(receipt.message, "KRS submitted");
        assert_eq!(receipt.view.stage, WorkflowStage::Success);
        assert_eq!(receipt.record.total_credits, 6);

        let stored = session.sink().submitted(ContextKind::Regular).unwrap();
        assert_eq!(stored.id, receipt.record.id);
        assert_eq!(stored.entries[1].section, Some(SectionCode::C));

        // Locked until the reset fires
        assert!(session.remove(ContextKind::Regular, "1").is_err());

        let view = session.auto_reset(ContextKind::Regular).unwrap();
        assert_eq!(view.stage, WorkflowStage::Editing);
        assert!(!view.terms_accepted);
        assert_eq!(view.selected.len(), 2);
    }

    #[test]
    fn test_what_if_submission_is_discardable() {
        let mut session = session();
        session.set_mode(Mode::WhatIf).unwrap();
        session.toggle("3").unwrap();

        let receipt = submit(&mut session, ContextKind::ShortTerm);
        assert_eq!(receipt.message, "KRS simulation saved");
        assert_eq!(receipt.record.mode, Mode::WhatIf);
        assert!(session.sink().submitted(ContextKind::ShortTerm).is_none());
        assert_eq!(session.sink().simulations().len(), 1);

        assert_eq!(session.sink_mut().discard_simulations(ContextKind::ShortTerm), 1);
        assert!(session.sink().simulations().is_empty());
    }

    #[test]
    fn test_mode_locked_while_review_open() {
        let mut session = session();
        session.toggle("1").unwrap();
        session.open_review(ContextKind::ShortTerm).unwrap();

        assert!(matches!(
            session.toggle_mode(),
            Err(SessionError::ModeLocked {
                context: ContextKind::ShortTerm,
                ..
            })
        ));
        assert_eq!(session.mode(), Mode::Committed);

        // Review carries the mode it was opened with
        session.set_terms_accepted(ContextKind::ShortTerm, true).unwrap();
        let receipt = session.confirm(ContextKind::ShortTerm).unwrap();
        assert_eq!(receipt.record.mode, Mode::Committed);

        session.auto_reset(ContextKind::ShortTerm).unwrap();
        assert_eq!(session.toggle_mode().unwrap(), Mode::WhatIf);
    }

    #[test]
    fn test_timetable_and_occupants() {
        let mut session = session();
        // IF-101 Senin 08:00-10:30, IF-302 Senin 13:00-15:30
        session.toggle("1").unwrap();
        session.toggle("6").unwrap();

        let grid = session.timetable(ContextKind::ShortTerm).unwrap();
        assert_eq!(grid.rows.len(), 10);
        assert!(!grid.has_conflict);
        assert!(!session.has_conflict(ContextKind::ShortTerm).unwrap());
        assert!(session.conflicting_pairs(ContextKind::ShortTerm).unwrap().is_empty());

        let bucket = TimeSlot::hour_bucket(Weekday::Mon, 14);
        let at = session
            .occupants_at(ContextKind::ShortTerm, Weekday::Mon, &bucket)
            .unwrap();
        assert_eq!(at.len(), 1);
        assert_eq!(at[0].code, "IF-302");
    }

    #[test]
    fn test_search_through_session() {
        let session = session();
        assert_eq!(session.search("").unwrap().len(), 8);
        assert!(!session.search("senin").unwrap().is_empty());
    }

    // =========================================================================
    // Reset Timer
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_handle_resets_after_delay() {
        let handle = SessionHandle::new(session(), Duration::from_millis(2000));
        handle.with_session_mut(|s| s.toggle("2")).unwrap();
        handle
            .with_session_mut(|s| {
                s.open_review(ContextKind::ShortTerm)?;
                s.set_terms_accepted(ContextKind::ShortTerm, true)
            })
            .unwrap();

        let receipt = handle.confirm(ContextKind::ShortTerm).unwrap();
        assert_eq!(receipt.view.stage, WorkflowStage::Success);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(
            handle.with_session(|s| s.stage(ContextKind::ShortTerm)),
            WorkflowStage::Success
        );
        assert!(handle.with_session_mut(|s| s.toggle("3")).is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        let view = handle
            .with_session(|s| s.view(ContextKind::ShortTerm))
            .unwrap();
        assert_eq!(view.stage, WorkflowStage::Editing);
        assert!(view.is_selected("2"));
    }

    #[test]
    fn test_confirm_without_runtime_submits_nothing() {
        let handle = SessionHandle::new(session(), Duration::from_millis(2000));
        handle.with_session_mut(|s| s.toggle("2")).unwrap();
        handle
            .with_session_mut(|s| {
                s.open_review(ContextKind::ShortTerm)?;
                s.set_terms_accepted(ContextKind::ShortTerm, true)
            })
            .unwrap();

        let err = handle.confirm(ContextKind::ShortTerm).unwrap_err();
        assert!(matches!(err, SessionError::NoRuntime));
        assert_eq!(err.code(), "NO_RUNTIME");

        let view = handle
            .with_session(|s| s.view(ContextKind::ShortTerm))
            .unwrap();
        assert_eq!(view.stage, WorkflowStage::ReviewPending);
        assert!(view.terms_accepted);
        assert!(handle
            .with_session(|s| s.sink().submitted(ContextKind::ShortTerm).is_none()));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let receipt = runtime
            .block_on(async { handle.confirm(ContextKind::ShortTerm) })
            .unwrap();
        assert_eq!(receipt.view.stage, WorkflowStage::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_confirm_schedules_nothing() {
        let handle = SessionHandle::new(session(), Duration::from_millis(500));
        handle.with_session_mut(|s| s.toggle("2")).unwrap();
        handle
            .with_session_mut(|s| s.open_review(ContextKind::ShortTerm))
            .unwrap();

        assert!(handle.confirm(ContextKind::ShortTerm).is_err());
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(
            handle.with_session(|s| s.stage(ContextKind::ShortTerm)),
            WorkflowStage::ReviewPending
        );
    }
}
