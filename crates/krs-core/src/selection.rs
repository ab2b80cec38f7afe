//! # Selection Store
//!
//! The courses a student currently holds selected, as an immutable value.
//!
//! ## Two Flavors, One Store
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Selection<E: Selectable>                             │
//! │                                                                         │
//! │  Selection<Course>               Selection<SelectionEntry>              │
//! │  ─────────────────               ─────────────────────────              │
//! │  Short-term registration         Regular registration                   │
//! │  "Pilih" toggles a course        "Pilih Kelas" adds course + section    │
//! │  toggle(course)                  select_with_section(course, section)   │
//! │                                                                         │
//! │  Shared: remove(id), contains(id), courses(), len()                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Value Semantics
//! Every operation returns a new `Selection`; the receiver is left as it was.
//! A caller holding the previous value keeps a consistent snapshot while the
//! next one is derived.
//!
//! ```rust
//! use krs_core::catalog::{Catalog, CatalogProvider};
//! use krs_core::selection::CourseSelection;
//!
//! let catalog = Catalog::builtin();
//! let course = &catalog.list_courses()[0];
//!
//! let empty = CourseSelection::new();
//! let one = empty.toggle(course);
//! assert_eq!(empty.len(), 0);
//! assert_eq!(one.len(), 1);
//! assert_eq!(one.toggle(course), empty);
//! ```

use serde::Serialize;

use crate::error::{RegistrationError, RegistrationResult};
use crate::types::{Course, SectionCode, SelectionEntry};

// =============================================================================
// Selectable
// =============================================================================

/// Anything that can sit in a selection: it must name exactly one course.
pub trait Selectable: Clone {
    fn course(&self) -> &Course;

    /// Section attached to the entry, if the flavor carries one.
    fn section(&self) -> Option<SectionCode> {
        None
    }

    fn course_id(&self) -> &str {
        &self.course().id
    }
}

impl Selectable for Course {
    fn course(&self) -> &Course {
        self
    }
}

impl Selectable for SelectionEntry {
    fn course(&self) -> &Course {
        &self.course
    }

    fn section(&self) -> Option<SectionCode> {
        Some(self.section)
    }
}

// =============================================================================
// Selection
// =============================================================================

/// An ordered set of entries, unique by course id.
///
/// ## Invariants
/// - No two entries share a course id
/// - Insertion order is preserved (the selected-courses table shows it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection<E> {
    entries: Vec<E>,
}

/// Plain course selection (short-term registration, simulations).
pub type CourseSelection = Selection<Course>;

/// Course + section selection (regular registration).
pub type SectionSelection = Selection<SelectionEntry>;

impl<E> Default for Selection<E> {
    fn default() -> Self {
        Selection {
            entries: Vec::new(),
        }
    }
}

impl<E: Selectable> Selection<E> {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.entries.iter().any(|e| e.course_id() == course_id)
    }

    pub fn get(&self, course_id: &str) -> Option<&E> {
        self.entries.iter().find(|e| e.course_id() == course_id)
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// The selected courses, in insertion order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> + '_ {
        self.entries.iter().map(Selectable::course)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an entry, refusing a course that is already present.
    ///
    /// ## Returns
    /// - `Ok(selection)` with the entry appended
    /// - `Err(DuplicateSelection)` if the course id is already selected
    pub fn try_insert(&self, entry: E) -> RegistrationResult<Self> {
        if self.contains(entry.course_id()) {
            return Err(RegistrationError::DuplicateSelection {
                course_code: entry.course().code.clone(),
            });
        }

        let mut entries = self.entries.clone();
        entries.push(entry);
        Ok(Selection { entries })
    }

    /// Adds an entry; a duplicate leaves the selection unchanged.
    pub fn insert(&self, entry: E) -> Self {
        self.try_insert(entry).unwrap_or_else(|_| self.clone())
    }

    /// Removes the entry for `course_id`. Unknown ids are a no-op.
    pub fn remove(&self, course_id: &str) -> Self {
        Selection {
            entries: self
                .entries
                .iter()
                .filter(|e| e.course_id() != course_id)
                .cloned()
                .collect(),
        }
    }

    /// Removes the entry if present, otherwise adds it.
    pub fn toggle_entry(&self, entry: E) -> Self {
        if self.contains(entry.course_id()) {
            self.remove(entry.course_id())
        } else {
            self.insert(entry)
        }
    }
}

impl CourseSelection {
    /// Adds `course` if absent, removes it if present.
    pub fn toggle(&self, course: &Course) -> Self {
        self.toggle_entry(course.clone())
    }
}

impl SectionSelection {
    /// Adds `course` in `section`. A course that is already selected (in any
    /// section) leaves the selection unchanged.
    pub fn select_with_section(&self, course: &Course, section: SectionCode) -> Self {
        self.insert(SelectionEntry::new(course.clone(), section))
    }

    /// Like [`select_with_section`](Self::select_with_section) but reports the
    /// duplicate instead of ignoring it.
    pub fn try_select_with_section(
        &self,
        course: &Course,
        section: SectionCode,
    ) -> RegistrationResult<Self> {
        self.try_insert(SelectionEntry::new(course.clone(), section))
    }

    /// Section chosen for `course_id`, if selected.
    pub fn section_of(&self, course_id: &str) -> Option<SectionCode> {
        self.get(course_id).map(|e| e.section)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
