//! # Course Catalog
//!
//! The read-only list of courses offered this term.
//!
//! ## Lifecycle
//! ```text
//! JSON file / built-in list
//!      │
//!      ▼
//! Catalog::new() ── validate_catalog() ──► CatalogError (rejected at load)
//!      │
//!      ▼
//! Catalog (immutable for the whole session)
//!      │
//!      ├── list_courses()   course list page
//!      ├── search("rabu")   search box
//!      └── get(id)          selection lookups
//! ```

use serde::Serialize;

use crate::error::CatalogResult;
use crate::money::Money;
use crate::schedule::TimeSlot;
use crate::types::{Course, Difficulty, Weekday};
use crate::validation::{normalize_search_query, validate_catalog};

// =============================================================================
// Catalog Provider
// =============================================================================

/// Source of the courses on offer.
///
/// The list is static for a session; implementors must return the same
/// courses, in the same order, on every call.
pub trait CatalogProvider {
    fn list_courses(&self) -> &[Course];

    /// Looks a course up by id.
    fn course(&self, id: &str) -> Option<&Course> {
        self.list_courses().iter().find(|c| c.id == id)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A validated, ordered set of courses.
///
/// ## Invariants
/// - Course ids and codes are unique
/// - Every schedule is non-empty, well-formed and free of self-overlap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    /// Builds a catalog, rejecting data that fails integrity checks.
    pub fn new(courses: Vec<Course>) -> CatalogResult<Self> {
        validate_catalog(&courses)?;
        Ok(Catalog { courses })
    }

    /// Parses a JSON array of courses.
    ///
    /// ## Example
    /// ```rust
    /// use krs_core::catalog::Catalog;
    ///
    /// let json = r#"[{
    ///     "id": "1", "code": "IF-101", "name": "Algoritma dan Pemrograman",
    ///     "credits": 3, "difficulty": "easy",
    ///     "schedule": [{ "day": "Senin", "time": "08:00-10:30" }],
    ///     "cost": 450000
    /// }]"#;
    /// let catalog = Catalog::from_json(json).unwrap();
    /// assert_eq!(catalog.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let courses: Vec<Course> = serde_json::from_str(json)?;
        Catalog::new(courses)
    }

    /// The informatics course offering used when no catalog file is given.
    pub fn builtin() -> Self {
        Catalog {
            courses: builtin_courses(),
        }
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Looks a course up by its code, ignoring case.
    pub fn find_by_code(&self, code: &str) -> Option<&Course> {
        self.courses
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
    }

    /// Filters courses for the search box.
    ///
    /// A course matches when the query is contained (case-insensitive) in its
    /// name, its code, a meeting day (English or Indonesian) or a meeting time
    /// label such as `08:00-10:30`. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Course> {
        let query = normalize_search_query(query);
        if query.is_empty() {
            return self.courses.iter().collect();
        }

        self.courses
            .iter()
            .filter(|course| {
                course.name.to_lowercase().contains(&query)
                    || course.code.to_lowercase().contains(&query)
                    || course.schedule.iter().any(|slot| {
                        slot.day.name_id().to_lowercase().contains(&query)
                            || slot.day.to_string().to_lowercase().contains(&query)
                            || slot.time_label().contains(&query)
                    })
            })
            .collect()
    }
}

impl CatalogProvider for Catalog {
    fn list_courses(&self) -> &[Course] {
        &self.courses
    }
}

// =============================================================================
// Built-in Offering
// =============================================================================

fn builtin_course(
    id: &str,
    code: &str,
    name: &str,
    credits: u32,
    difficulty: Difficulty,
    prerequisites: &[&str],
    slot: (Weekday, u16, u16),
    cost: i64,
) -> Course {
    let (day, start, end) = slot;
    Course {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        credits,
        difficulty,
        prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
        schedule: vec![TimeSlot { day, start, end }],
        cost: Money::from_rupiah(cost),
    }
}

/// Minutes helper for the table below.
const fn hm(hours: u16, minutes: u16) -> u16 {
    hours * 60 + minutes
}

/// Eight informatics courses, one weekly meeting each.
pub fn builtin_courses() -> Vec<Course> {
    use Difficulty::{Easy, Hard, Medium};
    use Weekday::{Fri, Mon, Thu, Tue, Wed};

    vec![
        builtin_course(
            "1",
            "IF-101",
            "Algoritma dan Pemrograman",
            3,
            Easy,
            &[],
            (Mon, hm(8, 0), hm(10, 30)),
            450_000,
        ),
        builtin_course(
            "2",
            "IF-102",
            "Basis Data",
            4,
            Medium,
            &["IF-101"],
            (Tue, hm(10, 0), hm(12, 30)),
            600_000,
        ),
        builtin_course(
            "3",
            "IF-201",
            "Struktur Data",
            3,
            Medium,
            &["IF-101"],
            (Wed, hm(8, 0), hm(10, 30)),
            450_000,
        ),
        builtin_course(
            "4",
            "IF-202",
            "Pemrograman Web",
            3,
            Easy,
            &["IF-101"],
            (Thu, hm(13, 0), hm(15, 30)),
            450_000,
        ),
        builtin_course(
            "5",
            "IF-301",
            "Kecerdasan Buatan",
            4,
            Hard,
            &["IF-101", "IF-201"],
            (Fri, hm(8, 0), hm(11, 0)),
            600_000,
        ),
        builtin_course(
            "6",
            "IF-302",
            "Sistem Operasi",
            3,
            Hard,
            &["IF-201"],
            (Mon, hm(13, 0), hm(15, 30)),
            450_000,
        ),
        builtin_course(
            "7",
            "IF-303",
            "Jaringan Komputer",
            3,
            Medium,
            &["IF-102"],
            (Tue, hm(13, 0), hm(15, 30)),
            450_000,
        ),
        builtin_course(
            "8",
            "IF-304",
            "Rekayasa Perangkat Lunak",
            4,
            Medium,
            &["IF-102", "IF-201"],
            (Wed, hm(13, 0), hm(16, 0)),
            600_000,
        ),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
