//! # Validation Module
//!
//! Integrity checks for catalog data and user input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Catalog load (THIS MODULE)                                   │
//! │  ├── Per course: names, credits, cost, time ranges, self-overlap       │
//! │  └── Across courses: unique id, unique code                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Selection values                                             │
//! │  └── At most one entry per course id                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Submission workflow guards                                   │
//! │  └── Empty selection, credit cap, terms accepted                       │
//! │                                                                         │
//! │  Once a catalog passes layer 1 the conflict detector can trust every   │
//! │  slot to satisfy start < end.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::CatalogError;
use crate::types::Course;
use crate::{MAX_COURSE_CREDITS, MAX_SEARCH_QUERY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, CatalogError>;

// =============================================================================
// Course Validators
// =============================================================================

/// Validates a single course.
///
/// ## Rules
/// - `id`, `code` and `name` must not be blank
/// - At least one credit, at most [`MAX_COURSE_CREDITS`]
/// - Cost is not negative
/// - Schedule is non-empty, every slot has `start < end`
/// - No two slots of the course overlap
pub fn validate_course(course: &Course) -> ValidationResult<()> {
    for (field, value) in [
        ("id", &course.id),
        ("code", &course.code),
        ("name", &course.name),
    ] {
        if value.trim().is_empty() {
            return Err(CatalogError::Required {
                field: field.to_string(),
            });
        }
    }

    if course.credits == 0 {
        return Err(CatalogError::ZeroCredits {
            course_code: course.code.clone(),
        });
    }

    if course.credits > MAX_COURSE_CREDITS {
        return Err(CatalogError::ExcessiveCredits {
            course_code: course.code.clone(),
            credits: course.credits,
            max: MAX_COURSE_CREDITS,
        });
    }

    if course.cost.is_negative() {
        return Err(CatalogError::NegativeCost {
            course_code: course.code.clone(),
        });
    }

    validate_schedule(course)
}

/// Validates the meeting list of a course.
fn validate_schedule(course: &Course) -> ValidationResult<()> {
    if course.schedule.is_empty() {
        return Err(CatalogError::EmptySchedule {
            course_code: course.code.clone(),
        });
    }

    if let Some(bad) = course.schedule.iter().find(|slot| !slot.is_well_formed()) {
        return Err(CatalogError::InvalidTimeRange {
            course_code: course.code.clone(),
            day: bad.day,
            start: crate::schedule::format_minutes(bad.start),
            end: crate::schedule::format_minutes(bad.end),
        });
    }

    for (i, a) in course.schedule.iter().enumerate() {
        if let Some(b) = course.schedule[i + 1..].iter().find(|b| a.overlaps(b)) {
            return Err(CatalogError::SelfOverlappingSchedule {
                course_code: course.code.clone(),
                day: b.day,
            });
        }
    }

    Ok(())
}

/// Validates a whole catalog: every course, then id/code uniqueness.
pub fn validate_catalog(courses: &[Course]) -> ValidationResult<()> {
    let mut ids = HashSet::with_capacity(courses.len());
    let mut codes = HashSet::with_capacity(courses.len());

    for course in courses {
        validate_course(course)?;

        if !ids.insert(course.id.as_str()) {
            return Err(CatalogError::DuplicateId(course.id.clone()));
        }
        // Codes are compared case-insensitively: "if-101" and "IF-101" are one course
        if !codes.insert(course.code.to_uppercase()) {
            return Err(CatalogError::DuplicateCode(course.code.clone()));
        }
    }

    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Normalizes a catalog search query.
///
/// ## Rules
/// - Can be empty (matches every course)
/// - Longer queries are cut to `MAX_SEARCH_QUERY_LEN` characters
///
/// ## Returns
/// The trimmed, lowercased query.
pub fn normalize_search_query(query: &str) -> String {
    query
        .trim()
        .chars()
        .take(MAX_SEARCH_QUERY_LEN)
        .collect::<String>()
        .to_lowercase()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::schedule::TimeSlot;
    use crate::types::{Difficulty, Weekday};

    fn course(id: &str, code: &str, slots: Vec<TimeSlot>) -> Course {
        Course {
            id: id.to_string(),
            code: code.to_string(),
            name: format!("Course {}", code),
            credits: 3,
            difficulty: Difficulty::Easy,
            prerequisites: vec![],
            schedule: slots,
            cost: Money::from_rupiah(450_000),
        }
    }

    fn monday(range: &str) -> TimeSlot {
        TimeSlot::parse(Weekday::Mon, range).unwrap()
    }

    #[test]
    fn test_valid_course() {
        assert!(validate_course(&course("1", "IF-101", vec![monday("08:00-10:30")])).is_ok());
    }

    #[test]
    fn test_reversed_slot_is_invalid_time_range() {
        let reversed = TimeSlot {
            day: Weekday::Mon,
            start: 630,
            end: 480,
        };
        let err = validate_course(&course("1", "IF-101", vec![reversed])).unwrap_err();
        match err {
            CatalogError::InvalidTimeRange {
                course_code,
                start,
                end,
                ..
            } => {
                assert_eq!(course_code, "IF-101");
                assert_eq!(start, "10:30");
                assert_eq!(end, "08:00");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_schedule() {
        let err = validate_course(&course("1", "IF-101", vec![])).unwrap_err();
        assert!(matches!(err, CatalogError::EmptySchedule { .. }));
    }

    #[test]
    fn test_self_overlap() {
        let c = course(
            "1",
            "IF-101",
            vec![monday("08:00-10:00"), monday("09:30-11:00")],
        );
        assert!(matches!(
            validate_course(&c),
            Err(CatalogError::SelfOverlappingSchedule { .. })
        ));

        // Two meetings on the same day that only touch are fine
        let c = course(
            "1",
            "IF-101",
            vec![monday("08:00-10:00"), monday("10:00-11:00")],
        );
        assert!(validate_course(&c).is_ok());
    }

    #[test]
    fn test_required_fields_and_numbers() {
        let mut c = course("1", "IF-101", vec![monday("08:00-10:30")]);
        c.name = "   ".to_string();
        assert!(matches!(validate_course(&c), Err(CatalogError::Required { .. })));

        let mut c = course("1", "IF-101", vec![monday("08:00-10:30")]);
        c.credits = 0;
        assert!(matches!(validate_course(&c), Err(CatalogError::ZeroCredits { .. })));

        let mut c = course("1", "IF-101", vec![monday("08:00-10:30")]);
        c.credits = MAX_COURSE_CREDITS;
        assert!(validate_course(&c).is_ok());
        c.credits = MAX_COURSE_CREDITS + 1;
        assert_eq!(
            validate_course(&c),
            Err(CatalogError::ExcessiveCredits {
                course_code: "IF-101".to_string(),
                credits: 25,
                max: 24,
            })
        );

        let mut c = course("1", "IF-101", vec![monday("08:00-10:30")]);
        c.cost = Money::from_rupiah(-1);
        assert!(matches!(validate_course(&c), Err(CatalogError::NegativeCost { .. })));
    }

    #[test]
    fn test_catalog_uniqueness() {
        let a = course("1", "IF-101", vec![monday("08:00-10:30")]);
        let same_id = course("1", "IF-102", vec![monday("08:00-10:30")]);
        let same_code = course("2", "if-101", vec![monday("08:00-10:30")]);

        assert!(validate_catalog(&[a.clone()]).is_ok());
        assert_eq!(
            validate_catalog(&[a.clone(), same_id]),
            Err(CatalogError::DuplicateId("1".to_string()))
        );
        assert_eq!(
            validate_catalog(&[a, same_code]),
            Err(CatalogError::DuplicateCode("if-101".to_string()))
        );
    }

    #[test]
    fn test_normalize_search_query() {
        assert_eq!(normalize_search_query("  Basis DATA "), "basis data");
        assert_eq!(normalize_search_query(""), "");
        assert_eq!(
            normalize_search_query(&"x".repeat(300)).len(),
            MAX_SEARCH_QUERY_LEN
        );
    }
}
