//! # Conflict Detector
//!
//! Finds schedule clashes in a selection and lays the selection out on the
//! weekly timetable grid.
//!
//! ## Timetable Grid
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Waktu        Senin      Selasa     Rabu       Kamis      Jumat         │
//! │  07:00-08:00  ·          ·          ·          ·          ·             │
//! │  08:00-09:00  IF-101     ·          IF-201     ·          IF-301        │
//! │  09:00-10:00  IF-101 ✗   ·          IF-201     ·          IF-301        │
//! │               IF-999                                                    │
//! │  ...                                                                    │
//! │  16:00-17:00  ·          ·          ·          ·          ·             │
//! │                                                                         │
//! │  ·  Free         one course  Scheduled         ✗  Conflicting           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Agreement with `has_conflict`
//! A cell is `Conflicting` only when two of its occupants really overlap
//! each other inside that hour. Two courses that merely share an hour
//! (08:00-08:30 and 08:30-09:30) make the cell `Scheduled`, not
//! `Conflicting`, so for schedules inside the grid hours
//! `has_conflict(selection) == timetable.has_conflicting_cell()`.
//! `has_conflict` stays authoritative for meetings outside the grid.

use serde::Serialize;
use ts_rs::TS;

use crate::schedule::{format_minutes, TimeSlot, HOURS_PER_DAY};
use crate::selection::{Selectable, Selection};
use crate::types::{Course, Weekday};
use crate::{GRID_FIRST_HOUR, GRID_LAST_HOUR};

// =============================================================================
// Pairwise Detection
// =============================================================================

/// Two selected courses that meet at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ConflictPair {
    pub first_code: String,
    pub second_code: String,
    /// The window both courses occupy.
    pub overlap: TimeSlot,
}

/// Returns true if any two selected courses overlap.
///
/// Two courses conflict when some meeting of one and some meeting of the
/// other fall on the same day with `s1 < e2 && s2 < e1`. Different days
/// never conflict. An empty selection has no conflict.
pub fn has_conflict<E: Selectable>(selection: &Selection<E>) -> bool {
    let courses: Vec<&Course> = selection.courses().collect();
    courses.iter().enumerate().any(|(i, a)| {
        courses[i + 1..]
            .iter()
            .any(|b| first_overlap(a, b).is_some())
    })
}

/// Lists every clashing pair, in selection order.
///
/// A pair meeting more than once in the same window is reported once per
/// overlapping meeting.
pub fn conflicting_pairs<E: Selectable>(selection: &Selection<E>) -> Vec<ConflictPair> {
    let courses: Vec<&Course> = selection.courses().collect();
    let mut pairs = Vec::new();

    for (i, a) in courses.iter().enumerate() {
        for b in &courses[i + 1..] {
            for slot_a in &a.schedule {
                for slot_b in &b.schedule {
                    if let Some(overlap) = slot_a.intersection(slot_b) {
                        pairs.push(ConflictPair {
                            first_code: a.code.clone(),
                            second_code: b.code.clone(),
                            overlap,
                        });
                    }
                }
            }
        }
    }

    pairs
}

fn first_overlap(a: &Course, b: &Course) -> Option<TimeSlot> {
    a.schedule
        .iter()
        .flat_map(|x| b.schedule.iter().map(move |y| (x, y)))
        .find_map(|(x, y)| x.intersection(y))
}

/// Courses with a meeting on `day` that overlaps `bucket`.
///
/// `bucket.day` is ignored in favour of `day`.
pub fn occupants_at<'a, E: Selectable>(
    selection: &'a Selection<E>,
    day: Weekday,
    bucket: &TimeSlot,
) -> Vec<&'a Course> {
    let window = TimeSlot { day, ..*bucket };
    selection
        .courses()
        .filter(|course| course.schedule.iter().any(|slot| slot.overlaps(&window)))
        .collect()
}

// =============================================================================
// Timetable Grid
// =============================================================================

/// Occupancy state of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Free,
    Scheduled,
    Conflicting,
}

/// Grid hours, `[first_hour, last_hour)` in one-hour buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSpec {
    pub first_hour: u16,
    pub last_hour: u16,
}

impl Default for GridSpec {
    /// 07:00 to 17:00, ten buckets.
    fn default() -> Self {
        GridSpec {
            first_hour: GRID_FIRST_HOUR,
            last_hour: GRID_LAST_HOUR,
        }
    }
}

impl GridSpec {
    /// Bucket start hours, top to bottom. Never runs past midnight.
    pub fn hours(&self) -> impl Iterator<Item = u16> {
        self.first_hour..self.last_hour.min(HOURS_PER_DAY)
    }

    pub fn bucket_count(&self) -> usize {
        self.last_hour
            .min(HOURS_PER_DAY)
            .saturating_sub(self.first_hour) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct TimetableCell {
    pub day: Weekday,
    pub state: CellState,
    /// Codes of the courses in this cell.
    pub occupants: Vec<String>,
}

/// One hour row across the five teaching days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct TimetableRow {
    /// `07:00-08:00`
    pub label: String,
    pub cells: Vec<TimetableCell>,
}

/// The weekly grid plus the global warning flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Timetable {
    pub rows: Vec<TimetableRow>,
    /// Drives the "Terdapat bentrok jadwal!" banner.
    pub has_conflict: bool,
}

impl Timetable {
    /// Lays `selection` out on the grid described by `spec`.
    pub fn build<E: Selectable>(selection: &Selection<E>, spec: &GridSpec) -> Self {
        let rows = spec
            .hours()
            .map(|hour| TimetableRow {
                label: format!("{}-{}", format_minutes(hour * 60), format_minutes((hour + 1) * 60)),
                cells: Weekday::ALL
                    .iter()
                    .map(|&day| build_cell(selection, TimeSlot::hour_bucket(day, hour)))
                    .collect(),
            })
            .collect();

        Timetable {
            rows,
            has_conflict: has_conflict(selection),
        }
    }

    /// True if any cell is `Conflicting`.
    pub fn has_conflicting_cell(&self) -> bool {
        self.cells().any(|cell| cell.state == CellState::Conflicting)
    }

    pub fn cells(&self) -> impl Iterator<Item = &TimetableCell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    /// Cell for `day` in the row starting at `hour`.
    pub fn cell(&self, day: Weekday, hour: u16, spec: &GridSpec) -> Option<&TimetableCell> {
        let row = hour.checked_sub(spec.first_hour)? as usize;
        self.rows.get(row)?.cells.get(day.index())
    }
}

fn build_cell<E: Selectable>(selection: &Selection<E>, bucket: TimeSlot) -> TimetableCell {
    let occupants = occupants_at(selection, bucket.day, &bucket);

    let state = match occupants.len() {
        0 => CellState::Free,
        1 => CellState::Scheduled,
        _ if clash_within(&occupants, &bucket) => CellState::Conflicting,
        _ => CellState::Scheduled,
    };

    TimetableCell {
        day: bucket.day,
        state,
        occupants: occupants.iter().map(|c| c.code.clone()).collect(),
    }
}

/// Two occupants whose meetings overlap each other inside `bucket`.
fn clash_within(occupants: &[&Course], bucket: &TimeSlot) -> bool {
    occupants.iter().enumerate().any(|(i, a)| {
        occupants[i + 1..].iter().any(|b| {
            a.schedule.iter().any(|x| {
                b.schedule.iter().any(|y| {
                    x.intersection(y)
                        .map_or(false, |shared| shared.overlaps(bucket))
                })
            })
        })
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::selection::CourseSelection;
    use crate::types::Difficulty;

    fn course(id: &str, slots: &[(Weekday, &str)]) -> Course {
        Course {
            id: id.to_string(),
            code: format!("MK-{}", id),
            name: format!("Course {}", id),
            credits: 3,
            difficulty: Difficulty::Medium,
            prerequisites: vec![],
            schedule: slots
                .iter()
                .map(|(day, range)| TimeSlot::parse(*day, range).unwrap())
                .collect(),
            cost: Money::zero(),
        }
    }

    fn select(courses: &[Course]) -> CourseSelection {
        courses
            .iter()
            .fold(CourseSelection::new(), |s, c| s.toggle(c))
    }

    #[test]
    fn test_empty_selection_has_no_conflict() {
        assert!(!has_conflict(&CourseSelection::new()));
        assert!(conflicting_pairs(&CourseSelection::new()).is_empty());
    }

    #[test]
    fn test_overlap_detected() {
        let a = course("1", &[(Weekday::Mon, "08:00-10:30")]);
        let b = course("2", &[(Weekday::Mon, "09:00-11:00")]);
        let sel = select(&[a, b]);

        assert!(has_conflict(&sel));
        let pairs = conflicting_pairs(&sel);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].first_code, "MK-1");
        assert_eq!(pairs[0].second_code, "MK-2");
        assert_eq!(pairs[0].overlap.time_label(), "09:00-10:30");
    }

    #[test]
    fn test_different_days_never_conflict() {
        let a = course("1", &[(Weekday::Mon, "08:00-10:30")]);
        let b = course("2", &[(Weekday::Tue, "08:00-10:30")]);
        assert!(!has_conflict(&select(&[a, b])));
    }

    #[test]
    fn test_back_to_back_is_not_a_conflict() {
        let a = course("1", &[(Weekday::Thu, "08:00-10:00")]);
        let b = course("2", &[(Weekday::Thu, "10:00-12:00")]);
        assert!(!has_conflict(&select(&[a, b])));
    }

    #[test]
    fn test_multi_meeting_courses() {
        let a = course("1", &[(Weekday::Mon, "08:00-09:40"), (Weekday::Wed, "08:00-09:40")]);
        let b = course("2", &[(Weekday::Tue, "08:00-09:40"), (Weekday::Wed, "09:00-10:00")]);
        let sel = select(&[a, b]);
        assert!(has_conflict(&sel));
        assert_eq!(conflicting_pairs(&sel)[0].overlap.day, Weekday::Wed);
    }

    #[test]
    fn test_occupants_at() {
        let a = course("1", &[(Weekday::Mon, "08:00-10:30")]);
        let b = course("2", &[(Weekday::Mon, "09:00-11:00")]);
        let sel = select(&[a, b]);

        let at = |hour| {
            occupants_at(&sel, Weekday::Mon, &TimeSlot::hour_bucket(Weekday::Mon, hour))
                .iter()
                .map(|c| c.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(at(7), Vec::<String>::new());
        assert_eq!(at(8), vec!["1"]);
        assert_eq!(at(9), vec!["1", "2"]);
        assert_eq!(at(10), vec!["1", "2"]);
        assert_eq!(at(11), Vec::<String>::new());

        // The day argument wins over the bucket's own day
        let tuesday_bucket = TimeSlot::hour_bucket(Weekday::Tue, 9);
        assert_eq!(occupants_at(&sel, Weekday::Mon, &tuesday_bucket).len(), 2);
        assert!(occupants_at(&sel, Weekday::Tue, &tuesday_bucket).is_empty());
    }

    #[test]
    fn test_timetable_states() {
        let a = course("1", &[(Weekday::Mon, "08:00-10:30")]);
        let b = course("2", &[(Weekday::Mon, "09:00-11:00")]);
        let spec = GridSpec::default();
        let grid = Timetable::build(&select(&[a, b]), &spec);

        assert_eq!(grid.rows.len(), 10);
        assert_eq!(grid.rows[0].label, "07:00-08:00");
        assert_eq!(grid.rows[9].label, "16:00-17:00");
        assert!(grid.rows.iter().all(|r| r.cells.len() == 5));

        let state = |hour| grid.cell(Weekday::Mon, hour, &spec).unwrap().state;
        assert_eq!(state(7), CellState::Free);
        assert_eq!(state(8), CellState::Scheduled);
        assert_eq!(state(9), CellState::Conflicting);
        assert_eq!(state(10), CellState::Conflicting);
        assert_eq!(state(11), CellState::Free);

        assert!(grid.has_conflict);
        assert!(grid.has_conflicting_cell());
    }

    #[test]
    fn test_shared_hour_without_overlap_is_scheduled() {
        let a = course("1", &[(Weekday::Fri, "08:00-08:30")]);
        let b = course("2", &[(Weekday::Fri, "08:30-09:30")]);
        let spec = GridSpec::default();
        let grid = Timetable::build(&select(&[a, b]), &spec);

        let cell = grid.cell(Weekday::Fri, 8, &spec).unwrap();
        assert_eq!(cell.occupants, vec!["MK-1", "MK-2"]);
        assert_eq!(cell.state, CellState::Scheduled);
        assert!(!grid.has_conflict);
        assert!(!grid.has_conflicting_cell());
    }

    #[test]
    fn test_cell_lookup_out_of_range() {
        let spec = GridSpec::default();
        let grid = Timetable::build(&CourseSelection::new(), &spec);
        assert!(grid.cell(Weekday::Mon, 6, &spec).is_none());
        assert!(grid.cell(Weekday::Mon, 17, &spec).is_none());
        assert_eq!(spec.bucket_count(), 10);
    }

    #[test]
    fn test_grid_past_midnight_is_clamped() {
        let spec = GridSpec {
            first_hour: 20,
            last_hour: 2000,
        };
        let grid = Timetable::build(&CourseSelection::new(), &spec);
        assert_eq!(spec.bucket_count(), 4);
        assert_eq!(grid.rows.len(), 4);
        assert_eq!(grid.rows[3].label, "23:00-24:00");
    }
}
