//! # Schedule Module
//!
//! Structured meeting times and the overlap rule.
//!
//! ## Half-Open Intervals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A meeting occupies [start, end) in minutes since midnight.             │
//! │                                                                         │
//! │  08:00 ──────────── 10:30                                               │
//! │               09:00 ──────────── 11:00     overlap: 09:00-10:30         │
//! │                                                                         │
//! │  08:00 ──── 09:00                                                       │
//! │             09:00 ──── 10:00               no overlap (back to back)    │
//! │                                                                         │
//! │  [s1, e1) and [s2, e2) overlap  ⇔  s1 < e2  AND  s2 < e1               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::CatalogError;
use crate::types::Weekday;

/// Minutes in a day; every time of day is strictly below this.
pub const MINUTES_PER_DAY: u16 = HOURS_PER_DAY * 60;

pub const HOURS_PER_DAY: u16 = 24;

// =============================================================================
// Time Slot
// =============================================================================

/// One weekly meeting of a course.
///
/// `start` and `end` are minutes since midnight. A well-formed slot has
/// `start < end`; [`TimeSlot::new`] enforces it, catalog loading checks it
/// for deserialized data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
pub struct TimeSlot {
    pub day: Weekday,
    pub start: u16,
    pub end: u16,
}

impl TimeSlot {
    /// Creates a validated slot.
    pub fn new(day: Weekday, start: u16, end: u16) -> Result<Self, CatalogError> {
        let slot = TimeSlot { day, start, end };
        if !slot.is_well_formed() {
            return Err(CatalogError::InvalidTimeRange {
                course_code: String::new(),
                day,
                start: format_minutes(start),
                end: format_minutes(end),
            });
        }
        Ok(slot)
    }

    /// Parses a range such as `08:00-10:30`.
    ///
    /// ## Example
    /// ```rust
    /// use krs_core::schedule::TimeSlot;
    /// use krs_core::types::Weekday;
    ///
    /// let slot = TimeSlot::parse(Weekday::Mon, "08:00-10:30").unwrap();
    /// assert_eq!((slot.start, slot.end), (480, 630));
    /// ```
    pub fn parse(day: Weekday, range: &str) -> Result<Self, CatalogError> {
        let (start, end) = parse_range(range)?;
        TimeSlot::new(day, start, end)
    }

    /// One-hour grid bucket starting at `hour:00`.
    ///
    /// Hours past 23 are clamped to the last bucket of the day.
    pub fn hour_bucket(day: Weekday, hour: u16) -> Self {
        let hour = hour.min(HOURS_PER_DAY - 1);
        TimeSlot {
            day,
            start: hour * 60,
            end: (hour + 1) * 60,
        }
    }

    /// `start < end` and the slot ends within the day.
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end && self.end <= MINUTES_PER_DAY
    }

    /// Half-open overlap on the same day.
    #[inline]
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }

    /// The shared window of two overlapping slots.
    pub fn intersection(&self, other: &TimeSlot) -> Option<TimeSlot> {
        if !self.overlaps(other) {
            return None;
        }
        Some(TimeSlot {
            day: self.day,
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Duration in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.end.saturating_sub(self.start)
    }

    /// `08:00-10:30`
    pub fn time_label(&self) -> String {
        format!("{}-{}", format_minutes(self.start), format_minutes(self.end))
    }
}

/// Slots come either as `{ day, time: "08:00-10:30" }` (the format the
/// registration UI has always stored) or as
/// `{ day, start, end }` with `HH:MM` strings or minute counts.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSlot {
    Range { day: Weekday, time: String },
    Structured { day: Weekday, start: RawTime, end: RawTime },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTime {
    Minutes(u16),
    Clock(String),
}

impl RawTime {
    fn minutes(self) -> Result<u16, CatalogError> {
        match self {
            RawTime::Minutes(m) => Ok(m),
            RawTime::Clock(text) => parse_clock(&text),
        }
    }
}

/// Order is not checked here: catalog validation reports a reversed range as
/// `InvalidTimeRange` together with the course it belongs to.
impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSlot::deserialize(deserializer)?;
        let slot = match raw {
            RawSlot::Range { day, time } => {
                let (start, end) = parse_range(&time).map_err(serde::de::Error::custom)?;
                TimeSlot { day, start, end }
            }
            RawSlot::Structured { day, start, end } => TimeSlot {
                day,
                start: start.minutes().map_err(serde::de::Error::custom)?,
                end: end.minutes().map_err(serde::de::Error::custom)?,
            },
        };
        Ok(slot)
    }
}

// =============================================================================
// Clock Helpers
// =============================================================================

/// Parses `HH:MM` into minutes since midnight.
pub fn parse_clock(text: &str) -> Result<u16, CatalogError> {
    let malformed = || CatalogError::MalformedTime(text.to_string());

    let (hours, minutes) = text.trim().split_once(':').ok_or_else(malformed)?;
    let hours: u16 = hours.trim().parse().map_err(|_| malformed())?;
    let minutes: u16 = minutes.trim().parse().map_err(|_| malformed())?;

    // 24:00 is accepted as the end of the day
    if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
        return Err(malformed());
    }

    Ok(hours * 60 + minutes)
}

/// Parses `HH:MM-HH:MM` into a (start, end) pair.
pub fn parse_range(range: &str) -> Result<(u16, u16), CatalogError> {
    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| CatalogError::MalformedTime(range.to_string()))?;
    Ok((parse_clock(start)?, parse_clock(end)?))
}

/// Formats minutes since midnight as `HH:MM`.
pub fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

// =============================================================================
// Unit Tests
// =============================================================================
