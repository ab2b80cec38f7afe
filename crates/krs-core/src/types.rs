//! # Domain Types
//!
//! Core domain types used throughout the registration engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Course      │   │ SelectionEntry  │   │      Mode       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │   │  course         │   │  WhatIf         │       │
//! │  │  code (IF-101)  │   │  section (A..H) │   │  Committed      │       │
//! │  │  credits (SKS)  │   └─────────────────┘   └─────────────────┘       │
//! │  │  schedule       │                                                    │
//! │  │  cost (Rp)      │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  └─────────────────┘   │   Difficulty    │   │    Weekday      │       │
//! │                        │  Easy/Med/Hard  │   │    Mon..Fri     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every course has:
//! - `id`: opaque identifier, used for selection identity
//! - `code`: human-readable business key (`IF-101`), shown everywhere in UI

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CatalogError;
use crate::money::Money;
use crate::schedule::TimeSlot;

// =============================================================================
// Weekday
// =============================================================================

/// A teaching day. Classes only run Monday to Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Weekday {
    /// All teaching days in timetable column order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    /// Indonesian day name as printed on the timetable.
    pub fn name_id(&self) -> &'static str {
        match self {
            Weekday::Mon => "Senin",
            Weekday::Tue => "Selasa",
            Weekday::Wed => "Rabu",
            Weekday::Thu => "Kamis",
            Weekday::Fri => "Jumat",
        }
    }

    /// Zero-based column index (Mon = 0).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
        };
        write!(f, "{}", name)
    }
}

/// Accepts English short/long names and Indonesian names.
impl FromStr for Weekday {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mon" | "monday" | "senin" => Ok(Weekday::Mon),
            "tue" | "tuesday" | "selasa" => Ok(Weekday::Tue),
            "wed" | "wednesday" | "rabu" => Ok(Weekday::Wed),
            "thu" | "thursday" | "kamis" => Ok(Weekday::Thu),
            "fri" | "friday" | "jumat" | "jum'at" => Ok(Weekday::Fri),
            _ => Err(CatalogError::UnknownDay(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Difficulty
// =============================================================================

/// Perceived course difficulty, shown as a traffic light next to the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Indonesian label (Mudah / Sedang / Sulit).
    pub fn label_id(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Mudah",
            Difficulty::Medium => "Sedang",
            Difficulty::Hard => "Sulit",
        }
    }

    /// Traffic-light tone used by the course list.
    pub fn tone(&self) -> Tone {
        match self {
            Difficulty::Easy => Tone::Green,
            Difficulty::Medium => Tone::Amber,
            Difficulty::Hard => Tone::Red,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Traffic-light colour for a difficulty badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Amber,
    Red,
}

// =============================================================================
// Section Code
// =============================================================================

/// A class section of a course (A..H).
///
/// Sections are a closed set; each identifies one class instance with its
/// own lecturer. Capacity is not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SectionCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl SectionCode {
    /// Every section offered by the class picker, in display order.
    pub const ALL: [SectionCode; 8] = [
        SectionCode::A,
        SectionCode::B,
        SectionCode::C,
        SectionCode::D,
        SectionCode::E,
        SectionCode::F,
        SectionCode::G,
        SectionCode::H,
    ];

    pub fn letter(&self) -> char {
        (b'A' + *self as u8) as char
    }
}

impl fmt::Display for SectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for SectionCode {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => SectionCode::ALL
                .iter()
                .copied()
                .find(|section| section.letter() == c.to_ascii_uppercase())
                .ok_or_else(|| CatalogError::UnknownSection(s.to_string())),
            _ => Err(CatalogError::UnknownSection(s.to_string())),
        }
    }
}

// =============================================================================
// Mode
// =============================================================================

/// Whether a submission is the student's real registration or a simulation.
///
/// ## Mode Behavior
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  COMMITTED (Default)              │  WHAT-IF                            │
/// │  ──────────────────               │  ───────                            │
/// │  • "Mode Aktual"                  │  • "Mode Simulasi"                  │
/// │  • Submit replaces the student's  │  • Submit stores a snapshot that    │
/// │    registration record            │    can be thrown away later         │
/// │  • "KRS submitted"                │  • "KRS simulation saved"           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    WhatIf,
    #[default]
    Committed,
}

impl Mode {
    pub fn is_simulation(&self) -> bool {
        matches!(self, Mode::WhatIf)
    }

    /// The other mode (what the mode switch flips to).
    pub fn toggled(&self) -> Mode {
        match self {
            Mode::WhatIf => Mode::Committed,
            Mode::Committed => Mode::WhatIf,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::WhatIf => write!(f, "what_if"),
            Mode::Committed => write!(f, "committed"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "what_if" | "whatif" | "what-if" | "simulation" | "simulasi" => Ok(Mode::WhatIf),
            "committed" | "actual" | "aktual" => Ok(Mode::Committed),
            other => Err(format!(
                "Unknown mode: '{}'. Valid options: what_if, committed",
                other
            )),
        }
    }
}

// =============================================================================
// Course
// =============================================================================

/// A course offered this term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Course {
    /// Opaque unique identifier.
    pub id: String,

    /// Course code (business identifier), e.g. `IF-101`.
    pub code: String,

    /// Display name.
    pub name: String,

    /// Credit units (SKS).
    pub credits: u32,

    pub difficulty: Difficulty,

    /// Codes of prerequisite courses. Informational only, never enforced.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Weekly meetings, in display order.
    pub schedule: Vec<TimeSlot>,

    /// Tuition for the course.
    #[serde(default)]
    pub cost: Money,
}

impl Course {
    /// Returns true if any meeting falls on `day`.
    pub fn meets_on(&self, day: Weekday) -> bool {
        self.schedule.iter().any(|slot| slot.day == day)
    }

    /// Label for the first meeting, e.g. `Senin 08:00-10:30`.
    pub fn schedule_label(&self) -> String {
        match self.schedule.first() {
            Some(slot) => format!("{} {}", slot.day.name_id(), slot.time_label()),
            None => String::new(),
        }
    }
}

// =============================================================================
// Selection Entry
// =============================================================================

/// A course picked together with the section the student will attend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectionEntry {
    pub course: Course,
    pub section: SectionCode,
}

impl SelectionEntry {
    pub fn new(course: Course, section: SectionCode) -> Self {
        SelectionEntry { course, section }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
