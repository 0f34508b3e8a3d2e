//! Lesson offering model.
//!
//! A lesson offering is the smallest placeable unit: one weekly session
//! of a course (lecture, tutorial or lab) in a fixed group, with a fixed
//! day, time, room and instructor. Offerings come from the catalog and
//! are never mutated; choosing a different group means choosing a
//! different offering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CourseId, TimeRange, Weekday};
use crate::error::{Result, TimetableError};

/// Kind of weekly session.
///
/// Behaviour never differs by type; the tag only selects which list of
/// offerings a group is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LessonType {
    Lecture,
    Tutorial,
    Lab,
}

impl LessonType {
    /// All types in placement order.
    pub const ALL: [LessonType; 3] = [LessonType::Lecture, LessonType::Tutorial, LessonType::Lab];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            LessonType::Lecture => "Lecture",
            LessonType::Tutorial => "Tutorial",
            LessonType::Lab => "Lab",
        }
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LessonType {
    type Err = TimetableError;

    /// Accepts singular and plural forms ("Lab", "labs"), any case.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        match singular {
            "lecture" => Ok(LessonType::Lecture),
            "tutorial" => Ok(LessonType::Tutorial),
            "lab" => Ok(LessonType::Lab),
            _ => Err(TimetableError::Parse(format!("unknown lesson type '{s}'"))),
        }
    }
}

/// A catalog-defined weekly session of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonOffering {
    /// Owning course.
    pub course_id: CourseId,
    /// Session kind.
    pub lesson_type: LessonType,
    /// Group identifier, unique within the course (e.g. "L1", "T2", "LB1").
    pub group_id: String,
    /// Day of the week.
    pub day: Weekday,
    /// Start time (minutes since midnight).
    pub start_min: u32,
    /// Duration (minutes).
    pub duration_min: u32,
    /// Room label.
    pub room: String,
    /// Building label.
    pub building: String,
    /// Teaching staff.
    pub instructor: String,
}

impl LessonOffering {
    /// Creates an offering without location or staff details.
    pub fn new(
        course_id: CourseId,
        lesson_type: LessonType,
        group_id: impl Into<String>,
        day: Weekday,
        start_min: u32,
        duration_min: u32,
    ) -> Self {
        Self {
            course_id,
            lesson_type,
            group_id: group_id.into(),
            day,
            start_min,
            duration_min,
            room: String::new(),
            building: String::new(),
            instructor: String::new(),
        }
    }

    /// Sets the room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    /// Sets the building.
    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = building.into();
        self
    }

    /// Sets the instructor.
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = instructor.into();
        self
    }

    /// Occupied time range on `day`.
    #[inline]
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_min, self.duration_min)
    }

    /// End time (minutes since midnight, exclusive).
    #[inline]
    pub fn end_min(&self) -> u32 {
        self.start_min + self.duration_min
    }

    /// Whether two offerings occupy a common minute of the week.
    pub fn overlaps(&self, other: &LessonOffering) -> bool {
        self.day == other.day && self.time_range().overlaps(&other.time_range())
    }

    /// Minutes shared with another offering (0 on different days).
    pub fn overlap_min(&self, other: &LessonOffering) -> u32 {
        if self.day != other.day {
            return 0;
        }
        self.time_range().overlap_min(&other.time_range())
    }

    /// Whether this offering is the given (course, group).
    #[inline]
    pub fn is(&self, course_id: CourseId, group_id: &str) -> bool {
        self.course_id == course_id && self.group_id == group_id
    }
}
