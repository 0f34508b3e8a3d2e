//! Conflict model.
//!
//! A conflict is a pair of lessons from the same schedule that share time
//! on the same day. Conflicts are snapshots of a schedule state: any
//! change to the schedule invalidates them, and indices refer to the
//! lesson list they were detected on.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CourseId, ScheduledLesson};

/// Suggested way to remove a conflict (informational, ordered by how
/// invasive it is).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionStrategy {
    /// Move one or both lessons to another group of the same type.
    GroupSubstitution,
    /// Shift to a group at a less crowded time.
    TimeSlotOptimization,
    /// Lessons are in different rooms; a room swap may free a group.
    SpatialReallocation,
    /// Rebuild the day around the longer lesson.
    ScheduleRestructuring,
    /// Drop the lower-priority course's lesson first.
    PriorityRebalancing,
    /// Replace one of the courses entirely.
    AlternativeCourse,
    /// Defer one course to another semester.
    CrossSemester,
}

impl ResolutionStrategy {
    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            ResolutionStrategy::GroupSubstitution => "Alternative group substitution",
            ResolutionStrategy::TimeSlotOptimization => "Time slot optimization",
            ResolutionStrategy::SpatialReallocation => "Spatial reallocation",
            ResolutionStrategy::ScheduleRestructuring => "Schedule restructuring",
            ResolutionStrategy::PriorityRebalancing => "Course priority rebalancing",
            ResolutionStrategy::AlternativeCourse => "Alternative course recommendation",
            ResolutionStrategy::CrossSemester => "Cross-semester optimization",
        }
    }
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Coarse severity band for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityLevel {
    /// Overlap covers at most half of the longer lesson.
    Medium,
    /// Overlap covers more than half of the longer lesson.
    High,
}

/// Order-independent identity of a conflicting pair: the two lessons'
/// `(course_id, group_id)`, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConflictKey {
    pub first: (CourseId, String),
    pub second: (CourseId, String),
}

impl ConflictKey {
    pub fn new(a: &ScheduledLesson, b: &ScheduledLesson) -> Self {
        let ka = (a.course_id(), a.group_id().to_string());
        let kb = (b.course_id(), b.group_id().to_string());
        if ka <= kb {
            Self { first: ka, second: kb }
        } else {
            Self { first: kb, second: ka }
        }
    }
}

/// Two lessons of one schedule that overlap in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Lesson at the lower index.
    pub first: ScheduledLesson,
    /// Lesson at the higher index.
    pub second: ScheduledLesson,
    /// Positions of `first` and `second` in the lesson list they were
    /// detected on (`indices.0 < indices.1`).
    pub indices: (usize, usize),
    /// Shared minutes.
    pub overlap_min: u32,
    /// `overlap_min / max(duration_first, duration_second)`, in (0, 1].
    pub severity: f64,
    /// Whether automatic resolution may be attempted. Always `true` for
    /// time overlaps; whether it succeeds is up to the search.
    pub resolvable: bool,
    /// Suggested strategies, least invasive first.
    pub strategies: Vec<ResolutionStrategy>,
}

impl Conflict {
    /// Severity band (`High` above 0.5).
    pub fn severity_level(&self) -> SeverityLevel {
        if self.severity > 0.5 {
            SeverityLevel::High
        } else {
            SeverityLevel::Medium
        }
    }

    /// Whether either side is the given (course, group).
    pub fn involves(&self, course_id: CourseId, group_id: &str) -> bool {
        self.first.is(course_id, group_id) || self.second.is(course_id, group_id)
    }

    /// Order-independent pair identity.
    pub fn key(&self) -> ConflictKey {
        ConflictKey::new(&self.first, &self.second)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} / {} {} {} on {}: {} min overlap ({:.0}%)",
            self.first.course_id(),
            self.first.lesson_type(),
            self.first.group_id(),
            self.second.course_id(),
            self.second.lesson_type(),
            self.second.group_id(),
            self.first.day(),
            self.overlap_min,
            self.severity * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LessonOffering, LessonType, Weekday};

    fn lesson(course: CourseId, group: &str) -> ScheduledLesson {
        ScheduledLesson::new(
            1,
            LessonOffering::new(course, LessonType::Lecture, group, Weekday::Monday, 600, 120),
        )
    }

    fn conflict(severity: f64) -> Conflict {
        Conflict {
            first: lesson(200, "L1"),
            second: lesson(100, "L2"),
            indices: (0, 1),
            overlap_min: 60,
            severity,
            resolvable: true,
            strategies: vec![ResolutionStrategy::GroupSubstitution],
        }
    }

    #[test]
    fn test_severity_level() {
        assert_eq!(conflict(0.5).severity_level(), SeverityLevel::Medium);
        assert_eq!(conflict(0.75).severity_level(), SeverityLevel::High);
    }

    #[test]
    fn test_key_is_order_independent() {
        let a = lesson(200, "L1");
        let b = lesson(100, "L2");
        assert_eq!(ConflictKey::new(&a, &b), ConflictKey::new(&b, &a));
        assert_eq!(ConflictKey::new(&a, &b).first, (100, "L2".to_string()));
    }

    #[test]
    fn test_involves() {
        let c = conflict(0.5);
        assert!(c.involves(200, "L1"));
        assert!(c.involves(100, "L2"));
        assert!(!c.involves(100, "L1"));
    }

    #[test]
    fn test_display() {
        let text = conflict(0.5).to_string();
        assert!(text.contains("60 min overlap"));
        assert!(text.contains("Monday"));
    }
}
