//! Schedule model.
//!
//! A schedule is one student's weekly selection: an ordered list of lesson
//! offerings placed under a schedule id. The only structural rule is that
//! a course contributes at most one lesson per lesson type. Overlaps are
//! allowed here; finding them is the conflict detector's job.

use serde::{Deserialize, Serialize};

use super::{CourseId, LessonOffering, LessonType, ScheduleId, TimeRange, Weekday};
use crate::catalog::Catalog;

/// A lesson offering placed into a specific schedule.
///
/// Identity within a schedule is `(course_id, group_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledLesson {
    /// Owning schedule.
    pub schedule_id: ScheduleId,
    /// The placed catalog offering.
    pub offering: LessonOffering,
}

impl ScheduledLesson {
    /// Places an offering under a schedule id.
    pub fn new(schedule_id: ScheduleId, offering: LessonOffering) -> Self {
        Self {
            schedule_id,
            offering,
        }
    }

    #[inline]
    pub fn course_id(&self) -> CourseId {
        self.offering.course_id
    }

    #[inline]
    pub fn group_id(&self) -> &str {
        &self.offering.group_id
    }

    #[inline]
    pub fn lesson_type(&self) -> LessonType {
        self.offering.lesson_type
    }

    #[inline]
    pub fn day(&self) -> Weekday {
        self.offering.day
    }

    #[inline]
    pub fn time_range(&self) -> TimeRange {
        self.offering.time_range()
    }

    /// Whether this is the given (course, group).
    #[inline]
    pub fn is(&self, course_id: CourseId, group_id: &str) -> bool {
        self.offering.is(course_id, group_id)
    }
}

/// One student's weekly lesson selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Schedule identifier.
    pub id: ScheduleId,
    /// Placed lessons, in insertion order.
    pub lessons: Vec<ScheduledLesson>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new(id: ScheduleId) -> Self {
        Self {
            id,
            lessons: Vec::new(),
        }
    }

    /// Places an offering.
    ///
    /// Returns `false` (and changes nothing) if the same (course, group)
    /// is already placed or the course already has a lesson of that type.
    pub fn place(&mut self, offering: &LessonOffering) -> bool {
        let occupied = self.lessons.iter().any(|l| {
            l.course_id() == offering.course_id
                && (l.lesson_type() == offering.lesson_type || l.group_id() == offering.group_id)
        });
        if occupied {
            return false;
        }
        self.lessons
            .push(ScheduledLesson::new(self.id, offering.clone()));
        true
    }

    /// Removes the lesson identified by (course, group).
    pub fn remove(&mut self, course_id: CourseId, group_id: &str) -> Option<ScheduledLesson> {
        let idx = self.position(course_id, group_id)?;
        Some(self.lessons.remove(idx))
    }

    /// Index of the lesson identified by (course, group).
    pub fn position(&self, course_id: CourseId, group_id: &str) -> Option<usize> {
        self.lessons.iter().position(|l| l.is(course_id, group_id))
    }

    /// Finds the lesson identified by (course, group).
    pub fn find(&self, course_id: CourseId, group_id: &str) -> Option<&ScheduledLesson> {
        self.lessons.iter().find(|l| l.is(course_id, group_id))
    }

    /// The lesson of a given type placed for a course, if any.
    pub fn lesson_for(&self, course_id: CourseId, lesson_type: LessonType) -> Option<&ScheduledLesson> {
        self.lessons
            .iter()
            .find(|l| l.course_id() == course_id && l.lesson_type() == lesson_type)
    }

    /// All lessons of a course.
    pub fn lessons_for_course(&self, course_id: CourseId) -> Vec<&ScheduledLesson> {
        self.lessons
            .iter()
            .filter(|l| l.course_id() == course_id)
            .collect()
    }

    /// Lessons on a day, ordered by start time.
    pub fn lessons_on(&self, day: Weekday) -> Vec<&ScheduledLesson> {
        let mut lessons: Vec<&ScheduledLesson> =
            self.lessons.iter().filter(|l| l.day() == day).collect();
        lessons.sort_by_key(|l| l.offering.start_min);
        lessons
    }

    /// Distinct courses, in order of first appearance.
    pub fn course_ids(&self) -> Vec<CourseId> {
        let mut ids = Vec::new();
        for lesson in &self.lessons {
            if !ids.contains(&lesson.course_id()) {
                ids.push(lesson.course_id());
            }
        }
        ids
    }

    /// Whether any lesson of the course is placed.
    pub fn contains_course(&self, course_id: CourseId) -> bool {
        self.lessons.iter().any(|l| l.course_id() == course_id)
    }

    /// Placed lessons that share time with `offering`.
    pub fn overlapping(&self, offering: &LessonOffering) -> Vec<&ScheduledLesson> {
        self.lessons
            .iter()
            .filter(|l| l.offering.overlaps(offering))
            .collect()
    }

    /// Sum of credits over distinct courses.
    pub fn total_credits(&self, catalog: &Catalog) -> f64 {
        self.course_ids().iter().map(|&id| catalog.credits(id)).sum()
    }

    /// Total teaching minutes per week.
    pub fn weekly_minutes(&self) -> u32 {
        self.lessons.iter().map(|l| l.offering.duration_min).sum()
    }

    /// Number of placed lessons.
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    /// Whether nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}
