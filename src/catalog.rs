//! Read-only course and lesson catalog.
//!
//! Every engine component receives a `&Catalog` at construction and does
//! all course and offering lookups through it. Lookups never fail: an
//! unknown course has synthesized defaults and a course without offerings
//! of some type yields an empty slice (that type is simply not required).

use std::collections::HashMap;

use crate::models::{Course, CourseId, LessonOffering, LessonType};
use crate::validation::{validate_catalog, ValidationResult};

/// Credits assumed for a course missing from the catalog.
pub const DEFAULT_CREDITS: f64 = 3.0;

/// Course listings plus their lesson offerings, keyed by (course, type).
///
/// Offerings keep insertion order; "catalog order" everywhere in the
/// crate means this order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    course_index: HashMap<CourseId, usize>,
    offerings: HashMap<(CourseId, LessonType), Vec<LessonOffering>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from loaded course and offering lists.
    pub fn from_parts(courses: Vec<Course>, offerings: Vec<LessonOffering>) -> Self {
        let mut catalog = Self::new();
        for course in courses {
            catalog.add_course(course);
        }
        for offering in offerings {
            catalog.add_offering(offering);
        }
        catalog
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.add_course(course);
        self
    }

    /// Adds a lesson offering.
    pub fn with_offering(mut self, offering: LessonOffering) -> Self {
        self.add_offering(offering);
        self
    }

    /// Adds a course. The first course with a given id wins lookups;
    /// later duplicates are kept so that validation can report them.
    pub fn add_course(&mut self, course: Course) {
        self.course_index
            .entry(course.id)
            .or_insert(self.courses.len());
        self.courses.push(course);
    }

    /// Appends an offering to its (course, type) list.
    pub fn add_offering(&mut self, offering: LessonOffering) {
        self.offerings
            .entry((offering.course_id, offering.lesson_type))
            .or_default()
            .push(offering);
    }

    /// All courses in catalog order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Looks up a course.
    pub fn course(&self, course_id: CourseId) -> Option<&Course> {
        self.course_index
            .get(&course_id)
            .map(|&idx| &self.courses[idx])
    }

    /// Position of a course in catalog order.
    pub fn course_position(&self, course_id: CourseId) -> Option<usize> {
        self.course_index.get(&course_id).copied()
    }

    /// Credit weight ([`DEFAULT_CREDITS`] if the course is unknown).
    pub fn credits(&self, course_id: CourseId) -> f64 {
        self.course(course_id)
            .map(|c| c.credits)
            .unwrap_or(DEFAULT_CREDITS)
    }

    /// Display name (`"Course <id>"` if unknown or unnamed).
    pub fn name(&self, course_id: CourseId) -> String {
        match self.course(course_id) {
            Some(course) => course.display_name(),
            None => format!("Course {course_id}"),
        }
    }

    /// Sum of credits over the given courses.
    pub fn total_credits(&self, course_ids: &[CourseId]) -> f64 {
        course_ids.iter().map(|&id| self.credits(id)).sum()
    }

    /// Offerings of one type for a course, in catalog order.
    pub fn offerings_for(&self, course_id: CourseId, lesson_type: LessonType) -> &[LessonOffering] {
        self.offerings
            .get(&(course_id, lesson_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Finds the offering identified by (course, group) across all types.
    pub fn offering(&self, course_id: CourseId, group_id: &str) -> Option<&LessonOffering> {
        LessonType::ALL
            .iter()
            .flat_map(|&t| self.offerings_for(course_id, t))
            .find(|o| o.group_id == group_id)
    }

    /// Lesson types the course actually offers, in placement order.
    pub fn offered_types(&self, course_id: CourseId) -> Vec<LessonType> {
        LessonType::ALL
            .into_iter()
            .filter(|&t| !self.offerings_for(course_id, t).is_empty())
            .collect()
    }

    /// Whether the course has at least one offering.
    pub fn has_offerings(&self, course_id: CourseId) -> bool {
        LessonType::ALL
            .iter()
            .any(|&t| !self.offerings_for(course_id, t).is_empty())
    }

    /// Total number of groups over all types of a course.
    pub fn group_count(&self, course_id: CourseId) -> usize {
        LessonType::ALL
            .iter()
            .map(|&t| self.offerings_for(course_id, t).len())
            .sum()
    }

    /// Every offering, grouped by course in catalog order (offerings of
    /// courses missing from the listing come last, by id).
    pub fn all_offerings(&self) -> Vec<&LessonOffering> {
        let mut keys: Vec<&(CourseId, LessonType)> = self.offerings.keys().collect();
        keys.sort_by_key(|(course_id, lesson_type)| {
            (
                self.course_position(*course_id).unwrap_or(usize::MAX),
                *course_id,
                *lesson_type,
            )
        });
        keys.into_iter()
            .flat_map(|key| self.offerings[key].iter())
            .collect()
    }

    /// Runs integrity checks over the whole catalog.
    pub fn validate(&self) -> ValidationResult {
        let offerings: Vec<LessonOffering> = self.all_offerings().into_iter().cloned().collect();
        validate_catalog(&self.courses, &offerings)
    }
}
