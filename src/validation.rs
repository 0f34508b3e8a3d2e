//! Input validation for course catalogs.
//!
//! Checks structural integrity of courses and lesson offerings before
//! any placement. Detects:
//! - Duplicate course IDs
//! - Duplicate group IDs within a course
//! - Offerings of unknown courses
//! - Non-positive credits
//! - Zero-length lessons and lessons running past midnight

use std::collections::HashSet;

use crate::models::{Course, CourseId, LessonOffering, MINUTES_PER_DAY};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An offering references a course that doesn't exist.
    InvalidCourseReference,
    /// A course has zero, negative or non-finite credits.
    InvalidCredits,
    /// A lesson has zero duration.
    InvalidDuration,
    /// A lesson does not fit inside one day.
    OutOfDayRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a catalog.
///
/// Checks:
/// 1. No duplicate course IDs
/// 2. Every course has positive, finite credits
/// 3. Every offering references an existing course
/// 4. Group IDs are unique within a course (across lesson types, since a
///    scheduled lesson is identified by course and group alone)
/// 5. Every offering has a positive duration and ends by midnight
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(courses: &[Course], offerings: &[LessonOffering]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut course_ids = HashSet::new();
    for course in courses {
        if !course_ids.insert(course.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }
        if !course.credits.is_finite() || course.credits <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCredits,
                format!("Course {} has invalid credits {}", course.id, course.credits),
            ));
        }
    }

    let mut group_ids: HashSet<(CourseId, &str)> = HashSet::new();
    for offering in offerings {
        if !course_ids.contains(&offering.course_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCourseReference,
                format!(
                    "{} group '{}' references unknown course {}",
                    offering.lesson_type, offering.group_id, offering.course_id
                ),
            ));
        }

        if !group_ids.insert((offering.course_id, offering.group_id.as_str())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!(
                    "Duplicate group ID '{}' in course {}",
                    offering.group_id, offering.course_id
                ),
            ));
        }

        if offering.duration_min == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Course {} group '{}' has zero duration",
                    offering.course_id, offering.group_id
                ),
            ));
        } else if offering.end_min() > MINUTES_PER_DAY {
            errors.push(ValidationError::new(
                ValidationErrorKind::OutOfDayRange,
                format!(
                    "Course {} group '{}' runs past midnight",
                    offering.course_id, offering.group_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LessonType, Weekday};

    fn sample_courses() -> Vec<Course> {
        vec![Course::new(100, 3.0), Course::new(200, 4.0)]
    }

    fn sample_offerings() -> Vec<LessonOffering> {
        vec![
            LessonOffering::new(100, LessonType::Lecture, "L1", Weekday::Monday, 540, 120),
            LessonOffering::new(100, LessonType::Tutorial, "T1", Weekday::Tuesday, 600, 60),
            LessonOffering::new(200, LessonType::Lecture, "L1", Weekday::Monday, 660, 60),
        ]
    }

    #[test]
    fn test_valid_catalog() {
        assert!(validate_catalog(&sample_courses(), &sample_offerings()).is_ok());
    }

    #[test]
    fn test_duplicate_course_id() {
        let courses = vec![Course::new(100, 3.0), Course::new(100, 2.0)];
        let errors = validate_catalog(&courses, &[]).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("course")));
    }

    #[test]
    fn test_duplicate_group_within_course() {
        let mut offerings = sample_offerings();
        offerings.push(LessonOffering::new(100, LessonType::Lab, "T1", Weekday::Friday, 600, 60));
        let errors = validate_catalog(&sample_courses(), &offerings).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("group")));
    }

    #[test]
    fn test_same_group_in_different_courses_is_fine() {
        // "L1" exists in both 100 and 200
        assert!(validate_catalog(&sample_courses(), &sample_offerings()).is_ok());
    }

    #[test]
    fn test_unknown_course_reference() {
        let offerings = vec![LessonOffering::new(999, LessonType::Lab, "LB1", Weekday::Friday, 600, 60)];
        let errors = validate_catalog(&sample_courses(), &offerings).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCourseReference));
    }

    #[test]
    fn test_invalid_credits() {
        let courses = vec![Course::new(1, 0.0), Course::new(2, f64::NAN)];
        let errors = validate_catalog(&courses, &[]).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::InvalidCredits)
                .count(),
            2
        );
    }

    #[test]
    fn test_zero_duration_and_past_midnight() {
        let offerings = vec![
            LessonOffering::new(100, LessonType::Lecture, "L1", Weekday::Monday, 540, 0),
            LessonOffering::new(100, LessonType::Lab, "LB1", Weekday::Monday, 23 * 60, 120),
        ];
        let errors = validate_catalog(&sample_courses(), &offerings).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidDuration));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::OutOfDayRange));
    }

    #[test]
    fn test_multiple_errors() {
        let courses = vec![Course::new(1, -1.0)];
        let offerings = vec![LessonOffering::new(2, LessonType::Lab, "LB1", Weekday::Monday, 540, 0)];
        let errors = validate_catalog(&courses, &offerings).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
