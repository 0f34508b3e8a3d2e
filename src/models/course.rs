//! Course model.
//!
//! A course is what a student selects; its lesson offerings are what gets
//! placed. Credits are fractional (half-credit seminars exist).

use serde::{Deserialize, Serialize};

use super::CourseId;

/// A course in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: CourseId,
    /// Human-readable name.
    pub name: String,
    /// Credit weight.
    pub credits: f64,
    /// Responsible lecturer.
    pub lecturer: String,
}

impl Course {
    /// Creates a course with the given ID and credit weight.
    pub fn new(id: CourseId, credits: f64) -> Self {
        Self {
            id,
            name: String::new(),
            credits,
            lecturer: String::new(),
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the lecturer.
    pub fn with_lecturer(mut self, lecturer: impl Into<String>) -> Self {
        self.lecturer = lecturer.into();
        self
    }

    /// Name for display, synthesized when the catalog has none.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("Course {}", self.id)
        } else {
            self.name.clone()
        }
    }
}
