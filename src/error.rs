//! Error types for timetable operations.
//!
//! Only failures that abort a whole operation live here. A lesson the
//! store refuses to add is an ordinary `false`, and a course/type without
//! offerings is an empty slice; neither is an error.

use thiserror::Error;

use crate::models::{CourseId, ScheduleId};
use crate::store::Mutation;

/// Main error type for timetable operations.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// The referenced schedule does not exist in the store.
    #[error("schedule {0} not found")]
    ScheduleNotFound(ScheduleId),

    /// The referenced course does not exist in the catalog.
    #[error("course {0} not found")]
    CourseNotFound(CourseId),

    /// No course combination within the search budget could be placed
    /// without conflicts.
    #[error(
        "no feasible combination for {target} ± {tolerance} credits \
         ({tested} candidates tested)"
    )]
    Infeasible {
        target: f64,
        tolerance: f64,
        tested: usize,
    },

    /// A single course has no conflict-free group for some lesson type.
    #[error("course {course_id} cannot be placed without conflicts")]
    Unplaceable { course_id: CourseId },

    /// The store refused a mutation of a batch. `rolled_back` is false when
    /// undoing the completed steps was also refused, leaving the schedule
    /// partially changed.
    #[error("schedule {schedule_id}: store rejected {mutation} (rolled back: {rolled_back})")]
    StoreRejected {
        schedule_id: ScheduleId,
        mutation: Mutation,
        rolled_back: bool,
    },

    /// Caller supplied an argument outside the accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A day, clock time or lesson type could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type alias for timetable operations.
pub type Result<T> = std::result::Result<T, TimetableError>;
