//! Timetabling domain models.
//!
//! Provides the data types for course catalogs, weekly lesson offerings,
//! student schedules and the conflicts found in them.
//!
//! # Domain Mappings
//!
//! | u-timetable | Catalog view | Student view |
//! |-------------|--------------|--------------|
//! | Course | Course listing | Selected course |
//! | LessonOffering | Lecture/tutorial/lab group | Candidate session |
//! | ScheduledLesson | - | Enrolled session |
//! | Schedule | - | Weekly timetable |
//! | Conflict | - | Overlapping sessions |

mod conflict;
mod course;
mod lesson;
mod schedule;
mod time;

pub use conflict::{Conflict, ConflictKey, ResolutionStrategy, SeverityLevel};
pub use course::Course;
pub use lesson::{LessonOffering, LessonType};
pub use schedule::{Schedule, ScheduledLesson};
pub use time::{format_clock, parse_clock, TimeRange, Weekday, MINUTES_PER_DAY};

/// Course identifier.
pub type CourseId = u32;

/// Schedule identifier.
pub type ScheduleId = u32;
