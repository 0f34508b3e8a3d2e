//! Course timetabling for the U-Engine ecosystem.
//!
//! Places weekly course lessons (lectures, tutorials, labs) into a
//! student's schedule, detects overlapping lessons, repairs them by
//! switching groups, and generates whole conflict-free course selections
//! that meet a credit target.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Course`, `LessonOffering`, `Schedule`,
//!   `ScheduledLesson`, `Conflict`, `Weekday`, `TimeRange`
//! - **`catalog`**: Read-only course and offering catalog
//! - **`validation`**: Catalog integrity checks (duplicate IDs, unknown
//!   courses, invalid credits and durations)
//! - **`matrix`**: Weekly slot bitset for O(1) collision queries
//! - **`store`**: Schedule store seam, in-memory store, all-or-nothing
//!   batches, persisted row layout
//! - **`conflict`**: Conflict detection, alternative group search, resolver
//! - **`generator`**: Credit-targeted random search with per-course
//!   backtracking placement
//! - **`metrics`**: Schedule summary (credits, load per day, utilization)
//! - **`config`**: Search caps and slot grid, loadable from TOML
//!
//! # Architecture
//!
//! The catalog is passed explicitly to every component and is never
//! mutated. Schedules live behind [`store::ScheduleStore`]; the engine
//! reads snapshots and changes them only through single-lesson adds and
//! removes, grouped into batches that are undone if any step is refused.
//! Everything runs synchronously on the caller's thread.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent Research Directions in Automated Timetabling"
//! - Carter & Laporte (1998), "Recent Developments in Practical Course Timetabling"

pub mod catalog;
pub mod config;
pub mod conflict;
pub mod error;
pub mod generator;
pub mod matrix;
pub mod metrics;
pub mod models;
pub mod store;
pub mod timetable;
pub mod validation;

pub use error::{Result, TimetableError};
pub use timetable::Timetable;
