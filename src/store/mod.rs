//! Schedule persistence seam.
//!
//! The engine never owns schedule storage. It reads snapshots and issues
//! single-lesson adds/removes through [`ScheduleStore`], which mirrors the
//! operations a schedule manager exposes: a refused add is a plain
//! `false` (unknown course/group, occupied slot, or an overlap the store
//! does not accept), never an error.
//!
//! Multi-step changes go through [`apply_batch`], which undoes completed
//! steps when a later one is refused.

mod batch;
mod memory;
mod row;

pub use batch::{apply_batch, BatchFailure, Mutation};
pub use memory::{MemoryStore, OverlapPolicy};
pub use row::ScheduleRow;

use crate::models::{CourseId, Schedule, ScheduleId};

/// Storage of student schedules.
pub trait ScheduleStore {
    /// Creates an empty schedule and returns its id.
    fn create_schedule(&mut self) -> ScheduleId;

    /// Deletes a schedule. Returns `false` if it does not exist.
    fn remove_schedule(&mut self, schedule_id: ScheduleId) -> bool;

    /// Current state of a schedule (an owned snapshot; reload after
    /// mutating).
    fn load(&self, schedule_id: ScheduleId) -> Option<Schedule>;

    /// Places the catalog offering (course, group) into a schedule.
    fn add_lesson(&mut self, schedule_id: ScheduleId, course_id: CourseId, group_id: &str) -> bool;

    /// Removes the lesson (course, group) from a schedule.
    fn remove_lesson(&mut self, schedule_id: ScheduleId, course_id: CourseId, group_id: &str) -> bool;
}
