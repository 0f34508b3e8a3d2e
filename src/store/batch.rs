//! All-or-nothing mutation batches.
//!
//! A batch is applied step by step. When the store refuses a step, the
//! inverses of the completed steps are replayed in reverse order, so the
//! schedule ends up exactly as it was before the batch.

use std::fmt;

use tracing::{error, warn};

use super::ScheduleStore;
use crate::models::{CourseId, ScheduleId};

/// A single-lesson change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Place (course, group).
    Add { course_id: CourseId, group_id: String },
    /// Remove (course, group).
    Remove { course_id: CourseId, group_id: String },
}

impl Mutation {
    pub fn add(course_id: CourseId, group_id: impl Into<String>) -> Self {
        Mutation::Add {
            course_id,
            group_id: group_id.into(),
        }
    }

    pub fn remove(course_id: CourseId, group_id: impl Into<String>) -> Self {
        Mutation::Remove {
            course_id,
            group_id: group_id.into(),
        }
    }

    /// The mutation that undoes this one.
    pub fn inverse(&self) -> Self {
        match self {
            Mutation::Add {
                course_id,
                group_id,
            } => Mutation::remove(*course_id, group_id.clone()),
            Mutation::Remove {
                course_id,
                group_id,
            } => Mutation::add(*course_id, group_id.clone()),
        }
    }

    /// Applies this mutation. Returns the store's verdict.
    pub fn apply<S: ScheduleStore + ?Sized>(&self, store: &mut S, schedule_id: ScheduleId) -> bool {
        match self {
            Mutation::Add {
                course_id,
                group_id,
            } => store.add_lesson(schedule_id, *course_id, group_id),
            Mutation::Remove {
                course_id,
                group_id,
            } => store.remove_lesson(schedule_id, *course_id, group_id),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Add {
                course_id,
                group_id,
            } => write!(f, "add {course_id}/{group_id}"),
            Mutation::Remove {
                course_id,
                group_id,
            } => write!(f, "remove {course_id}/{group_id}"),
        }
    }
}

/// Why a batch did not commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// The refused step.
    pub failed: Mutation,
    /// Steps that had succeeded before the refusal.
    pub completed: usize,
    /// Whether every completed step was undone. `false` only if the store
    /// also refused an inverse, which leaves the schedule modified.
    pub rolled_back: bool,
}

/// Applies `mutations` in order, all or nothing.
pub fn apply_batch<S: ScheduleStore + ?Sized>(
    store: &mut S,
    schedule_id: ScheduleId,
    mutations: &[Mutation],
) -> Result<(), BatchFailure> {
    for (completed, mutation) in mutations.iter().enumerate() {
        if mutation.apply(store, schedule_id) {
            continue;
        }

        warn!(
            schedule_id,
            step = %mutation,
            completed,
            "batch step refused, rolling back"
        );
        let mut rolled_back = true;
        for done in mutations[..completed].iter().rev() {
            let undo = done.inverse();
            if !undo.apply(store, schedule_id) {
                error!(schedule_id, step = %undo, "rollback step refused");
                rolled_back = false;
            }
        }
        return Err(BatchFailure {
            failed: mutation.clone(),
            completed,
            rolled_back,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::{Course, LessonOffering, LessonType, Weekday};
    use crate::store::MemoryStore;

    fn catalog() -> Catalog {
        Catalog::new()
            .with_course(Course::new(100, 3.0))
            .with_offering(LessonOffering::new(100, LessonType::Lecture, "L1", Weekday::Monday, 540, 60))
            .with_offering(LessonOffering::new(100, LessonType::Lecture, "L2", Weekday::Monday, 660, 60))
            .with_offering(LessonOffering::new(100, LessonType::Lab, "LB1", Weekday::Friday, 600, 120))
    }

    #[test]
    fn test_inverse() {
        let m = Mutation::add(100, "L1");
        assert_eq!(m.inverse(), Mutation::remove(100, "L1"));
        assert_eq!(m.inverse().inverse(), m);
    }

    #[test]
    fn test_batch_commits() {
        let catalog = catalog();
        let mut store = MemoryStore::new(&catalog);
        let id = store.create_schedule();
        let batch = [Mutation::add(100, "L1"), Mutation::add(100, "LB1")];
        assert!(apply_batch(&mut store, id, &batch).is_ok());
        assert_eq!(store.load(id).unwrap().lesson_count(), 2);
    }

    #[test]
    fn test_batch_rolls_back_on_refusal() {
        let catalog = catalog();
        let mut store = MemoryStore::new(&catalog);
        let id = store.create_schedule();
        assert!(store.add_lesson(id, 100, "L1"));
        let before = store.load(id).unwrap();

        // Swap L1 for L2, then try to add an unknown group.
        let batch = [
            Mutation::remove(100, "L1"),
            Mutation::add(100, "L2"),
            Mutation::add(100, "NOPE"),
        ];
        let failure = apply_batch(&mut store, id, &batch).unwrap_err();
        assert_eq!(failure.failed, Mutation::add(100, "NOPE"));
        assert_eq!(failure.completed, 2);
        assert!(failure.rolled_back);
        assert_eq!(store.load(id).unwrap(), before);
    }

    #[test]
    fn test_first_step_refused_changes_nothing() {
        let catalog = catalog();
        let mut store = MemoryStore::new(&catalog);
        let id = store.create_schedule();
        let failure = apply_batch(&mut store, id, &[Mutation::remove(100, "L1")]).unwrap_err();
        assert_eq!(failure.completed, 0);
        assert!(failure.rolled_back);
        assert!(store.load(id).unwrap().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Mutation::add(7, "T2").to_string(), "add 7/T2");
        assert_eq!(Mutation::remove(7, "T2").to_string(), "remove 7/T2");
    }
}
