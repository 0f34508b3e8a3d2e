//! Conflict-free group assignment.
//!
//! # Algorithm
//! Courses are placed one after another, most constrained first (fewest
//! groups; ties keep catalog order). Within a course, its offered lesson
//! types are filled in order with the first group that collides with
//! nothing placed so far; if a later type has no free group, earlier
//! types of the same course try their next group (depth-first). A course
//! with no complete assignment makes the whole placement fail; placed
//! courses are never revisited.
//!
//! Collisions are screened on a [`TimeSlotMatrix`]. The matrix rounds
//! outward to whole slots, so a hit is only a candidate: it is confirmed
//! by comparing minutes exactly against every placed lesson. Lessons the
//! grid cannot represent completely are always compared exactly.

use tracing::trace;

use crate::catalog::Catalog;
use crate::matrix::{SlotGrid, TimeSlotMatrix};
use crate::models::{CourseId, LessonOffering, LessonType};

/// Picks one group per lesson type for a set of courses.
#[derive(Debug, Clone, Copy)]
pub struct Assigner<'a> {
    catalog: &'a Catalog,
    grid: SlotGrid,
}

impl<'a> Assigner<'a> {
    pub fn new(catalog: &'a Catalog, grid: SlotGrid) -> Self {
        Self { catalog, grid }
    }

    /// Assigns every course on top of `placed`.
    ///
    /// Returns the chosen offerings (grouped by course, in placement
    /// order), or the id of the first course that could not be placed.
    pub fn place_all(
        &self,
        course_ids: &[CourseId],
        placed: &[&'a LessonOffering],
    ) -> Result<Vec<&'a LessonOffering>, CourseId> {
        let mut occupied: Vec<&'a LessonOffering> = placed.to_vec();
        let mut matrix = TimeSlotMatrix::from_offerings(self.grid, placed.iter().copied());
        let start = occupied.len();

        for course_id in self.placement_order(course_ids) {
            let chosen = self
                .place_course(course_id, &occupied, matrix)
                .ok_or(course_id)?;
            for offering in chosen {
                matrix.place(offering);
                occupied.push(offering);
            }
        }
        Ok(occupied.split_off(start))
    }

    /// One group per offered type of `course_id`, colliding with nothing
    /// in `placed` nor with each other.
    pub fn place_course(
        &self,
        course_id: CourseId,
        placed: &[&'a LessonOffering],
        matrix: TimeSlotMatrix,
    ) -> Option<Vec<&'a LessonOffering>> {
        let types = self.catalog.offered_types(course_id);
        let mut occupied = placed.to_vec();
        let mut chosen = Vec::with_capacity(types.len());
        if self.fill(course_id, &types, matrix, &mut occupied, &mut chosen) {
            Some(chosen)
        } else {
            trace!(course_id, "course not placeable");
            None
        }
    }

    /// Courses sorted by ascending group count, then catalog position.
    pub fn placement_order(&self, course_ids: &[CourseId]) -> Vec<CourseId> {
        let mut order = course_ids.to_vec();
        order.sort_by_key(|&id| {
            (
                self.catalog.group_count(id),
                self.catalog.course_position(id).unwrap_or(usize::MAX),
            )
        });
        order
    }

    fn fill(
        &self,
        course_id: CourseId,
        types: &[LessonType],
        matrix: TimeSlotMatrix,
        occupied: &mut Vec<&'a LessonOffering>,
        chosen: &mut Vec<&'a LessonOffering>,
    ) -> bool {
        let Some((&lesson_type, rest)) = types.split_first() else {
            return true;
        };
        for offering in self.catalog.offerings_for(course_id, lesson_type) {
            if self.collides(&matrix, occupied, offering) {
                continue;
            }
            let mut next = matrix;
            next.place(offering);
            occupied.push(offering);
            chosen.push(offering);
            if self.fill(course_id, rest, next, occupied, chosen) {
                return true;
            }
            occupied.pop();
            chosen.pop();
        }
        false
    }

    fn collides(&self, matrix: &TimeSlotMatrix, occupied: &[&LessonOffering], offering: &LessonOffering) -> bool {
        if matrix.conflicts_with(offering) {
            return occupied.iter().any(|p| p.overlaps(offering));
        }
        // Clipped minutes are invisible to the matrix.
        occupied
            .iter()
            .any(|p| (!self.in_grid(p) || !self.in_grid(offering)) && p.overlaps(offering))
    }

    fn in_grid(&self, offering: &LessonOffering) -> bool {
        self.grid.covers(offering.start_min, offering.duration_min)
    }
}
