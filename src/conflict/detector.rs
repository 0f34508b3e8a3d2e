//! Pairwise overlap detection.
//!
//! # Algorithm
//! Every unordered index pair `i < j` of the lesson list is examined:
//! lessons on different days are skipped, and the overlap of the
//! half-open ranges `[start, start + duration)` is measured. A positive
//! overlap yields a [`Conflict`] carrying its severity and the strategy
//! hints for its size. O(n²) in the number of lessons.
//!
//! Pairs are identified by index, so two identical lessons at different
//! positions are still compared.

use tracing::trace;

use crate::models::{Conflict, ResolutionStrategy, ScheduledLesson};

/// Overlap (minutes) from which rebuilding the day is suggested.
pub const RESTRUCTURE_THRESHOLD_MIN: u32 = 120;

/// Overlap (minutes) from which replacing a course is suggested.
pub const REPLACE_COURSE_THRESHOLD_MIN: u32 = 180;

/// Finds overlapping lesson pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    pub fn new() -> Self {
        Self
    }

    /// All conflicts, ordered by `(i, j)`.
    pub fn detect(&self, lessons: &[ScheduledLesson]) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        for i in 0..lessons.len() {
            for j in (i + 1)..lessons.len() {
                if let Some(conflict) = self.examine(lessons, i, j) {
                    conflicts.push(conflict);
                }
            }
        }
        conflicts
    }

    /// The conflict between `lessons[i]` and `lessons[j]`, if they overlap.
    pub fn examine(&self, lessons: &[ScheduledLesson], i: usize, j: usize) -> Option<Conflict> {
        let (a, b) = (lessons.get(i)?, lessons.get(j)?);
        let overlap_min = a.offering.overlap_min(&b.offering);
        if overlap_min == 0 {
            return None;
        }
        let longer = a.offering.duration_min.max(b.offering.duration_min);
        let severity = f64::from(overlap_min) / f64::from(longer);
        trace!(
            first = %a.offering.group_id,
            second = %b.offering.group_id,
            overlap_min,
            "overlap found"
        );
        Some(Conflict {
            first: a.clone(),
            second: b.clone(),
            indices: (i, j),
            overlap_min,
            severity,
            resolvable: true,
            strategies: strategies_for(a, b, overlap_min),
        })
    }

    /// Whether any pair overlaps.
    pub fn has_conflicts(&self, lessons: &[ScheduledLesson]) -> bool {
        lessons.iter().enumerate().any(|(i, a)| {
            lessons[i + 1..]
                .iter()
                .any(|b| a.offering.overlaps(&b.offering))
        })
    }

    /// Number of overlapping pairs.
    pub fn count(&self, lessons: &[ScheduledLesson]) -> usize {
        lessons
            .iter()
            .enumerate()
            .map(|(i, a)| {
                lessons[i + 1..]
                    .iter()
                    .filter(|b| a.offering.overlaps(&b.offering))
                    .count()
            })
            .sum()
    }
}

fn strategies_for(a: &ScheduledLesson, b: &ScheduledLesson, overlap_min: u32) -> Vec<ResolutionStrategy> {
    let mut strategies = vec![
        ResolutionStrategy::GroupSubstitution,
        ResolutionStrategy::TimeSlotOptimization,
    ];
    if a.offering.room != b.offering.room {
        strategies.push(ResolutionStrategy::SpatialReallocation);
    }
    if overlap_min >= RESTRUCTURE_THRESHOLD_MIN {
        strategies.push(ResolutionStrategy::ScheduleRestructuring);
        strategies.push(ResolutionStrategy::PriorityRebalancing);
    }
    if overlap_min >= REPLACE_COURSE_THRESHOLD_MIN {
        strategies.push(ResolutionStrategy::AlternativeCourse);
        strategies.push(ResolutionStrategy::CrossSemester);
    }
    strategies
}
