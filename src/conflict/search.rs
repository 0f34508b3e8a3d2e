//! Alternative group search.
//!
//! # Algorithm
//! For a conflict between lesson A (course Ca, type Ta, group Ga) and
//! lesson B (Cb, Tb, Gb):
//!
//! 1. Candidates for A are the catalog groups of (Ca, Ta) other than Ga;
//!    likewise for B. A side without alternatives keeps its current group.
//! 2. Every pair (g1, g2) is enumerated in catalog order. Pairs where g1
//!    and g2 overlap each other are rejected. Otherwise the residual is
//!    the number of overlaps of g1 and of g2 with the other lessons of
//!    the schedule (A and B themselves excluded).
//! 3. The first pair with residual 0 wins immediately.
//! 4. Otherwise the lowest residual wins; ties go to the earlier pair.
//!
//! The search only reads the schedule; applying the result is the
//! resolver's job.

use tracing::trace;

use crate::catalog::Catalog;
use crate::models::{Conflict, LessonOffering, ScheduledLesson};
use crate::store::Mutation;

/// One side of a substitution: the lesson currently placed and the
/// offering that should take its place (possibly the same group).
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    pub original: ScheduledLesson,
    pub offering: LessonOffering,
}

impl Replacement {
    /// Whether the group actually changes.
    pub fn is_change(&self) -> bool {
        self.original.group_id() != self.offering.group_id
    }
}

/// A replacement pair for the two lessons of a conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub first: Replacement,
    pub second: Replacement,
    /// Overlaps the replacements still have with the rest of the schedule.
    pub residual_conflicts: usize,
    /// Conflicts touching the two original lessons, the conflict itself
    /// included.
    pub baseline_conflicts: usize,
}

impl Substitution {
    /// Whether the replacements overlap nothing.
    pub fn is_perfect(&self) -> bool {
        self.residual_conflicts == 0
    }

    /// Whether applying strictly lowers the conflicts around the pair.
    pub fn improves(&self) -> bool {
        self.residual_conflicts < self.baseline_conflicts
    }

    /// The batch that applies this substitution: removals of every
    /// replaced lesson, then additions of their replacements.
    pub fn mutations(&self) -> Vec<Mutation> {
        let sides: Vec<&Replacement> = [&self.first, &self.second]
            .into_iter()
            .filter(|r| r.is_change())
            .collect();
        let removes = sides
            .iter()
            .map(|r| Mutation::remove(r.original.course_id(), r.original.group_id()));
        let adds = sides
            .iter()
            .map(|r| Mutation::add(r.offering.course_id, r.offering.group_id.clone()));
        removes.chain(adds).collect()
    }
}

/// Result of an alternative search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A pair that overlaps nothing else.
    Perfect(Substitution),
    /// The pair with the fewest remaining overlaps.
    BestEffort(Substitution),
    /// No alternatives, or every pair overlaps itself.
    NoViablePair,
}

impl SearchOutcome {
    pub fn substitution(&self) -> Option<&Substitution> {
        match self {
            SearchOutcome::Perfect(s) | SearchOutcome::BestEffort(s) => Some(s),
            SearchOutcome::NoViablePair => None,
        }
    }

    pub fn is_perfect(&self) -> bool {
        matches!(self, SearchOutcome::Perfect(_))
    }
}

/// Searches the catalog for groups that dissolve a conflict.
#[derive(Debug, Clone, Copy)]
pub struct AlternativeSearch<'a> {
    catalog: &'a Catalog,
}

impl<'a> AlternativeSearch<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Finds the best replacement pair for `conflict`.
    ///
    /// `lessons` must be the lesson list the conflict was detected on;
    /// `conflict.indices` locate the two lessons being replaced.
    pub fn find(&self, conflict: &Conflict, lessons: &[ScheduledLesson]) -> SearchOutcome {
        let (a, b) = (&conflict.first, &conflict.second);
        let (ia, ib) = conflict.indices;
        let others: Vec<&LessonOffering> = lessons
            .iter()
            .enumerate()
            .filter(|&(k, _)| k != ia && k != ib)
            .map(|(_, l)| &l.offering)
            .collect();

        let mut first_options = self.alternatives(a);
        let mut second_options = self.alternatives(b);
        match (first_options.is_empty(), second_options.is_empty()) {
            (true, true) => return SearchOutcome::NoViablePair,
            (true, false) => first_options.push(&a.offering),
            (false, true) => second_options.push(&b.offering),
            (false, false) => {}
        }

        let overlaps_with_others =
            |g: &LessonOffering| others.iter().filter(|o| o.overlaps(g)).count();
        let baseline = overlaps_with_others(&a.offering) + overlaps_with_others(&b.offering) + 1;

        let mut best: Option<(usize, &LessonOffering, &LessonOffering)> = None;
        for &g1 in &first_options {
            for &g2 in &second_options {
                if g1.overlaps(g2) {
                    trace!(first = %g1.group_id, second = %g2.group_id, "pair overlaps itself");
                    continue;
                }
                let residual = overlaps_with_others(g1) + overlaps_with_others(g2);
                trace!(first = %g1.group_id, second = %g2.group_id, residual, "pair evaluated");
                if best.map_or(true, |(r, _, _)| residual < r) {
                    best = Some((residual, g1, g2));
                }
                if residual == 0 {
                    break;
                }
            }
            if matches!(best, Some((0, _, _))) {
                break;
            }
        }

        let Some((residual, g1, g2)) = best else {
            return SearchOutcome::NoViablePair;
        };
        let substitution = Substitution {
            first: Replacement {
                original: a.clone(),
                offering: g1.clone(),
            },
            second: Replacement {
                original: b.clone(),
                offering: g2.clone(),
            },
            residual_conflicts: residual,
            baseline_conflicts: baseline,
        };
        if residual == 0 {
            SearchOutcome::Perfect(substitution)
        } else {
            SearchOutcome::BestEffort(substitution)
        }
    }

    /// Catalog groups of the lesson's (course, type) other than its own.
    fn alternatives(&self, lesson: &ScheduledLesson) -> Vec<&'a LessonOffering> {
        self.catalog
            .offerings_for(lesson.course_id(), lesson.lesson_type())
            .iter()
            .filter(|o| o.group_id != lesson.group_id())
            .collect()
    }
}
