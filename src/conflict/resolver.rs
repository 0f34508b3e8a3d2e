//! Round-based conflict resolution.
//!
//! # Algorithm
//! Each round reloads the schedule, detects its conflicts and tries to fix
//! up to `max_fixes_per_round` of them in detection order. A fix is the
//! [`AlternativeSearch`] result applied as one batch (remove the replaced
//! lessons, add their replacements), undone entirely if the store refuses
//! any step. A best-effort result is only applied when it lowers the
//! conflicts around the pair. Rounds stop when nothing remains, when a
//! round applies nothing, or after `max_rounds`.
//!
//! Fixing one conflict changes the schedule, so every later conflict of
//! the round is re-located by lesson identity on a fresh snapshot before
//! it is handled; conflicts whose lessons moved or no longer overlap are
//! left to the next round.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{AlternativeSearch, ConflictDetector, SearchOutcome, Substitution};
use crate::catalog::Catalog;
use crate::config::ResolverConfig;
use crate::error::{Result, TimetableError};
use crate::models::{Conflict, ConflictKey, Schedule, ScheduleId};
use crate::store::{apply_batch, ScheduleStore};

/// Why a conflict is still present after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedReason {
    /// No alternative groups exist; needs manual intervention.
    NoViablePair,
    /// The best available pair would not lower the conflict count.
    NoImprovement,
    /// The store refused the substitution; it was rolled back.
    RolledBack,
    /// The round or fix budget ran out before the conflict was handled.
    BudgetExhausted,
}

/// A remaining conflict with the reason it was not fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedConflict {
    pub conflict: Conflict,
    pub reason: UnresolvedReason,
}

/// A dry-run search result for one conflict.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub conflict: Conflict,
    pub outcome: SearchOutcome,
}

/// Outcome of a resolution run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionReport {
    /// Rounds that ran detection on a conflicting schedule.
    pub rounds: usize,
    /// Conflicts before the run.
    pub initial_count: usize,
    /// `initial_count - remaining_count`, saturating.
    pub resolved_count: usize,
    /// Conflicts after the run.
    pub remaining_count: usize,
    /// Substitutions applied, in order.
    pub applied: Vec<Substitution>,
    /// Remaining conflicts and why each was left.
    pub unresolved: Vec<UnresolvedConflict>,
    /// Search results per conflict (dry runs only).
    pub proposals: Vec<Proposal>,
}

impl ResolutionReport {
    /// Whether the schedule ended conflict-free.
    pub fn is_clean(&self) -> bool {
        self.remaining_count == 0
    }
}

/// Detects and fixes conflicts of stored schedules.
#[derive(Debug, Clone)]
pub struct ConflictResolver<'a> {
    config: ResolverConfig,
    detector: ConflictDetector,
    search: AlternativeSearch<'a>,
}

impl<'a> ConflictResolver<'a> {
    /// Creates a resolver with default caps.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            config: ResolverConfig::default(),
            detector: ConflictDetector::new(),
            search: AlternativeSearch::new(catalog),
        }
    }

    /// Sets the caps.
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs resolution rounds on a stored schedule.
    pub fn resolve<S: ScheduleStore + ?Sized>(
        &self,
        store: &mut S,
        schedule_id: ScheduleId,
    ) -> Result<ResolutionReport> {
        let initial = self.detector.detect(&load(store, schedule_id)?.lessons);
        let mut report = ResolutionReport {
            initial_count: initial.len(),
            ..ResolutionReport::default()
        };
        if initial.is_empty() {
            return Ok(report);
        }
        info!(
            event = "resolve_start",
            schedule_id,
            conflicts = initial.len(),
            "resolving conflicts"
        );

        let mut reasons: HashMap<ConflictKey, UnresolvedReason> = HashMap::new();
        for round in 1..=self.config.max_rounds {
            let conflicts = self.detector.detect(&load(store, schedule_id)?.lessons);
            if conflicts.is_empty() {
                break;
            }
            report.rounds = round;

            let mut fixes = 0;
            for stale in &conflicts {
                if fixes >= self.config.max_fixes_per_round {
                    break;
                }
                let current = load(store, schedule_id)?;
                let Some(conflict) = self.relocate(&current, stale) else {
                    continue;
                };

                let outcome = self.search.find(&conflict, &current.lessons);
                let substitution = match outcome {
                    SearchOutcome::NoViablePair => {
                        warn!(
                            schedule_id,
                            conflict = %conflict,
                            "no alternative groups, manual intervention required"
                        );
                        reasons.insert(conflict.key(), UnresolvedReason::NoViablePair);
                        continue;
                    }
                    SearchOutcome::BestEffort(s) if !s.improves() => {
                        debug!(
                            schedule_id,
                            residual = s.residual_conflicts,
                            baseline = s.baseline_conflicts,
                            "best pair does not improve, skipped"
                        );
                        reasons.insert(conflict.key(), UnresolvedReason::NoImprovement);
                        continue;
                    }
                    SearchOutcome::Perfect(s) | SearchOutcome::BestEffort(s) => s,
                };

                match apply_batch(store, schedule_id, &substitution.mutations()) {
                    Ok(()) => {
                        debug!(
                            schedule_id,
                            round,
                            first = %substitution.first.offering.group_id,
                            second = %substitution.second.offering.group_id,
                            residual = substitution.residual_conflicts,
                            "substitution applied"
                        );
                        reasons.remove(&conflict.key());
                        report.applied.push(substitution);
                        fixes += 1;
                    }
                    Err(failure) if failure.rolled_back => {
                        reasons.insert(conflict.key(), UnresolvedReason::RolledBack);
                    }
                    Err(failure) => {
                        return Err(TimetableError::StoreRejected {
                            schedule_id,
                            mutation: failure.failed,
                            rolled_back: false,
                        });
                    }
                }
            }

            if fixes == 0 {
                break;
            }
        }

        let remaining = self.detector.detect(&load(store, schedule_id)?.lessons);
        report.remaining_count = remaining.len();
        report.resolved_count = report.initial_count.saturating_sub(remaining.len());
        report.unresolved = remaining
            .into_iter()
            .map(|conflict| {
                let reason = reasons
                    .get(&conflict.key())
                    .copied()
                    .unwrap_or(UnresolvedReason::BudgetExhausted);
                UnresolvedConflict { conflict, reason }
            })
            .collect();

        info!(
            event = "resolve_end",
            schedule_id,
            rounds = report.rounds,
            applied = report.applied.len(),
            resolved = report.resolved_count,
            remaining = report.remaining_count,
            "resolution finished"
        );
        Ok(report)
    }

    /// Searches every conflict of a stored schedule without changing it.
    pub fn propose<S: ScheduleStore + ?Sized>(
        &self,
        store: &S,
        schedule_id: ScheduleId,
    ) -> Result<ResolutionReport> {
        let schedule = load(store, schedule_id)?;
        let conflicts = self.detector.detect(&schedule.lessons);
        let proposals: Vec<Proposal> = conflicts
            .iter()
            .map(|conflict| Proposal {
                conflict: conflict.clone(),
                outcome: self.search.find(conflict, &schedule.lessons),
            })
            .collect();
        debug!(schedule_id, proposals = proposals.len(), "dry run finished");

        Ok(ResolutionReport {
            initial_count: conflicts.len(),
            remaining_count: conflicts.len(),
            proposals,
            ..ResolutionReport::default()
        })
    }

    /// The conflict between the same two lessons in the current schedule,
    /// if both are still placed and still overlap.
    fn relocate(&self, current: &Schedule, stale: &Conflict) -> Option<Conflict> {
        let i = current.position(stale.first.course_id(), stale.first.group_id())?;
        let j = current.position(stale.second.course_id(), stale.second.group_id())?;
        self.detector.examine(&current.lessons, i.min(j), i.max(j))
    }
}

fn load<S: ScheduleStore + ?Sized>(store: &S, schedule_id: ScheduleId) -> Result<Schedule> {
    store
        .load(schedule_id)
        .ok_or(TimetableError::ScheduleNotFound(schedule_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, CourseId, LessonOffering, LessonType, Weekday};
    use crate::store::{MemoryStore, Mutation};

    fn lecture(course: CourseId, group: &str, day: Weekday, start: u32) -> LessonOffering {
        LessonOffering::new(course, LessonType::Lecture, group, day, start, 60)
    }

    fn sample_catalog() -> Catalog {
        Catalog::new()
            .with_course(Course::new(100, 3.0))
            .with_course(Course::new(200, 3.0))
            .with_offering(lecture(100, "L1", Weekday::Monday, 540))
            .with_offering(lecture(200, "L1", Weekday::Monday, 540))
            .with_offering(lecture(200, "L2", Weekday::Monday, 660))
    }

    fn conflicting_schedule(store: &mut MemoryStore<'_>) -> ScheduleId {
        let id = store.create_schedule();
        assert!(store.add_lesson(id, 100, "L1"));
        assert!(store.add_lesson(id, 200, "L1"));
        id
    }

    /// Refuses adds of the listed (course, group) pairs; otherwise delegates.
    struct RefusingStore<'a> {
        inner: MemoryStore<'a>,
        refuse: &'static [(CourseId, &'static str)],
    }

    impl ScheduleStore for RefusingStore<'_> {
        fn create_schedule(&mut self) -> ScheduleId {
            self.inner.create_schedule()
        }
        fn remove_schedule(&mut self, id: ScheduleId) -> bool {
            self.inner.remove_schedule(id)
        }
        fn load(&self, id: ScheduleId) -> Option<Schedule> {
            self.inner.load(id)
        }
        fn add_lesson(&mut self, id: ScheduleId, course_id: CourseId, group_id: &str) -> bool {
            if self.refuse.contains(&(course_id, group_id)) {
                return false;
            }
            self.inner.add_lesson(id, course_id, group_id)
        }
        fn remove_lesson(&mut self, id: ScheduleId, course_id: CourseId, group_id: &str) -> bool {
            self.inner.remove_lesson(id, course_id, group_id)
        }
    }

    #[test]
    fn test_resolves_simple_conflict() {
        let catalog = sample_catalog();
        let mut store = MemoryStore::new(&catalog);
        let id = conflicting_schedule(&mut store);

        let report = ConflictResolver::new(&catalog).resolve(&mut store, id).unwrap();
        assert_eq!(report.initial_count, 1);
        assert_eq!(report.resolved_count, 1);
        assert_eq!(report.remaining_count, 0);
        assert_eq!(report.applied.len(), 1);
        assert!(report.is_clean());

        let schedule = store.load(id).unwrap();
        assert!(schedule.find(100, "L1").is_some());
        assert!(schedule.find(200, "L2").is_some());
        assert!(schedule.find(200, "L1").is_none());
    }

    #[test]
    fn test_conflict_free_schedule_is_untouched() {
        let catalog = sample_catalog();
        let mut store = MemoryStore::new(&catalog);
        let id = store.create_schedule();
        assert!(store.add_lesson(id, 100, "L1"));
        assert!(store.add_lesson(id, 200, "L2"));
        let before = store.load(id).unwrap();

        let report = ConflictResolver::new(&catalog).resolve(&mut store, id).unwrap();
        assert_eq!(report.resolved_count, 0);
        assert_eq!(report.remaining_count, 0);
        assert_eq!(report.rounds, 0);
        assert_eq!(store.load(id).unwrap(), before);
    }

    #[test]
    fn test_no_alternatives_reported_not_fatal() {
        let catalog = Catalog::new()
            .with_offering(lecture(100, "L1", Weekday::Monday, 540))
            .with_offering(lecture(200, "L1", Weekday::Monday, 540));
        let mut store = MemoryStore::new(&catalog);
        let id = conflicting_schedule(&mut store);

        let report = ConflictResolver::new(&catalog).resolve(&mut store, id).unwrap();
        assert_eq!(report.resolved_count, 0);
        assert_eq!(report.remaining_count, 1);
        assert_eq!(report.unresolved[0].reason, UnresolvedReason::NoViablePair);
        assert_eq!(report.rounds, 1);
    }

    #[test]
    fn test_refused_substitution_is_rolled_back() {
        let catalog = sample_catalog();
        let mut store = RefusingStore {
            inner: MemoryStore::new(&catalog),
            refuse: &[(200, "L2")],
        };
        let id = store.create_schedule();
        assert!(store.add_lesson(id, 100, "L1"));
        assert!(store.add_lesson(id, 200, "L1"));
        let before = store.load(id).unwrap();

        let report = ConflictResolver::new(&catalog).resolve(&mut store, id).unwrap();
        assert_eq!(report.remaining_count, 1);
        assert_eq!(report.unresolved[0].reason, UnresolvedReason::RolledBack);
        let after = store.load(id).unwrap();
        assert_eq!(after.lesson_count(), before.lesson_count());
        for lesson in &before.lessons {
            assert!(after.find(lesson.course_id(), lesson.group_id()).is_some());
        }
    }

    #[test]
    fn test_failed_rollback_is_fatal() {
        let catalog = sample_catalog();
        let mut inner = MemoryStore::new(&catalog);
        let id = conflicting_schedule(&mut inner);
        // Neither the new group nor the restore of the old one is accepted.
        let mut store = RefusingStore {
            inner,
            refuse: &[(200, "L2"), (200, "L1")],
        };

        let err = ConflictResolver::new(&catalog).resolve(&mut store, id).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::StoreRejected {
                rolled_back: false,
                mutation: Mutation::Add { course_id: 200, .. },
                ..
            }
        ));
        assert!(store.load(id).unwrap().find(200, "L1").is_none());
    }

    #[test]
    fn test_fix_budget_per_round() {
        // Three independent conflicts, one fix per round, one round.
        let mut catalog = Catalog::new();
        for (course, day) in [(1, Weekday::Monday), (3, Weekday::Tuesday), (5, Weekday::Wednesday)] {
            catalog.add_offering(lecture(course, "L1", day, 540));
            catalog.add_offering(lecture(course + 1, "L1", day, 540));
            catalog.add_offering(lecture(course + 1, "L2", day, 720));
        }
        let mut store = MemoryStore::new(&catalog);
        let id = store.create_schedule();
        for course in 1..=6 {
            assert!(store.add_lesson(id, course, "L1"));
        }

        let resolver = ConflictResolver::new(&catalog)
            .with_config(ResolverConfig::default().with_max_rounds(1).with_max_fixes_per_round(1));
        let report = resolver.resolve(&mut store, id).unwrap();
        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.remaining_count, 2);
        assert!(report
            .unresolved
            .iter()
            .all(|u| u.reason == UnresolvedReason::BudgetExhausted));

        // Default caps finish the job.
        let report = ConflictResolver::new(&catalog).resolve(&mut store, id).unwrap();
        assert_eq!(report.initial_count, 2);
        assert!(report.is_clean());
    }

    #[test]
    fn test_propose_does_not_mutate() {
        let catalog = sample_catalog();
        let mut store = MemoryStore::new(&catalog);
        let id = conflicting_schedule(&mut store);
        let before = store.load(id).unwrap();

        let report = ConflictResolver::new(&catalog).propose(&store, id).unwrap();
        assert_eq!(report.proposals.len(), 1);
        assert_eq!(report.resolved_count, 0);
        assert_eq!(report.remaining_count, 1);
        let s = report.proposals[0].outcome.substitution().unwrap();
        assert_eq!(
            s.mutations(),
            vec![Mutation::remove(200, "L1"), Mutation::add(200, "L2")]
        );
        assert_eq!(store.load(id).unwrap(), before);
    }

    #[test]
    fn test_unknown_schedule() {
        let catalog = sample_catalog();
        let mut store = MemoryStore::new(&catalog);
        let err = ConflictResolver::new(&catalog).resolve(&mut store, 42).unwrap_err();
        assert!(matches!(err, TimetableError::ScheduleNotFound(42)));
    }
}
