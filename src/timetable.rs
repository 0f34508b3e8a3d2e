//! Timetable facade.
//!
//! Binds a catalog, a schedule store and a configuration, and exposes the
//! engine's operations on stored schedules.

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::TimetableConfig;
use crate::conflict::{ConflictDetector, ConflictResolver, ResolutionReport};
use crate::error::{Result, TimetableError};
use crate::generator::{Assigner, GeneratedSchedule, ScheduleGenerator};
use crate::matrix::TimeSlotMatrix;
use crate::metrics::ScheduleMetrics;
use crate::models::{Conflict, CourseId, LessonOffering, Schedule, ScheduleId};
use crate::store::{apply_batch, Mutation, ScheduleStore};

/// Course timetabling engine over a schedule store.
///
/// # Example
/// ```
/// use u_timetable::catalog::Catalog;
/// use u_timetable::models::{Course, LessonOffering, LessonType, Weekday};
/// use u_timetable::store::{MemoryStore, ScheduleStore};
/// use u_timetable::Timetable;
///
/// let catalog = Catalog::new()
///     .with_course(Course::new(100, 3.0))
///     .with_course(Course::new(200, 3.0))
///     .with_offering(LessonOffering::new(100, LessonType::Lecture, "L1", Weekday::Monday, 540, 60))
///     .with_offering(LessonOffering::new(200, LessonType::Lecture, "L1", Weekday::Monday, 540, 60))
///     .with_offering(LessonOffering::new(200, LessonType::Lecture, "L2", Weekday::Monday, 660, 60));
///
/// let mut timetable = Timetable::new(&catalog, MemoryStore::new(&catalog));
/// let id = timetable.store_mut().create_schedule();
/// timetable.store_mut().add_lesson(id, 100, "L1");
/// timetable.store_mut().add_lesson(id, 200, "L1");
///
/// assert_eq!(timetable.detect_conflicts(id).unwrap().len(), 1);
/// let report = timetable.resolve_conflicts(id, true).unwrap();
/// assert_eq!(report.resolved_count, 1);
/// assert_eq!(report.remaining_count, 0);
/// ```
#[derive(Debug)]
pub struct Timetable<'a, S: ScheduleStore> {
    catalog: &'a Catalog,
    store: S,
    config: TimetableConfig,
    generator: ScheduleGenerator<'a>,
}

impl<'a, S: ScheduleStore> Timetable<'a, S> {
    /// Creates an engine with the default configuration.
    pub fn new(catalog: &'a Catalog, store: S) -> Self {
        let config = TimetableConfig::default();
        Self {
            catalog,
            store,
            generator: Self::build_generator(catalog, &config),
            config,
        }
    }

    /// Replaces the configuration (and re-seeds the generator if it
    /// carries a seed).
    pub fn with_config(mut self, config: TimetableConfig) -> Self {
        self.generator = Self::build_generator(self.catalog, &config);
        self.config = config;
        self
    }

    fn build_generator(catalog: &'a Catalog, config: &TimetableConfig) -> ScheduleGenerator<'a> {
        ScheduleGenerator::new(catalog)
            .with_config(config.generator.clone())
            .with_grid(config.grid)
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Gives the store back.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Current state of a schedule.
    pub fn schedule(&self, schedule_id: ScheduleId) -> Result<Schedule> {
        self.store
            .load(schedule_id)
            .ok_or(TimetableError::ScheduleNotFound(schedule_id))
    }

    /// All overlapping lesson pairs of a schedule.
    pub fn detect_conflicts(&self, schedule_id: ScheduleId) -> Result<Vec<Conflict>> {
        let schedule = self.schedule(schedule_id)?;
        let conflicts = ConflictDetector::new().detect(&schedule.lessons);
        debug!(schedule_id, conflicts = conflicts.len(), "conflicts detected");
        Ok(conflicts)
    }

    /// Fixes conflicts (`apply_fixes`), or only proposes fixes without
    /// touching the schedule.
    pub fn resolve_conflicts(&mut self, schedule_id: ScheduleId, apply_fixes: bool) -> Result<ResolutionReport> {
        let resolver = ConflictResolver::new(self.catalog).with_config(self.config.resolver.clone());
        if apply_fixes {
            resolver.resolve(&mut self.store, schedule_id)
        } else {
            resolver.propose(&self.store, schedule_id)
        }
    }

    /// Generates and stores a conflict-free schedule whose credits are
    /// within `target ± tolerance`.
    pub fn generate_schedule(&mut self, target: f64, tolerance: f64) -> Result<GeneratedSchedule> {
        self.generator.generate(&mut self.store, target, tolerance)
    }

    /// Adds one group of every offered lesson type of a course to an
    /// existing schedule, without creating conflicts. All or nothing.
    ///
    /// Returns the placed offerings.
    pub fn add_complete_course(&mut self, schedule_id: ScheduleId, course_id: CourseId) -> Result<Vec<LessonOffering>> {
        let schedule = self.schedule(schedule_id)?;
        if self.catalog.course(course_id).is_none() {
            return Err(TimetableError::CourseNotFound(course_id));
        }
        if !self.catalog.has_offerings(course_id) {
            return Err(TimetableError::InvalidInput(format!(
                "course {course_id} has no lesson offerings"
            )));
        }
        if schedule.contains_course(course_id) {
            return Err(TimetableError::InvalidInput(format!(
                "course {course_id} is already in schedule {schedule_id}"
            )));
        }

        let placed: Vec<&LessonOffering> = schedule.lessons.iter().map(|l| &l.offering).collect();
        let matrix = TimeSlotMatrix::from_offerings(self.config.grid, placed.iter().copied());
        let chosen = Assigner::new(self.catalog, self.config.grid)
            .place_course(course_id, &placed, matrix)
            .ok_or(TimetableError::Unplaceable { course_id })?;

        let mutations: Vec<Mutation> = chosen
            .iter()
            .map(|o| Mutation::add(o.course_id, o.group_id.clone()))
            .collect();
        apply_batch(&mut self.store, schedule_id, &mutations).map_err(|failure| {
            TimetableError::StoreRejected {
                schedule_id,
                mutation: failure.failed,
                rolled_back: failure.rolled_back,
            }
        })?;

        info!(
            event = "course_added",
            schedule_id,
            course_id,
            lessons = chosen.len(),
            "complete course added"
        );
        Ok(chosen.into_iter().cloned().collect())
    }

    /// Summary metrics of a schedule.
    pub fn metrics(&self, schedule_id: ScheduleId) -> Result<ScheduleMetrics> {
        let schedule = self.schedule(schedule_id)?;
        Ok(ScheduleMetrics::calculate(&schedule, self.catalog, self.config.grid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::models::{Course, LessonType, Weekday};
    use crate::store::MemoryStore;

    fn offering(course: CourseId, kind: LessonType, group: &str, day: Weekday, start: u32) -> LessonOffering {
        LessonOffering::new(course, kind, group, day, start, 60)
    }

    fn sample_catalog() -> Catalog {
        Catalog::new()
            .with_course(Course::new(100, 3.0))
            .with_course(Course::new(200, 3.0))
            .with_course(Course::new(300, 2.0))
            .with_course(Course::new(400, 1.0))
            .with_offering(offering(100, LessonType::Lecture, "L1", Weekday::Monday, 540))
            .with_offering(offering(200, LessonType::Lecture, "L1", Weekday::Monday, 540))
            .with_offering(offering(200, LessonType::Lecture, "L2", Weekday::Monday, 660))
            .with_offering(offering(300, LessonType::Lecture, "L1", Weekday::Monday, 540))
            .with_offering(offering(300, LessonType::Lecture, "L2", Weekday::Tuesday, 540))
            .with_offering(offering(300, LessonType::Lab, "LB1", Weekday::Tuesday, 540))
            .with_offering(offering(300, LessonType::Lab, "LB2", Weekday::Tuesday, 600))
    }

    fn seeded(catalog: &Catalog) -> Timetable<'_, MemoryStore<'_>> {
        let config = TimetableConfig::default()
            .with_generator(GeneratorConfig::default().with_seed(42));
        Timetable::new(catalog, MemoryStore::new(catalog)).with_config(config)
    }

    #[test]
    fn test_detect_and_resolve() {
        let catalog = sample_catalog();
        let mut tt = seeded(&catalog);
        let id = tt.store_mut().create_schedule();
        assert!(tt.store_mut().add_lesson(id, 100, "L1"));
        assert!(tt.store_mut().add_lesson(id, 200, "L1"));

        assert_eq!(tt.detect_conflicts(id).unwrap().len(), 1);
        let report = tt.resolve_conflicts(id, true).unwrap();
        assert_eq!((report.resolved_count, report.remaining_count), (1, 0));
        assert!(tt.detect_conflicts(id).unwrap().is_empty());
    }

    #[test]
    fn test_dry_run_leaves_schedule() {
        let catalog = sample_catalog();
        let mut tt = seeded(&catalog);
        let id = tt.store_mut().create_schedule();
        assert!(tt.store_mut().add_lesson(id, 100, "L1"));
        assert!(tt.store_mut().add_lesson(id, 200, "L1"));
        let before = tt.schedule(id).unwrap();

        let report = tt.resolve_conflicts(id, false).unwrap();
        assert_eq!(report.proposals.len(), 1);
        assert_eq!(tt.schedule(id).unwrap(), before);
    }

    #[test]
    fn test_resolve_is_idempotent_on_clean_schedule() {
        let catalog = sample_catalog();
        let mut tt = seeded(&catalog);
        let id = tt.store_mut().create_schedule();
        assert!(tt.store_mut().add_lesson(id, 100, "L1"));
        let before = tt.schedule(id).unwrap();
        let report = tt.resolve_conflicts(id, true).unwrap();
        assert_eq!((report.resolved_count, report.remaining_count), (0, 0));
        assert_eq!(tt.schedule(id).unwrap(), before);
    }

    #[test]
    fn test_generate_schedule() {
        let catalog = sample_catalog();
        let mut tt = seeded(&catalog);
        let generated = tt.generate_schedule(6.0, 0.5).unwrap();
        let metrics = tt.metrics(generated.schedule_id).unwrap();
        assert!(metrics.meets_credit_target(6.0, 0.5));
        assert_eq!(metrics.conflict_count, 0);
    }

    #[test]
    fn test_add_complete_course() {
        let catalog = sample_catalog();
        let mut tt = seeded(&catalog);
        let id = tt.store_mut().create_schedule();
        assert!(tt.store_mut().add_lesson(id, 100, "L1"));

        let placed = tt.add_complete_course(id, 300).unwrap();
        let groups: Vec<&str> = placed.iter().map(|o| o.group_id.as_str()).collect();
        // L1 collides with 100/L1; L2 blocks LB1, so LB2 is taken.
        assert_eq!(groups, vec!["L2", "LB2"]);
        assert!(tt.detect_conflicts(id).unwrap().is_empty());
        assert_eq!(tt.schedule(id).unwrap().lesson_count(), 3);
    }

    #[test]
    fn test_add_complete_course_errors() {
        let catalog = sample_catalog();
        let mut tt = seeded(&catalog);
        let id = tt.store_mut().create_schedule();
        assert!(tt.store_mut().add_lesson(id, 100, "L1"));

        assert!(matches!(
            tt.add_complete_course(id + 1, 300),
            Err(TimetableError::ScheduleNotFound(_))
        ));
        assert!(matches!(
            tt.add_complete_course(id, 999),
            Err(TimetableError::CourseNotFound(999))
        ));
        assert!(matches!(
            tt.add_complete_course(id, 400),
            Err(TimetableError::InvalidInput(_))
        ));
        assert!(matches!(
            tt.add_complete_course(id, 100),
            Err(TimetableError::InvalidInput(_))
        ));
        assert!(tt.store_mut().remove_lesson(id, 100, "L1"));
        assert!(tt.store_mut().add_lesson(id, 200, "L1"));
        let before = tt.schedule(id).unwrap();
        // 100's only lecture collides with 200/L1.
        assert!(matches!(
            tt.add_complete_course(id, 100),
            Err(TimetableError::Unplaceable { course_id: 100 })
        ));
        assert_eq!(tt.schedule(id).unwrap(), before);
    }

    #[test]
    fn test_unknown_schedule() {
        let catalog = sample_catalog();
        let mut tt = seeded(&catalog);
        assert!(matches!(tt.detect_conflicts(9), Err(TimetableError::ScheduleNotFound(9))));
        assert!(matches!(tt.resolve_conflicts(9, true), Err(TimetableError::ScheduleNotFound(9))));
        assert!(matches!(tt.metrics(9), Err(TimetableError::ScheduleNotFound(9))));
        let store = tt.into_store();
        assert!(store.is_empty());
    }
}
