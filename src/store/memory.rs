//! In-memory schedule store backed by the catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::ScheduleStore;
use crate::catalog::Catalog;
use crate::models::{CourseId, Schedule, ScheduleId};

/// Whether [`MemoryStore::add_lesson`] accepts lessons that overlap an
/// already placed lesson.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Overlaps are stored and left for the conflict detector.
    #[default]
    Permit,
    /// Overlapping adds are refused.
    Reject,
}

/// Schedules kept in a map, resolving (course, group) through a catalog.
///
/// Ids start at 1; a new id is one past the largest ever issued.
#[derive(Debug, Clone)]
pub struct MemoryStore<'a> {
    catalog: &'a Catalog,
    schedules: BTreeMap<ScheduleId, Schedule>,
    next_id: ScheduleId,
    policy: OverlapPolicy,
}

impl<'a> MemoryStore<'a> {
    /// Creates an empty store.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            schedules: BTreeMap::new(),
            next_id: 1,
            policy: OverlapPolicy::default(),
        }
    }

    /// Sets the overlap policy.
    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Ids of all stored schedules, ascending.
    pub fn schedule_ids(&self) -> Vec<ScheduleId> {
        self.schedules.keys().copied().collect()
    }

    /// Borrowed view of a schedule.
    pub fn get(&self, schedule_id: ScheduleId) -> Option<&Schedule> {
        self.schedules.get(&schedule_id)
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}

impl ScheduleStore for MemoryStore<'_> {
    fn create_schedule(&mut self) -> ScheduleId {
        let id = self.next_id;
        self.next_id += 1;
        self.schedules.insert(id, Schedule::new(id));
        debug!(schedule_id = id, "schedule created");
        id
    }

    fn remove_schedule(&mut self, schedule_id: ScheduleId) -> bool {
        self.schedules.remove(&schedule_id).is_some()
    }

    fn load(&self, schedule_id: ScheduleId) -> Option<Schedule> {
        self.schedules.get(&schedule_id).cloned()
    }

    fn add_lesson(&mut self, schedule_id: ScheduleId, course_id: CourseId, group_id: &str) -> bool {
        let catalog = self.catalog;
        let Some(offering) = catalog.offering(course_id, group_id) else {
            trace!(schedule_id, course_id, group_id, "add refused: unknown group");
            return false;
        };
        let Some(schedule) = self.schedules.get_mut(&schedule_id) else {
            return false;
        };
        if self.policy == OverlapPolicy::Reject && !schedule.overlapping(offering).is_empty() {
            trace!(schedule_id, course_id, group_id, "add refused: overlap");
            return false;
        }
        schedule.place(offering)
    }

    fn remove_lesson(&mut self, schedule_id: ScheduleId, course_id: CourseId, group_id: &str) -> bool {
        self.schedules
            .get_mut(&schedule_id)
            .and_then(|s| s.remove(course_id, group_id))
            .is_some()
    }
}
