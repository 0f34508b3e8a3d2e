//! Credit-targeted schedule generation.
//!
//! # Algorithm
//! 1. Sample candidate course sets whose credit sum is within
//!    `target ± tolerance` ([`sample_candidates`]).
//! 2. Test candidates in sampling order: assign one group per offered
//!    lesson type of every course without overlaps ([`Assigner`]).
//! 3. The first fully placeable candidate is written to a new schedule as
//!    one batch; if the store refuses any lesson, the schedule is removed
//!    again.
//!
//! The search is randomized; set `random_seed` for reproducible output.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling", Artificial
//! Intelligence Review 13(2), section on course timetabling.

mod assign;
mod sampler;

pub use assign::Assigner;
pub use sampler::{course_pool, sample_candidates, Candidate, CreditWindow};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::GeneratorConfig;
use crate::error::{Result, TimetableError};
use crate::matrix::SlotGrid;
use crate::models::{CourseId, LessonOffering, ScheduleId};
use crate::store::{apply_batch, Mutation, ScheduleStore};

/// A placeable course selection, not yet stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePlan {
    /// Selected courses, ascending.
    pub course_ids: Vec<CourseId>,
    pub total_credits: f64,
    /// Chosen offerings, grouped by course in placement order.
    pub offerings: Vec<LessonOffering>,
    /// Candidates collected by sampling.
    pub candidates_sampled: usize,
    /// Candidates tested for placement, the winner included.
    pub candidates_tested: usize,
}

impl SchedulePlan {
    /// The batch that writes this plan into a schedule.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.offerings
            .iter()
            .map(|o| Mutation::add(o.course_id, o.group_id.clone()))
            .collect()
    }
}

/// A generated and stored schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSchedule {
    pub schedule_id: ScheduleId,
    pub plan: SchedulePlan,
}

/// Builds conflict-free schedules that meet a credit target.
#[derive(Debug, Clone)]
pub struct ScheduleGenerator<'a> {
    catalog: &'a Catalog,
    config: GeneratorConfig,
    grid: SlotGrid,
    rng: ChaCha8Rng,
}

impl<'a> ScheduleGenerator<'a> {
    /// Creates a generator with default caps and an OS-seeded RNG.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            config: GeneratorConfig::default(),
            grid: SlotGrid::default(),
            rng: ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }

    /// Sets the caps; a configured seed re-seeds the RNG.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        if let Some(seed) = config.random_seed {
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }
        self.config = config;
        self
    }

    /// Sets the slot grid used for collision checks.
    pub fn with_grid(mut self, grid: SlotGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Re-seeds the RNG.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// The credit window actually searched: non-positive or non-finite
    /// tolerances fall back to the configured default.
    pub fn credit_window(&self, target: f64, tolerance: f64) -> Result<CreditWindow> {
        if !target.is_finite() || target <= 0.0 {
            return Err(TimetableError::InvalidInput(format!(
                "credit target must be positive, got {target}"
            )));
        }
        let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            self.config.default_tolerance
        };
        Ok(CreditWindow::new(target, tolerance))
    }

    /// Finds a placeable course selection without touching any store.
    pub fn plan(&mut self, target: f64, tolerance: f64) -> Result<SchedulePlan> {
        let window = self.credit_window(target, tolerance)?;
        info!(
            event = "generate_start",
            target = window.target,
            tolerance = window.tolerance,
            "searching course combinations"
        );

        let candidates = sample_candidates(self.catalog, &self.config, window, &mut self.rng);
        let assigner = Assigner::new(self.catalog, self.grid);

        for (tested, candidate) in candidates.iter().take(self.config.max_candidates).enumerate() {
            match assigner.place_all(&candidate.course_ids, &[]) {
                Ok(offerings) => {
                    info!(
                        event = "generate_found",
                        courses = ?candidate.course_ids,
                        credits = candidate.total_credits,
                        tested = tested + 1,
                        "placeable combination found"
                    );
                    return Ok(SchedulePlan {
                        course_ids: candidate.course_ids.clone(),
                        total_credits: candidate.total_credits,
                        offerings: offerings.into_iter().cloned().collect(),
                        candidates_sampled: candidates.len(),
                        candidates_tested: tested + 1,
                    });
                }
                Err(course_id) => {
                    debug!(
                        courses = ?candidate.course_ids,
                        blocking = course_id,
                        "candidate rejected"
                    );
                }
            }
        }

        let tested = candidates.len().min(self.config.max_candidates);
        warn!(
            event = "generate_infeasible",
            target = window.target,
            tolerance = window.tolerance,
            tested,
            "no placeable combination"
        );
        Err(TimetableError::Infeasible {
            target: window.target,
            tolerance: window.tolerance,
            tested,
        })
    }

    /// Plans a selection and writes it into a new schedule.
    pub fn generate<S: ScheduleStore + ?Sized>(
        &mut self,
        store: &mut S,
        target: f64,
        tolerance: f64,
    ) -> Result<GeneratedSchedule> {
        let plan = self.plan(target, tolerance)?;
        let schedule_id = store.create_schedule();

        if let Err(failure) = apply_batch(store, schedule_id, &plan.mutations()) {
            store.remove_schedule(schedule_id);
            return Err(TimetableError::StoreRejected {
                schedule_id,
                mutation: failure.failed,
                rolled_back: failure.rolled_back,
            });
        }
        info!(
            event = "generate_stored",
            schedule_id,
            lessons = plan.offerings.len(),
            "generated schedule stored"
        );
        Ok(GeneratedSchedule { schedule_id, plan })
    }
}
