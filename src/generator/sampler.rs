//! Random course-combination sampling.
//!
//! # Algorithm
//! For every combination size `k` from `min_courses` to
//! `min(max_courses, pool size)`, draw random `k`-subsets of the pool
//! (courses with at least one offering). Each size gets
//! `min(max_samples_per_size, pool size × samples_per_course)` draws.
//! A draw whose credit sum lies inside the target window becomes a
//! candidate unless the same course set was already collected. Sampling
//! stops once `max_candidates` candidates exist.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::GeneratorConfig;
use crate::models::CourseId;

/// Absorbs float error in credit sums (e.g. 0.1 + 0.2).
const CREDIT_EPSILON: f64 = 1e-9;

/// Accepted credit range `[target - tolerance, target + tolerance]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditWindow {
    pub target: f64,
    pub tolerance: f64,
}

impl CreditWindow {
    pub fn new(target: f64, tolerance: f64) -> Self {
        Self { target, tolerance }
    }

    pub fn min(&self) -> f64 {
        self.target - self.tolerance
    }

    pub fn max(&self) -> f64 {
        self.target + self.tolerance
    }

    /// Whether `credits` lies inside the window (bounds included).
    pub fn contains(&self, credits: f64) -> bool {
        (credits - self.target).abs() <= self.tolerance + CREDIT_EPSILON
    }
}

/// A tentative course selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Selected courses, ascending.
    pub course_ids: Vec<CourseId>,
    /// Sum of their credits.
    pub total_credits: f64,
}

/// Courses the generator may pick: listed courses that have offerings,
/// in catalog order, each once.
pub fn course_pool(catalog: &Catalog) -> Vec<CourseId> {
    let mut seen = HashSet::new();
    catalog
        .courses()
        .iter()
        .map(|c| c.id)
        .filter(|&id| catalog.has_offerings(id) && seen.insert(id))
        .collect()
}

/// Collects candidates whose credits fall inside `window`, smallest
/// combinations first.
pub fn sample_candidates<R: Rng + ?Sized>(
    catalog: &Catalog,
    config: &GeneratorConfig,
    window: CreditWindow,
    rng: &mut R,
) -> Vec<Candidate> {
    let pool = course_pool(catalog);
    let max_k = config.max_courses.min(pool.len());
    let draws = config
        .max_samples_per_size
        .min(pool.len().saturating_mul(config.samples_per_course));

    let mut seen: HashSet<Vec<CourseId>> = HashSet::new();
    let mut candidates = Vec::new();

    for k in config.min_courses.max(1)..=max_k {
        let before = candidates.len();
        for _ in 0..draws {
            let mut course_ids: Vec<CourseId> = pool.choose_multiple(rng, k).copied().collect();
            course_ids.sort_unstable();

            let total_credits = catalog.total_credits(&course_ids);
            if !window.contains(total_credits) || !seen.insert(course_ids.clone()) {
                continue;
            }
            candidates.push(Candidate {
                course_ids,
                total_credits,
            });
            if candidates.len() >= config.max_candidates {
                debug!(k, collected = candidates.len(), "candidate cap reached");
                return candidates;
            }
        }
        debug!(k, draws, collected = candidates.len() - before, "combination size sampled");
    }
    candidates
}
