//! Schedule quality metrics.
//!
//! Summarizes one student schedule for reporting.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total credits | Sum over distinct courses |
//! | Weekly minutes | Sum of lesson durations |
//! | Busiest day | Day with the most teaching minutes |
//! | Slot utilization | Occupied grid slots / slots in the week |
//! | Workload balance | 1 - coefficient of variation of minutes over teaching days |
//! | Instructor diversity | Distinct instructors / lessons with an instructor |
//! | Conflicts | Overlapping lesson pairs |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::conflict::ConflictDetector;
use crate::generator::CreditWindow;
use crate::matrix::{SlotGrid, TimeSlotMatrix};
use crate::models::{Schedule, Weekday};

/// Schedule summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    pub total_credits: f64,
    pub course_count: usize,
    pub lesson_count: usize,
    pub weekly_minutes: u32,
    /// Teaching minutes per weekday, Monday first.
    pub minutes_by_day: [u32; 7],
    /// `None` for an empty schedule; ties go to the earlier day.
    pub busiest_day: Option<Weekday>,
    /// Occupied slots / slots in the week (0.0..=1.0).
    pub slot_utilization: f64,
    /// 1.0 for perfectly even teaching days, towards 0.0 for lopsided ones.
    pub workload_balance: f64,
    /// Distinct instructors per lesson with an instructor (0.0..=1.0).
    pub instructor_diversity: f64,
    pub conflict_count: usize,
}

impl ScheduleMetrics {
    /// Computes metrics of a schedule.
    pub fn calculate(schedule: &Schedule, catalog: &Catalog, grid: SlotGrid) -> Self {
        let mut minutes_by_day = [0u32; 7];
        for lesson in &schedule.lessons {
            minutes_by_day[lesson.day().index()] += lesson.offering.duration_min;
        }

        let busiest_day = Weekday::ALL
            .into_iter()
            .filter(|d| minutes_by_day[d.index()] > 0)
            .fold(None, |best: Option<Weekday>, day| match best {
                Some(b) if minutes_by_day[b.index()] >= minutes_by_day[day.index()] => Some(b),
                _ => Some(day),
            });

        let matrix = TimeSlotMatrix::from_offerings(grid, schedule.lessons.iter().map(|l| &l.offering));

        let instructors: Vec<&str> = schedule
            .lessons
            .iter()
            .map(|l| l.offering.instructor.as_str())
            .filter(|name| !name.is_empty())
            .collect();
        let instructor_diversity = if instructors.is_empty() {
            0.0
        } else {
            let distinct: HashSet<&str> = instructors.iter().copied().collect();
            distinct.len() as f64 / instructors.len() as f64
        };

        Self {
            total_credits: schedule.total_credits(catalog),
            course_count: schedule.course_ids().len(),
            lesson_count: schedule.lesson_count(),
            weekly_minutes: schedule.weekly_minutes(),
            minutes_by_day,
            busiest_day,
            slot_utilization: matrix.utilization(),
            workload_balance: workload_balance(&minutes_by_day),
            instructor_diversity,
            conflict_count: ConflictDetector::new().count(&schedule.lessons),
        }
    }

    /// Number of days with at least one lesson.
    pub fn teaching_days(&self) -> usize {
        self.minutes_by_day.iter().filter(|&&m| m > 0).count()
    }

    /// Whether total credits lie within `target ± tolerance`.
    pub fn meets_credit_target(&self, target: f64, tolerance: f64) -> bool {
        CreditWindow::new(target, tolerance).contains(self.total_credits)
    }
}

fn workload_balance(minutes_by_day: &[u32; 7]) -> f64 {
    let active: Vec<f64> = minutes_by_day
        .iter()
        .filter(|&&m| m > 0)
        .map(|&m| f64::from(m))
        .collect();
    if active.len() < 2 {
        return 1.0;
    }
    let n = active.len() as f64;
    let mean = active.iter().sum::<f64>() / n;
    let variance = active.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance.sqrt() / mean).clamp(0.0, 1.0)
}
