//! Weekly occupancy bitset.
//!
//! One `u64` per weekday, one bit per fixed-width slot, so that "does this
//! lesson collide with anything placed so far?" is a mask and an AND
//! instead of a scan over the placed lessons.
//!
//! # Granularity
//! A day holds [`SLOTS_PER_DAY`] slots of `slot_min` minutes starting at
//! `origin_min` (default: 15-minute slots from 07:00, i.e. 07:00-23:00).
//! A lesson marks every slot it touches: the first slot is rounded down and
//! the last one up. For slot-aligned times the query is exact; for
//! unaligned times it may report a collision that is not a real overlap,
//! but never misses one. Minutes outside the span are clipped silently;
//! callers that need exactness there check [`SlotGrid::covers`] first.

use serde::{Deserialize, Serialize};

use crate::models::{LessonOffering, Weekday};

/// Slots per day (bits in a `u64`).
pub const SLOTS_PER_DAY: u32 = 64;

/// Placement of the slot grid within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotGrid {
    /// Start of slot 0 (minutes since midnight).
    pub origin_min: u32,
    /// Width of one slot (minutes).
    pub slot_min: u32,
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self {
            origin_min: 7 * 60,
            slot_min: 15,
        }
    }
}

impl SlotGrid {
    /// Creates a grid.
    pub fn new(origin_min: u32, slot_min: u32) -> Self {
        Self {
            origin_min,
            slot_min,
        }
    }

    /// End of the representable span (minutes since midnight, exclusive).
    pub fn span_end_min(&self) -> u32 {
        self.origin_min + self.slot_min * SLOTS_PER_DAY
    }

    /// Whether `[start, start + duration)` lies entirely inside the span.
    pub fn covers(&self, start_min: u32, duration_min: u32) -> bool {
        start_min >= self.origin_min && start_min + duration_min <= self.span_end_min()
    }

    /// Bit mask of the slots touched by `[start, start + duration)`.
    fn mask(&self, start_min: u32, duration_min: u32) -> u64 {
        if duration_min == 0 || self.slot_min == 0 {
            return 0;
        }
        let lo = start_min.max(self.origin_min);
        let hi = (start_min + duration_min).min(self.span_end_min());
        if hi <= lo {
            return 0;
        }
        let first = (lo - self.origin_min) / self.slot_min;
        let last = (hi - self.origin_min).div_ceil(self.slot_min).min(SLOTS_PER_DAY);
        let width = last - first;
        if width >= SLOTS_PER_DAY {
            u64::MAX
        } else {
            ((1u64 << width) - 1) << first
        }
    }
}

/// Occupancy of a week on a [`SlotGrid`].
///
/// `Copy`: a working copy per search branch costs 7 words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSlotMatrix {
    grid: SlotGrid,
    days: [u64; 7],
}

impl TimeSlotMatrix {
    /// Creates an empty matrix on the default grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty matrix on the given grid.
    pub fn with_grid(grid: SlotGrid) -> Self {
        Self { grid, days: [0; 7] }
    }

    /// Builds a matrix with every offering marked.
    pub fn from_offerings<'a>(
        grid: SlotGrid,
        offerings: impl IntoIterator<Item = &'a LessonOffering>,
    ) -> Self {
        let mut matrix = Self::with_grid(grid);
        for offering in offerings {
            matrix.place(offering);
        }
        matrix
    }

    /// The grid this matrix uses.
    pub fn grid(&self) -> SlotGrid {
        self.grid
    }

    /// Marks `[start, start + duration)` on `day` as occupied.
    pub fn set_slot(&mut self, day: Weekday, start_min: u32, duration_min: u32) {
        self.days[day.index()] |= self.grid.mask(start_min, duration_min);
    }

    /// Marks an offering's time as occupied.
    pub fn place(&mut self, offering: &LessonOffering) {
        self.set_slot(offering.day, offering.start_min, offering.duration_min);
    }

    /// Whether any occupied slot intersects `[start, start + duration)`.
    #[inline]
    pub fn has_conflict(&self, day: Weekday, start_min: u32, duration_min: u32) -> bool {
        self.days[day.index()] & self.grid.mask(start_min, duration_min) != 0
    }

    /// Whether an offering would collide with an occupied slot.
    #[inline]
    pub fn conflicts_with(&self, offering: &LessonOffering) -> bool {
        self.has_conflict(offering.day, offering.start_min, offering.duration_min)
    }

    /// Raw occupancy bits of one day.
    pub fn day_bits(&self, day: Weekday) -> u64 {
        self.days[day.index()]
    }

    /// Number of occupied slots over the week.
    pub fn occupied_slots(&self) -> u32 {
        self.days.iter().map(|bits| bits.count_ones()).sum()
    }

    /// Number of slots in the week.
    pub fn total_slots(&self) -> u32 {
        SLOTS_PER_DAY * 7
    }

    /// Occupied slots / total slots (0.0..=1.0).
    pub fn utilization(&self) -> f64 {
        self.occupied_slots() as f64 / self.total_slots() as f64
    }

    /// Clears all occupancy.
    pub fn clear(&mut self) {
        self.days = [0; 7];
    }
}
