//! Weekly time model.
//!
//! Lessons repeat every week, so a point in time is a weekday plus a
//! minute offset from midnight. Ranges are half-open: `[start, end)`.
//! Two lessons touching at a boundary (10:00-11:00 and 11:00-12:00) do
//! not overlap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Day of the teaching week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based position in the week (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = TimetableError;

    /// Accepts full names and three-letter abbreviations, any case.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| {
                let name = d.name().to_ascii_lowercase();
                lower == name || (lower.len() == 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| TimetableError::Parse(format!("unknown weekday '{s}'")))
    }
}

/// A time interval `[start_min, end_min)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Interval start (minutes since midnight, inclusive).
    pub start_min: u32,
    /// Interval end (minutes since midnight, exclusive).
    pub end_min: u32,
}

impl TimeRange {
    /// Creates a range from a start and a duration.
    pub fn new(start_min: u32, duration_min: u32) -> Self {
        Self {
            start_min,
            end_min: start_min + duration_min,
        }
    }

    /// Duration of this range (minutes).
    #[inline]
    pub fn duration_min(&self) -> u32 {
        self.end_min - self.start_min
    }

    /// Whether a minute falls within this range.
    #[inline]
    pub fn contains(&self, minute: u32) -> bool {
        minute >= self.start_min && minute < self.end_min
    }

    /// Whether two ranges share at least one minute. An empty range
    /// overlaps nothing.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.overlap_min(other) > 0
    }

    /// Length of the shared part of two ranges (0 if disjoint).
    pub fn overlap_min(&self, other: &Self) -> u32 {
        let start = self.start_min.max(other.start_min);
        let end = self.end_min.min(other.end_min);
        end.saturating_sub(start)
    }
}

/// Parses an `HH:MM` clock time into minutes since midnight.
pub fn parse_clock(s: &str) -> Result<u32> {
    let invalid = || TimetableError::Parse(format!("invalid clock time '{s}'"));
    let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = h.trim().parse().map_err(|_| invalid())?;
    let minutes: u32 = m.trim().parse().map_err(|_| invalid())?;
    if hours >= 24 || minutes >= 60 {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

/// Formats minutes since midnight as `HH:MM`.
pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_overlap() {
        let a = TimeRange::new(600, 120); // 10:00-12:00
        let b = TimeRange::new(660, 120); // 11:00-13:00
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert_eq!(a.overlap_min(&b), 60);
    }

    #[test]
    fn test_touching_ranges_do_not_overlap() {
        let a = TimeRange::new(600, 60);
        let b = TimeRange::new(660, 60);
        assert!(!a.overlaps(&b));
        assert_eq!(a.overlap_min(&b), 0);
    }

    #[test]
    fn test_contained_range() {
        let outer = TimeRange::new(480, 240);
        let inner = TimeRange::new(540, 30);
        assert!(outer.overlaps(&inner));
        assert_eq!(outer.overlap_min(&inner), 30);
        assert!(outer.contains(480));
        assert!(!outer.contains(720));
    }

    #[test]
    fn test_empty_range_never_overlaps() {
        let empty = TimeRange::new(600, 0);
        let other = TimeRange::new(540, 120);
        assert_eq!(empty.duration_min(), 0);
        assert!(!empty.overlaps(&other));
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!("Monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("fri".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert_eq!(" SUNDAY ".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("Funday".parse::<Weekday>().is_err());
        assert!("mo".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_weekday_index() {
        assert_eq!(Weekday::Monday.index(), 0);
        assert_eq!(Weekday::Sunday.index(), 6);
        assert_eq!(Weekday::Wednesday.to_string(), "Wednesday");
    }

    #[test]
    fn test_clock_round_trip() {
        assert_eq!(parse_clock("09:00").unwrap(), 540);
        assert_eq!(parse_clock("13:45").unwrap(), 825);
        assert_eq!(format_clock(825), "13:45");
        assert_eq!(format_clock(0), "00:00");
    }

    #[test]
    fn test_clock_rejects_garbage() {
        assert!(parse_clock("9").is_err());
        assert!(parse_clock("24:00").is_err());
        assert!(parse_clock("10:60").is_err());
        assert!(parse_clock("ab:cd").is_err());
    }
}
