//! Conflict detection and resolution.
//!
//! - [`ConflictDetector`]: finds overlapping lesson pairs
//! - [`AlternativeSearch`]: finds replacement groups for one conflict
//! - [`ConflictResolver`]: applies replacements round by round

mod detector;
mod resolver;
mod search;

pub use detector::{ConflictDetector, REPLACE_COURSE_THRESHOLD_MIN, RESTRUCTURE_THRESHOLD_MIN};
pub use resolver::{ConflictResolver, Proposal, ResolutionReport, UnresolvedConflict, UnresolvedReason};
pub use search::{AlternativeSearch, Replacement, SearchOutcome, Substitution};
