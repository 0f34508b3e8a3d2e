//! Engine configuration.
//!
//! Every search cap of the resolver and generator lives here, so callers
//! can widen or narrow the search without code changes.
//!
//! # Examples
//!
//! ```
//! use u_timetable::config::TimetableConfig;
//!
//! let config = TimetableConfig::from_toml_str(r#"
//!     [resolver]
//!     max_rounds = 5
//!
//!     [generator]
//!     max_courses = 4
//!     random_seed = 42
//! "#).unwrap();
//!
//! assert_eq!(config.resolver.max_rounds, 5);
//! assert_eq!(config.resolver.max_fixes_per_round, 5);
//! assert_eq!(config.generator.random_seed, Some(42));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::matrix::SlotGrid;

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    pub resolver: ResolverConfig,
    pub generator: GeneratorConfig,
    /// Slot grid used by every occupancy matrix.
    pub grid: SlotGrid,
}

impl TimetableConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_resolver(mut self, resolver: ResolverConfig) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_grid(mut self, grid: SlotGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Checks that the caps are usable.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(TimetableError::InvalidConfig(msg.to_string()));
        let g = &self.generator;

        if self.resolver.max_rounds == 0 {
            return invalid("resolver.max_rounds must be at least 1");
        }
        if self.resolver.max_fixes_per_round == 0 {
            return invalid("resolver.max_fixes_per_round must be at least 1");
        }
        if g.min_courses == 0 {
            return invalid("generator.min_courses must be at least 1");
        }
        if g.min_courses > g.max_courses {
            return invalid("generator.min_courses exceeds generator.max_courses");
        }
        if g.max_samples_per_size == 0 || g.samples_per_course == 0 || g.max_candidates == 0 {
            return invalid("generator sample and candidate caps must be positive");
        }
        if !g.default_tolerance.is_finite() || g.default_tolerance <= 0.0 {
            return invalid("generator.default_tolerance must be positive");
        }
        if self.grid.slot_min == 0 {
            return invalid("grid.slot_min must be positive");
        }
        if self.grid.span_end_min() > crate::models::MINUTES_PER_DAY {
            return invalid("grid span runs past midnight");
        }
        Ok(())
    }
}

/// Caps of the conflict resolution loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Detect/fix rounds before giving up.
    pub max_rounds: usize,
    /// Substitutions applied per round at most.
    pub max_fixes_per_round: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            max_fixes_per_round: 5,
        }
    }
}

impl ResolverConfig {
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_max_fixes_per_round(mut self, fixes: usize) -> Self {
        self.max_fixes_per_round = fixes;
        self
    }
}

/// Caps of the schedule generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Smallest course combination tried.
    pub min_courses: usize,
    /// Largest course combination tried (further capped by the number of
    /// placeable courses).
    pub max_courses: usize,
    /// Random draws per combination size at most.
    pub max_samples_per_size: usize,
    /// Draws per combination size per placeable course, before the cap
    /// above.
    pub samples_per_course: usize,
    /// Candidates collected and tested at most.
    pub max_candidates: usize,
    /// Tolerance used when the caller's is not positive.
    pub default_tolerance: f64,
    /// Seed for reproducible sampling (`None`: seeded from the OS).
    pub random_seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_courses: 2,
            max_courses: 6,
            max_samples_per_size: 5000,
            samples_per_course: 100,
            max_candidates: 500,
            default_tolerance: 0.15,
            random_seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_course_range(mut self, min: usize, max: usize) -> Self {
        self.min_courses = min;
        self.max_courses = max;
        self
    }

    pub fn with_max_samples_per_size(mut self, samples: usize) -> Self {
        self.max_samples_per_size = samples;
        self
    }

    pub fn with_samples_per_course(mut self, samples: usize) -> Self {
        self.samples_per_course = samples;
        self
    }

    pub fn with_max_candidates(mut self, candidates: usize) -> Self {
        self.max_candidates = candidates;
        self
    }

    pub fn with_default_tolerance(mut self, tolerance: f64) -> Self {
        self.default_tolerance = tolerance;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}
