//! Validator configuration.
//!
//! Two incompatible trip conventions exist for rescue plans. The variant is
//! chosen once per run and drives both the trip grammar and the ambulance
//! model used by the rescue engine.
//!
//! | Variant | Trip record | Return leg | Ambulance model |
//! |---------|-------------|------------|-----------------|
//! | `ReturnToNearest` | `h p1 .. pn` | nearest hospital | pooled: stays at its hospital, busiest-first fit |
//! | `ExplicitEnd` | `h p1 .. pn h'` | `h'` | owned: idlest ambulance, moves to `h'` |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Minutes;

/// Most people an ambulance can carry at once.
pub const MAX_CAPACITY: usize = 4;
/// Minutes to load one person.
pub const DEFAULT_LOAD_MINUTES: Minutes = 1;
/// Minutes to unload everyone at the hospital.
pub const DEFAULT_UNLOAD_MINUTES: Minutes = 1;

/// Trip record convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TripVariant {
    /// One hospital token; the ambulance unloads at the nearest hospital.
    #[default]
    ReturnToNearest,
    /// Start and end hospital tokens; the ambulance is transferred to the end.
    ExplicitEnd,
}

impl TripVariant {
    /// Whether ambulances stay at their home hospital.
    pub fn is_pooled(self) -> bool {
        matches!(self, Self::ReturnToNearest)
    }
}

impl fmt::Display for TripVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReturnToNearest => f.write_str("nearest"),
            Self::ExplicitEnd => f.write_str("explicit-end"),
        }
    }
}

/// Rescue validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Trip convention.
    pub variant: TripVariant,
    /// Maximum people per trip, in `1..=MAX_CAPACITY`.
    pub capacity: usize,
    /// Minutes added per pickup.
    pub load_minutes: Minutes,
    /// Minutes added once at the destination hospital.
    pub unload_minutes: Minutes,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            variant: TripVariant::default(),
            capacity: MAX_CAPACITY,
            load_minutes: DEFAULT_LOAD_MINUTES,
            unload_minutes: DEFAULT_UNLOAD_MINUTES,
        }
    }
}

impl ValidatorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the trip variant.
    pub fn with_variant(mut self, variant: TripVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the per-trip capacity, clamped to `1..=MAX_CAPACITY`.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.clamp(1, MAX_CAPACITY);
        self
    }

    /// Sets the loading time per person.
    pub fn with_load_minutes(mut self, minutes: Minutes) -> Self {
        self.load_minutes = minutes;
        self
    }

    /// Sets the unloading time per trip.
    pub fn with_unload_minutes(mut self, minutes: Minutes) -> Self {
        self.unload_minutes = minutes;
        self
    }
}
