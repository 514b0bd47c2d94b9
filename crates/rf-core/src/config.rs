//! Tunable thresholds for the reconciliation engine.
//!
//! None of these values has a physical derivation; they are fleet heuristics
//! and can be overridden per deployment.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Upper bound for every duration threshold: one leap year, in hours.
const MAX_WINDOW_HOURS: i64 = 366 * 24;

/// Configuration for refill reconstruction and consumption estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A level rise must strictly exceed this many percentage points to count
    /// as a refill. Default: 5.0.
    pub noise_threshold_pct: f64,

    /// Maximum gap between consecutive upward steps of one refill.
    /// Default: 20 minutes.
    pub grouping_window_minutes: i64,

    /// Maximum distance between a manual claim and a sensor rise for them to
    /// be fused. Default: 6 hours.
    pub match_tolerance_hours: i64,

    /// Half-width of the window inspected around a claim when estimating
    /// capacity. Default: 4 hours.
    pub capacity_window_hours: i64,

    /// Capacity assumed for sensor-only events when estimating their volume.
    /// Default: 80 liters.
    pub fallback_capacity_liters: u32,

    /// Hour of day given to claims that carry no time. Default: 12.
    pub claim_default_hour: u32,

    /// Distance below which no per-100 km ratio is reported. Default: 10 km.
    pub min_distance_km: f64,

    /// Levels below this are critical. Default: 10%.
    pub critical_level_pct: f64,

    /// Levels below this are a warning. Default: 20%.
    pub warning_level_pct: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            noise_threshold_pct: 5.0,
            grouping_window_minutes: 20,
            match_tolerance_hours: 6,
            capacity_window_hours: 4,
            fallback_capacity_liters: 80,
            claim_default_hour: 12,
            min_distance_km: 10.0,
            critical_level_pct: 10.0,
            warning_level_pct: 20.0,
        }
    }
}

impl EngineConfig {
    // Accessors clamp into [0, one year] so an unvalidated config cannot
    // overflow `Duration`.

    pub fn grouping_window(&self) -> Duration {
        Duration::minutes(self.grouping_window_minutes.clamp(0, MAX_WINDOW_HOURS * 60))
    }

    pub fn match_tolerance(&self) -> Duration {
        Duration::hours(self.match_tolerance_hours.clamp(0, MAX_WINDOW_HOURS))
    }

    pub fn capacity_window(&self) -> Duration {
        Duration::hours(self.capacity_window_hours.clamp(0, MAX_WINDOW_HOURS))
    }

    /// Checks that every threshold is usable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |field, reason| Err(ValidationError::InvalidConfig { field, reason });

        if self.noise_threshold_pct.is_nan() || self.noise_threshold_pct < 0.0 {
            return invalid("noise_threshold_pct", "must be zero or positive");
        }
        if self.grouping_window_minutes <= 0 {
            return invalid("grouping_window_minutes", "must be positive");
        }
        if self.grouping_window_minutes > MAX_WINDOW_HOURS * 60 {
            return invalid("grouping_window_minutes", "must not exceed one year");
        }
        if self.match_tolerance_hours < 0 {
            return invalid("match_tolerance_hours", "must not be negative");
        }
        if self.match_tolerance_hours > MAX_WINDOW_HOURS {
            return invalid("match_tolerance_hours", "must not exceed one year");
        }
        if self.capacity_window_hours <= 0 {
            return invalid("capacity_window_hours", "must be positive");
        }
        if self.capacity_window_hours > MAX_WINDOW_HOURS {
            return invalid("capacity_window_hours", "must not exceed one year");
        }
        if self.fallback_capacity_liters == 0 {
            return invalid("fallback_capacity_liters", "must be positive");
        }
        if self.claim_default_hour > 23 {
            return invalid("claim_default_hour", "must be an hour of day (0-23)");
        }
        if self.min_distance_km.is_nan() || self.min_distance_km < 0.0 {
            return invalid("min_distance_km", "must be zero or positive");
        }
        if self.warning_level_pct < self.critical_level_pct {
            return invalid(
                "warning_level_pct",
                "must not be below critical_level_pct",
            );
        }
        Ok(())
    }
}
