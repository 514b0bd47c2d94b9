//! Current fluid level status per vehicle and for the fleet.

use std::fmt;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::summary::VehicleSummary;
use crate::types::Reading;

/// Urgency of a vehicle's latest level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStatus {
    Critical,
    Warning,
    Ok,
    NoData,
}

impl LevelStatus {
    /// Classifies a level against the configured thresholds.
    ///
    /// The level is rounded to a whole percent first, so the status always
    /// agrees with the percentage shown next to it.
    pub fn classify(level: Option<f64>, config: &EngineConfig) -> Self {
        match level.map(f64::round) {
            None => Self::NoData,
            Some(l) if l < config.critical_level_pct => Self::Critical,
            Some(l) if l < config.warning_level_pct => Self::Warning,
            Some(_) => Self::Ok,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Ok => "ok",
            Self::NoData => "no data",
        }
    }
}

impl fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value of the most recent reading. The series must be sorted ascending.
pub fn latest_level(series: &[Reading]) -> Option<f64> {
    series.last().map(|r| r.value)
}

/// Fleet-wide figures shown above the per-vehicle list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetOverview {
    pub vehicle_count: usize,
    /// Vehicles with at least one refill event in the window.
    pub active_count: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    /// Mean latest level over vehicles that report one, one decimal.
    pub average_level: Option<f64>,
    pub total_liters: u64,
    pub total_consumed: f64,
}

impl FleetOverview {
    pub fn from_summaries(vehicles: &[VehicleSummary]) -> Self {
        let count_status = |status: LevelStatus| {
            vehicles.iter().filter(|v| v.level_status == status).count()
        };

        let levels: Vec<f64> = vehicles.iter().filter_map(|v| v.latest_level).collect();
        #[allow(clippy::cast_precision_loss)]
        let average_level = (!levels.is_empty())
            .then(|| (levels.iter().sum::<f64>() / levels.len() as f64 * 10.0).round() / 10.0);

        Self {
            vehicle_count: vehicles.len(),
            active_count: vehicles.iter().filter(|v| v.is_active()).count(),
            critical_count: count_status(LevelStatus::Critical),
            warning_count: count_status(LevelStatus::Warning),
            average_level,
            total_liters: vehicles.iter().map(|v| u64::from(v.total_liters)).sum(),
            total_consumed: vehicles.iter().map(|v| v.consumption.liters).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_against_thresholds() {
        let config = EngineConfig::default();
        assert_eq!(LevelStatus::classify(None, &config), LevelStatus::NoData);
        assert_eq!(LevelStatus::classify(Some(9.0), &config), LevelStatus::Critical);
        assert_eq!(LevelStatus::classify(Some(10.0), &config), LevelStatus::Warning);
        assert_eq!(LevelStatus::classify(Some(19.0), &config), LevelStatus::Warning);
        assert_eq!(LevelStatus::classify(Some(20.0), &config), LevelStatus::Ok);
    }

    #[test]
    fn classifies_the_rounded_level() {
        let config = EngineConfig::default();
        assert_eq!(LevelStatus::classify(Some(9.4), &config), LevelStatus::Critical);
        assert_eq!(LevelStatus::classify(Some(9.6), &config), LevelStatus::Warning);
        assert_eq!(LevelStatus::classify(Some(19.5), &config), LevelStatus::Ok);
        assert_eq!(LevelStatus::classify(Some(0.3), &config), LevelStatus::Critical);
    }

    #[test]
    fn latest_level_of_empty_series_is_none() {
        assert_eq!(latest_level(&[]), None);
    }
}
