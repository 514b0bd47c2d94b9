//! Consumption over a window by mass balance.
//!
//! `consumed = start volume + added volume - end volume`, with volumes derived
//! from sensor percentages and the capacity estimate. Without a capacity the
//! manually reported liters stand in as an approximation.

use serde::Serialize;

use crate::config::EngineConfig;

/// How a consumption figure was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionMethod {
    /// Level change plus reported refills, scaled by the capacity estimate.
    MassBalance,
    /// Reported refills only; capacity or levels are unknown.
    ManualFallback,
    /// Neither levels nor reported refills are available.
    NoData,
}

/// Inputs of the consumption calculation for one vehicle and window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumptionInput {
    /// Sensor level (percent) at the start of the window.
    pub start_level: Option<f64>,
    /// Sensor level (percent) at the end of the window.
    pub end_level: Option<f64>,
    /// Sum of manually reported liters in the window.
    pub manual_liters: u32,
    /// Estimated tank capacity in liters.
    pub capacity: Option<u32>,
    /// Kilometers driven in the window.
    pub distance_km: f64,
}

/// Computed consumption for one vehicle and window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Consumption {
    /// Liters consumed, never negative.
    pub liters: f64,
    pub method: ConsumptionMethod,
    /// Liters per 100 km, only when the distance is meaningful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_per_100km: Option<f64>,
}

/// Computes consumption for one vehicle and window.
pub fn compute_consumption(input: &ConsumptionInput, config: &EngineConfig) -> Consumption {
    let manual = f64::from(input.manual_liters);

    let (liters, method) = match (input.capacity, input.start_level, input.end_level) {
        (Some(capacity), Some(start), Some(end)) => {
            let capacity = f64::from(capacity);
            let consumed = (start / 100.0 * capacity + manual) - (end / 100.0 * capacity);
            (consumed.max(0.0), ConsumptionMethod::MassBalance)
        }
        (_, start, end) if input.manual_liters > 0 || start.is_some() || end.is_some() => {
            (manual, ConsumptionMethod::ManualFallback)
        }
        _ => (0.0, ConsumptionMethod::NoData),
    };

    let avg_per_100km = (input.distance_km > config.min_distance_km && liters > 0.0)
        .then(|| liters / input.distance_km * 100.0);

    Consumption {
        liters,
        method,
        avg_per_100km,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ConsumptionInput {
        ConsumptionInput {
            start_level: Some(80.0),
            end_level: Some(60.0),
            manual_liters: 30,
            capacity: Some(100),
            distance_km: 0.0,
        }
    }

    #[test]
    fn mass_balance_with_known_capacity() {
        let result = compute_consumption(&input(), &EngineConfig::default());

        assert_eq!(result.method, ConsumptionMethod::MassBalance);
        assert!((result.liters - 50.0).abs() < 1e-9);
    }

    #[test]
    fn mass_balance_is_clamped_at_zero() {
        let result = compute_consumption(
            &ConsumptionInput {
                start_level: Some(20.0),
                end_level: Some(90.0),
                manual_liters: 10,
                ..input()
            },
            &EngineConfig::default(),
        );
        assert!(result.liters.abs() < f64::EPSILON);
        assert_eq!(result.avg_per_100km, None);
    }

    #[test]
    fn unknown_capacity_falls_back_to_manual_liters() {
        let result = compute_consumption(
            &ConsumptionInput {
                capacity: None,
                ..input()
            },
            &EngineConfig::default(),
        );
        assert_eq!(result.method, ConsumptionMethod::ManualFallback);
        assert!((result.liters - 30.0).abs() < 1e-9);
    }

    #[test]
    fn missing_levels_fall_back_to_manual_liters() {
        let result = compute_consumption(
            &ConsumptionInput {
                start_level: None,
                end_level: None,
                ..input()
            },
            &EngineConfig::default(),
        );
        assert_eq!(result.method, ConsumptionMethod::ManualFallback);
    }

    #[test]
    fn nothing_known_reports_no_data() {
        let result = compute_consumption(
            &ConsumptionInput {
                start_level: None,
                end_level: None,
                manual_liters: 0,
                capacity: None,
                distance_km: 250.0,
            },
            &EngineConfig::default(),
        );
        assert_eq!(result.method, ConsumptionMethod::NoData);
        assert_eq!(result.avg_per_100km, None);
    }

    #[test]
    fn ratio_requires_meaningful_distance() {
        let short = compute_consumption(
            &ConsumptionInput {
                distance_km: 10.0,
                ..input()
            },
            &EngineConfig::default(),
        );
        assert_eq!(short.avg_per_100km, None);

        let long = compute_consumption(
            &ConsumptionInput {
                distance_km: 500.0,
                ..input()
            },
            &EngineConfig::default(),
        );
        assert!((long.avg_per_100km.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let config = EngineConfig::default();
        let first = compute_consumption(&input(), &config);
        let second = compute_consumption(&input(), &config);
        assert_eq!(first, second);
    }
}
