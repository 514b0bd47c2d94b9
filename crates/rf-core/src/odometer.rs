//! Odometer correlation.
//!
//! Odometer readings arrive in meters; everything reported is in whole
//! kilometers.

use chrono::{DateTime, Utc};

use crate::types::{Reading, TimeWindow};

/// Returns the reading closest in time to `ts`.
///
/// Ties resolve to the first reading encountered.
pub fn nearest_reading(series: &[Reading], ts: DateTime<Utc>) -> Option<&Reading> {
    series.iter().fold(None, |best: Option<&Reading>, reading| {
        let distance = (reading.timestamp - ts).abs();
        match best {
            Some(current) if (current.timestamp - ts).abs() <= distance => Some(current),
            _ => Some(reading),
        }
    })
}

/// Odometer value at `ts` in kilometers, or 0 when there are no readings.
pub fn odometer_km_at(series: &[Reading], ts: DateTime<Utc>) -> i64 {
    nearest_reading(series, ts).map_or(0, |reading| meters_to_km(reading.value))
}

/// Kilometers driven inside `window`: last minus first reading in the window.
///
/// The series must be sorted by timestamp ascending.
pub fn distance_km(series: &[Reading], window: &TimeWindow) -> f64 {
    let mut in_window = series.iter().filter(|r| window.contains(r.timestamp));
    let Some(first) = in_window.next() else {
        return 0.0;
    };
    let last = in_window.last().unwrap_or(first);
    ((last.value - first.value) / 1000.0).max(0.0)
}

#[allow(clippy::cast_possible_truncation)]
fn meters_to_km(meters: f64) -> i64 {
    (meters / 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VehicleId;
    use chrono::{Duration, TimeZone};

    fn ts(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::seconds(seconds)
    }

    fn odo(points: &[(i64, f64)]) -> Vec<Reading> {
        points
            .iter()
            .map(|&(seconds, meters)| Reading {
                vehicle_id: VehicleId::new("b1").unwrap(),
                timestamp: ts(seconds),
                value: meters,
            })
            .collect()
    }

    #[test]
    fn picks_nearest_in_time() {
        let series = odo(&[(0, 1_000.0), (100, 2_000.0)]);
        let nearest = nearest_reading(&series, ts(60)).unwrap();
        assert_eq!(nearest.timestamp, ts(100));
    }

    #[test]
    fn tie_resolves_to_first_reading() {
        let series = odo(&[(0, 1_000.0), (100, 2_000.0)]);
        let nearest = nearest_reading(&series, ts(50)).unwrap();
        assert_eq!(nearest.timestamp, ts(0));
    }

    #[test]
    fn empty_series_reports_zero() {
        assert!(nearest_reading(&[], ts(0)).is_none());
        assert_eq!(odometer_km_at(&[], ts(0)), 0);
    }

    #[test]
    fn converts_meters_to_rounded_km() {
        let series = odo(&[(0, 123_456.0), (100, 123_600.0)]);
        assert_eq!(odometer_km_at(&series, ts(0)), 123);
        assert_eq!(odometer_km_at(&series, ts(90)), 124);
    }

    #[test]
    fn distance_uses_readings_inside_window() {
        let series = odo(&[(0, 10_000.0), (100, 15_000.0), (200, 42_500.0), (300, 90_000.0)]);
        let window = TimeWindow::new(ts(50), ts(250)).unwrap();
        assert!((distance_km(&series, &window) - 27.5).abs() < 1e-9);
    }

    #[test]
    fn distance_needs_two_readings() {
        let series = odo(&[(0, 10_000.0)]);
        let window = TimeWindow::new(ts(0), ts(10)).unwrap();
        assert!(distance_km(&series, &window).abs() < f64::EPSILON);
        assert!(distance_km(&[], &window).abs() < f64::EPSILON);
    }
}
