//! Levels command: latest fluid level per vehicle and fleet overview.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use rf_core::{FleetReport, LevelStatus, compute_fleet};

use crate::Config;
use crate::cli::WindowArgs;
use crate::commands::report::format_level;
use crate::commands::util::{load_snapshot, resolve_window};

// ========== Progress Bar ==========

/// Generates a 10-character level bar.
/// Non-empty levels under 5% get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn level_bar(level: Option<f64>) -> String {
    let Some(level) = level else {
        return "░░░░░░░░░░".to_string();
    };

    let ratio = (level / 100.0).clamp(0.0, 1.0);
    let filled = if ratio < 0.05 && level > 0.0 {
        1
    } else {
        (ratio * 10.0).round() as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn status_marker(status: LevelStatus) -> &'static str {
    match status {
        LevelStatus::Critical => "!!",
        LevelStatus::Warning => "! ",
        LevelStatus::Ok | LevelStatus::NoData => "  ",
    }
}

/// Formats the level overview.
pub fn format_levels(report: &FleetReport) -> String {
    let mut output = String::new();

    writeln!(output, "FLUID LEVELS").unwrap();
    writeln!(output, "────────────").unwrap();

    if report.vehicles.is_empty() {
        writeln!(output, "No vehicles in snapshot.").unwrap();
        return output;
    }

    for vehicle in &report.vehicles {
        let plate = vehicle.license_plate.as_deref().unwrap_or("N/A");
        writeln!(
            output,
            "{} {:<20} {:<10} {}  {:>4}  {}",
            status_marker(vehicle.level_status),
            vehicle.name,
            plate,
            level_bar(vehicle.latest_level),
            format_level(vehicle.latest_level),
            vehicle.level_status,
        )
        .unwrap();
    }

    let overview = &report.overview;
    writeln!(output).unwrap();
    writeln!(output, "Critical:       {}", overview.critical_count).unwrap();
    writeln!(output, "Warning:        {}", overview.warning_count).unwrap();
    let average = overview
        .average_level
        .map_or_else(|| "n/a".to_string(), |avg| format!("{avg:.1}%"));
    writeln!(output, "Average level:  {average}").unwrap();

    output
}

/// Runs the levels command.
///
/// Levels are the latest readings regardless of window; the window only
/// bounds the refill figures computed alongside.
pub fn run<W: Write>(writer: &mut W, config: &Config, input: &std::path::Path) -> Result<()> {
    let window = resolve_window(&WindowArgs::default(), config.default_window_days, Utc::now())?;
    let snapshot = load_snapshot(input)?;
    let report = compute_fleet(&snapshot, window, &config.engine);

    writer
        .write_all(format_levels(&report).as_bytes())
        .context("failed to write levels")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use insta::assert_snapshot;
    use rf_core::{Device, EngineConfig, FleetSnapshot, Reading, TimeWindow, VehicleId};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0)
            .single()
            .expect("valid test timestamp")
    }

    fn device(id: &str, name: &str, plate: Option<&str>) -> Device {
        Device {
            id: VehicleId::new(id).unwrap(),
            name: name.to_string(),
            license_plate: plate.map(String::from),
            comment: None,
        }
    }

    fn reading(id: &str, day: u32, value: f64) -> Reading {
        Reading {
            vehicle_id: VehicleId::new(id).unwrap(),
            timestamp: at(day),
            value,
        }
    }

    #[test]
    fn test_level_bar() {
        assert_eq!(level_bar(None), "░░░░░░░░░░");
        assert_eq!(level_bar(Some(0.0)), "░░░░░░░░░░");
        assert_eq!(level_bar(Some(3.0)), "█░░░░░░░░░");
        assert_eq!(level_bar(Some(64.0)), "██████░░░░");
        assert_eq!(level_bar(Some(120.0)), "██████████");
    }

    #[test]
    fn test_levels_output() {
        let snapshot = FleetSnapshot {
            devices: vec![
                device("a", "Truck 01", Some("1234-ABC")),
                device("b", "Truck 02", None),
                device("c", "Van 03", Some("9876-XYZ")),
            ],
            sensor_readings: vec![
                reading("a", 1, 80.0),
                reading("a", 2, 64.0),
                reading("b", 2, 8.0),
            ],
            odometer_readings: vec![],
        };
        let window = TimeWindow::new(at(1), at(31)).unwrap();
        let report = compute_fleet(&snapshot, window, &EngineConfig::default());

        assert_snapshot!(format_levels(&report), @r"
        FLUID LEVELS
        ────────────
           Truck 01             1234-ABC   ██████░░░░   64%  ok
        !! Truck 02             N/A        █░░░░░░░░░    8%  critical
           Van 03               9876-XYZ   ░░░░░░░░░░   n/a  no data

        Critical:       1
        Warning:        0
        Average level:  36.0%
        ");
    }
}
