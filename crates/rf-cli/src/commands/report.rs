//! Report command for the per-vehicle refill log.
//!
//! This module implements `rf report` with human-readable and JSON output.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rf_core::{
    ConsumptionMethod, FleetReport, FusedEvent, TimeWindow, VehicleSummary, compute_fleet,
};

use crate::Config;
use crate::cli::WindowArgs;
use crate::commands::util::{load_snapshot, resolve_window};

// ========== Formatting ==========

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn format_window(window: &TimeWindow) -> String {
    format!(
        "{} to {}",
        window.from().format("%Y-%m-%d"),
        window.to().format("%Y-%m-%d")
    )
}

/// Formats an optional percentage as "45%", or "n/a".
pub fn format_level(level: Option<f64>) -> String {
    level.map_or_else(|| "n/a".to_string(), |l| format!("{l:.0}%"))
}

/// Formats one refill event as a single line.
pub fn format_event(event: &FusedEvent) -> String {
    let mut line = format!(
        "{}  {:<11}  {:>4} L",
        format_timestamp(event.timestamp),
        event.kind.as_str(),
        event.liters
    );
    if let Some(jump) = event.percent_jump {
        write!(line, "  +{jump:.1}%").unwrap();
    }
    if let Some(capacity) = event.tank_capacity_estimate {
        write!(line, "  cap {capacity} L").unwrap();
    }
    write!(line, "  @ {} km", event.odometer_km).unwrap();
    line
}

fn format_consumption(vehicle: &VehicleSummary) -> String {
    let consumption = &vehicle.consumption;
    let mut line = match consumption.method {
        ConsumptionMethod::MassBalance => format!("{:.1} L (mass balance)", consumption.liters),
        ConsumptionMethod::ManualFallback => {
            format!("{:.1} L (reported refills only)", consumption.liters)
        }
        ConsumptionMethod::NoData => "no data".to_string(),
    };
    if let Some(avg) = consumption.avg_per_100km {
        write!(
            line,
            ", {avg:.1} L/100 km over {:.0} km",
            vehicle.distance_km
        )
        .unwrap();
    }
    line
}

fn format_vehicle(output: &mut String, vehicle: &VehicleSummary) {
    match &vehicle.license_plate {
        Some(plate) => writeln!(output, "{} ({plate})", vehicle.name).unwrap(),
        None => writeln!(output, "{}", vehicle.name).unwrap(),
    }
    writeln!(
        output,
        "  Level:       {} ({})",
        format_level(vehicle.latest_level),
        vehicle.level_status
    )
    .unwrap();
    let capacity = vehicle
        .tank_capacity
        .map_or_else(|| "unknown".to_string(), |c| format!("{c} L"));
    writeln!(output, "  Capacity:    {capacity}").unwrap();
    writeln!(output, "  Consumption: {}", format_consumption(vehicle)).unwrap();
    let noun = if vehicle.event_count == 1 {
        "event"
    } else {
        "events"
    };
    writeln!(
        output,
        "  Refills:     {} {noun}, {} L",
        vehicle.event_count, vehicle.total_liters
    )
    .unwrap();
    for event in &vehicle.events {
        writeln!(output, "    {}", format_event(event)).unwrap();
    }
}

/// Formats the human-readable report output.
pub fn format_report(report: &FleetReport, include_inactive: bool) -> String {
    let mut output = String::new();

    // Header
    writeln!(output, "REFILL REPORT: {}", format_window(&report.window)).unwrap();

    let vehicles: Vec<&VehicleSummary> = if include_inactive {
        report.vehicles.iter().collect()
    } else {
        report.active_vehicles().collect()
    };

    if vehicles.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No refill activity in this window.").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Hint: Run 'rf report --all' to list every vehicle.").unwrap();
        return output;
    }

    for vehicle in vehicles {
        writeln!(output).unwrap();
        format_vehicle(&mut output, vehicle);
    }

    // SUMMARY section
    let overview = &report.overview;
    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(
        output,
        "Vehicles:       {} ({} active)",
        overview.vehicle_count, overview.active_count
    )
    .unwrap();
    writeln!(output, "Refilled:       {} L", overview.total_liters).unwrap();
    writeln!(output, "Consumed:       {:.1} L", overview.total_consumed).unwrap();

    output
}

/// Formats the report as pretty JSON.
pub fn format_report_json(report: &FleetReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    input: &std::path::Path,
    window: &WindowArgs,
    json: bool,
    include_inactive: bool,
) -> Result<()> {
    let window = resolve_window(window, config.default_window_days, Utc::now())?;
    let snapshot = load_snapshot(input)?;
    let report = compute_fleet(&snapshot, window, &config.engine);

    let output = if json {
        let mut json = format_report_json(&report)?;
        json.push('\n');
        json
    } else {
        format_report(&report, include_inactive)
    };
    writer
        .write_all(output.as_bytes())
        .context("failed to write report")?;

    Ok(())
}
