//! Fleet computation run.
//!
//! One run is scoped to a snapshot and a window. Vehicles are independent, so
//! each one is summarized on rayon's pool; results keep device order.
//!
//! # Pipeline per vehicle
//!
//! 1. Parse manual claims from the device comment
//! 2. Detect sensor candidates in the in-window level series
//! 3. Fuse claims and candidates into the refill log
//! 4. Estimate capacity from claims against the full level series
//! 5. Balance start level, end level and reported liters into consumption

use std::collections::{BTreeSet, HashMap, HashSet};

use rayon::prelude::*;

use crate::annotation::parse_claims;
use crate::capacity::estimate_capacity;
use crate::config::EngineConfig;
use crate::consumption::{ConsumptionInput, compute_consumption};
use crate::detector::detect_candidates;
use crate::fusion::fuse_events;
use crate::level::{FleetOverview, LevelStatus, latest_level};
use crate::odometer::distance_km;
use crate::summary::{FleetReport, FleetSnapshot, VehicleSummary};
use crate::types::{Device, Reading, TimeWindow};

/// Computes the summaries of every device in `snapshot` for `window`.
///
/// Readings of unknown devices are ignored.
pub fn compute_fleet(
    snapshot: &FleetSnapshot,
    window: TimeWindow,
    config: &EngineConfig,
) -> FleetReport {
    let sensor_by_vehicle = group_by_vehicle(&snapshot.sensor_readings);
    let odometer_by_vehicle = group_by_vehicle(&snapshot.odometer_readings);

    let orphans = unknown_vehicle_ids(snapshot);
    if !orphans.is_empty() {
        tracing::warn!(
            orphans = orphans.len(),
            ids = ?orphans,
            "ignoring readings of unknown vehicles"
        );
    }

    let vehicles: Vec<VehicleSummary> = snapshot
        .devices
        .par_iter()
        .map(|device| {
            let id = device.id.as_str();
            summarize_vehicle(
                device,
                sensor_by_vehicle.get(id).map(Vec::as_slice).unwrap_or_default(),
                odometer_by_vehicle.get(id).map(Vec::as_slice).unwrap_or_default(),
                &window,
                config,
            )
        })
        .collect();

    let overview = FleetOverview::from_summaries(&vehicles);
    tracing::debug!(
        vehicles = overview.vehicle_count,
        active = overview.active_count,
        "fleet computation finished"
    );

    FleetReport {
        window,
        vehicles,
        overview,
    }
}

/// Summarizes one vehicle.
///
/// Both series must be sorted by timestamp ascending and may extend beyond
/// the window; only the capacity estimate and the latest level look outside it.
pub fn summarize_vehicle(
    device: &Device,
    sensor: &[Reading],
    odometer: &[Reading],
    window: &TimeWindow,
    config: &EngineConfig,
) -> VehicleSummary {
    let in_window: Vec<Reading> = sensor
        .iter()
        .filter(|r| window.contains(r.timestamp))
        .cloned()
        .collect();

    let claims = parse_claims(&device.id, device.comment.as_deref(), window, config);
    let candidates = detect_candidates(&device.id, &in_window, config);
    let events = fuse_events(&claims, &candidates, odometer, config);
    let tank_capacity = estimate_capacity(sensor, &claims, config);

    let manual_liters = claims.iter().fold(0u32, |acc, c| acc.saturating_add(c.liters));
    let total_liters = events.iter().fold(0u32, |acc, e| acc.saturating_add(e.liters));
    let start_level = in_window.first().map(|r| r.value);
    let end_level = in_window.last().map(|r| r.value);
    let distance = distance_km(odometer, window);

    let consumption = compute_consumption(
        &ConsumptionInput {
            start_level,
            end_level,
            manual_liters,
            capacity: tank_capacity,
            distance_km: distance,
        },
        config,
    );

    let latest = latest_level(sensor);
    tracing::debug!(
        vehicle_id = %device.id,
        claims = claims.len(),
        candidates = candidates.len(),
        events = events.len(),
        ?tank_capacity,
        "summarized vehicle"
    );

    VehicleSummary {
        vehicle_id: device.id.clone(),
        name: device.name.clone(),
        license_plate: device.license_plate.clone(),
        event_count: events.len(),
        events,
        total_liters,
        manual_liters,
        tank_capacity,
        start_level,
        end_level,
        latest_level: latest,
        latest_reading_at: sensor.last().map(|r| r.timestamp),
        level_status: LevelStatus::classify(latest, config),
        distance_km: distance,
        consumption,
    }
}

/// Distinct vehicle ids that have readings but no device.
fn unknown_vehicle_ids(snapshot: &FleetSnapshot) -> BTreeSet<&str> {
    let known: HashSet<&str> = snapshot.devices.iter().map(|d| d.id.as_str()).collect();
    snapshot
        .sensor_readings
        .iter()
        .chain(&snapshot.odometer_readings)
        .map(|r| r.vehicle_id.as_str())
        .filter(|id| !known.contains(id))
        .collect()
}

/// Groups readings per vehicle, each series stable-sorted by timestamp.
fn group_by_vehicle(readings: &[Reading]) -> HashMap<&str, Vec<Reading>> {
    let mut grouped: HashMap<&str, Vec<Reading>> = HashMap::new();
    for reading in readings {
        grouped
            .entry(reading.vehicle_id.as_str())
            .or_default()
            .push(reading.clone());
    }
    for series in grouped.values_mut() {
        series.sort_by_key(|r| r.timestamp);
    }
    grouped
}
