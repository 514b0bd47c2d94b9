//! Inputs and outputs of a fleet computation run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consumption::Consumption;
use crate::level::{FleetOverview, LevelStatus};
use crate::types::{Device, FusedEvent, Reading, TimeWindow, VehicleId};

/// The three record collections a run consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    pub devices: Vec<Device>,
    #[serde(default, alias = "sensorReadings")]
    pub sensor_readings: Vec<Reading>,
    #[serde(default, alias = "odometerReadings")]
    pub odometer_readings: Vec<Reading>,
}

/// Everything computed for one vehicle in one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub vehicle_id: VehicleId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    pub events: Vec<FusedEvent>,
    pub event_count: usize,
    /// Liters over all events, estimated ones included.
    pub total_liters: u32,
    /// Liters reported in annotations.
    pub manual_liters: u32,
    pub tank_capacity: Option<u32>,
    pub start_level: Option<f64>,
    pub end_level: Option<f64>,
    pub latest_level: Option<f64>,
    pub latest_reading_at: Option<DateTime<Utc>>,
    pub level_status: LevelStatus,
    pub distance_km: f64,
    pub consumption: Consumption,
}

impl VehicleSummary {
    /// A vehicle without refill events carries no signal for the window.
    pub fn is_active(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Result of a fleet computation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetReport {
    pub window: TimeWindow,
    pub vehicles: Vec<VehicleSummary>,
    pub overview: FleetOverview,
}

impl FleetReport {
    /// Vehicles with at least one refill event.
    pub fn active_vehicles(&self) -> impl Iterator<Item = &VehicleSummary> {
        self.vehicles.iter().filter(|v| v.is_active())
    }
}
