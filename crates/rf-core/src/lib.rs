//! Core domain logic for the fleet refill log.
//!
//! This crate contains the pure reconstruction and estimation engine:
//! - Annotations: parsing manual refill claims from free-text notes
//! - Detection: consolidating sensor level rises into refill candidates
//! - Fusion: pairing claims with candidates into a typed refill log
//! - Estimation: tank capacity and mass-balance consumption per window
//!
//! It performs no I/O; callers supply the device, sensor and odometer records.

pub mod annotation;
pub mod capacity;
mod config;
pub mod consumption;
pub mod detector;
mod engine;
pub mod fusion;
pub mod level;
pub mod odometer;
mod summary;
pub mod types;

pub use annotation::parse_claims;
pub use capacity::estimate_capacity;
pub use config::EngineConfig;
pub use consumption::{Consumption, ConsumptionInput, ConsumptionMethod, compute_consumption};
pub use detector::detect_candidates;
pub use engine::{compute_fleet, summarize_vehicle};
pub use fusion::fuse_events;
pub use level::{FleetOverview, LevelStatus};
pub use summary::{FleetReport, FleetSnapshot, VehicleSummary};
pub use types::{
    Device, EventKind, FusedEvent, ManualClaim, Reading, SensorCandidate, TimeWindow,
    ValidationError, VehicleId,
};
