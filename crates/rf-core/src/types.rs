//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The window starts after it ends.
    #[error("time window is inverted: from {from} is after to {to}")]
    InvertedWindow {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    /// An engine setting is out of range.
    #[error("invalid engine setting {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated vehicle (device) identifier.
    ///
    /// Vehicle IDs must be non-empty strings. They are the telematics device IDs
    /// that readings and annotations are keyed by.
    VehicleId, "vehicle ID"
);

/// A closed time range `[from, to]` that a computation run is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a window, rejecting `from > to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, ValidationError> {
        if from > to {
            return Err(ValidationError::InvertedWindow { from, to });
        }
        Ok(Self { from, to })
    }

    pub const fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub const fn to(&self) -> DateTime<Utc> {
        self.to
    }

    /// Returns true if `ts` lies inside the window, both ends inclusive.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.from && ts <= self.to
    }
}

/// A vehicle as known to the telematics platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: VehicleId,
    pub name: String,
    #[serde(default, alias = "licensePlate", skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    /// Free-text note where drivers log refills, e.g. `[01/03 08:15 -> 20 L]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A single sensor or odometer observation.
///
/// Sensor values are percent of full (0-100, may overshoot with noise).
/// Odometer values are meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(alias = "deviceId")]
    pub vehicle_id: VehicleId,
    #[serde(alias = "dateTime")]
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "data")]
    pub value: f64,
}

/// A refill reported by a human in a vehicle's annotation text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualClaim {
    pub vehicle_id: VehicleId,
    pub timestamp: DateTime<Utc>,
    pub liters: u32,
}

/// A consolidated upward movement of the sensor level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorCandidate {
    pub vehicle_id: VehicleId,
    pub start_timestamp: DateTime<Utc>,
    pub end_timestamp: DateTime<Utc>,
    pub start_level: f64,
    pub end_level: f64,
}

impl SensorCandidate {
    /// Level gained over the whole group, in percentage points.
    pub fn percent_jump(&self) -> f64 {
        self.end_level - self.start_level
    }

    /// Reference time used for matching and ordering: when the rise began.
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.start_timestamp
    }
}

/// How a refill event is corroborated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Reported manually and observed by the sensor.
    Verified,
    /// Reported manually, no matching sensor rise.
    ManualOnly,
    /// Observed by the sensor, never reported.
    SensorOnly,
}

impl EventKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::ManualOnly => "MANUAL_ONLY",
            Self::SensorOnly => "SENSOR_ONLY",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a vehicle's reconstructed refill log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedEvent {
    pub vehicle_id: VehicleId,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    /// Reported liters, or estimated liters for sensor-only events.
    pub liters: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_jump: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tank_capacity_estimate: Option<u32>,
    pub odometer_km: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn vehicle_id_rejects_empty() {
        assert_eq!(
            VehicleId::new(""),
            Err(ValidationError::Empty {
                field: "vehicle ID"
            })
        );
        assert_eq!(VehicleId::new("b1").unwrap().as_str(), "b1");
    }

    #[test]
    fn window_rejects_inverted_range() {
        let early = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap();
        assert!(TimeWindow::new(late, early).is_err());

        let window = TimeWindow::new(early, late).unwrap();
        assert!(window.contains(early));
        assert!(window.contains(late));
        assert!(!window.contains(late + chrono::Duration::seconds(1)));
    }

    #[test]
    fn reading_accepts_source_field_names() {
        let json = r#"{"deviceId": "b12", "dateTime": "2025-03-01T12:00:00Z", "data": 41.5}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.vehicle_id.as_str(), "b12");
        assert!((reading.value - 41.5).abs() < f64::EPSILON);
    }

    #[test]
    fn reading_rejects_empty_vehicle_id() {
        let json = r#"{"vehicle_id": "", "timestamp": "2025-03-01T12:00:00Z", "value": 1.0}"#;
        let result: Result<Reading, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn event_kind_serializes_screaming_case() {
        let json = serde_json::to_string(&EventKind::ManualOnly).unwrap();
        assert_eq!(json, r#""MANUAL_ONLY""#);
    }
}
