//! Sensor refill detection.
//!
//! Consolidates consecutive upward steps of a level series into discrete
//! refill candidates.
//!
//! # Algorithm Summary
//!
//! 1. Walk the series pairwise; a step is upward when the level increases
//! 2. An upward step within the grouping window of the open candidate's last
//!    update extends it; otherwise the open candidate closes and a new one
//!    starts at the step's previous reading
//! 3. Non-upward steps are ignored: an open candidate only closes when the
//!    next upward step arrives too late, or when the series ends
//! 4. Closed candidates are emitted only if their total jump exceeds the noise
//!    threshold

use crate::config::EngineConfig;
use crate::types::{Reading, SensorCandidate, VehicleId};

/// Consolidation state.
#[derive(Debug, Clone)]
enum DetectorState {
    /// No rise in progress.
    Idle,
    /// A rise is being accumulated.
    Accumulating(SensorCandidate),
}

/// Detects refill candidates in a level series.
///
/// The series must be sorted by timestamp ascending.
pub fn detect_candidates(
    vehicle_id: &VehicleId,
    series: &[Reading],
    config: &EngineConfig,
) -> Vec<SensorCandidate> {
    let grouping_window = config.grouping_window();
    let mut candidates = Vec::new();
    let mut state = DetectorState::Idle;

    for pair in series.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if curr.value - prev.value <= 0.0 {
            continue;
        }

        state = match state {
            DetectorState::Accumulating(mut open)
                if curr.timestamp - open.end_timestamp <= grouping_window =>
            {
                open.end_timestamp = curr.timestamp;
                open.end_level = curr.value;
                DetectorState::Accumulating(open)
            }
            previous => {
                if let DetectorState::Accumulating(closed) = previous {
                    emit(closed, config, &mut candidates);
                }
                DetectorState::Accumulating(SensorCandidate {
                    vehicle_id: vehicle_id.clone(),
                    start_timestamp: prev.timestamp,
                    end_timestamp: curr.timestamp,
                    start_level: prev.value,
                    end_level: curr.value,
                })
            }
        };
    }

    if let DetectorState::Accumulating(trailing) = state {
        emit(trailing, config, &mut candidates);
    }

    tracing::debug!(
        %vehicle_id,
        readings = series.len(),
        candidates = candidates.len(),
        "detected sensor candidates"
    );
    candidates
}

fn emit(candidate: SensorCandidate, config: &EngineConfig, out: &mut Vec<SensorCandidate>) {
    if candidate.percent_jump() > config.noise_threshold_pct {
        out.push(candidate);
    } else {
        tracing::trace!(
            vehicle_id = %candidate.vehicle_id,
            jump = candidate.percent_jump(),
            "discarding rise below noise threshold"
        );
    }
}
