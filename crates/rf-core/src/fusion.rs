//! Event fusion.
//!
//! Pairs manual claims with sensor candidates that describe the same physical
//! refill and produces the vehicle's typed refill log.
//!
//! Each claim, in claim order, takes the first not-yet-matched candidate (in
//! chronological candidate order) within the match tolerance. A candidate is
//! consumed by at most one claim.

use crate::config::EngineConfig;
use crate::odometer::odometer_km_at;
use crate::types::{EventKind, FusedEvent, ManualClaim, Reading, SensorCandidate};

/// Fuses claims and candidates into one chronologically sorted event list.
///
/// `odometer` must be sorted by timestamp ascending.
pub fn fuse_events(
    claims: &[ManualClaim],
    candidates: &[SensorCandidate],
    odometer: &[Reading],
    config: &EngineConfig,
) -> Vec<FusedEvent> {
    let tolerance = config.match_tolerance();
    let mut matched = vec![false; candidates.len()];
    let mut events = Vec::with_capacity(claims.len() + candidates.len());

    for claim in claims {
        let pick = candidates.iter().zip(&matched).position(|(candidate, taken)| {
            !*taken && (candidate.timestamp() - claim.timestamp).abs() <= tolerance
        });

        let event = if let Some(idx) = pick {
            matched[idx] = true;
            let candidate = &candidates[idx];
            let jump = candidate.percent_jump();
            FusedEvent {
                vehicle_id: claim.vehicle_id.clone(),
                timestamp: candidate.timestamp(),
                kind: EventKind::Verified,
                liters: claim.liters,
                percent_jump: Some(jump),
                tank_capacity_estimate: Some(capacity_from_jump(f64::from(claim.liters), jump)),
                odometer_km: odometer_km_at(odometer, candidate.timestamp()),
            }
        } else {
            FusedEvent {
                vehicle_id: claim.vehicle_id.clone(),
                timestamp: claim.timestamp,
                kind: EventKind::ManualOnly,
                liters: claim.liters,
                percent_jump: None,
                tank_capacity_estimate: None,
                odometer_km: odometer_km_at(odometer, claim.timestamp),
            }
        };
        events.push(event);
    }

    let fallback = config.fallback_capacity_liters;
    for (candidate, _) in candidates
        .iter()
        .zip(&matched)
        .filter(|(_, matched)| !**matched)
    {
        let jump = candidate.percent_jump();
        events.push(FusedEvent {
            vehicle_id: candidate.vehicle_id.clone(),
            timestamp: candidate.timestamp(),
            kind: EventKind::SensorOnly,
            liters: round_liters(jump / 100.0 * f64::from(fallback)),
            percent_jump: Some(jump),
            tank_capacity_estimate: Some(fallback),
            odometer_km: odometer_km_at(odometer, candidate.timestamp()),
        });
    }

    events.sort_by_key(|e| e.timestamp);
    events
}

/// Full-tank volume implied by `liters` raising the level by `jump` points.
///
/// Only called with jumps above the noise threshold, so the divisor is never
/// near zero.
pub(crate) fn capacity_from_jump(liters: f64, jump: f64) -> u32 {
    round_liters(liters / (jump / 100.0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn round_liters(liters: f64) -> u32 {
    liters.round().max(0.0) as u32
}
