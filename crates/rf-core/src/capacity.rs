//! Tank capacity estimation.
//!
//! Independent of fusion: for every claim, look for a clean before/after level
//! pair around the claim and convert the reported liters into a full-tank
//! volume. The per-claim samples are averaged.

use crate::config::EngineConfig;
use crate::fusion::round_liters;
use crate::types::{ManualClaim, Reading};

/// Estimates the tank capacity from claims and the level series.
///
/// Returns `None` when no claim has readings on both sides with a jump above
/// the noise threshold.
pub fn estimate_capacity(
    series: &[Reading],
    claims: &[ManualClaim],
    config: &EngineConfig,
) -> Option<u32> {
    let window = config.capacity_window();

    let samples: Vec<f64> = claims
        .iter()
        .filter_map(|claim| {
            let nearby = series
                .iter()
                .filter(|r| (r.timestamp - claim.timestamp).abs() <= window);

            let (mut pre_min, mut post_max) = (None::<f64>, None::<f64>);
            for reading in nearby {
                if reading.timestamp < claim.timestamp {
                    pre_min = Some(pre_min.map_or(reading.value, |m| m.min(reading.value)));
                } else {
                    post_max = Some(post_max.map_or(reading.value, |m| m.max(reading.value)));
                }
            }

            let jump = post_max? - pre_min?;
            (jump > config.noise_threshold_pct).then(|| f64::from(claim.liters) / (jump / 100.0))
        })
        .collect();

    if samples.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    Some(round_liters(mean))
}
