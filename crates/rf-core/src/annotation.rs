//! Manual refill annotations.
//!
//! Drivers log refills in a vehicle's free-text note as bracketed tokens:
//!
//! ```text
//! [01/03 -> 20 L]  [14/3 07:45 -> 35 L]
//! ```
//!
//! The token carries day and month but no year. The year is taken from the end
//! of the requested window, stepping back one year when that would place the
//! claim after the window (a December claim read against a January window).

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;

use crate::config::EngineConfig;
use crate::types::{ManualClaim, TimeWindow, VehicleId};

/// `[D/M <anything> -> N L]`
static CLAIM_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(\d{1,2})\s*/\s*(\d{1,2})([^\]]*?)->\s*(\d+)\s*[lL]\s*\]").unwrap()
});

/// Optional `HH:MM` between the date and the arrow.
static TIME_OF_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").unwrap());

/// Extracts the refill claims in `text` that fall inside `window`.
///
/// Tokens that do not resolve to a real calendar date, or whose liters do not
/// fit, are skipped. Absent text yields no claims.
pub fn parse_claims(
    vehicle_id: &VehicleId,
    text: Option<&str>,
    window: &TimeWindow,
    config: &EngineConfig,
) -> Vec<ManualClaim> {
    let Some(text) = text else {
        return Vec::new();
    };

    let mut claims = Vec::new();
    for caps in CLAIM_TOKEN_RE.captures_iter(text) {
        let (Ok(day), Ok(month), Ok(liters)) = (
            caps[1].parse::<u32>(),
            caps[2].parse::<u32>(),
            caps[4].parse::<u32>(),
        ) else {
            tracing::debug!(token = &caps[0], %vehicle_id, "skipping unparseable claim token");
            continue;
        };

        let (hour, minute) = time_of_day(&caps[3]).unwrap_or((config.claim_default_hour, 0));

        let Some(timestamp) = resolve_timestamp(day, month, hour, minute, window.to()) else {
            tracing::debug!(token = &caps[0], %vehicle_id, "skipping claim with invalid date");
            continue;
        };

        if window.contains(timestamp) {
            claims.push(ManualClaim {
                vehicle_id: vehicle_id.clone(),
                timestamp,
                liters,
            });
        }
    }
    claims
}

/// Finds a valid 24-hour `HH:MM` in the text between date and arrow.
fn time_of_day(between: &str) -> Option<(u32, u32)> {
    let caps = TIME_OF_DAY_RE.captures(between)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

/// Places day/month in the year of `window_end`, or the year before when the
/// result would land after `window_end`.
fn resolve_timestamp(
    day: u32,
    month: u32,
    hour: u32,
    minute: u32,
    window_end: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let at = |year: i32| {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .map(|naive| naive.and_utc())
    };

    let year = window_end.year();
    match at(year) {
        Some(ts) if ts <= window_end => Some(ts),
        // 29/02 can exist this year and not the previous one; that is a skip.
        Some(_) => at(year - 1),
        None => None,
    }
}
