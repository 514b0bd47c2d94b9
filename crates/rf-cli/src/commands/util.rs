//! Shared utilities for CLI commands.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use rf_core::{FleetSnapshot, TimeWindow};

use crate::cli::WindowArgs;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Which end of a window a bare date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// 00:00:00 of the date.
    Start,
    /// 23:59:59 of the date.
    End,
}

/// Parse a datetime string as ISO 8601, a bare date, or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Date: "2026-01-15" (start or end of day, per `bound`)
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, bound: Bound, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    // Try ISO 8601 first
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let time = match bound {
            Bound::Start => date.and_hms_opt(0, 0, 0),
            Bound::End => date.and_hms_opt(23, 59, 59),
        };
        return time
            .map(|naive| naive.and_utc())
            .with_context(|| format!("invalid date: {s}"));
    }

    // Try relative time: "N hours/minutes/days/weeks ago"
    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), a date (2026-01-15) or relative (e.g., '2 days ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    // Safe to create Duration now that we've validated the range
    let duration = Duration::minutes(n * minutes_per_unit);
    Ok(now - duration)
}

/// Resolves `--from`/`--to` into a window.
///
/// `to` defaults to `now`; `from` defaults to `default_days` before `to`.
pub fn resolve_window(
    args: &WindowArgs,
    default_days: i64,
    now: DateTime<Utc>,
) -> anyhow::Result<TimeWindow> {
    let to = args
        .to
        .as_deref()
        .map(|s| parse_datetime(s, Bound::End, now))
        .transpose()
        .context("invalid --to")?
        .unwrap_or(now);
    let from = match args.from.as_deref() {
        Some(s) => parse_datetime(s, Bound::Start, now).context("invalid --from")?,
        None => Duration::try_days(default_days)
            .and_then(|span| to.checked_sub_signed(span))
            .with_context(|| format!("default_window_days out of range: {default_days}"))?,
    };

    TimeWindow::new(from, to).context("invalid time window")
}

/// Loads a fleet snapshot file.
///
/// Any failure here ends the whole run: without all three collections there
/// is nothing meaningful to compute.
pub fn load_snapshot(path: &Path) -> anyhow::Result<FleetSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot: FleetSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    tracing::debug!(
        devices = snapshot.devices.len(),
        sensor_readings = snapshot.sensor_readings.len(),
        odometer_readings = snapshot.odometer_readings.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 31, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_datetime("2025-03-01T12:00:00Z", Bound::Start, now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_date_bounds() {
        let start = parse_datetime("2025-02-01", Bound::Start, now()).unwrap();
        let end = parse_datetime("2025-02-01", Bound::End, now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 2, 1, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_parse_relative() {
        let dt = parse_datetime("2 days ago", Bound::Start, now()).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 3, 29, 18, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime("yesterday-ish", Bound::Start, now()).is_err());
        assert!(parse_datetime("2025-02-30", Bound::Start, now()).is_err());
    }

    #[test]
    fn test_resolve_window_defaults() {
        let window = resolve_window(&WindowArgs::default(), 30, now()).unwrap();
        assert_eq!(window.to(), now());
        assert_eq!(window.from(), now() - Duration::days(30));
    }

    #[test]
    fn test_resolve_window_rejects_oversized_default() {
        let err = resolve_window(&WindowArgs::default(), i64::MAX, now()).unwrap_err();
        assert!(err.to_string().contains("default_window_days"), "{err}");

        // Fits in a Duration but not in the calendar.
        assert!(resolve_window(&WindowArgs::default(), 1_000_000_000, now()).is_err());
    }

    #[test]
    fn test_resolve_window_rejects_inverted() {
        let args = WindowArgs {
            from: Some("2025-03-31".to_string()),
            to: Some("2025-02-01".to_string()),
        };
        assert!(resolve_window(&args, 30, now()).is_err());
    }

    #[test]
    fn test_load_snapshot_reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_snapshot(&temp.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read snapshot"));
    }
}
