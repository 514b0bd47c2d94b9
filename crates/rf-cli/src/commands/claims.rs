//! Claims command: show what the annotation parser reads from a note.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use rf_core::{ManualClaim, VehicleId, parse_claims};

use crate::Config;
use crate::cli::WindowArgs;
use crate::commands::util::resolve_window;

/// Formats parsed claims, one per line.
pub fn format_claims(claims: &[ManualClaim]) -> String {
    let mut output = String::new();
    if claims.is_empty() {
        writeln!(output, "No refill claims found in this window.").unwrap();
        return output;
    }
    for claim in claims {
        writeln!(
            output,
            "{}  {:>4} L",
            claim.timestamp.format("%Y-%m-%d %H:%M"),
            claim.liters
        )
        .unwrap();
    }
    output
}

/// Runs the claims command.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    text: &str,
    window: &WindowArgs,
) -> Result<()> {
    let window = resolve_window(window, config.default_window_days, Utc::now())?;
    let vehicle = VehicleId::new("annotation").context("invalid placeholder vehicle id")?;
    let claims = parse_claims(&vehicle, Some(text), &window, &config.engine);

    writer
        .write_all(format_claims(&claims).as_bytes())
        .context("failed to write claims")?;
    Ok(())
}
