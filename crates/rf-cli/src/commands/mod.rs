//! CLI subcommand implementations.

pub mod claims;
pub mod levels;
pub mod report;
pub mod util;
