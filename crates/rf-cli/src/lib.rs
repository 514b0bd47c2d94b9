//! Fleet refill log CLI library.
//!
//! This crate provides the CLI interface over the refill reconstruction engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, WindowArgs};
pub use config::Config;
