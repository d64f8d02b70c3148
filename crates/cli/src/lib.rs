//! CLI tool for inspecting mirrored-zone partition routing.
//!
//! Provides commands for:
//! - Checking how evenly the mirrored-zone hash spreads keys
//! - Routing keys against a topology and store definition
//! - Validating topology and store definitions together

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
