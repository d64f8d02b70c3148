//! Command-line configuration.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

/// Inspect mirrored-zone partition routing.
#[derive(Debug, Parser)]
#[command(name = "ring-tool", version)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        init_tracing(&self.log_level);
        let result = self.command.execute()?;
        print!("{}", result);
        Ok(())
    }
}

/// Logs go to stderr so reports on stdout stay machine readable.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
