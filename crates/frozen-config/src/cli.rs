//! Command-line argument parsing for the world server.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// FrozenLib world server command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "frozen-server", about = "Headless FrozenLib world server")]
pub struct CliArgs {
    /// Noise seed.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Stop after this many ticks (0 runs forever).
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Tick rate.
    #[arg(long)]
    pub tps: Option<u32>,

    /// Thunder level in [0, 1].
    #[arg(long)]
    pub thunder: Option<f64>,

    /// Disable the wind simulation.
    #[arg(long)]
    pub no_wind: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config root (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(ticks) = args.ticks {
            self.server.max_ticks = ticks;
        }
        if let Some(tps) = args.tps {
            self.server.ticks_per_second = tps;
        }
        if let Some(thunder) = args.thunder {
            self.wind.thunder_level = thunder;
        }
        if args.no_wind {
            self.wind.enabled = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
