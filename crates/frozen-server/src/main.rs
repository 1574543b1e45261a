//! The binary entry point for the FrozenLib world server.

use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use frozen_config::{CliArgs, Config, ServerDirs};
use frozen_server::{TickLoop, WorldServer};
use tracing::{error, info, warn};

/// Ticks between checks of `config.ron` for changes.
const RELOAD_INTERVAL: u64 = 200;

fn main() {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(root) => Ok(ServerDirs::with_root(root)),
        None => ServerDirs::resolve(),
    };
    let dirs = match dirs.and_then(|dirs| dirs.create().map(|()| dirs)) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize server directories: {e}");
            std::process::exit(1);
        }
    };

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {e}");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    frozen_log::init_logging(Some(&dirs.log_dir), Some(&config));
    info!(
        config = %dirs.config_dir.display(),
        logs = %dirs.log_dir.display(),
        "FrozenLib server starting"
    );

    let mut server = match WorldServer::new(config.clone()) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to create world server: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = server.generate_terrain() {
        error!("Failed to generate terrain: {e}");
        std::process::exit(1);
    }
    server.place_features();

    let mut tick_loop = TickLoop::new(config.server.ticks_per_second);
    let mut previous = Instant::now();
    let mut next_reload = RELOAD_INTERVAL;

    loop {
        let now = Instant::now();
        let frame_time = now.duration_since(previous).as_secs_f64();
        previous = now;

        tick_loop.advance(frame_time, |_| server.tick());

        if server.tick_count() >= next_reload {
            next_reload = server.tick_count() + RELOAD_INTERVAL;
            // CLI overrides keep winning over the file after a reload.
            match server.config().reload(&dirs.config_dir) {
                Ok(Some(mut reloaded)) => {
                    reloaded.apply_cli_overrides(&args);
                    if reloaded != *server.config() {
                        if reloaded.server.ticks_per_second
                            != server.config().server.ticks_per_second
                        {
                            tick_loop = TickLoop::new(reloaded.server.ticks_per_second);
                        }
                        server.apply_config(reloaded);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Config reload failed: {e}"),
            }
        }

        let max_ticks = server.config().server.max_ticks;
        if max_ticks > 0 && server.tick_count() >= max_ticks {
            break;
        }

        thread::sleep(Duration::from_secs_f64(tick_loop.time_to_next_tick()));
    }

    let stats = server.stats();
    let wind = server.wind().wind();
    info!(
        ticks = server.tick_count(),
        finished = stats.finished,
        placed = stats.placed,
        deferred = stats.deferred,
        wind_x = wind.x,
        wind_z = wind.z,
        "FrozenLib server stopped"
    );
}
