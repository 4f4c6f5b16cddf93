//! Flipswarm headless runner.
//!
//! Builds a world from `config.ini`, registers the flipbook template, spawns
//! the swarm once, and advances a fixed number of ticks. Useful for timing
//! the parallel animation update and for producing frame snapshots that a
//! renderer (or a diff) can consume.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --ticks 600 --dump frames.json
//! ```

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use flipswarm::resources::simconfig::SimConfig;
use flipswarm::resources::spawntrigger::SpawnTrigger;
use flipswarm::simulation::Simulation;
use flipswarm::systems::spawner::plan_placements;
use log::{error, info, warn};

/// Flipswarm: thousands of flipbook sprites on a deterministic spawn layout.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file to load.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Override the number of ticks to simulate.
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the number of instances to spawn.
    #[arg(long)]
    count: Option<i32>,

    /// Log the first placements of the spawn layout.
    #[arg(long)]
    seed_report: bool,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Write a JSON frame snapshot to PATH after the run.
    #[arg(long, value_name = "PATH")]
    dump: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = SimConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{} ({}), using defaults", e, cli.config.display());
    }
    if let Some(ticks) = cli.ticks {
        config.ticks = ticks;
    }
    if let Some(count) = cli.count {
        config.spawn_count = count;
    }

    // Early-exit: write the effective config and quit
    if let Some(path) = cli.write_config {
        config.config_path = path;
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    if cli.seed_report {
        let preview = plan_placements(
            config.spawn_count.clamp(0, 5) as usize,
            config.spawn_area(),
            true,
        );
        for (i, p) in preview.iter().enumerate() {
            info!(
                "placement {}: ({:.4}, {:.4}, {:.6}) timer {:.4}",
                i,
                p.x,
                p.y,
                p.z,
                p.timer.unwrap_or_default()
            );
        }
    }

    let mut sim = Simulation::new(&config);

    let template = config.template();
    if let Err(e) = sim.register_template(&template) {
        error!("{}", e);
        std::process::exit(1);
    }
    if let Err(e) = sim.request_spawn(&template.name, config.spawn_count, config.spawn_area()) {
        error!("{}", e);
        std::process::exit(1);
    }

    let started = Instant::now();
    sim.run(config.ticks, config.fixed_delta);
    let elapsed = started.elapsed();

    if let Some(SpawnTrigger::Rejected(e)) = sim.spawn_trigger() {
        error!("Spawn never happened: {}", e);
    }

    let instances = sim.instance_count();
    let per_tick = if config.ticks > 0 {
        elapsed.as_secs_f64() * 1000.0 / config.ticks as f64
    } else {
        0.0
    };
    info!(
        "Simulated {} instances for {} ticks in {:.2?} ({:.3} ms/tick)",
        instances, config.ticks, elapsed, per_tick
    );

    let snapshot = sim.frame_snapshot();
    for (frame, count) in snapshot.histogram() {
        info!("frame {}: {} instances", frame, count);
    }

    if let Some(path) = cli.dump {
        let written = snapshot
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => info!("Frame snapshot written to {}", path.display()),
            Err(e) => {
                eprintln!("Error writing snapshot: {e}");
                std::process::exit(1);
            }
        }
    }
}
