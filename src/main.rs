use bevy::prelude::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tidewater::game::ai::world::FactionId;
use tidewater::game::config::DEFAULT_CONFIG_PATH;
use tidewater::game::fixed_math::{FixedNum, FixedVec2};
use tidewater::game::sandbox::{SandboxPlugin, SandboxWorld, UnitSpec};
use tidewater::game::snapshot::save_snapshot;
use tidewater::game::{AiConfig, AiPlugin, AiSimulation, Behavior, SimTick, UnitId};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const SQUAD_SIZE: usize = 12;
const MAX_TICKS: u64 = 2400;
const LINE_OF_SIGHT: f32 = 12.0;

fn setup_file_logging() -> Result<String, Box<dyn Error>> {
    let log_dir = PathBuf::from("logs");
    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    // Keep only the last 25 runs
    cleanup_old_logs(&log_dir, 25);

    let now = chrono::Local::now();
    let log_filename = format!("tidewater_{}.log", now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(
        Rotation::NEVER, // One file per run
        &log_dir,
        &log_filename
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bevy_ecs=info,tidewater=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(log_path_str)
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    if let Ok(entries) = fs::read_dir(log_dir) {
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|s| s.starts_with("tidewater") && s.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();

        // Oldest first
        log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        if log_files.len() > keep_count {
            for file in log_files.iter().take(log_files.len() - keep_count) {
                let _ = fs::remove_file(file.path());
            }
        }
    }
}

/// Demo arguments: `[seed] [--snapshot <path>]`.
struct DemoArgs {
    seed: u64,
    snapshot: Option<String>,
}

fn parse_args() -> Result<DemoArgs, Box<dyn Error>> {
    let mut args = DemoArgs { seed: 7, snapshot: None };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--snapshot" {
            args.snapshot = Some(iter.next().ok_or("--snapshot needs a path")?);
        } else {
            args.seed = arg.parse()?;
        }
    }
    Ok(args)
}

/// Scatter a squad around `center` and give every unit a scanning idle.
fn spawn_squad(
    simulation: &mut AiSimulation<SandboxWorld>,
    rng: &mut StdRng,
    faction: FactionId,
    center: FixedVec2,
) -> Vec<UnitId> {
    let line_of_sight = FixedNum::from_num(LINE_OF_SIGHT);
    let interval = simulation.config().enemy_scan_interval;
    (0..SQUAD_SIZE)
        .map(|_| {
            let jitter = FixedVec2::from_int(rng.random_range(-4..=4), rng.random_range(-4..=4));
            let unit = simulation.world_mut().spawn(UnitSpec::mobile(faction, center + jitter));
            simulation.add_unit(unit, Some(Behavior::idle_scanning(line_of_sight, interval)));
            unit
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let log_file = setup_file_logging()?;
    let args = parse_args()?;

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  Tidewater AI sandbox - Logging to file                  ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  Log file: {:<45} ║", log_file);
    println!("╚══════════════════════════════════════════════════════════╝");

    let config = AiConfig::load_or_default(DEFAULT_CONFIG_PATH);
    let world = SandboxWorld::new(FixedNum::from_num(200), FixedNum::from_num(200), FixedNum::from_num(10));
    let mut simulation = AiSimulation::new(world, config.to_sim());

    let mut rng = StdRng::seed_from_u64(args.seed);
    let west = FixedVec2::from_int(-70, 0);
    let east = FixedVec2::from_int(70, 0);
    let blue = spawn_squad(&mut simulation, &mut rng, FactionId(0), west);
    let red = spawn_squad(&mut simulation, &mut rng, FactionId(1), east);

    let line_of_sight = FixedNum::from_num(LINE_OF_SIGHT);
    simulation.issue_formation_attack_move(&blue, east, line_of_sight);
    simulation.issue_formation_attack_move(&red, west, line_of_sight);
    info!("[SANDBOX] Seed {}: {} vs {} units", args.seed, blue.len(), red.len());

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(AiPlugin::<SandboxWorld>::new(config))
        .add_plugins(SandboxPlugin)
        .insert_resource(simulation);
    app.finish();
    app.cleanup();

    // Drive FixedUpdate directly so the run does not depend on wall-clock time
    for _ in 0..MAX_TICKS {
        app.world_mut().run_schedule(FixedUpdate);

        let tick = app.world().resource::<SimTick>().get();
        let simulation = app.world().resource::<AiSimulation<SandboxWorld>>();
        let blue_alive = simulation.world().alive_count(FactionId(0));
        let red_alive = simulation.world().alive_count(FactionId(1));
        if tick % 100 == 0 {
            info!("[SANDBOX] Tick {}: blue {} / red {} alive, {} paths queued",
                tick, blue_alive, red_alive, simulation.scheduler().pending_count());
        }
        if blue_alive == 0 || red_alive == 0 {
            info!("[SANDBOX] Battle decided at tick {}", tick);
            break;
        }
    }

    let simulation = app.world().resource::<AiSimulation<SandboxWorld>>();
    let stats = simulation.scheduler().stats();
    info!("[SANDBOX] Final: blue {} / red {} alive, {} path requests executed ({} cancelled, peak queue {})",
        simulation.world().alive_count(FactionId(0)),
        simulation.world().alive_count(FactionId(1)),
        stats.executed,
        stats.cancelled,
        stats.peak_queue);

    if let Some(path) = args.snapshot {
        save_snapshot(&path, &simulation.save())?;
        info!("[SANDBOX] Saved AI snapshot to {}", path);
    }

    Ok(())
}
