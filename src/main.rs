//! Headless runner that loads a scene and reports where the liquid ended up.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use decant::liquid_sync::LiquidDiagnostics;
use decant::{init_logging, spawn_scene, LiquidPlugin, LiquidState, SceneConfig, SceneId};
use log::info;

const DEMO_SCENE: &str = include_str!("../scenes/pour_demo.json");

/// Headless liquid pouring simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Scene description in JSON; the bundled demo is used when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,
    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 120)]
    ticks: u32,
    /// Seconds advanced per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

fn load_scene(path: Option<&PathBuf>) -> Result<SceneConfig> {
    path.map_or_else(
        || SceneConfig::from_json_str(DEMO_SCENE).context("parsing bundled demo scene"),
        |file| {
            SceneConfig::from_path(file)
                .with_context(|| format!("loading scene {}", file.display()))
        },
    )
}

fn log_summary(app: &mut App) {
    let world = app.world_mut();
    let mut vessels = world.query::<(&Name, &SceneId, &LiquidState)>();
    let mut rows: Vec<_> = vessels.iter(world).collect();
    rows.sort_by_key(|(_, id, _)| id.0);
    for (name, _, state) in rows {
        info!(
            "{name}: {:.3} L of {:.3} L ({:.1}%)",
            state.litres,
            state.volume,
            state.fill_percent * 100.0
        );
    }

    let diagnostics = world.resource::<LiquidDiagnostics>();
    info!(
        "{} ticks, {} pours, {:.3} L transferred, {:.3} L lost",
        diagnostics.ticks,
        diagnostics.pours,
        diagnostics.litres_transferred,
        diagnostics.litres_lost
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "--dt must be a positive number of seconds"
    );

    let scene = load_scene(args.scene.as_ref())?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LiquidPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            args.dt,
        )));
    let spawned = spawn_scene(app.world_mut(), &scene);
    info!("spawned {} scene objects", spawned.len());
    app.finish();
    app.cleanup();

    for _ in 0..args.ticks {
        app.update();
    }
    log_summary(&mut app);
    Ok(())
}
