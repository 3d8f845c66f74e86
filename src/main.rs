mod cli;
mod components;
mod resources;
mod systems;

use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use flocking::{FlockError, FlockParameters};

use crate::cli::Args;
use crate::resources::*;
use crate::systems::*;

fn main() -> ExitCode {
    let args = Args::parse();

    let result = if args.headless {
        run_headless(&args)
    } else {
        run_windowed(&args)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn load_sim(args: &Args) -> Result<FlockSim, FlockError> {
    let params = match &args.params {
        Some(path) => {
            info!("loading parameters from {}", path.display());
            FlockParameters::from_json_file(path)?
        }
        None => FlockParameters::default(),
    };
    FlockSim::new(params, args.agents, args.seed)
}

// ==================== Windowed Host ====================
fn run_windowed(args: &Args) -> Result<(), FlockError> {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Flocking".into(),
            ..default()
        }),
        ..default()
    }));

    let sim = load_sim(args)?;

    let exit = app
        .insert_resource(sim)
        .insert_resource(DebugMode(false))
        .insert_resource(Paused::default())
        .insert_resource(MetricsTimer::default())
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                handle_keys,
                step_flock,
                sync_agent_transforms,
                draw_debug_velocities,
                log_metrics,
            )
                .chain(),
        )
        .run();

    if let AppExit::Error(code) = exit {
        warn!("app exited with code {code}");
    }
    Ok(())
}

// ==================== Headless Runner ====================
fn run_headless(args: &Args) -> Result<(), FlockError> {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));

    if !(args.dt.is_finite() && args.dt > 0.0) {
        return Err(FlockError::InvalidArgument("dt must be positive and finite"));
    }
    let sim = load_sim(args)?;

    app.insert_resource(sim)
        .insert_resource(FixedDelta(args.dt))
        .add_systems(Update, step_flock_fixed);

    for _ in 0..args.steps {
        app.update();
    }

    let sim = app.world().resource::<FlockSim>();
    info!(steps = sim.steps, "headless run finished");
    println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    Ok(())
}
