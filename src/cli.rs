use std::path::PathBuf;

use clap::Parser;
use flocking::constants::{AGENT_COUNT, FIXED_TIME_STEP, HEADLESS_STEPS};

/// Boids flocking simulation.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Number of agents placed on the starting ring.
    #[arg(long, default_value_t = AGENT_COUNT)]
    pub agents: usize,

    /// Seed for the starting layout; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file with flocking parameters.
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Run without a window and print the final state as JSON.
    #[arg(long)]
    pub headless: bool,

    /// Steps to run in headless mode.
    #[arg(long, default_value_t = HEADLESS_STEPS)]
    pub steps: u64,

    /// Seconds per step in headless mode.
    #[arg(long, default_value_t = FIXED_TIME_STEP)]
    pub dt: f32,
}
