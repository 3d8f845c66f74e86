use std::f32::consts::PI;

pub const AGENT_COUNT: usize = 40;
pub const RING_RADIUS: f32 = 150.0;
pub const LAYOUT_JITTER: f32 = 50.0;
pub const FULL_TURN: f32 = PI * 2.0;

pub const NEIGHBOR_RADIUS: f32 = 200.0;
pub const DESIRED_SEPARATION: f32 = 80.0;
pub const MAX_SPEED: f32 = 5.0;
pub const MAX_FORCE: f32 = 0.5;

pub const SEPARATION_WEIGHT: f32 = 1.5;
pub const ALIGNMENT_WEIGHT: f32 = 1.0;
pub const COHESION_WEIGHT: f32 = 1.0;

pub const FIXED_TIME_STEP: f32 = 1.0 / 60.0;
pub const HEADLESS_STEPS: u64 = 600;
