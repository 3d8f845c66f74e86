//! Boids flocking over a flat, engine-independent agent population.
//!
//! [`AgentPopulation`] owns positions and velocities; [`FlockingManager`]
//! borrows it once per tick to apply separation, alignment and cohesion.

pub mod constants;
pub mod error;
pub mod manager;
pub mod metrics;
pub mod params;
pub mod population;
pub mod steering;

pub use error::FlockError;
pub use manager::{FlockingManager, Steering, StepStats};
pub use metrics::{FlockMetrics, FlockSnapshot};
pub use params::FlockParameters;
pub use population::{AgentId, AgentPopulation, AgentState, RingLayout};
