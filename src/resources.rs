use bevy::prelude::*;
use flocking::{
    AgentPopulation, FlockError, FlockMetrics, FlockParameters, FlockSnapshot, FlockingManager,
    StepStats,
};

/// Owns the simulation state the host drives each frame.
#[derive(Resource)]
pub struct FlockSim {
    pub manager: FlockingManager,
    pub population: AgentPopulation,
    pub agent_count: usize,
    pub seed: Option<u64>,
    pub steps: u64,
    pub last_stats: StepStats,
}

impl FlockSim {
    pub fn new(
        params: FlockParameters,
        agent_count: usize,
        seed: Option<u64>,
    ) -> Result<Self, FlockError> {
        Ok(Self {
            manager: FlockingManager::new(params)?,
            population: AgentPopulation::with_layout(agent_count, seed)?,
            agent_count,
            seed,
            steps: 0,
            last_stats: StepStats::default(),
        })
    }

    pub fn advance(&mut self, dt: f32) -> Result<StepStats, FlockError> {
        let stats = self.manager.advance(&mut self.population, dt)?;
        self.steps += 1;
        self.last_stats = stats;
        Ok(stats)
    }

    /// Puts every agent back on the starting ring, reusing the seed.
    pub fn reset(&mut self) -> Result<(), FlockError> {
        self.population.initialize(self.agent_count, self.seed)?;
        self.steps = 0;
        self.last_stats = StepStats::default();
        Ok(())
    }

    pub fn metrics(&self) -> Option<FlockMetrics> {
        FlockMetrics::measure(&self.population)
    }

    pub fn snapshot(&self) -> FlockSnapshot {
        FlockSnapshot::capture(self.steps, &self.population)
    }
}

/// Fixed time step used when running without a window.
#[derive(Resource)]
pub struct FixedDelta(pub f32);

#[derive(Resource)]
pub struct DebugMode(pub bool);

#[derive(Resource, Default)]
pub struct Paused(pub bool);

#[derive(Resource)]
pub struct MetricsTimer(pub Timer);

impl Default for MetricsTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(2.0, TimerMode::Repeating))
    }
}
