use bevy::math::Vec3;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::FlockError;

/// Stable handle of an agent: its slot in the population buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(usize);

impl AgentId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Ring placement used when seeding a population.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingLayout {
    pub radius: f32,
    /// Half-width of the uniform per-axis perturbation.
    pub jitter: f32,
}

impl Default for RingLayout {
    fn default() -> Self {
        Self {
            radius: RING_RADIUS,
            jitter: LAYOUT_JITTER,
        }
    }
}

impl RingLayout {
    fn validate(&self) -> Result<(), FlockError> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(FlockError::InvalidArgument(
                "ring radius must be finite and non-negative",
            ));
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(FlockError::InvalidArgument(
                "layout jitter must be finite and non-negative",
            ));
        }
        Ok(())
    }

    fn place(&self, count: usize, rng: &mut ChaCha8Rng) -> Vec<Vec3> {
        let incr = FULL_TURN / count as f32;
        (0..count)
            .map(|i| {
                let angle = incr * i as f32;
                let ring = Vec3::new(angle.sin() * self.radius, 0.0, angle.cos() * self.radius);
                let jitter = Vec3::new(
                    rng.gen_range(-self.jitter..=self.jitter),
                    rng.gen_range(-self.jitter..=self.jitter),
                    rng.gen_range(-self.jitter..=self.jitter),
                );
                ring + jitter
            })
            .collect()
    }
}

/// Serializable view of one agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub id: usize,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
}

/// Flat position/velocity buffers for a fixed-size set of agents.
///
/// An empty population is the "not yet initialized" state.
#[derive(Clone, Debug, Default)]
pub struct AgentPopulation {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
}

impl AgentPopulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a population seeded on the default ring layout.
    pub fn with_layout(count: usize, layout_seed: Option<u64>) -> Result<Self, FlockError> {
        let mut population = Self::new();
        population.initialize(count, layout_seed)?;
        Ok(population)
    }

    /// Builds a population from explicit `(position, velocity)` pairs, in order.
    pub fn from_agents(agents: impl IntoIterator<Item = (Vec3, Vec3)>) -> Result<Self, FlockError> {
        let mut positions = Vec::new();
        let mut velocities = Vec::new();
        for (position, velocity) in agents {
            positions.push(finite(position, "agent position must be finite")?);
            velocities.push(finite(velocity, "agent velocity must be finite")?);
        }
        Ok(Self {
            positions,
            velocities,
        })
    }

    /// Replaces every agent with `count` fresh ones on the default ring layout.
    pub fn initialize(&mut self, count: usize, layout_seed: Option<u64>) -> Result<(), FlockError> {
        self.initialize_with(RingLayout::default(), count, layout_seed)
    }

    /// Replaces every agent with `count` fresh ones on `layout`, at rest.
    ///
    /// The same seed always yields the same positions.
    pub fn initialize_with(
        &mut self,
        layout: RingLayout,
        count: usize,
        layout_seed: Option<u64>,
    ) -> Result<(), FlockError> {
        if count == 0 {
            return Err(FlockError::InvalidArgument("agent count must be positive"));
        }
        layout.validate()?;

        let mut rng = match layout_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        self.positions = layout.place(count, &mut rng);
        self.velocities = vec![Vec3::ZERO; count];
        Ok(())
    }

    pub fn agent_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Agent handles in insertion order.
    pub fn agents(&self) -> impl ExactSizeIterator<Item = AgentId> {
        (0..self.agent_count()).map(AgentId)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn position_of(&self, id: AgentId) -> Result<Vec3, FlockError> {
        self.check(id).map(|i| self.positions[i])
    }

    pub fn velocity_of(&self, id: AgentId) -> Result<Vec3, FlockError> {
        self.check(id).map(|i| self.velocities[i])
    }

    pub fn set_position(&mut self, id: AgentId, position: Vec3) -> Result<(), FlockError> {
        let i = self.check(id)?;
        self.positions[i] = finite(position, "agent position must be finite")?;
        Ok(())
    }

    pub fn set_velocity(&mut self, id: AgentId, velocity: Vec3) -> Result<(), FlockError> {
        let i = self.check(id)?;
        self.velocities[i] = finite(velocity, "agent velocity must be finite")?;
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<AgentState> {
        self.positions
            .iter()
            .zip(&self.velocities)
            .enumerate()
            .map(|(id, (position, velocity))| AgentState {
                id,
                position: position.to_array(),
                velocity: velocity.to_array(),
            })
            .collect()
    }

    pub(crate) fn replace_velocities(&mut self, velocities: Vec<Vec3>) {
        debug_assert_eq!(velocities.len(), self.positions.len());
        self.velocities = velocities;
    }

    pub(crate) fn integrate_positions(&mut self, dt: f32) {
        for (position, velocity) in self.positions.iter_mut().zip(&self.velocities) {
            *position += *velocity * dt;
        }
    }

    fn check(&self, id: AgentId) -> Result<usize, FlockError> {
        if id.0 < self.agent_count() {
            Ok(id.0)
        } else {
            Err(FlockError::OutOfRange {
                index: id.0,
                count: self.agent_count(),
            })
        }
    }
}

fn finite(v: Vec3, message: &'static str) -> Result<Vec3, FlockError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FlockError::InvalidArgument(message))
    }
}
