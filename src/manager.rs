use bevy::log::{debug, trace};
use bevy::math::Vec3;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use crate::error::FlockError;
use crate::params::FlockParameters;
use crate::population::{AgentId, AgentPopulation};
use crate::steering::{clamp_magnitude, magnitude, safe_normalize};

/// Raw output of the three rules for one agent, before weighting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steering {
    pub separation: Vec3,
    pub alignment: Vec3,
    pub cohesion: Vec3,
    /// Agents that contributed to separation.
    pub separation_contacts: usize,
    /// Agents that contributed to alignment and cohesion.
    pub neighbor_contacts: usize,
}

impl Steering {
    pub fn acceleration(&self, params: &FlockParameters) -> Vec3 {
        self.separation * params.separation_weight
            + self.alignment * params.alignment_weight
            + self.cohesion * params.cohesion_weight
    }
}

/// Bookkeeping for one completed step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StepStats {
    pub agents: usize,
    pub separation_contacts: usize,
    pub neighbor_contacts: usize,
}

/// Advances a borrowed [`AgentPopulation`] with the boids rules.
///
/// Every rule reads the population as it stood when the step began; new
/// velocities are written only once all agents have been evaluated.
#[derive(Clone, Debug, Default)]
pub struct FlockingManager {
    params: FlockParameters,
}

impl FlockingManager {
    pub fn new(params: FlockParameters) -> Result<Self, FlockError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn parameters(&self) -> &FlockParameters {
        &self.params
    }

    /// Replaces the parameters; the old ones stay in place if `params` is invalid.
    pub fn set_parameters(&mut self, params: FlockParameters) -> Result<(), FlockError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Runs one velocity update over the whole population.
    ///
    /// Calling this on an empty population is deliberately tolerated: it does
    /// nothing and reports idle stats, so a host may tick before setup is
    /// done. Use [`try_step`](Self::try_step) to observe that case.
    pub fn step(&self, population: &mut AgentPopulation, dt: f32) -> Result<StepStats, FlockError> {
        match self.try_step(population, dt) {
            Err(FlockError::UninitializedState) => {
                trace!("flock step skipped: population not initialized");
                Ok(StepStats::default())
            }
            other => other,
        }
    }

    /// Like [`step`](Self::step) but fails with
    /// [`FlockError::UninitializedState`] on an empty population.
    pub fn try_step(
        &self,
        population: &mut AgentPopulation,
        dt: f32,
    ) -> Result<StepStats, FlockError> {
        if population.is_empty() {
            return Err(FlockError::UninitializedState);
        }
        validate_dt(dt)?;

        let params = self.params;
        let snapshot: &AgentPopulation = population;
        let updates = self.evaluate_all(snapshot, &params, dt);

        let mut stats = StepStats {
            agents: updates.len(),
            ..StepStats::default()
        };
        let velocities = updates
            .into_iter()
            .map(|(velocity, steering)| {
                stats.separation_contacts += steering.separation_contacts;
                stats.neighbor_contacts += steering.neighbor_contacts;
                velocity
            })
            .collect();
        population.replace_velocities(velocities);

        debug!(
            agents = stats.agents,
            separation_contacts = stats.separation_contacts,
            neighbor_contacts = stats.neighbor_contacts,
            "flock step"
        );
        Ok(stats)
    }

    /// Moves every agent along its current velocity.
    ///
    /// Kept apart from [`step`](Self::step) so that positions never change
    /// while rules are being evaluated.
    pub fn integrate_positions(
        &self,
        population: &mut AgentPopulation,
        dt: f32,
    ) -> Result<(), FlockError> {
        if population.is_empty() {
            return Ok(());
        }
        validate_dt(dt)?;
        population.integrate_positions(dt);
        Ok(())
    }

    /// [`step`](Self::step) followed by [`integrate_positions`](Self::integrate_positions).
    pub fn advance(
        &self,
        population: &mut AgentPopulation,
        dt: f32,
    ) -> Result<StepStats, FlockError> {
        let stats = self.step(population, dt)?;
        self.integrate_positions(population, dt)?;
        Ok(stats)
    }

    /// The unweighted rule outputs for `id` against the current state.
    pub fn steering(&self, population: &AgentPopulation, id: AgentId) -> Result<Steering, FlockError> {
        population.position_of(id)?;
        Ok(self.steer(population, &self.params, id.index()))
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all(
        &self,
        snapshot: &AgentPopulation,
        params: &FlockParameters,
        dt: f32,
    ) -> Vec<(Vec3, Steering)> {
        (0..snapshot.agent_count())
            .into_par_iter()
            .map(|i| self.evaluate(snapshot, params, i, dt))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all(
        &self,
        snapshot: &AgentPopulation,
        params: &FlockParameters,
        dt: f32,
    ) -> Vec<(Vec3, Steering)> {
        (0..snapshot.agent_count())
            .map(|i| self.evaluate(snapshot, params, i, dt))
            .collect()
    }

    fn evaluate(
        &self,
        snapshot: &AgentPopulation,
        params: &FlockParameters,
        i: usize,
        dt: f32,
    ) -> (Vec3, Steering) {
        let steering = self.steer(snapshot, params, i);
        let accel = steering.acceleration(params);
        let velocity = clamp_magnitude(snapshot.velocities()[i] + accel * dt, params.max_speed);
        (velocity, steering)
    }

    fn steer(&self, snapshot: &AgentPopulation, params: &FlockParameters, i: usize) -> Steering {
        let (separation, separation_contacts) = rule_separation(snapshot, params, i);
        let (alignment, neighbor_contacts) = rule_alignment(snapshot, params, i);
        let (cohesion, _) = rule_cohesion(snapshot, params, i);
        Steering {
            separation,
            alignment,
            cohesion,
            separation_contacts,
            neighbor_contacts,
        }
    }
}

fn validate_dt(dt: f32) -> Result<(), FlockError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(FlockError::InvalidArgument("dt must be positive and finite"))
    }
}

/// Other agents of `i` paired with their distance to it.
fn others(snapshot: &AgentPopulation, i: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
    let positions = snapshot.positions();
    let here = positions[i];
    positions
        .iter()
        .enumerate()
        .filter(move |&(j, _)| j != i)
        .map(move |(j, there)| (j, magnitude(here - *there)))
}

// Inverse-distance push away from every agent inside the separation radius.
fn rule_separation(snapshot: &AgentPopulation, params: &FlockParameters, i: usize) -> (Vec3, usize) {
    let positions = snapshot.positions();
    let mut steer = Vec3::ZERO;
    let mut count = 0;

    for (j, d) in others(snapshot, i) {
        // d > 0 keeps coincident agents from dividing by zero
        if d > 0.0 && d < params.desired_separation {
            steer += safe_normalize(positions[i] - positions[j]) / d;
            count += 1;
        }
    }

    if count > 0 {
        steer /= count as f32;
    }
    (clamp_magnitude(steer, params.max_force), count)
}

fn rule_alignment(snapshot: &AgentPopulation, params: &FlockParameters, i: usize) -> (Vec3, usize) {
    let velocities = snapshot.velocities();
    let mut sum = Vec3::ZERO;
    let mut count = 0;

    for (j, d) in others(snapshot, i) {
        if d < params.neighbor_radius {
            sum += velocities[j];
            count += 1;
        }
    }

    if count == 0 {
        return (Vec3::ZERO, 0);
    }

    let heading = safe_normalize(sum / count as f32) * params.max_speed;
    (
        clamp_magnitude(heading - velocities[i], params.max_force),
        count,
    )
}

fn rule_cohesion(snapshot: &AgentPopulation, params: &FlockParameters, i: usize) -> (Vec3, usize) {
    let positions = snapshot.positions();
    let mut center = Vec3::ZERO;
    let mut count = 0;

    for (j, d) in others(snapshot, i) {
        if d < params.neighbor_radius {
            center += positions[j];
            count += 1;
        }
    }

    if count == 0 {
        return (Vec3::ZERO, 0);
    }

    center /= count as f32;
    let desired = safe_normalize(center - positions[i]) * params.max_speed;
    (
        clamp_magnitude(desired - snapshot.velocities()[i], params.max_force),
        count,
    )
}
