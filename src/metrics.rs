use bevy::math::Vec3;
use serde::Serialize;

use crate::population::{AgentPopulation, AgentState};

/// Aggregate shape of a flock at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FlockMetrics {
    pub centroid: [f32; 3],
    pub mean_speed: f32,
    pub max_speed: f32,
    /// 1.0 when every moving agent shares a heading, near 0.0 when headings cancel out.
    pub polarization: f32,
}

impl FlockMetrics {
    /// `None` for an empty population.
    pub fn measure(population: &AgentPopulation) -> Option<Self> {
        if population.is_empty() {
            return None;
        }
        let n = population.agent_count() as f32;

        let centroid = population.positions().iter().copied().sum::<Vec3>() / n;

        let speeds = population.velocities().iter().map(|v| v.length());
        let mean_speed = speeds.clone().sum::<f32>() / n;
        let max_speed = speeds.fold(0.0_f32, f32::max);

        let mut heading_sum = Vec3::ZERO;
        let mut moving = 0;
        for velocity in population.velocities() {
            let heading = velocity.normalize_or_zero();
            if heading != Vec3::ZERO {
                heading_sum += heading;
                moving += 1;
            }
        }
        let polarization = if moving > 0 {
            heading_sum.length() / moving as f32
        } else {
            0.0
        };

        Some(Self {
            centroid: centroid.to_array(),
            mean_speed,
            max_speed,
            polarization,
        })
    }
}

/// Serializable dump of a population after `step` completed steps.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlockSnapshot {
    pub step: u64,
    pub agents: Vec<AgentState>,
    pub metrics: Option<FlockMetrics>,
}

impl FlockSnapshot {
    pub fn capture(step: u64, population: &AgentPopulation) -> Self {
        Self {
            step,
            agents: population.snapshot(),
            metrics: FlockMetrics::measure(population),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_population_has_no_metrics() {
        assert!(FlockMetrics::measure(&AgentPopulation::new()).is_none());
    }

    #[test]
    fn aligned_flock_is_fully_polarized() {
        let population = AgentPopulation::from_agents([
            (Vec3::new(-2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)),
            (Vec3::new(2.0, 0.0, 4.0), Vec3::new(1.0, 0.0, 0.0)),
        ])
        .unwrap();
        let metrics = FlockMetrics::measure(&population).unwrap();
        assert_eq!(metrics.centroid, [0.0, 0.0, 2.0]);
        assert_eq!(metrics.mean_speed, 2.0);
        assert_eq!(metrics.max_speed, 3.0);
        assert!((metrics.polarization - 1.0).abs() < 1e-6);
    }

    #[test]
    fn opposed_headings_cancel() {
        let population = AgentPopulation::from_agents([
            (Vec3::ZERO, Vec3::Y),
            (Vec3::ZERO, Vec3::NEG_Y),
            (Vec3::ZERO, Vec3::ZERO),
        ])
        .unwrap();
        let metrics = FlockMetrics::measure(&population).unwrap();
        assert!(metrics.polarization.abs() < 1e-6);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let population = AgentPopulation::from_agents([(Vec3::ONE, Vec3::ZERO)]).unwrap();
        let json = serde_json::to_value(FlockSnapshot::capture(3, &population)).unwrap();
        assert_eq!(json["step"], 3);
        assert_eq!(json["agents"][0]["position"][2], 1.0);
        assert_eq!(json["metrics"]["polarization"], 0.0);
    }
}
