use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::FlockError;

/// Tuning values for the three steering rules.
///
/// Fields missing from a parameter file keep their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParameters {
    /// Alignment and cohesion only consider agents closer than this.
    pub neighbor_radius: f32,
    /// Separation only considers agents closer than this.
    pub desired_separation: f32,
    pub max_speed: f32,
    /// Upper bound on each rule's steering vector.
    pub max_force: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
}

impl Default for FlockParameters {
    fn default() -> Self {
        Self {
            neighbor_radius: NEIGHBOR_RADIUS,
            desired_separation: DESIRED_SEPARATION,
            max_speed: MAX_SPEED,
            max_force: MAX_FORCE,
            separation_weight: SEPARATION_WEIGHT,
            alignment_weight: ALIGNMENT_WEIGHT,
            cohesion_weight: COHESION_WEIGHT,
        }
    }
}

impl FlockParameters {
    pub fn validate(&self) -> Result<(), FlockError> {
        let positive = [
            (self.neighbor_radius, "neighbor_radius must be positive and finite"),
            (self.desired_separation, "desired_separation must be positive and finite"),
            (self.max_speed, "max_speed must be positive and finite"),
            (self.max_force, "max_force must be positive and finite"),
        ];
        for (value, message) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FlockError::InvalidArgument(message));
            }
        }

        let weights = [
            self.separation_weight,
            self.alignment_weight,
            self.cohesion_weight,
        ];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(FlockError::InvalidArgument("rule weights must be finite"));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, FlockError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FlockError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}
