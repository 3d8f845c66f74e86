//! Errors surfaced by the flocking core.

use thiserror::Error;

/// Errors emitted while configuring, querying or stepping a flock.
#[derive(Debug, Error)]
pub enum FlockError {
    /// A count, time step or tuning value that the simulation cannot use.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// An agent handle outside `[0, count)`.
    #[error("agent index {index} out of range for population of {count}")]
    OutOfRange { index: usize, count: usize },
    /// The population has no agents yet.
    ///
    /// Only [`FlockingManager::try_step`](crate::FlockingManager::try_step)
    /// reports this; `step` treats an empty population as a no-op.
    #[error("population has not been initialized")]
    UninitializedState,
    /// Reading a parameter file failed.
    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),
    /// Parameters or a snapshot could not be converted to or from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
