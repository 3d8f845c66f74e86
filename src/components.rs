use bevy::prelude::*;
use flocking::AgentId;

/// Links a rendered entity to the agent it mirrors.
#[derive(Component)]
pub struct AgentVisual {
    pub id: AgentId,
}
