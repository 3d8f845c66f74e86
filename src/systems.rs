use bevy::prelude::*;

use crate::components::*;
use crate::resources::*;

const AGENT_SIZE: Vec3 = Vec3::new(3.0, 3.0, 9.0);
const VELOCITY_GIZMO_SCALE: f32 = 10.0;

pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sim: Res<FlockSim>,
) {
    commands.spawn(Camera3dBundle {
        transform: Transform::from_xyz(0.0, 350.0, 450.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.spawn(DirectionalLightBundle {
        transform: Transform::from_xyz(100.0, 300.0, 200.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    let mesh = meshes.add(Cuboid::new(AGENT_SIZE.x, AGENT_SIZE.y, AGENT_SIZE.z));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.33, 0.55, 0.95),
        ..default()
    });

    for id in sim.population.agents() {
        let position = sim.population.positions()[id.index()];
        commands.spawn((
            PbrBundle {
                mesh: mesh.clone(),
                material: material.clone(),
                transform: Transform::from_translation(position),
                ..default()
            },
            AgentVisual { id },
        ));
    }

    info!(agents = sim.population.agent_count(), seed = ?sim.seed, "flock spawned");
}

pub fn step_flock(time: Res<Time>, paused: Res<Paused>, mut sim: ResMut<FlockSim>) {
    if paused.0 {
        return;
    }

    // the first frame can report no elapsed time
    let dt = time.delta_seconds();
    if dt <= 0.0 {
        return;
    }

    if let Err(err) = sim.advance(dt) {
        error!("flock step failed: {err}");
    }
}

pub fn step_flock_fixed(delta: Res<FixedDelta>, mut sim: ResMut<FlockSim>) {
    if let Err(err) = sim.advance(delta.0) {
        error!("flock step failed: {err}");
    }
}

pub fn sync_agent_transforms(sim: Res<FlockSim>, mut query: Query<(&AgentVisual, &mut Transform)>) {
    for (visual, mut transform) in query.iter_mut() {
        let (Ok(position), Ok(velocity)) = (
            sim.population.position_of(visual.id),
            sim.population.velocity_of(visual.id),
        ) else {
            continue;
        };

        transform.translation = position;

        let heading = velocity.normalize_or_zero();
        if heading != Vec3::ZERO {
            transform.rotation = Quat::from_rotation_arc(Vec3::Z, heading);
        }
    }
}

pub fn handle_keys(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut debug_mode: ResMut<DebugMode>,
    mut paused: ResMut<Paused>,
    mut sim: ResMut<FlockSim>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyD) {
        debug_mode.0 = !debug_mode.0;
        info!("Debug mode: {}", if debug_mode.0 { "ON" } else { "OFF" });
    }

    if keyboard_input.just_pressed(KeyCode::Space) {
        paused.0 = !paused.0;
        info!("Simulation {}", if paused.0 { "paused" } else { "resumed" });
    }

    if keyboard_input.just_pressed(KeyCode::KeyR) {
        match sim.reset() {
            Ok(()) => info!("flock reset"),
            Err(err) => error!("flock reset failed: {err}"),
        }
    }
}

pub fn draw_debug_velocities(sim: Res<FlockSim>, debug_mode: Res<DebugMode>, mut gizmos: Gizmos) {
    if !debug_mode.0 {
        return;
    }

    let population = &sim.population;
    for (position, velocity) in population.positions().iter().zip(population.velocities()) {
        gizmos.line(
            *position,
            *position + *velocity * VELOCITY_GIZMO_SCALE,
            Color::srgba(0.0, 1.0, 0.0, 0.6),
        );
    }
}

pub fn log_metrics(time: Res<Time>, mut timer: ResMut<MetricsTimer>, sim: Res<FlockSim>) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    if let Some(metrics) = sim.metrics() {
        info!(
            step = sim.steps,
            mean_speed = metrics.mean_speed,
            polarization = metrics.polarization,
            neighbor_contacts = sim.last_stats.neighbor_contacts,
            "flock metrics"
        );
    }
}
