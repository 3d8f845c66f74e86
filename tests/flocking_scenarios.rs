use bevy::math::Vec3;
use flocking::{AgentId, AgentPopulation, FlockParameters, FlockingManager};

const EPSILON: f32 = 1e-4;

fn two_agent_flock() -> AgentPopulation {
    AgentPopulation::from_agents([
        (Vec3::ZERO, Vec3::ZERO),
        (Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO),
    ])
    .unwrap()
}

#[test]
fn close_pair_pushes_apart_along_x() {
    let manager = FlockingManager::new(FlockParameters {
        desired_separation: 80.0,
        neighbor_radius: 200.0,
        max_speed: 5.0,
        max_force: 0.5,
        separation_weight: 1.5,
        alignment_weight: 1.0,
        cohesion_weight: 1.0,
    })
    .unwrap();
    let mut population = two_agent_flock();

    let left = manager.steering(&population, AgentId::new(0)).unwrap();
    let right = manager.steering(&population, AgentId::new(1)).unwrap();
    assert!(left.separation.x < 0.0);
    assert!(right.separation.x > 0.0);

    manager.step(&mut population, 1.0).unwrap();

    let a = population.velocity_of(AgentId::new(0)).unwrap();
    let b = population.velocity_of(AgentId::new(1)).unwrap();
    assert!(a.x != 0.0 && b.x != 0.0);
    assert!(a.x.signum() != b.x.signum());
    assert!(a.length() <= 5.0 + EPSILON);
    assert!(b.length() <= 5.0 + EPSILON);
    assert_eq!(a.y, 0.0);
    assert_eq!(a.z, 0.0);
}

#[test]
fn lone_agent_never_moves() {
    let manager = FlockingManager::default();
    let mut population = AgentPopulation::with_layout(1, Some(5)).unwrap();
    let start = population.positions()[0];

    for dt in [0.01, 1.0, 100.0] {
        manager.advance(&mut population, dt).unwrap();
    }

    assert_eq!(population.velocities()[0], Vec3::ZERO);
    assert_eq!(population.positions()[0], start);
}

#[test]
fn speed_stays_bounded_over_many_steps() {
    let params = FlockParameters {
        max_speed: 3.0,
        max_force: 2.0,
        ..FlockParameters::default()
    };
    let manager = FlockingManager::new(params).unwrap();
    let mut population = AgentPopulation::with_layout(40, Some(11)).unwrap();

    for _ in 0..200 {
        manager.advance(&mut population, 0.5).unwrap();
        for velocity in population.velocities() {
            assert!(velocity.is_finite());
            assert!(velocity.length() <= params.max_speed + EPSILON);
        }
    }
}

#[test]
fn every_rule_respects_max_force() {
    let manager = FlockingManager::default();
    let max_force = manager.parameters().max_force;
    let mut population = AgentPopulation::with_layout(30, Some(3)).unwrap();
    for (i, id) in population.agents().collect::<Vec<_>>().into_iter().enumerate() {
        let spin = i as f32;
        population
            .set_velocity(id, Vec3::new(spin.cos(), 0.3, spin.sin()) * 4.0)
            .unwrap();
    }

    for id in population.agents() {
        let steering = manager.steering(&population, id).unwrap();
        for steer in [steering.separation, steering.alignment, steering.cohesion] {
            assert!(steer.length() <= max_force + EPSILON);
        }
    }
}

#[test]
fn isolated_agent_keeps_its_velocity() {
    let manager = FlockingManager::default();
    let cruising = Vec3::new(1.0, 2.0, -2.0);
    let mut population = AgentPopulation::from_agents([
        (Vec3::ZERO, cruising),
        (Vec3::new(1000.0, 0.0, 0.0), Vec3::ZERO),
        (Vec3::new(1000.0, 50.0, 0.0), Vec3::ZERO),
    ])
    .unwrap();

    let steering = manager.steering(&population, AgentId::new(0)).unwrap();
    assert_eq!(steering.separation, Vec3::ZERO);
    assert_eq!(steering.alignment, Vec3::ZERO);
    assert_eq!(steering.cohesion, Vec3::ZERO);

    manager.step(&mut population, 1.0).unwrap();
    assert_eq!(population.velocities()[0], cruising);
}

#[test]
fn agent_is_never_its_own_neighbor() {
    let params = FlockParameters {
        neighbor_radius: 1.0e6,
        desired_separation: 1.0e6,
        ..FlockParameters::default()
    };
    let manager = FlockingManager::new(params).unwrap();
    let population =
        AgentPopulation::from_agents([(Vec3::ONE, Vec3::new(3.0, 0.0, 0.0))]).unwrap();

    let steering = manager.steering(&population, AgentId::new(0)).unwrap();
    assert_eq!(steering.separation_contacts, 0);
    assert_eq!(steering.neighbor_contacts, 0);
    assert_eq!(steering.acceleration(&params), Vec3::ZERO);
}

#[test]
fn separation_is_symmetric_for_a_pair() {
    let manager = FlockingManager::default();
    let population = AgentPopulation::from_agents([
        (Vec3::new(3.0, -1.0, 2.0), Vec3::ZERO),
        (Vec3::new(-4.0, 5.0, 0.5), Vec3::ZERO),
    ])
    .unwrap();

    let a = manager.steering(&population, AgentId::new(0)).unwrap().separation;
    let b = manager.steering(&population, AgentId::new(1)).unwrap().separation;
    assert!(a.length() > 0.0);
    assert!((a + b).length() < EPSILON);
}

#[test]
fn rules_read_only_the_pre_step_state() {
    let manager = FlockingManager::default();
    let mut population = AgentPopulation::with_layout(20, Some(21)).unwrap();
    population
        .set_velocity(AgentId::new(0), Vec3::new(4.0, 0.0, 0.0))
        .unwrap();

    let params = *manager.parameters();
    let expected: Vec<Vec3> = population
        .agents()
        .map(|id| {
            let steering = manager.steering(&population, id).unwrap();
            let velocity = population.velocity_of(id).unwrap() + steering.acceleration(&params);
            velocity.clamp_length_max(params.max_speed)
        })
        .collect();

    manager.step(&mut population, 1.0).unwrap();

    for (actual, expected) in population.velocities().iter().zip(&expected) {
        assert!((*actual - *expected).length() < EPSILON);
    }
}

#[test]
fn stepping_is_deterministic() {
    let manager = FlockingManager::default();
    let mut first = AgentPopulation::with_layout(25, Some(99)).unwrap();
    let mut second = first.clone();

    for _ in 0..50 {
        manager.advance(&mut first, 0.25).unwrap();
        manager.advance(&mut second, 0.25).unwrap();
    }

    assert_eq!(first.positions(), second.positions());
    assert_eq!(first.velocities(), second.velocities());
}

#[test]
fn parameters_can_change_between_steps() {
    let mut manager = FlockingManager::default();
    let mut population = two_agent_flock();
    manager.step(&mut population, 1.0).unwrap();

    manager
        .set_parameters(FlockParameters {
            max_speed: 0.1,
            ..FlockParameters::default()
        })
        .unwrap();
    manager.step(&mut population, 1.0).unwrap();

    for velocity in population.velocities() {
        assert!(velocity.length() <= 0.1 + EPSILON);
    }
}

#[test]
fn nearly_touching_pair_still_separates() {
    let manager = FlockingManager::new(FlockParameters {
        alignment_weight: 0.0,
        cohesion_weight: 0.0,
        ..FlockParameters::default()
    })
    .unwrap();
    let mut population = AgentPopulation::from_agents([
        (Vec3::ZERO, Vec3::ZERO),
        (Vec3::new(0.0, 0.0, 1e-30), Vec3::ZERO),
    ])
    .unwrap();

    manager.step(&mut population, 1.0).unwrap();

    let push = 1.5 * manager.parameters().max_force;
    let near = population.velocity_of(AgentId::new(0)).unwrap();
    let far = population.velocity_of(AgentId::new(1)).unwrap();
    assert!((near - Vec3::new(0.0, 0.0, -push)).length() < EPSILON);
    assert!((far - Vec3::new(0.0, 0.0, push)).length() < EPSILON);
}
