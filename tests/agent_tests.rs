#![allow(missing_docs)]

use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;

use roboevo::simulation::agent::{
    AgentFactory, AgentParams, Body, BodyPlan, DeathCause, SensorParams,
};
use roboevo::simulation::brain::{GenomeCodec, NetworkParams};
use roboevo::simulation::error::SimError;
use roboevo::simulation::evolution::FitnessPolarity;
use roboevo::simulation::geometric_utils::Segment;
use roboevo::simulation::params::Objective;
use roboevo::simulation::physics::{PhysicsParams, World};
use roboevo::simulation::vector::Vec2;

fn create_test_params(plan: BodyPlan, segments: usize) -> AgentParams {
    AgentParams {
        plan,
        segments,
        ..AgentParams::default()
    }
}

fn create_test_factory() -> AgentFactory {
    let network = NetworkParams {
        layers: vec![1, 4, 4],
        ..NetworkParams::default()
    };
    let sensor = SensorParams {
        rays: 1,
        ..SensorParams::default()
    };
    AgentFactory::new(
        create_test_params(BodyPlan::Worm, 5),
        &network,
        sensor,
        GenomeCodec::default(),
    )
    .unwrap()
}

fn assert_close(actual: Vec2, expected: Vec2) {
    assert!(
        (actual - expected).length() < 1e-4,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_muscle_counts_per_plan() {
    assert_eq!(BodyPlan::Worm.muscle_count(5), 4);
    assert_eq!(BodyPlan::Blob.muscle_count(5), 5);
    assert_eq!(BodyPlan::Crab.muscle_count(2), 8);
    assert_eq!(BodyPlan::default(), BodyPlan::Worm);
}

#[test]
fn test_body_part_counts() {
    let cases = [
        (BodyPlan::Worm, 5, (6, 5, 4, 5)),
        (BodyPlan::Blob, 5, (6, 10, 5, 5)),
        (BodyPlan::Crab, 2, (11, 10, 8, 4)),
    ];
    for (plan, segments, (particles, springs, muscles, foils)) in cases {
        let mut world = World::new(PhysicsParams::default());
        let params = create_test_params(plan, segments);
        let body = Body::build(&mut world, &params, Vec2::ZERO, Vec2::X).unwrap();

        assert_eq!(body.particles.len(), particles, "{plan:?}");
        assert_eq!(body.springs.len(), springs, "{plan:?}");
        assert_eq!(body.muscles.len(), muscles, "{plan:?}");
        assert_eq!(body.foils.len(), foils, "{plan:?}");
        assert_eq!(body.muscles.len(), plan.muscle_count(segments));
        assert_eq!(body.base_angles().len(), muscles);

        assert_eq!(world.particle_count(), particles);
        assert_eq!(world.spring_count(), springs);
        assert_eq!(world.muscle_count(), muscles);
        assert_eq!(world.foil_count(), foils);
    }
}

#[test]
fn test_head_sits_at_origin_facing_heading() {
    for plan in [BodyPlan::Worm, BodyPlan::Blob, BodyPlan::Crab] {
        let mut world = World::new(PhysicsParams::default());
        let params = create_test_params(plan, 3);
        let origin = Vec2::new(5.0, -3.0);
        let body = Body::build(&mut world, &params, origin, Vec2::new(0.0, 2.0)).unwrap();

        assert_close(body.head_position(&world).unwrap(), origin);
        assert_close(body.heading(&world), Vec2::Y);
    }
}

#[test]
fn test_zero_heading_faces_x() {
    let mut world = World::new(PhysicsParams::default());
    let params = create_test_params(BodyPlan::Worm, 3);
    let body = Body::build(&mut world, &params, Vec2::ZERO, Vec2::ZERO).unwrap();
    assert_close(body.heading(&world), Vec2::X);
}

#[test]
fn test_worm_is_straight_and_trails_behind() {
    let mut world = World::new(PhysicsParams::default());
    let params = create_test_params(BodyPlan::Worm, 5);
    let body = Body::build(&mut world, &params, Vec2::ZERO, Vec2::X).unwrap();

    assert!(body.base_angles().iter().all(|angle| angle.abs() < 1e-6));
    assert_close(body.centroid(&world).unwrap(), Vec2::new(-25.0, 0.0));
    assert_eq!(body.positions(&world).len(), 6);
    assert_eq!(body.spring_lines(&world).len(), 5);
}

#[test]
fn test_blob_ring_chords_match_segment_length() {
    let mut world = World::new(PhysicsParams::default());
    let params = create_test_params(BodyPlan::Blob, 6);
    let body = Body::build(&mut world, &params, Vec2::ZERO, Vec2::X).unwrap();

    // Spokes first, then the hull.
    for &spring in &body.springs[6..] {
        let rest = world.spring(spring).unwrap().rest_length;
        assert!((rest - params.segment_length).abs() < 1e-3, "{rest}");
    }
}

#[test]
fn test_actuate_clamps_outputs() {
    let mut world = World::new(PhysicsParams::default());
    let params = create_test_params(BodyPlan::Worm, 3);
    let body = Body::build(&mut world, &params, Vec2::ZERO, Vec2::X).unwrap();

    body.actuate(&mut world, &[5.0, -0.5], &params).unwrap();

    let targets: Vec<f32> = body
        .muscles
        .iter()
        .map(|&id| world.muscle(id).unwrap().target)
        .collect();
    assert!((targets[0] - params.max_bend).abs() < 1e-6);
    assert!((targets[1] + 0.5 * params.max_bend).abs() < 1e-6);
}

#[test]
fn test_body_touches_wall() {
    let mut world = World::new(PhysicsParams::default());
    let params = create_test_params(BodyPlan::Worm, 3);
    let body = Body::build(&mut world, &params, Vec2::ZERO, Vec2::X).unwrap();

    let crossing = Segment::new(Vec2::new(-10.0, -10.0), Vec2::new(-10.0, 10.0));
    let grazing = Segment::new(Vec2::new(-30.0, 1.5), Vec2::new(10.0, 1.5));
    let distant = Segment::new(Vec2::new(-30.0, 20.0), Vec2::new(10.0, 20.0));

    assert!(body.touches(&world, &[crossing]));
    assert!(body.touches(&world, &[grazing]));
    assert!(!body.touches(&world, &[distant]));
    assert!(!body.touches(&world, &[]));
}

#[test]
fn test_remove_from_clears_the_world() {
    let mut world = World::new(PhysicsParams::default());
    let params = create_test_params(BodyPlan::Crab, 2);
    let body = Body::build(&mut world, &params, Vec2::ZERO, Vec2::X).unwrap();

    body.remove_from(&mut world);

    assert_eq!(world.particle_count(), 0);
    assert_eq!(world.spring_count(), 0);
    assert_eq!(world.muscle_count(), 0);
    assert_eq!(world.foil_count(), 0);
    assert!(body.centroid(&world).is_none());
    assert_eq!(body.heading(&world), Vec2::ZERO);
}

#[test]
fn test_factory_spawns_and_encodes() {
    let factory = create_test_factory();
    let mut world = World::new(PhysicsParams::default());
    let mut rng = StdRng::seed_from_u64(3);

    let genome = factory.random_genome(&mut rng);
    assert_eq!(genome.len(), factory.genome_len());

    let agent = factory
        .spawn(&mut world, 7, genome.clone(), Vec2::ZERO, Vec2::X)
        .unwrap();
    assert_eq!(agent.id, 7);
    assert!(agent.is_alive());
    assert_eq!(agent.color, factory.agent_params().color);
    assert_close(agent.start, Vec2::new(-25.0, 0.0));

    let encoded = factory.encode(&agent);
    for (a, b) in encoded.iter().zip(genome.iter()) {
        assert!((a - b).abs() < 1e-5);
    }
}

#[test]
fn test_factory_rejects_wrong_genome_without_building() {
    let factory = create_test_factory();
    let mut world = World::new(PhysicsParams::default());

    let result = factory.spawn(&mut world, 0, Array1::zeros(3), Vec2::ZERO, Vec2::X);
    assert!(result.is_err());
    assert_eq!(world.particle_count(), 0);
}

#[test]
fn test_factory_rejects_bodies_with_too_few_segments() {
    for (plan, segments, outputs) in [
        (BodyPlan::Worm, 0, 1),
        (BodyPlan::Worm, 1, 1),
        (BodyPlan::Blob, 2, 2),
        (BodyPlan::Crab, 0, 1),
    ] {
        let network = NetworkParams {
            layers: vec![1, outputs],
            ..NetworkParams::default()
        };
        let sensor = SensorParams {
            rays: 1,
            ..SensorParams::default()
        };
        let result = AgentFactory::new(
            create_test_params(plan, segments),
            &network,
            sensor,
            GenomeCodec::default(),
        );
        assert!(
            matches!(result, Err(SimError::InvalidConfig(_))),
            "{plan:?} with {segments} segments"
        );
    }
}

#[test]
fn test_factory_rejects_network_that_does_not_fit() {
    let sensor = SensorParams {
        rays: 1,
        ..SensorParams::default()
    };

    // Three inputs for a single ray.
    let wide_input = NetworkParams {
        layers: vec![3, 4, 4],
        ..NetworkParams::default()
    };
    let result = AgentFactory::new(
        create_test_params(BodyPlan::Worm, 5),
        &wide_input,
        sensor.clone(),
        GenomeCodec::default(),
    );
    assert!(matches!(result, Err(SimError::InvalidConfig(_))));

    // A five-segment worm has four muscles.
    let wrong_output = NetworkParams {
        layers: vec![1, 4, 5],
        ..NetworkParams::default()
    };
    let result = AgentFactory::new(
        create_test_params(BodyPlan::Worm, 5),
        &wrong_output,
        sensor,
        GenomeCodec::default(),
    );
    assert!(matches!(result, Err(SimError::InvalidConfig(_))));
}

#[test]
fn test_build_rejects_too_few_segments_without_touching_world() {
    for (plan, segments) in [(BodyPlan::Worm, 0), (BodyPlan::Worm, 1), (BodyPlan::Blob, 2)] {
        let mut world = World::new(PhysicsParams::default());
        let params = create_test_params(plan, segments);
        let result = Body::build(&mut world, &params, Vec2::ZERO, Vec2::X);

        assert!(matches!(result, Err(SimError::InvalidConfig(_))), "{plan:?}");
        assert_eq!(world.particle_count(), 0);
        assert_eq!(world.spring_count(), 0);
    }
}

#[test]
fn test_agent_senses_thinks_and_dies() {
    let factory = create_test_factory();
    let mut world = World::new(PhysicsParams::default());
    let mut rng = StdRng::seed_from_u64(4);
    let genome = factory.random_genome(&mut rng);
    let mut agent = factory
        .spawn(&mut world, 0, genome, Vec2::ZERO, Vec2::X)
        .unwrap();

    let walls = [Segment::new(Vec2::new(20.0, -50.0), Vec2::new(20.0, 50.0))];
    agent.sense(&world, &walls);
    assert!((agent.readings()[0] - 400.0).abs() < 1e-2);

    let outputs = agent.think().unwrap();
    assert_eq!(outputs.len(), 4);

    agent
        .update(&mut world, &walls, factory.agent_params())
        .unwrap();
    let max_bend = factory.agent_params().max_bend;
    for (&muscle, &base) in agent.body.muscles.iter().zip(agent.body.base_angles()) {
        let target = world.muscle(muscle).unwrap().target;
        assert!((target - base).abs() <= max_bend + 1e-6);
    }

    agent.kill(&mut world, DeathCause::Collision, 12.5);
    assert!(!agent.is_alive());
    assert_eq!(agent.death(), Some(DeathCause::Collision));
    assert_eq!(agent.fitness, 12.5);
    assert_eq!(world.particle_count(), 0);
    assert_close(agent.centroid(&world), agent.start);
}

#[test]
fn test_objective_fitness() {
    let start = Vec2::new(0.0, 0.0);
    let centroid = Vec2::new(30.0, 40.0);

    let target = Objective::Target {
        position: Vec2::new(30.0, 0.0),
        radius: 5.0,
    };
    assert!((target.fitness(start, centroid, 10) - 40.0).abs() < 1e-5);
    assert!(!target.is_complete(centroid));
    assert!(target.is_complete(Vec2::new(33.0, 4.0)));
    assert_eq!(target.natural_polarity(), FitnessPolarity::Minimize);

    let distance = Objective::Distance {
        direction: Vec2::new(0.0, 2.0),
    };
    assert!((distance.fitness(start, centroid, 10) - 40.0).abs() < 1e-5);
    assert!(!distance.is_complete(centroid));
    assert_eq!(distance.natural_polarity(), FitnessPolarity::Maximize);

    let survival = Objective::Survival;
    assert_eq!(survival.fitness(start, centroid, 17), 17.0);
    assert_eq!(survival.natural_polarity(), FitnessPolarity::Maximize);
}
