mod common;

use pliant::vec::Vec;
use pliant::{
    ConstraintSolver, CorrectionWeighting, DistanceConstraint, Integrator, NoOpStepObserver,
    Particle, SimulationConfig, Vec3,
};
use rstest::rstest;

fn particle(x: f32, y: f32, z: f32) -> Particle<Vec3<f32>> {
    Particle::new(Vec3::new(x, y, z), 1.0).unwrap()
}

#[test]
fn pair_error_never_increases_across_passes() {
    common::init_tracing();
    let mut particles = [particle(0.0, 0.0, 0.0), particle(2.0, 0.0, 0.0)];
    let constraints = [DistanceConstraint::new(0, 1, 1.0)];
    let solver = ConstraintSolver::default();

    let initial = ConstraintSolver::max_error(&particles, &constraints);
    assert_eq!(initial, 1.0);
    let mut previous = initial;
    for pass in 0..5 {
        solver.pass(pass, &mut particles, &constraints);
        let err = ConstraintSolver::max_error(&particles, &constraints);
        assert!(err <= previous, "pass {} raised error {} -> {}", pass, previous, err);
        previous = err;
    }
    assert!(previous < initial);
}

#[test]
fn stretched_chain_converges() {
    let mut particles = [
        particle(0.0, 0.0, 0.0),
        particle(2.0, 0.0, 0.0),
        particle(4.0, 0.0, 0.0),
        particle(6.0, 0.0, 0.0),
    ];
    let constraints = [
        DistanceConstraint::new(0, 1, 1.0),
        DistanceConstraint::new(1, 2, 1.0),
        DistanceConstraint::new(2, 3, 1.0),
    ];
    let initial = ConstraintSolver::max_error(&particles, &constraints);

    ConstraintSolver::new(5, CorrectionWeighting::Equal).relax(&mut particles, &constraints, &mut NoOpStepObserver);
    let after_five = ConstraintSolver::max_error(&particles, &constraints);

    ConstraintSolver::new(45, CorrectionWeighting::Equal).relax(&mut particles, &constraints, &mut NoOpStepObserver);
    let after_fifty = ConstraintSolver::max_error(&particles, &constraints);

    assert!(after_five < initial);
    assert!(after_fifty <= after_five);
    assert!(after_fifty < 1e-3, "chain still off by {}", after_fifty);
}

#[rstest]
#[case(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), 1.0)]
#[case(Vec3::new(-1.0, 2.0, 0.5), Vec3::new(1.0, -2.0, 0.5), 2.0)]
#[case(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.5, 0.0), 4.0)]
fn equal_correction_keeps_midpoint(
    #[case] a: Vec3<f32>,
    #[case] b: Vec3<f32>,
    #[case] rest: f32,
) {
    let mut particles = [Particle::new(a, 1.0).unwrap(), Particle::new(b, 1.0).unwrap()];
    let before = (a + b).scale(0.5);
    DistanceConstraint::new(0, 1, rest).solve(&mut particles, CorrectionWeighting::Equal);
    let after = (particles[0].pos + particles[1].pos).scale(0.5);
    common::assert_near(before, after, 1e-5);
    assert!((particles[0].pos.distance(particles[1].pos) - rest).abs() < 1e-5);
}

#[rstest]
#[case(CorrectionWeighting::Equal)]
#[case(CorrectionWeighting::InverseMass)]
fn coincident_endpoints_are_left_alone(#[case] weighting: CorrectionWeighting) {
    let mut particles = [particle(1.0, 1.0, 1.0), particle(1.0, 1.0, 1.0)];
    let constraints = [DistanceConstraint::new(0, 1, 0.5)];
    ConstraintSolver::new(3, weighting).relax(&mut particles, &constraints, &mut NoOpStepObserver);
    assert_eq!(particles[0].pos, Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(particles[1].pos, Vec3::new(1.0, 1.0, 1.0));
    assert!(particles.iter().all(|p| p.pos.x.is_finite()));
}

#[test]
fn particle_at_rest_stays_put() {
    let mut p = particle(3.0, -2.0, 1.0);
    p.integrate(0.018 * 0.018, 0.97);
    assert_eq!(p.pos, Vec3::new(3.0, -2.0, 1.0));
    assert_eq!(p.velocity_raw(), Vec3::zero());
}

#[test]
fn restoring_force_pulls_back_monotonically() {
    let config = SimulationConfig::<Vec3<f64>>::new()
        .with_stiffness(0.5)
        .with_damping(0.5)
        .with_timestep(0.1);
    let integrator = Integrator::from_config(&config);

    let mut particles = [Particle::new(Vec3::new(0.0f64, 0.0, 0.0), 1.0).unwrap()];
    particles[0].pos = Vec3::new(1.0, 0.5, -0.5);
    particles[0].prev_pos = particles[0].pos;

    let start = particles[0].pos.distance(particles[0].rest_pos());
    let mut previous = start;
    for tick in 0..200 {
        integrator.advance(&mut particles, None);
        let d = particles[0].pos.distance(particles[0].rest_pos());
        assert!(d <= previous, "tick {}: distance grew {} -> {}", tick, previous, d);
        previous = d;
    }
    assert!(previous < start * 0.5);
}
