//! Iterative relaxation of distance constraints.

use crate::constraint::{CorrectionWeighting, DistanceConstraint};
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::vec::Vec;

/// Gauss–Seidel style solver over a fixed constraint list.
///
/// Each pass resolves constraints one at a time against the latest positions.
/// Even passes walk the list forward and odd passes walk it backward, so no
/// endpoint is consistently corrected last. A fixed pass count only
/// approaches the rest lengths; it never guarantees them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstraintSolver {
    pub iterations: usize,
    pub weighting: CorrectionWeighting,
}

impl ConstraintSolver {
    pub fn new(iterations: usize, weighting: CorrectionWeighting) -> Self {
        ConstraintSolver { iterations, weighting }
    }

    /// Run `iterations` passes over `constraints`.
    pub fn relax<V: Vec, O: StepObserver>(
        &self,
        particles: &mut [Particle<V>],
        constraints: &[DistanceConstraint<V>],
        observer: &mut O,
    ) {
        for i in 0..self.iterations {
            self.pass(i, particles, constraints);
            observer.on_constraint_iteration(i);
        }
    }

    /// A single pass; `index` selects the traversal direction.
    pub fn pass<V: Vec>(
        &self,
        index: usize,
        particles: &mut [Particle<V>],
        constraints: &[DistanceConstraint<V>],
    ) {
        if index % 2 == 0 {
            for c in constraints.iter() {
                c.solve(particles, self.weighting);
            }
        } else {
            for c in constraints.iter().rev() {
                c.solve(particles, self.weighting);
            }
        }
    }

    /// Largest absolute length error over all constraints.
    pub fn max_error<V: Vec>(
        particles: &[Particle<V>],
        constraints: &[DistanceConstraint<V>],
    ) -> V::Scalar {
        constraints
            .iter()
            .map(|c| c.error(particles).abs())
            .fold(V::Scalar::zero(), |acc, e| acc.max(e))
    }
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        ConstraintSolver::new(5, CorrectionWeighting::Equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoOpStepObserver;
    use crate::vec::Vec3;
    use alloc::vec::Vec as AllocVec;

    struct PassLog(AllocVec<usize>);

    impl StepObserver for PassLog {
        fn on_constraint_iteration(&mut self, iteration: usize) {
            self.0.push(iteration);
        }
    }

    #[test]
    fn reports_every_pass() {
        let mut particles = [Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 1.0).unwrap()];
        let mut log = PassLog(AllocVec::new());
        ConstraintSolver::default().relax(&mut particles, &[], &mut log);
        assert_eq!(log.0, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn traversal_direction_alternates() {
        // A chain 0-1-2 where both links are stretched. Forward order
        // corrects 0-1 first, reverse order corrects 1-2 first, so the
        // middle particle lands in different places.
        let make = || {
            [
                Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 1.0).unwrap(),
                Particle::new(Vec3::new(2.0f32, 0.0, 0.0), 1.0).unwrap(),
                Particle::new(Vec3::new(4.0f32, 0.0, 0.0), 1.0).unwrap(),
            ]
        };
        let constraints = [
            DistanceConstraint::new(0, 1, 1.0),
            DistanceConstraint::new(1, 2, 1.0),
        ];
        let solver = ConstraintSolver::default();

        let mut forward = make();
        solver.pass(0, &mut forward, &constraints);
        let mut reverse = make();
        solver.pass(1, &mut reverse, &constraints);

        assert!((forward[1].pos.x - 2.25).abs() < 1e-6);
        assert!((reverse[1].pos.x - 1.75).abs() < 1e-6);
    }

    #[test]
    fn max_error_picks_worst_constraint() {
        let mut particles = [
            Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 1.0).unwrap(),
            Particle::new(Vec3::new(1.0f32, 0.0, 0.0), 1.0).unwrap(),
            Particle::new(Vec3::new(4.0f32, 0.0, 0.0), 1.0).unwrap(),
        ];
        let constraints = [
            DistanceConstraint::new(0, 1, 1.5),
            DistanceConstraint::new(1, 2, 1.0),
        ];
        assert!((ConstraintSolver::max_error(&particles, &constraints) - 2.0).abs() < 1e-6);

        ConstraintSolver::new(50, CorrectionWeighting::Equal)
            .relax(&mut particles, &constraints, &mut NoOpStepObserver);
        assert!(ConstraintSolver::max_error(&particles, &constraints) < 1e-3);
    }
}
