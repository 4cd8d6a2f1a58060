//! Distance constraints between mesh neighbours.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec;

/// How a constraint correction is split between its two endpoints.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CorrectionWeighting {
    /// Each endpoint takes half, whatever its mass.
    #[default]
    Equal,
    /// Split by inverse mass; a pinned endpoint does not move.
    InverseMass,
}

/// Keeps two particles at their rest-pose separation.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraint<V: Vec> {
    pub a: usize,
    pub b: usize,
    pub rest_length: V::Scalar,
}

impl<V: Vec> DistanceConstraint<V> {
    pub fn new(a: usize, b: usize, rest_length: V::Scalar) -> Self {
        DistanceConstraint { a, b, rest_length }
    }

    /// Constraint whose rest length is the endpoints' rest-pose distance.
    pub fn from_rest_pose(a: usize, b: usize, particles: &[Particle<V>]) -> Self {
        let rest_length = particles[a].rest_pos().distance(particles[b].rest_pos());
        DistanceConstraint { a, b, rest_length }
    }

    /// Current distance minus rest length.
    pub fn error(&self, particles: &[Particle<V>]) -> V::Scalar {
        particles[self.a].pos.distance(particles[self.b].pos) - self.rest_length
    }

    /// Move both endpoints toward the rest length.
    ///
    /// Coincident endpoints have no correction direction and are left alone
    /// for this pass.
    pub fn solve(&self, particles: &mut [Particle<V>], weighting: CorrectionWeighting) {
        let a_pos = particles[self.a].pos;
        let b_pos = particles[self.b].pos;

        let delta = b_pos - a_pos;
        let dist = delta.length();
        if dist == V::Scalar::zero() {
            tracing::trace!(a = self.a, b = self.b, "skipping coincident constraint");
            return;
        }

        let correction = delta.scale(V::Scalar::one() - self.rest_length / dist);

        let (a_share, b_share) = match weighting {
            CorrectionWeighting::Equal => (V::Scalar::half(), V::Scalar::half()),
            CorrectionWeighting::InverseMass => {
                let a_inv = particles[self.a].inv_mass;
                let b_inv = particles[self.b].inv_mass;
                let w_total = a_inv + b_inv;
                if w_total.is_near_zero(V::Scalar::from_f32(1e-10)) {
                    return; // both pinned
                }
                (a_inv / w_total, b_inv / w_total)
            }
        };

        particles[self.a].pos = particles[self.a].pos + correction.scale(a_share);
        particles[self.b].pos = particles[self.b].pos - correction.scale(b_share);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec3;

    fn pair(a: Vec3<f32>, b: Vec3<f32>) -> [Particle<Vec3<f32>>; 2] {
        [Particle::new(a, 1.0).unwrap(), Particle::new(b, 1.0).unwrap()]
    }

    #[test]
    fn single_pass_restores_length() {
        let mut particles = pair(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        let c = DistanceConstraint::new(0, 1, 1.0);
        c.solve(&mut particles, CorrectionWeighting::Equal);
        assert!(c.error(&particles).abs() < 1e-6);
        assert_eq!(particles[0].pos, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(particles[1].pos, Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn equal_weighting_ignores_mass() {
        let mut particles = [
            Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 10.0).unwrap(),
            Particle::new(Vec3::new(4.0f32, 0.0, 0.0), 1.0).unwrap(),
        ];
        DistanceConstraint::new(0, 1, 2.0).solve(&mut particles, CorrectionWeighting::Equal);
        assert_eq!(particles[0].pos.x, 1.0);
        assert_eq!(particles[1].pos.x, 3.0);
    }

    #[test]
    fn inverse_mass_weighting_heavier_moves_less() {
        let mut particles = [
            Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 10.0).unwrap(),
            Particle::new(Vec3::new(10.0f32, 0.0, 0.0), 1.0).unwrap(),
        ];
        DistanceConstraint::new(0, 1, 5.0).solve(&mut particles, CorrectionWeighting::InverseMass);
        let heavy = particles[0].pos.x.abs();
        let light = (particles[1].pos.x - 10.0).abs();
        assert!(heavy < light, "heavy moved {}, light moved {}", heavy, light);
    }

    #[test]
    fn inverse_mass_weighting_keeps_pinned_endpoint() {
        let mut particles = [
            Particle::pinned(Vec3::new(0.0f32, 0.0, 0.0)),
            Particle::new(Vec3::new(3.0f32, 0.0, 0.0), 1.0).unwrap(),
        ];
        DistanceConstraint::new(0, 1, 1.0).solve(&mut particles, CorrectionWeighting::InverseMass);
        assert_eq!(particles[0].pos, Vec3::zero());
        assert!((particles[1].pos.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_rest_length_pulls_together() {
        let mut particles = pair(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        DistanceConstraint::new(0, 1, 0.0).solve(&mut particles, CorrectionWeighting::Equal);
        assert_eq!(particles[0].pos, particles[1].pos);
    }
}
