//! Force accumulation and Verlet integration for a whole particle set.

use crate::config::SimulationConfig;
use crate::particle::Particle;
use crate::vec::Vec;

/// Applies the per-tick forces and advances every free particle.
///
/// Two forces act on each particle: an elastic pull toward its rest
/// position, `(rest - pos) * stiffness`, and the configured gravity. Both go
/// through [`Particle::apply_force`], so a zero inverse mass cancels them.
#[derive(Clone, Debug, PartialEq)]
pub struct Integrator<V: Vec> {
    pub dt_sq: V::Scalar,
    pub damping: V::Scalar,
    pub stiffness: V::Scalar,
    pub gravity: V,
}

impl<V: Vec> Integrator<V> {
    pub fn from_config(config: &SimulationConfig<V>) -> Self {
        Integrator {
            dt_sq: config.dt_sq(),
            damping: config.damping,
            stiffness: config.stiffness,
            gravity: config.gravity,
        }
    }

    /// Elastic pull of `particle` back to its rest position.
    pub fn restoring_force(&self, particle: &Particle<V>) -> V {
        (particle.rest_pos() - particle.pos).scale(self.stiffness)
    }

    /// Accumulate restoring force and gravity on every particle except `skip`.
    pub fn apply_forces(&self, particles: &mut [Particle<V>], skip: Option<usize>) {
        for (i, p) in particles.iter_mut().enumerate() {
            if Some(i) == skip {
                continue;
            }
            let force = self.restoring_force(p) + self.gravity;
            p.apply_force(force);
        }
    }

    pub fn integrate_all(&self, particles: &mut [Particle<V>], skip: Option<usize>) {
        for (i, p) in particles.iter_mut().enumerate() {
            if Some(i) != skip {
                p.integrate(self.dt_sq, self.damping);
            }
        }
    }

    /// Forces then integration for every particle except `skip`.
    ///
    /// The skipped particle is the one being dragged; its position is owned by
    /// the interaction controller for the tick.
    pub fn advance(&self, particles: &mut [Particle<V>], skip: Option<usize>) {
        self.apply_forces(particles, skip);
        self.integrate_all(particles, skip);
    }
}
