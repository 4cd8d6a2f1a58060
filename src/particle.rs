//! Verlet particles: one point mass per mesh vertex.

use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::vec::Vec;

/// A Verlet particle: position-based dynamics with implicit velocity.
///
/// `rest_pos` is the undeformed vertex location. It is fixed at creation and
/// anchors the restoring force. An `inv_mass` of zero makes the particle
/// immune to forces; it can still be moved by the solver or a drag.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle<V: Vec> {
    pub pos: V,
    pub prev_pos: V,
    rest_pos: V,
    pub acceleration: V,
    pub inv_mass: V::Scalar,
}

impl<V: Vec> Particle<V> {
    /// Create a particle at rest at `pos`.
    ///
    /// Fails with [`PhysicsError::InvalidMass`] for zero, negative or NaN
    /// mass. An infinite mass is accepted and pins the particle.
    pub fn new(pos: V, mass: V::Scalar) -> PhysicsResult<Self> {
        if !mass.is_strictly_positive() {
            return Err(PhysicsError::InvalidMass);
        }
        Ok(Particle {
            pos,
            prev_pos: pos,
            rest_pos: pos,
            acceleration: V::zero(),
            inv_mass: V::Scalar::one() / mass,
        })
    }

    /// Create a particle that forces cannot move.
    pub fn pinned(pos: V) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            rest_pos: pos,
            acceleration: V::zero(),
            inv_mass: V::Scalar::zero(),
        }
    }

    pub fn rest_pos(&self) -> V {
        self.rest_pos
    }

    pub fn is_pinned(&self) -> bool {
        self.inv_mass == V::Scalar::zero()
    }

    /// Accumulate `force / mass` into this tick's acceleration.
    pub fn apply_force(&mut self, force: V) {
        self.acceleration = self.acceleration + force.scale(self.inv_mass);
    }

    /// Advance one step.
    ///
    /// `dt_sq` is the squared fixed timestep; `damping` scales the implicit
    /// velocity (1.0 keeps it, lower values bleed energy every step).
    pub fn integrate(&mut self, dt_sq: V::Scalar, damping: V::Scalar) {
        let velocity = (self.pos - self.prev_pos).scale(damping);
        let new_pos = self.pos + velocity + self.acceleration.scale(dt_sq);
        self.prev_pos = self.pos;
        self.pos = new_pos;
        self.acceleration = V::zero();
    }

    /// Per-step displacement, i.e. the implicit velocity times dt.
    pub fn velocity_raw(&self) -> V {
        self.pos - self.prev_pos
    }

    /// Place the particle at `pos`, keeping the jump as implicit velocity.
    pub fn move_to(&mut self, pos: V) {
        self.prev_pos = self.pos;
        self.pos = pos;
    }
}
