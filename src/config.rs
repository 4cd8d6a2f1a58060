//! Configuration for a deformable-mesh simulation.

use crate::constraint::CorrectionWeighting;
use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::interaction::{DragFalloff, DragPlacement};
use crate::vec::Vec;

/// All tunables of a simulation. Plain values, constant during a run unless
/// replaced through [`Simulation::set_config`](crate::Simulation::set_config).
///
/// # Builder Pattern
/// ```
/// use pliant::config::SimulationConfig;
/// use pliant::interaction::DragFalloff;
/// use pliant::vec::Vec3;
///
/// let config: SimulationConfig<Vec3<f32>> = SimulationConfig::new()
///     .with_stiffness(25.0)
///     .with_damping(0.97)
///     .with_gravity(Vec3::new(0.0, -0.098, 0.0))
///     .with_iterations(5)
///     .with_drag_falloff(DragFalloff::new(10.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig<V: Vec> {
    /// Mass of every particle unless the mesh supplies its own. Default: 0.1.
    pub particle_mass: V::Scalar,
    /// Restoring force per unit of displacement from the rest pose. Default: 7.5.
    pub stiffness: V::Scalar,
    /// Gravity applied as a force on every free particle. Default: zero.
    pub gravity: V,
    /// Fraction of implicit velocity kept each step, in [0, 1]. Default: 0.97.
    pub damping: V::Scalar,
    /// Fixed simulated timestep in seconds. Default: 0.018.
    pub timestep: V::Scalar,
    /// Constraint passes per tick. Default: 5.
    pub iterations: usize,
    /// Drag influence on particles around the selected one. Default: none.
    pub drag_falloff: Option<DragFalloff<V::Scalar>>,
    /// How pointer movement becomes a drag target. Default: mesh surface.
    pub drag_placement: DragPlacement<V>,
    /// How constraint corrections are split. Default: equal halves.
    pub weighting: CorrectionWeighting,
}

impl<V: Vec> SimulationConfig<V> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimulationConfig {
            particle_mass: V::Scalar::from_f32(0.1),
            stiffness: V::Scalar::from_f32(7.5),
            gravity: V::zero(),
            damping: V::Scalar::from_f32(0.97),
            timestep: V::Scalar::from_f32(0.018),
            iterations: 5,
            drag_falloff: None,
            drag_placement: DragPlacement::Surface,
            weighting: CorrectionWeighting::Equal,
        }
    }

    pub fn with_particle_mass(mut self, mass: V::Scalar) -> Self {
        self.particle_mass = mass;
        self
    }

    pub fn with_stiffness(mut self, stiffness: V::Scalar) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_gravity(mut self, gravity: V) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_damping(mut self, damping: V::Scalar) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_timestep(mut self, timestep: V::Scalar) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_drag_falloff(mut self, falloff: DragFalloff<V::Scalar>) -> Self {
        self.drag_falloff = Some(falloff);
        self
    }

    pub fn with_drag_placement(mut self, placement: DragPlacement<V>) -> Self {
        self.drag_placement = placement;
        self
    }

    pub fn with_weighting(mut self, weighting: CorrectionWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Squared timestep used by the integrator.
    pub fn dt_sq(&self) -> V::Scalar {
        self.timestep * self.timestep
    }

    /// Check every value. NaN and infinities fail every check except the
    /// particle mass, where an infinite mass pins every vertex.
    pub fn validate(&self) -> PhysicsResult<()> {
        let zero = V::Scalar::zero();
        if !self.particle_mass.is_strictly_positive() {
            return Err(PhysicsError::InvalidMass);
        }
        if !(self.stiffness >= zero && self.stiffness.is_finite()) {
            return Err(PhysicsError::InvalidStiffness);
        }
        if !(self.damping >= zero && self.damping <= V::Scalar::one()) {
            return Err(PhysicsError::InvalidDamping);
        }
        if !(self.timestep.is_strictly_positive() && self.timestep.is_finite()) {
            return Err(PhysicsError::InvalidTimestep);
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidGravity);
        }
        if self.iterations == 0 {
            return Err(PhysicsError::InvalidIterations);
        }
        if let Some(falloff) = &self.drag_falloff {
            let finite = falloff.radius.is_finite() && falloff.strength.is_finite();
            if !finite || !falloff.radius.is_strictly_positive() || !(falloff.strength >= zero) {
                return Err(PhysicsError::InvalidFalloff);
            }
        }
        Ok(())
    }
}

impl<V: Vec> Default for SimulationConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}
