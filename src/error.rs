//! Error types for simulation setup.
//!
//! Every error is raised synchronously while configuring a simulation or
//! loading a mesh. Per-tick anomalies (coincident particles, missed picks)
//! are tolerated and never surface here.

use thiserror::Error;

/// Errors that can occur while setting up a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Mass must be positive.
    #[error("mass must be positive")]
    InvalidMass,

    /// Restoring stiffness must be finite and non-negative.
    #[error("stiffness must be finite and non-negative")]
    InvalidStiffness,

    /// Damping factor must be in [0, 1].
    #[error("damping must be in [0, 1]")]
    InvalidDamping,

    /// Timestep must be positive and finite.
    #[error("timestep must be positive and finite")]
    InvalidTimestep,

    /// Gravity must have finite components.
    #[error("gravity must be finite")]
    InvalidGravity,

    /// At least one solver iteration is required.
    #[error("solver needs at least one iteration")]
    InvalidIterations,

    /// Drag falloff radius must be positive and strength non-negative, both finite.
    #[error("drag falloff needs a finite positive radius and finite non-negative strength")]
    InvalidFalloff,

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {index} (vertex count: {vertex_count})")]
    InvalidTopology {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },

    /// Flat mesh buffers have inconsistent lengths.
    #[error("malformed mesh: {reason}")]
    MalformedMesh { reason: &'static str },

    /// A mesh has already been loaded into this simulation.
    #[error("simulation already has a mesh loaded")]
    AlreadyLoaded,

    /// The simulation was torn down and cannot be reused.
    #[error("simulation has been torn down")]
    TornDown,
}

/// Convenience alias for `Result<T, PhysicsError>`.
pub type PhysicsResult<T> = Result<T, PhysicsError>;
