//! Interactive deformable meshes driven by Verlet integration.
//!
//! `pliant` turns a triangle mesh into a soft body: every vertex becomes a
//! particle pulled back toward its rest position, every unique mesh edge
//! becomes a distance constraint, and a pointer can grab the nearest particle
//! and drag it around while the rest of the mesh follows.
//!
//! # Features
//!
//! - **Verlet integration**: Position-based dynamics with implicit velocity and damping
//! - **Edge constraints**: Built once from mesh topology, relaxed with alternating direction
//! - **Pointer interaction**: Staged input, nearest-particle picking, optional drag falloff
//! - **Observable**: Monitor every tick via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod mesh;
pub mod topology;
pub mod integrator;
pub mod constraint;
pub mod solver;
pub mod interaction;
pub mod simulation;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec2, Vec3};
pub use particle::Particle;
pub use mesh::{MeshData, VertexBuffer};
pub use topology::Topology;
pub use integrator::Integrator;
pub use constraint::{CorrectionWeighting, DistanceConstraint};
pub use solver::ConstraintSolver;
pub use interaction::{
    DragFalloff, DragPlacement, InteractionController, MeshRaycaster, NoRaycaster, Plane,
    PointerEvent, Ray, ScreenPoint, Selection,
};
pub use simulation::{Simulation, SimulationState};
pub use config::SimulationConfig;
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::{PhysicsError, PhysicsResult};
