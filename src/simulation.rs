//! The simulation context and its per-tick driver.

use crate::config::SimulationConfig;
use crate::constraint::DistanceConstraint;
use crate::error::{PhysicsError, PhysicsResult};
use crate::integrator::Integrator;
use crate::interaction::{InteractionController, MeshRaycaster, PointerEvent, ScreenPoint};
use crate::mesh::{MeshData, VertexBuffer};
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::solver::ConstraintSolver;
use crate::topology::build_body;
use crate::vec::Vec;
use alloc::vec::Vec as AllocVec;

/// Lifecycle of a [`Simulation`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimulationState {
    /// No mesh yet; ticks do nothing.
    Uninitialized,
    /// Mesh loaded, no tick run yet.
    Ready,
    /// At least one tick has run.
    Running,
    /// Storage released; the context cannot be reused.
    TornDown,
}

/// One deformable mesh and everything needed to advance it.
///
/// The context owns the particles, the constraints, the selection and the
/// staged pointer input. Nothing outside it mutates them, and every tick runs
/// to completion through `&mut self`, so input handlers can only stage
/// intent for the next tick.
///
/// ```
/// use pliant::{MeshData, NoOpStepObserver, NoRaycaster, Simulation, SimulationConfig, Vec3, VertexBuffer};
///
/// let mesh = MeshData::<Vec3<f32>>::uv_sphere(1.0, 16, 12);
/// let mut sim = Simulation::new(SimulationConfig::new()).unwrap();
/// sim.load_mesh(&mesh).unwrap();
///
/// let mut buffer = VertexBuffer::from_mesh(&mesh);
/// assert!(sim.step(&NoRaycaster, &mut buffer, &mut NoOpStepObserver));
/// assert!(buffer.take_dirty());
/// ```
pub struct Simulation<V: Vec> {
    config: SimulationConfig<V>,
    state: SimulationState,
    particles: AllocVec<Particle<V>>,
    constraints: AllocVec<DistanceConstraint<V>>,
    integrator: Integrator<V>,
    solver: ConstraintSolver,
    interaction: InteractionController<V>,
    ticks: u64,
}

impl<V: Vec> Simulation<V> {
    /// Create an empty simulation. Fails if `config` does not validate.
    pub fn new(config: SimulationConfig<V>) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(Simulation {
            integrator: Integrator::from_config(&config),
            solver: ConstraintSolver::new(config.iterations, config.weighting),
            interaction: InteractionController::new(config.drag_placement, config.drag_falloff),
            config,
            state: SimulationState::Uninitialized,
            particles: AllocVec::new(),
            constraints: AllocVec::new(),
            ticks: 0,
        })
    }

    /// Create a simulation and load `mesh` into it.
    pub fn from_mesh(config: SimulationConfig<V>, mesh: &MeshData<V>) -> PhysicsResult<Self> {
        let mut sim = Self::new(config)?;
        sim.load_mesh(mesh)?;
        Ok(sim)
    }

    /// Build particles and constraints for `mesh`. Moves to `Ready`.
    ///
    /// A mesh can be loaded once; topology never changes afterwards.
    #[tracing::instrument(level = "debug", skip_all, fields(vertices = mesh.vertex_count()))]
    pub fn load_mesh(&mut self, mesh: &MeshData<V>) -> PhysicsResult<()> {
        match self.state {
            SimulationState::Uninitialized => {}
            SimulationState::TornDown => return Err(PhysicsError::TornDown),
            SimulationState::Ready | SimulationState::Running => {
                return Err(PhysicsError::AlreadyLoaded)
            }
        }

        let (particles, constraints) = build_body(mesh, self.config.particle_mass)?;
        tracing::info!(
            particles = particles.len(),
            constraints = constraints.len(),
            "mesh loaded"
        );
        self.particles = particles;
        self.constraints = constraints;
        self.state = SimulationState::Ready;
        Ok(())
    }

    /// Replace the configuration between ticks.
    ///
    /// Particles keep their current masses; `particle_mass` only applies to
    /// meshes loaded afterwards.
    pub fn set_config(&mut self, config: SimulationConfig<V>) -> PhysicsResult<()> {
        config.validate()?;
        self.integrator = Integrator::from_config(&config);
        self.solver = ConstraintSolver::new(config.iterations, config.weighting);
        self.interaction
            .reconfigure(config.drag_placement, config.drag_falloff, &self.particles);
        self.config = config;
        Ok(())
    }

    /// Stage a pointer event for the next tick.
    ///
    /// Dropped unless a mesh is loaded; there is nothing to pick yet.
    pub fn push_event(&mut self, event: PointerEvent<V::Scalar>) {
        match self.state {
            SimulationState::Ready | SimulationState::Running => self.interaction.push(event),
            SimulationState::Uninitialized | SimulationState::TornDown => {
                tracing::trace!(state = ?self.state, "dropping pointer event");
            }
        }
    }

    pub fn pointer_down(&mut self, screen: ScreenPoint<V::Scalar>) {
        self.push_event(PointerEvent::Down(screen));
    }

    pub fn pointer_move(&mut self, screen: ScreenPoint<V::Scalar>) {
        self.push_event(PointerEvent::Move(screen));
    }

    pub fn pointer_up(&mut self) {
        self.push_event(PointerEvent::Up);
    }

    /// Advance one fixed timestep and publish positions into `output`.
    ///
    /// Order within a tick: staged input, forces and integration for every
    /// particle except the dragged one, constraint relaxation, drag override,
    /// output. Returns `false` and leaves `output` alone when no mesh is
    /// loaded or the simulation was torn down.
    pub fn step<R, O>(
        &mut self,
        raycaster: &R,
        output: &mut VertexBuffer<V::Scalar>,
        observer: &mut O,
    ) -> bool
    where
        R: MeshRaycaster<V>,
        O: StepObserver,
    {
        match self.state {
            SimulationState::Ready | SimulationState::Running => {}
            SimulationState::Uninitialized | SimulationState::TornDown => return false,
        }

        let applied = self.interaction.apply_pending(&self.particles, raycaster);
        observer.on_events_applied(applied);

        let dragged = self.interaction.selected();
        self.integrator.advance(&mut self.particles, dragged);
        observer.on_integrate();

        self.solver.relax(&mut self.particles, &self.constraints, observer);

        if let Some(index) = self.interaction.apply_drag(&mut self.particles) {
            observer.on_drag_applied(index);
        }

        output.write_particles(&self.particles);
        self.state = SimulationState::Running;
        self.ticks += 1;
        tracing::trace!(tick = self.ticks, "step complete");
        observer.on_step_complete();
        true
    }

    /// Release particles, constraints, selection and staged input.
    ///
    /// Idempotent. Afterwards `step` is a no-op and `load_mesh` fails.
    pub fn teardown(&mut self) {
        if self.state == SimulationState::TornDown {
            return;
        }
        self.particles = AllocVec::new();
        self.constraints = AllocVec::new();
        self.interaction.clear();
        self.state = SimulationState::TornDown;
        tracing::info!(ticks = self.ticks, "simulation torn down");
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn config(&self) -> &SimulationConfig<V> {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn particle(&self, index: usize) -> Option<&Particle<V>> {
        self.particles.get(index)
    }

    pub fn particles(&self) -> &[Particle<V>] {
        &self.particles
    }

    pub fn constraints(&self) -> &[DistanceConstraint<V>] {
        &self.constraints
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn positions(&self) -> AllocVec<V> {
        self.particles.iter().map(|p| p.pos).collect()
    }

    /// Index of the particle currently being dragged.
    pub fn selected(&self) -> Option<usize> {
        self.interaction.selected()
    }

    pub fn interaction(&self) -> &InteractionController<V> {
        &self.interaction
    }

    /// Largest constraint length error, a rough measure of how stretched the mesh is.
    pub fn max_constraint_error(&self) -> V::Scalar {
        ConstraintSolver::max_error(&self.particles, &self.constraints)
    }
}
