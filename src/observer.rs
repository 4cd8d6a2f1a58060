//! Step observer trait for monitoring simulation ticks.

/// Hooks called at fixed points of every tick.
///
/// Implement this trait for debugging, visualization or profiling. All
/// methods have default no-op implementations.
pub trait StepObserver {
    /// Called after staged pointer events were applied, with their count.
    fn on_events_applied(&mut self, _count: usize) {}

    /// Called after forces were applied and particles integrated.
    fn on_integrate(&mut self) {}

    /// Called after each constraint pass.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called after the drag override moved the selected particle.
    fn on_drag_applied(&mut self, _selected: usize) {}

    /// Called when a tick is fully complete and the vertex buffer written.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer. Use as default when no observation is needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
