//! Picking and dragging particles from pointer input.
//!
//! The controller never casts rays itself. A [`MeshRaycaster`] supplied by
//! the renderer turns screen positions into rays and rays into mesh hits.
//! Pointer events are only staged when they arrive; [`InteractionController::apply_pending`]
//! consumes them at the start of a tick, before any particle moves.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec;
use alloc::vec::Vec as AllocVec;

/// Pointer position in whatever screen space the raycaster understands.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScreenPoint<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> ScreenPoint<F> {
    pub fn new(x: F, y: F) -> Self {
        ScreenPoint { x, y }
    }
}

/// Half-line from `origin` along `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray<V: Vec> {
    pub origin: V,
    pub direction: V,
}

impl<V: Vec> Ray<V> {
    pub fn new(origin: V, direction: V) -> Self {
        Ray { origin, direction }
    }

    pub fn at(&self, t: V::Scalar) -> V {
        self.origin + self.direction.scale(t)
    }
}

/// Infinite plane through `point` with unit `normal`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane<V: Vec> {
    pub point: V,
    pub normal: V,
}

impl<V: Vec> Plane<V> {
    /// `normal` is normalized here; a zero normal gives a plane no ray hits.
    pub fn new(point: V, normal: V) -> Self {
        Plane { point, normal: normal.normalize() }
    }

    /// Where `ray` crosses the plane, if it does so in front of its origin.
    pub fn intersect_ray(&self, ray: &Ray<V>) -> Option<V> {
        let denom = self.normal.dot(ray.direction);
        if denom.is_near_zero(V::Scalar::from_f32(1e-10)) {
            return None;
        }
        let t = self.normal.dot(self.point - ray.origin) / denom;
        if t < V::Scalar::zero() {
            return None;
        }
        Some(ray.at(t))
    }
}

/// The renderer's picking service.
pub trait MeshRaycaster<V: Vec> {
    /// Ray through the given screen position, from the current camera.
    fn screen_ray(&self, screen: ScreenPoint<V::Scalar>) -> Option<Ray<V>>;

    /// First intersection of `ray` with the rendered (deformed) mesh.
    fn intersect_mesh(&self, ray: &Ray<V>) -> Option<V>;
}

/// A raycaster that never hits anything.
pub struct NoRaycaster;

impl<V: Vec> MeshRaycaster<V> for NoRaycaster {
    fn screen_ray(&self, _screen: ScreenPoint<V::Scalar>) -> Option<Ray<V>> {
        None
    }

    fn intersect_mesh(&self, _ray: &Ray<V>) -> Option<V> {
        None
    }
}

/// Pointer input, staged until the next tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent<F: Float> {
    Down(ScreenPoint<F>),
    Move(ScreenPoint<F>),
    Up,
}

/// How a moving pointer is turned into a drag target.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum DragPlacement<V: Vec> {
    /// Target is where the pointer ray hits the mesh.
    #[default]
    Surface,
    /// Target is where the pointer ray crosses a fixed plane.
    Plane(Plane<V>),
    /// Target is where the pointer ray crosses the plane through `point`
    /// facing the ray's origin. The plane is rebuilt from every ray, so it
    /// keeps facing an orbiting camera.
    CameraFacing { point: V },
}

/// Drag influence on particles near the selected one, measured in the rest
/// pose.
///
/// A particle at rest distance `d < radius` receives the fraction
/// `clamp(1 - strength * d / radius, 0, 1)` of the drag offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragFalloff<F: Float> {
    pub radius: F,
    pub strength: F,
}

impl<F: Float> DragFalloff<F> {
    /// Linear falloff reaching zero at `radius`.
    pub fn new(radius: F) -> Self {
        DragFalloff { radius, strength: F::one() }
    }

    /// Lower strength keeps the whole neighbourhood closer to full influence.
    pub fn with_strength(mut self, strength: F) -> Self {
        self.strength = strength;
        self
    }

    pub fn influence(&self, rest_distance: F) -> F {
        if !(rest_distance < self.radius) {
            return F::zero();
        }
        (F::one() - self.strength * rest_distance / self.radius).clamp(F::zero(), F::one())
    }
}

/// Index of the particle closest to `point`, by current position.
///
/// Ties go to the lowest index. `None` only for an empty slice.
pub fn select_nearest<V: Vec>(point: V, particles: &[Particle<V>]) -> Option<usize> {
    let first = particles.first()?;
    let mut nearest_idx = 0;
    let mut nearest_dist_sq = first.pos.distance_sq(point);
    for (i, p) in particles.iter().enumerate().skip(1) {
        let d = p.pos.distance_sq(point);
        if d < nearest_dist_sq {
            nearest_dist_sq = d;
            nearest_idx = i;
        }
    }
    Some(nearest_idx)
}

/// The particle being dragged and where it is being dragged to.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection<V: Vec> {
    pub index: usize,
    pub target: V,
    /// Rest-pose distance of every particle from the selected one. Empty
    /// unless a falloff is configured.
    rest_distances: AllocVec<V::Scalar>,
}

impl<V: Vec> Selection<V> {
    pub fn rest_distance(&self, index: usize) -> Option<V::Scalar> {
        self.rest_distances.get(index).copied()
    }
}

/// Selection state and staged input for one simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionController<V: Vec> {
    placement: DragPlacement<V>,
    falloff: Option<DragFalloff<V::Scalar>>,
    pressed: bool,
    selection: Option<Selection<V>>,
    pending: AllocVec<PointerEvent<V::Scalar>>,
}

impl<V: Vec> InteractionController<V> {
    pub fn new(placement: DragPlacement<V>, falloff: Option<DragFalloff<V::Scalar>>) -> Self {
        InteractionController {
            placement,
            falloff,
            pressed: false,
            selection: None,
            pending: AllocVec::new(),
        }
    }

    /// Swap placement and falloff; an active selection keeps going with the
    /// new settings.
    pub fn reconfigure(
        &mut self,
        placement: DragPlacement<V>,
        falloff: Option<DragFalloff<V::Scalar>>,
        particles: &[Particle<V>],
    ) {
        self.placement = placement;
        self.falloff = falloff;
        if let Some(sel) = self.selection.as_mut() {
            sel.rest_distances = Self::rest_distances(self.falloff.as_ref(), sel.index, particles);
        }
    }

    /// Stage an event for the next tick.
    pub fn push(&mut self, event: PointerEvent<V::Scalar>) {
        self.pending.push(event);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn selection(&self) -> Option<&Selection<V>> {
        self.selection.as_ref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.as_ref().map(|s| s.index)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Apply every staged event in arrival order. Returns how many were applied.
    pub fn apply_pending<R: MeshRaycaster<V>>(
        &mut self,
        particles: &[Particle<V>],
        raycaster: &R,
    ) -> usize {
        let events = core::mem::take(&mut self.pending);
        for event in events.iter() {
            match *event {
                PointerEvent::Down(screen) => {
                    self.pressed = true;
                    if self.selection.is_none() {
                        self.try_select(screen, particles, raycaster);
                    }
                }
                PointerEvent::Move(screen) => {
                    if self.selection.is_some() {
                        self.update_target(screen, raycaster);
                    } else if self.pressed {
                        self.try_select(screen, particles, raycaster);
                    }
                }
                PointerEvent::Up => {
                    self.pressed = false;
                    self.release();
                }
            }
        }
        let count = events.len();
        // Hand the allocation back for the next batch.
        self.pending = events;
        self.pending.clear();
        count
    }

    fn try_select<R: MeshRaycaster<V>>(
        &mut self,
        screen: ScreenPoint<V::Scalar>,
        particles: &[Particle<V>],
        raycaster: &R,
    ) {
        let hit = raycaster.screen_ray(screen).and_then(|ray| raycaster.intersect_mesh(&ray));
        match hit {
            Some(point) => {
                self.select_at(point, particles);
            }
            None => tracing::trace!("pick missed the mesh"),
        }
    }

    fn update_target<R: MeshRaycaster<V>>(&mut self, screen: ScreenPoint<V::Scalar>, raycaster: &R) {
        let Some(ray) = raycaster.screen_ray(screen) else {
            return;
        };
        let target = match &self.placement {
            DragPlacement::Surface => raycaster.intersect_mesh(&ray),
            DragPlacement::Plane(plane) => plane.intersect_ray(&ray),
            DragPlacement::CameraFacing { point } => {
                Plane::new(*point, ray.origin - *point).intersect_ray(&ray)
            }
        };
        if let (Some(target), Some(sel)) = (target, self.selection.as_mut()) {
            sel.target = target;
        }
    }

    /// Select the particle nearest to a known hit point and start dragging it
    /// toward that point.
    pub fn select_at(&mut self, point: V, particles: &[Particle<V>]) -> Option<usize> {
        let index = select_nearest(point, particles)?;
        self.select(index, point, particles);
        Some(index)
    }

    /// Start dragging particle `index` toward `target`.
    ///
    /// Returns `false` and keeps the current selection when `index` is not a
    /// particle.
    pub fn select(&mut self, index: usize, target: V, particles: &[Particle<V>]) -> bool {
        if index >= particles.len() {
            tracing::trace!(index, count = particles.len(), "ignoring selection of missing particle");
            return false;
        }
        let rest_distances = Self::rest_distances(self.falloff.as_ref(), index, particles);
        tracing::debug!(index, "selected particle");
        self.selection = Some(Selection { index, target, rest_distances });
        true
    }

    fn rest_distances(
        falloff: Option<&DragFalloff<V::Scalar>>,
        index: usize,
        particles: &[Particle<V>],
    ) -> AllocVec<V::Scalar> {
        let (Some(_), Some(selected)) = (falloff, particles.get(index)) else {
            return AllocVec::new();
        };
        let origin = selected.rest_pos();
        particles.iter().map(|p| origin.distance(p.rest_pos())).collect()
    }

    /// Drop the selection. The particle becomes a free particle again.
    pub fn release(&mut self) {
        if let Some(sel) = self.selection.take() {
            tracing::debug!(index = sel.index, "released particle");
        }
    }

    /// Forget selection, press state and staged events.
    pub fn clear(&mut self) {
        self.selection = None;
        self.pressed = false;
        self.pending.clear();
    }

    /// Move the selected particle onto its target, dragging its neighbourhood
    /// along according to the falloff. Returns the selected index.
    pub fn apply_drag(&self, particles: &mut [Particle<V>]) -> Option<usize> {
        let sel = self.selection.as_ref()?;
        let offset = sel.target - particles.get(sel.index)?.pos;

        if let Some(falloff) = &self.falloff {
            for (i, (p, &d)) in particles.iter_mut().zip(sel.rest_distances.iter()).enumerate() {
                if i == sel.index {
                    continue;
                }
                let influence = falloff.influence(d);
                if influence > V::Scalar::zero() {
                    p.pos = p.pos + offset.scale(influence);
                }
            }
        }

        particles.get_mut(sel.index)?.move_to(sel.target);
        Some(sel.index)
    }
}

impl<V: Vec> Default for InteractionController<V> {
    fn default() -> Self {
        InteractionController::new(DragPlacement::Surface, None)
    }
}
