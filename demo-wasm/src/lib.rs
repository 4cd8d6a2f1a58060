use pliant::{
    DragFalloff, DragPlacement, MeshData, MeshRaycaster, NoOpStepObserver, Plane, Ray,
    ScreenPoint, Simulation, SimulationConfig, Vec3, VertexBuffer,
};
use wasm_bindgen::prelude::*;

type V = Vec3<f32>;

// ---- Picking bridge ----

/// Picking results computed by the JavaScript renderer for the current frame.
///
/// The renderer owns the camera and the deformed geometry, so it raycasts
/// itself and hands over the ray and hit point. The simulation asks for them
/// when it applies staged pointer events at the start of the next tick.
#[derive(Default)]
struct FrameHits {
    ray: Option<Ray<V>>,
    hit: Option<V>,
}

impl MeshRaycaster<V> for FrameHits {
    fn screen_ray(&self, _screen: ScreenPoint<f32>) -> Option<Ray<V>> {
        self.ray
    }

    fn intersect_mesh(&self, _ray: &Ray<V>) -> Option<V> {
        self.hit
    }
}

// ---- Deformable Mesh Demo ----

#[wasm_bindgen]
pub struct DeformableMeshDemo {
    sim: Simulation<V>,
    buffer: VertexBuffer<f32>,
    hits: FrameHits,
}

#[wasm_bindgen]
impl DeformableMeshDemo {
    /// Load a mesh from flat renderer buffers with the default tuning.
    #[wasm_bindgen(constructor)]
    pub fn new(positions: &[f32], indices: &[u32]) -> Result<DeformableMeshDemo, JsError> {
        let mesh = MeshData::from_flat(positions, indices)?;
        Self::with_mesh(mesh, SimulationConfig::new())
    }

    /// Welded UV sphere, handy when no asset is loaded.
    pub fn sphere(radius: f32, width_segments: usize, height_segments: usize) -> Result<DeformableMeshDemo, JsError> {
        let mesh = MeshData::uv_sphere(radius, width_segments, height_segments);
        Self::with_mesh(mesh, SimulationConfig::new())
    }

    fn with_mesh(mesh: MeshData<V>, config: SimulationConfig<V>) -> Result<DeformableMeshDemo, JsError> {
        let buffer = VertexBuffer::from_mesh(&mesh);
        let sim = Simulation::from_mesh(config, &mesh)?;
        Ok(DeformableMeshDemo { sim, buffer, hits: FrameHits::default() })
    }

    pub fn set_stiffness(&mut self, stiffness: f32) -> Result<(), JsError> {
        let config = self.sim.config().clone().with_stiffness(stiffness);
        Ok(self.sim.set_config(config)?)
    }

    pub fn set_damping(&mut self, damping: f32) -> Result<(), JsError> {
        let config = self.sim.config().clone().with_damping(damping);
        Ok(self.sim.set_config(config)?)
    }

    /// Spread drags over neighbours within `radius`; a radius of 0 disables it.
    pub fn set_falloff(&mut self, radius: f32, strength: f32) -> Result<(), JsError> {
        let mut config = self.sim.config().clone();
        config.drag_falloff = if radius > 0.0 {
            Some(DragFalloff::new(radius).with_strength(strength))
        } else {
            None
        };
        Ok(self.sim.set_config(config)?)
    }

    /// Drag on a fixed plane through `(px, py, pz)` instead of the surface.
    pub fn drag_on_plane(&mut self, px: f32, py: f32, pz: f32, nx: f32, ny: f32, nz: f32) -> Result<(), JsError> {
        let plane = Plane::new(Vec3::new(px, py, pz), Vec3::new(nx, ny, nz));
        let config = self.sim.config().clone().with_drag_placement(DragPlacement::Plane(plane));
        Ok(self.sim.set_config(config)?)
    }

    /// Drag on a plane through `(px, py, pz)` that turns to face each pointer ray.
    pub fn drag_facing_camera(&mut self, px: f32, py: f32, pz: f32) -> Result<(), JsError> {
        let placement = DragPlacement::CameraFacing { point: Vec3::new(px, py, pz) };
        let config = self.sim.config().clone().with_drag_placement(placement);
        Ok(self.sim.set_config(config)?)
    }

    pub fn drag_on_surface(&mut self) -> Result<(), JsError> {
        let config = self.sim.config().clone().with_drag_placement(DragPlacement::Surface);
        Ok(self.sim.set_config(config)?)
    }

    /// Record this frame's pointer ray and, if any, where it hit the mesh.
    pub fn set_pick(&mut self, ox: f32, oy: f32, oz: f32, dx: f32, dy: f32, dz: f32) {
        self.hits.ray = Some(Ray::new(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz)));
        self.hits.hit = None;
    }

    pub fn set_hit(&mut self, x: f32, y: f32, z: f32) {
        self.hits.hit = Some(Vec3::new(x, y, z));
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.sim.pointer_down(ScreenPoint::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.sim.pointer_move(ScreenPoint::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.sim.pointer_up();
    }

    /// Advance one fixed tick. Returns true when positions changed.
    pub fn update(&mut self) -> bool {
        let stepped = self.sim.step(&self.hits, &mut self.buffer, &mut NoOpStepObserver);
        self.hits = FrameHits::default();
        stepped
    }

    /// Returns true once per update that rewrote positions.
    pub fn take_dirty(&mut self) -> bool {
        self.buffer.take_dirty()
    }

    /// Returns flat [x0, y0, z0, x1, y1, z1, ...] positions
    pub fn positions(&self) -> Vec<f32> {
        self.buffer.as_slice().to_vec()
    }

    /// Index of the dragged vertex, or -1.
    pub fn selected(&self) -> i32 {
        self.sim.selected().map_or(-1, |i| i as i32)
    }

    pub fn vertex_count(&self) -> usize {
        self.sim.particle_count()
    }

    pub fn constraint_count(&self) -> usize {
        self.sim.constraint_count()
    }

    pub fn dispose(&mut self) {
        self.sim.teardown();
    }
}
