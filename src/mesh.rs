//! Mesh input and the vertex buffer handed back to the renderer.

use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::particle::Particle;
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Triangulated surface as delivered by an asset loader.
///
/// Vertex `i` becomes particle `i`; indices are never renumbered.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData<V: Vec> {
    pub positions: AllocVec<V>,
    pub triangles: AllocVec<[u32; 3]>,
    /// Per-vertex masses. `None` uses the configured uniform mass.
    pub masses: Option<AllocVec<V::Scalar>>,
}

impl<V: Vec> MeshData<V> {
    pub fn new(positions: AllocVec<V>, triangles: AllocVec<[u32; 3]>) -> Self {
        MeshData { positions, triangles, masses: None }
    }

    /// Build from the flat arrays a renderer keeps in its geometry
    /// (`[x0, y0, z0, x1, ...]` and `[a0, b0, c0, a1, ...]`).
    pub fn from_flat(positions: &[V::Scalar], indices: &[u32]) -> PhysicsResult<Self> {
        if positions.len() % V::DIM != 0 {
            return Err(PhysicsError::MalformedMesh {
                reason: "position buffer length is not a multiple of the vector dimension",
            });
        }
        if indices.len() % 3 != 0 {
            return Err(PhysicsError::MalformedMesh {
                reason: "index buffer length is not a multiple of 3",
            });
        }
        let positions = positions.chunks_exact(V::DIM).map(V::read_from).collect();
        let triangles = indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();
        Ok(MeshData::new(positions, triangles))
    }

    /// Attach per-vertex masses; the length is checked when the mesh is loaded.
    pub fn with_masses(mut self, masses: AllocVec<V::Scalar>) -> Self {
        self.masses = Some(masses);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl<F: Float> MeshData<Vec3<F>> {
    /// Welded UV sphere centred at the origin.
    ///
    /// One vertex per pole and `width_segments` vertices per latitude ring,
    /// so the seam and poles are stitched and every edge gets a constraint.
    pub fn uv_sphere(radius: F, width_segments: usize, height_segments: usize) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut positions = AllocVec::with_capacity(2 + ws * (hs - 1));
        let mut triangles = AllocVec::with_capacity(2 * ws * (hs - 1));

        positions.push(Vec3::new(F::zero(), radius, F::zero()));
        for iy in 1..hs {
            let v = F::from_usize(iy) / F::from_usize(hs);
            let theta = v * F::pi();
            for ix in 0..ws {
                let u = F::from_usize(ix) / F::from_usize(ws);
                let phi = u * F::pi() * F::from_f32(2.0);
                positions.push(Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                ));
            }
        }
        positions.push(Vec3::new(F::zero(), -radius, F::zero()));

        let ring = |iy: usize, ix: usize| (1 + (iy - 1) * ws + ix % ws) as u32;
        let south = (positions.len() - 1) as u32;

        for ix in 0..ws {
            triangles.push([0, ring(1, ix), ring(1, ix + 1)]);
        }
        for iy in 1..(hs - 1) {
            for ix in 0..ws {
                let a = ring(iy, ix);
                let b = ring(iy, ix + 1);
                let c = ring(iy + 1, ix);
                let d = ring(iy + 1, ix + 1);
                triangles.push([a, c, b]);
                triangles.push([b, c, d]);
            }
        }
        for ix in 0..ws {
            triangles.push([ring(hs - 1, ix), south, ring(hs - 1, ix + 1)]);
        }

        MeshData::new(positions, triangles)
    }

    /// Flat sheet in the XY plane, two triangles per cell.
    ///
    /// Vertex at (col, row) has index `row * cols + col`.
    pub fn grid(cols: usize, rows: usize, spacing: F) -> Self {
        let cols = cols.max(2);
        let rows = rows.max(2);
        let mut positions = AllocVec::with_capacity(cols * rows);
        let mut triangles = AllocVec::with_capacity(2 * (cols - 1) * (rows - 1));

        for row in 0..rows {
            for col in 0..cols {
                let x = F::from_usize(col) * spacing;
                let y = F::from_usize(row) * spacing;
                positions.push(Vec3::new(x, y, F::zero()));
            }
        }

        for row in 0..(rows - 1) {
            for col in 0..(cols - 1) {
                let tl = (row * cols + col) as u32;
                let tr = tl + 1;
                let bl = tl + cols as u32;
                let br = bl + 1;
                triangles.push([tl, bl, tr]);
                triangles.push([tr, bl, br]);
            }
        }

        MeshData::new(positions, triangles)
    }
}

/// Caller-owned flat position buffer, same layout as [`MeshData::from_flat`].
///
/// The simulation rewrites it every tick and raises `dirty`; the renderer
/// re-uploads the geometry and recomputes normals when it sees the flag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexBuffer<F: Float> {
    data: AllocVec<F>,
    dirty: bool,
}

impl<F: Float> VertexBuffer<F> {
    pub fn new() -> Self {
        VertexBuffer { data: AllocVec::new(), dirty: false }
    }

    /// Buffer pre-filled with the mesh's rest positions.
    pub fn from_mesh<V: Vec<Scalar = F>>(mesh: &MeshData<V>) -> Self {
        let mut data = AllocVec::new();
        data.resize(mesh.vertex_count() * V::DIM, F::zero());
        for (p, out) in mesh.positions.iter().zip(data.chunks_exact_mut(V::DIM)) {
            p.write_to(out);
        }
        VertexBuffer { data, dirty: false }
    }

    pub fn as_slice(&self) -> &[F] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the dirty flag and clear it.
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Read vertex `index` back as a vector. `None` past the end of the buffer.
    pub fn vertex<V: Vec<Scalar = F>>(&self, index: usize) -> Option<V> {
        let start = index.checked_mul(V::DIM)?;
        self.data.get(start..start.checked_add(V::DIM)?).map(V::read_from)
    }

    pub(crate) fn write_particles<V: Vec<Scalar = F>>(&mut self, particles: &[Particle<V>]) {
        self.data.resize(particles.len() * V::DIM, F::zero());
        for (p, out) in particles.iter().zip(self.data.chunks_exact_mut(V::DIM)) {
            p.pos.write_to(out);
        }
        self.dirty = true;
    }
}
