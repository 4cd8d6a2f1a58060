//! Mesh topology: neighbour adjacency and the distance constraints derived from it.

use crate::constraint::DistanceConstraint;
use crate::error::{PhysicsError, PhysicsResult};
use crate::mesh::MeshData;
use crate::particle::Particle;
use crate::vec::Vec;
use alloc::vec::Vec as AllocVec;

/// Per-vertex neighbour lists built from a triangle index list.
///
/// Every triangle edge is registered in both directions and each neighbour
/// list is deduplicated on insertion, so a vertex shared by many triangles
/// still lists each neighbour exactly once.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
    adjacency: AllocVec<AllocVec<usize>>,
}

impl Topology {
    /// Build adjacency for `vertex_count` vertices.
    ///
    /// Fails with [`PhysicsError::InvalidTopology`] on the first index
    /// outside `0..vertex_count`. Repeated indices inside one triangle
    /// (degenerate triangles) produce no self-adjacency.
    pub fn build(vertex_count: usize, triangles: &[[u32; 3]]) -> PhysicsResult<Self> {
        let mut adjacency = AllocVec::new();
        adjacency.resize_with(vertex_count, AllocVec::new);
        let mut topology = Topology { adjacency };

        for (t, tri) in triangles.iter().enumerate() {
            let [a, b, c] = Self::checked(t, tri, vertex_count)?;
            topology.link(a, b);
            topology.link(b, c);
            topology.link(c, a);
        }
        Ok(topology)
    }

    fn checked(triangle: usize, tri: &[u32; 3], vertex_count: usize) -> PhysicsResult<[usize; 3]> {
        let mut out = [0usize; 3];
        for (slot, &index) in out.iter_mut().zip(tri.iter()) {
            let index = index as usize;
            if index >= vertex_count {
                return Err(PhysicsError::InvalidTopology { triangle, index, vertex_count });
            }
            *slot = index;
        }
        Ok(out)
    }

    fn link(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        if !self.adjacency[a].contains(&b) {
            self.adjacency[a].push(b);
        }
        if !self.adjacency[b].contains(&a) {
            self.adjacency[b].push(a);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }

    /// Number of unique undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|n| n.len()).sum::<usize>() / 2
    }

    /// Unique undirected edges as `(low, high)` index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, neighbors)| {
            neighbors.iter().copied().filter(move |&j| j > i).map(move |j| (i, j))
        })
    }

    /// One constraint per unique edge, rest length taken from the rest pose.
    ///
    /// The pair is emitted only from its lower-index endpoint; emitting it from
    /// both sides would make that spring twice as stiff as its neighbours.
    pub fn constraints<V: Vec>(&self, particles: &[Particle<V>]) -> AllocVec<DistanceConstraint<V>> {
        self.edges()
            .map(|(a, b)| DistanceConstraint::from_rest_pose(a, b, particles))
            .collect()
    }
}

/// Create the particles and constraints for a mesh.
///
/// `mass` is used for every vertex unless the mesh carries its own masses.
pub fn build_body<V: Vec>(
    mesh: &MeshData<V>,
    mass: V::Scalar,
) -> PhysicsResult<(AllocVec<Particle<V>>, AllocVec<DistanceConstraint<V>>)> {
    let topology = Topology::build(mesh.vertex_count(), &mesh.triangles)?;

    let particles = match &mesh.masses {
        Some(masses) => {
            if masses.len() != mesh.vertex_count() {
                return Err(PhysicsError::MalformedMesh {
                    reason: "per-vertex mass count does not match vertex count",
                });
            }
            mesh.positions
                .iter()
                .zip(masses.iter())
                .map(|(&pos, &m)| Particle::new(pos, m))
                .collect::<PhysicsResult<AllocVec<_>>>()?
        }
        None => mesh.positions
            .iter()
            .map(|&pos| Particle::new(pos, mass))
            .collect::<PhysicsResult<AllocVec<_>>>()?,
    };

    let constraints = topology.constraints(&particles);
    tracing::debug!(
        vertices = particles.len(),
        triangles = mesh.triangle_count(),
        constraints = constraints.len(),
        "built mesh topology"
    );
    Ok((particles, constraints))
}
