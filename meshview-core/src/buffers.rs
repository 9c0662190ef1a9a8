//! Flat buffers handed from the geometry pipeline to a renderer.
//!
//! Positions and indices describe the indexed mesh. Normals are keyed by
//! face corner, not by vertex, so they only line up with
//! [`MeshBuffers::expanded_positions`], never with `positions` directly.

use std::path::Path;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::error::MeshResult;
use crate::geometry::Mesh;
use crate::normals::compute_normals;
use crate::obj;

/// Read-only render buffers for one mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    positions: Vec<f32>,
    indices: Vec<u32>,
    normals: Vec<f32>,
}

impl MeshBuffers {
    /// Flatten `mesh` and compute its per-corner normals
    pub fn from_mesh(mesh: &Mesh) -> MeshResult<Self> {
        let normals = compute_normals(mesh)?;

        let positions = mesh
            .vertices()
            .iter()
            .flat_map(|v| [v.x, v.y, v.z])
            .collect();
        let indices = mesh.faces().iter().flat_map(|f| f.indices()).collect();
        let normals = normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect();

        Ok(Self {
            positions,
            indices,
            normals,
        })
    }

    /// 3 floats per vertex, file order
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// 3 indices per face, file order
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// 3 floats per face corner
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn corner_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex(&self, index: usize) -> Option<Point3<f32>> {
        let p = self.positions.get(index * 3..index * 3 + 3)?;
        Some(Point3::new(p[0], p[1], p[2]))
    }

    /// Position and normal of face corner `corner` in the non-indexed stream
    pub fn corner(&self, corner: usize) -> Option<(Point3<f32>, Vector3<f32>)> {
        let index = *self.indices.get(corner)? as usize;
        let n = self.normals.get(corner * 3..corner * 3 + 3)?;
        Some((self.vertex(index)?, Vector3::new(n[0], n[1], n[2])))
    }

    /// Positions re-expanded per corner, aligned element for element with
    /// [`normals`](Self::normals)
    pub fn expanded_positions(&self) -> Vec<f32> {
        let mut expanded = Vec::with_capacity(self.indices.len() * 3);
        for &index in &self.indices {
            let start = index as usize * 3;
            expanded.extend_from_slice(&self.positions[start..start + 3]);
        }
        expanded
    }

    /// Axis-aligned bounding box of the vertex positions
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertex(0)?;
        Some(
            (1..self.vertex_count())
                .filter_map(|i| self.vertex(i))
                .fold((first, first), |(min, max), v| (min.inf(&v), max.sup(&v))),
        )
    }
}

/// Run the whole pipeline: load the OBJ file at `path`, compute normals and
/// flatten into buffers
pub fn load_buffers(path: impl AsRef<Path>) -> MeshResult<MeshBuffers> {
    let mesh = obj::load(path)?;
    let buffers = MeshBuffers::from_mesh(&mesh)?;
    debug!(
        positions = buffers.positions.len(),
        indices = buffers.indices.len(),
        normals = buffers.normals.len(),
        "built mesh buffers"
    );
    Ok(buffers)
}
