//! Flat face normals.
//!
//! Each face contributes one unit normal, emitted once per corner so the
//! output lines up with a non-indexed (per-corner) vertex stream. A vertex
//! shared by several faces therefore appears with several normals.

use nalgebra::Vector3;

use crate::error::{MeshError, MeshResult};
use crate::geometry::Mesh;

/// Compute the per-corner normal stream for `mesh`.
///
/// The result has exactly `3 * mesh.face_count()` entries, in face order.
/// Normals follow the right-hand rule over each face's stored winding; faces
/// are never re-oriented.
///
/// Fails with [`MeshError::DegenerateFace`] on the first face whose corners
/// are colinear or coincident.
pub fn compute_normals(mesh: &Mesh) -> MeshResult<Vec<Vector3<f32>>> {
    let mut normals = Vec::with_capacity(mesh.face_count() * 3);

    for (face, triangle) in mesh.triangles().enumerate() {
        let normal = triangle
            .normal()
            .ok_or(MeshError::DegenerateFace { face })?
            .into_inner();

        normals.extend_from_slice(&[normal; 3]);
    }

    Ok(normals)
}
