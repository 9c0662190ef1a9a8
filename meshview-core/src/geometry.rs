/// Geometry primitives for indexed triangle meshes
use nalgebra::{Point3, Unit, Vector3};

use crate::error::{MeshError, MeshResult};

/// Sine of the corner angle below which a triangle has no usable normal.
///
/// Compared against the cross product of the two edge directions, so the
/// test does not depend on the triangle's size.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// A triangle face as three zero-based vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face(pub [u32; 3]);

impl Face {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c])
    }

    pub fn indices(&self) -> [u32; 3] {
        self.0
    }
}

/// A triangle resolved to its three corner positions
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub corners: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            corners: [v0, v1, v2],
        }
    }

    /// Unnormalized face normal, `(v1 - v0) x (v2 - v0)`.
    ///
    /// Its length is twice the triangle's area and its direction follows the
    /// right-hand rule over the stored corner order.
    pub fn cross(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.corners;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2)
    }

    /// Unit face normal, or `None` when the corners are colinear or coincident.
    ///
    /// The edges are reduced to unit directions before the cross product, so
    /// neither very small nor very large coordinates underflow or overflow.
    pub fn normal(&self) -> Option<Unit<Vector3<f32>>> {
        let [v0, v1, v2] = self.corners;

        let edge1 = direction(v1 - v0)?;
        let edge2 = direction(v2 - v0)?;

        Unit::try_new(edge1.cross(&edge2), DEGENERATE_EPSILON)
    }

    pub fn area(&self) -> f32 {
        self.cross().norm() * 0.5
    }
}

/// An indexed triangle mesh.
///
/// Vertices and faces keep file order and are never modified after
/// construction; every face index is guaranteed to be in range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Point3<f32>>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Build a mesh, checking that every face references an existing vertex
    pub fn new(vertices: Vec<Point3<f32>>, faces: Vec<Face>) -> MeshResult<Self> {
        let vertex_count = vertices.len();
        for (face, Face(indices)) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Resolve face `index` into its corner positions
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let Face([a, b, c]) = *self.faces.get(index)?;
        Some(Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ))
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(move |i| self.triangle(i))
    }

    /// Axis-aligned bounding box as `(min, max)`, `None` for a mesh without vertices
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        }))
    }
}

/// Unit vector along `edge`, `None` for a zero or non-finite edge
fn direction(edge: Vector3<f32>) -> Option<Vector3<f32>> {
    // Dividing by the largest component first keeps the norm finite
    let largest = edge.amax();
    if largest == 0.0 || !largest.is_finite() {
        return None;
    }
    Some((edge / largest).normalize())
}
