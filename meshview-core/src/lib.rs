/// meshview core library - mesh loading and flat normal computation
///
/// This library is the stateless half of the viewer: it parses the vertex
/// and face records of an OBJ file, derives one lighting normal per face
/// corner and flattens both into buffers a renderer can draw from. It also
/// carries the camera and model-transform math the renderers share.

pub mod buffers;
pub mod error;
pub mod geometry;
pub mod normals;
pub mod obj;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use buffers::{load_buffers, MeshBuffers};
pub use error::{ErrorKind, MeshError, MeshResult};
pub use geometry::{Face, Mesh, Triangle};
pub use normals::compute_normals;
pub use obj::{load, parse_obj};
pub use projection::{Camera, ScreenPoint};
pub use transform::ModelTransform;
