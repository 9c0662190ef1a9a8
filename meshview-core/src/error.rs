/// Error types for mesh loading and normal computation
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Broad classification of a [`MeshError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The mesh file could not be read
    Resource,
    /// A record could not be parsed or has an unsupported shape
    Parse,
    /// The parsed geometry cannot be lit or drawn
    Geometry,
}

/// Everything that can go wrong between a file path and a set of buffers.
///
/// Line numbers are 1-based, face numbers are 0-based positions in the
/// face list.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read mesh file {}: {source}", path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {reason}: `{text}`")]
    Parse {
        line: usize,
        text: String,
        reason: String,
    },

    #[error("line {line}: face has {count} vertex references, only triangles are supported")]
    FaceArity { line: usize, count: usize },

    #[error("line {line}: face has {count} vertex references, a triangle needs 3")]
    TooFewFaceRefs { line: usize, count: usize },

    #[error("face {face} references vertex index {index}, but only {vertex_count} vertices are defined")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("face {face} is degenerate (zero-area), its normal is undefined")]
    DegenerateFace { face: usize },
}

impl MeshError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshError::Resource { .. } => ErrorKind::Resource,
            MeshError::Parse { .. } | MeshError::FaceArity { .. } => ErrorKind::Parse,
            MeshError::TooFewFaceRefs { .. }
            | MeshError::IndexOutOfRange { .. }
            | MeshError::DegenerateFace { .. } => ErrorKind::Geometry,
        }
    }

    pub(crate) fn parse(line: usize, text: &str, reason: impl Into<String>) -> Self {
        MeshError::Parse {
            line,
            text: text.trim().to_string(),
            reason: reason.into(),
        }
    }
}

pub type MeshResult<T> = Result<T, MeshError>;
