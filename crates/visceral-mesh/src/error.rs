//! Mesh validation errors.

use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// A structural problem found in a [`Mesh`](crate::Mesh).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Normals do not pair up with positions
    #[error("Mesh has {positions} positions but {normals} normals")]
    NormalCountMismatch {
        /// Position count
        positions: usize,
        /// Normal count
        normals: usize,
    },

    /// UVs are present but do not pair up with positions
    #[error("Mesh has {positions} positions but {uvs} uvs")]
    UvCountMismatch {
        /// Position count
        positions: usize,
        /// UV count
        uvs: usize,
    },

    /// A triangle references a missing vertex
    #[error("Index {index} at slot {slot} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// Offending index value
        index: u32,
        /// Position in the index buffer
        slot: usize,
        /// Vertices available
        vertex_count: usize,
    },

    /// Index buffer length is not a multiple of three
    #[error("Index count {count} is not a multiple of 3")]
    IndexCountNotTriangular {
        /// Index buffer length
        count: usize,
    },

    /// A normal is not unit length
    #[error("Normal {vertex} has length {length:.6}")]
    NonUnitNormal {
        /// Vertex index
        vertex: usize,
        /// Measured length
        length: f32,
    },

    /// Merged vertex count does not fit in 32-bit indices
    #[error("Merged mesh has {vertex_count} vertices, exceeding 32-bit indices")]
    IndexOverflow {
        /// Total vertex count
        vertex_count: usize,
    },
}
