//! Triangle mesh container and interleaved GPU vertex.

use serde::{Deserialize, Serialize};
use visceral_core::Vec3;

use crate::error::{MeshError, MeshResult};

/// Tolerance for unit-length normal checks.
pub const NORMAL_TOLERANCE: f32 = 1e-4;

/// Interleaved vertex for GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Normal vector (x, y, z)
    pub normal: [f32; 3],
    /// Texture coordinates (u, v)
    pub uv: [f32; 2],
}

#[cfg(feature = "gpu")]
impl Vertex {
    /// Vertex buffer layout for wgpu pipelines.
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Box extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Triangulated surface: parallel position/normal/uv arrays and optional indices.
///
/// When `indices` is `None`, every three consecutive vertices form a triangle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Unit vertex normals, one per position
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates, one per position (or empty)
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices, three per triangle
    pub indices: Option<Vec<u32>>,
}

impl Mesh {
    /// Mesh with no vertices and no indices.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Indexed mesh with preallocated buffers.
    #[must_use]
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            indices: Some(Vec::with_capacity(indices)),
        }
    }

    /// Append a vertex, returning its index.
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        index
    }

    /// Append one triangle. Turns a non-indexed mesh into an indexed one.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.get_or_insert_with(Vec::new).extend_from_slice(&[a, b, c]);
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Whether the mesh has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position `i` as a vector.
    #[must_use]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.positions[i])
    }

    /// Normal `i` as a vector.
    #[must_use]
    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::from_array(self.normals[i])
    }

    /// Triangles as index triples, whether or not the mesh is indexed.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let sequential = match self.indices {
            Some(_) => 0,
            None => self.positions.len() / 3,
        };
        let indexed = self.indices.iter().flat_map(|idx| idx.chunks_exact(3));

        indexed
            .map(|t| [t[0], t[1], t[2]])
            .chain((0..sequential as u32).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]))
    }

    /// Shift every position by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            p[0] += offset.x;
            p[1] += offset.y;
            p[2] += offset.z;
        }
    }

    /// Builder form of [`translate`](Self::translate).
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.translate(offset);
        self
    }

    /// Axis-aligned bounds, or `None` for an empty mesh.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let first = Vec3::from_array(*self.positions.first()?);
        let mut min = first;
        let mut max = first;

        for p in &self.positions[1..] {
            min.x = min.x.min(p[0]);
            min.y = min.y.min(p[1]);
            min.z = min.z.min(p[2]);
            max.x = max.x.max(p[0]);
            max.y = max.y.max(p[1]);
            max.z = max.z.max(p[2]);
        }

        Some(Bounds { min, max })
    }

    /// Check the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: mismatched attribute counts,
    /// a non-triangular or out-of-range index buffer, or a non-unit normal.
    pub fn validate(&self) -> MeshResult<()> {
        let n = self.positions.len();

        if self.normals.len() != n {
            return Err(MeshError::NormalCountMismatch {
                positions: n,
                normals: self.normals.len(),
            });
        }
        if !self.uvs.is_empty() && self.uvs.len() != n {
            return Err(MeshError::UvCountMismatch {
                positions: n,
                uvs: self.uvs.len(),
            });
        }

        if let Some(indices) = &self.indices {
            if indices.len() % 3 != 0 {
                return Err(MeshError::IndexCountNotTriangular {
                    count: indices.len(),
                });
            }
            if let Some((slot, &index)) = indices.iter().enumerate().find(|&(_, &i)| i as usize >= n) {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    slot,
                    vertex_count: n,
                });
            }
        }

        for (vertex, normal) in self.normals.iter().enumerate() {
            let length = Vec3::from_array(*normal).length();
            if (length - 1.0).abs() > NORMAL_TOLERANCE {
                return Err(MeshError::NonUnitNormal { vertex, length });
            }
        }

        Ok(())
    }

    /// Positions as a flat `[x, y, z, ...]` buffer.
    #[must_use]
    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flatten().copied().collect()
    }

    /// Normals as a flat `[x, y, z, ...]` buffer.
    #[must_use]
    pub fn flat_normals(&self) -> Vec<f32> {
        self.normals.iter().flatten().copied().collect()
    }

    /// Interleave attributes for GPU upload. Missing UVs become `[0, 0]`.
    #[must_use]
    pub fn to_vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .enumerate()
            .map(|(i, (&position, &normal))| Vertex {
                position,
                normal,
                uv: self.uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }

    /// Index buffer; non-indexed meshes get sequential indices.
    #[must_use]
    pub fn index_buffer(&self) -> Vec<u32> {
        match &self.indices {
            Some(indices) => indices.clone(),
            None => (0..self.positions.len() as u32).collect(),
        }
    }
}
