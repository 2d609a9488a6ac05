//! Mesh concatenation.
//!
//! Composite structures (the spine, the body shell) are many small
//! primitives placed at computed offsets and drawn as one mesh.

use tracing::{debug, warn};

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;

/// Buffer pairing and index range of one merge input.
///
/// Normal lengths are not checked; inputs may still be mid-synthesis.
fn check_input(mesh: &Mesh) -> MeshResult<()> {
    let n = mesh.positions.len();
    if mesh.normals.len() != n {
        return Err(MeshError::NormalCountMismatch {
            positions: n,
            normals: mesh.normals.len(),
        });
    }
    if !mesh.uvs.is_empty() && mesh.uvs.len() != n {
        return Err(MeshError::UvCountMismatch {
            positions: n,
            uvs: mesh.uvs.len(),
        });
    }
    if let Some((slot, &index)) = mesh
        .indices
        .iter()
        .flatten()
        .enumerate()
        .find(|&(_, &i)| i as usize >= n)
    {
        return Err(MeshError::IndexOutOfRange {
            index,
            slot,
            vertex_count: n,
        });
    }
    Ok(())
}

/// Concatenate meshes, offsetting each input's indices by the running
/// vertex count.
///
/// Normals are copied, never recomputed. If any input is indexed the output
/// is indexed and non-indexed inputs receive sequential indices. UVs are kept
/// when any input has them; inputs without UVs contribute `[0, 0]`.
///
/// # Errors
///
/// Returns [`MeshError::NormalCountMismatch`],
/// [`MeshError::UvCountMismatch`] or [`MeshError::IndexOutOfRange`] for a
/// malformed input, and [`MeshError::IndexOverflow`] if the result needs
/// more than `u32::MAX` vertices.
pub fn try_merge(meshes: &[Mesh]) -> MeshResult<Mesh> {
    let mut total_vertices = 0usize;
    let mut total_indices = 0usize;
    let mut any_indexed = false;
    let mut any_uvs = false;

    for mesh in meshes {
        check_input(mesh)?;
        let n = mesh.positions.len();

        total_vertices += n;
        total_indices += mesh.indices.as_ref().map_or(n, Vec::len);
        any_indexed |= mesh.indices.is_some();
        any_uvs |= !mesh.uvs.is_empty();
    }

    if u32::try_from(total_vertices).is_err() {
        return Err(MeshError::IndexOverflow {
            vertex_count: total_vertices,
        });
    }

    let mut merged = Mesh {
        positions: Vec::with_capacity(total_vertices),
        normals: Vec::with_capacity(total_vertices),
        uvs: Vec::with_capacity(if any_uvs { total_vertices } else { 0 }),
        indices: any_indexed.then(|| Vec::with_capacity(total_indices)),
    };

    for mesh in meshes {
        let offset = merged.positions.len() as u32;

        merged.positions.extend_from_slice(&mesh.positions);
        merged.normals.extend_from_slice(&mesh.normals);
        if any_uvs {
            if mesh.uvs.is_empty() {
                merged.uvs.resize(merged.positions.len(), [0.0, 0.0]);
            } else {
                merged.uvs.extend_from_slice(&mesh.uvs);
            }
        }

        if let Some(indices) = merged.indices.as_mut() {
            match &mesh.indices {
                Some(src) => indices.extend(src.iter().map(|&i| i + offset)),
                None => indices.extend((0..mesh.positions.len() as u32).map(|i| i + offset)),
            }
        }
    }

    debug!(
        inputs = meshes.len(),
        vertices = merged.vertex_count(),
        triangles = merged.triangle_count(),
        "Merged meshes"
    );

    Ok(merged)
}

/// Concatenate meshes, skipping malformed inputs.
///
/// An empty input yields an empty mesh. Inputs whose normals or UVs do not
/// pair up with their positions, or whose indices point past their own
/// vertices, are dropped with a warning.
#[must_use]
pub fn merge(meshes: &[Mesh]) -> Mesh {
    match try_merge(meshes) {
        Ok(merged) => merged,
        Err(err) => {
            warn!(%err, "Merge input rejected; dropping malformed meshes");
            let usable: Vec<Mesh> = meshes
                .iter()
                .filter(|m| check_input(m).is_ok())
                .cloned()
                .collect();
            try_merge(&usable).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{cylinder, uv_sphere};
    use proptest::prelude::*;

    #[test]
    fn test_merge_empty() {
        let merged = merge(&[]);
        assert_eq!(merged.vertex_count(), 0);
        assert_eq!(merged.triangle_count(), 0);
        assert!(merged.index_buffer().is_empty());
    }

    #[test]
    fn test_merge_offsets_second_mesh() {
        let a = uv_sphere(1.0, 8, 4);
        let b = cylinder(0.5, 0.5, 1.0, 6);
        let merged = merge(&[a.clone(), b.clone()]);

        assert_eq!(merged.vertex_count(), a.vertex_count() + b.vertex_count());
        let indices = merged.indices.as_ref().unwrap();
        let a_len = a.indices.as_ref().unwrap().len();
        for (got, want) in indices[a_len..].iter().zip(b.indices.as_ref().unwrap()) {
            assert_eq!(*got, want + a.vertex_count() as u32);
        }
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn test_merge_mixes_indexed_and_sequential() {
        let indexed = cylinder(0.5, 0.5, 1.0, 4);
        let mut soup = Mesh::empty();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            soup.positions.push(p);
            soup.normals.push([0.0, 0.0, 1.0]);
        }

        let merged = merge(&[indexed.clone(), soup]);
        let tail: Vec<u32> = merged.indices.unwrap().into_iter().rev().take(3).collect();
        let base = indexed.vertex_count() as u32;
        assert_eq!(tail, vec![base + 2, base + 1, base]);
        assert_eq!(merged.uvs.len(), merged.positions.len());
    }

    #[test]
    fn test_try_merge_rejects_missing_normals() {
        let good = uv_sphere(1.0, 8, 4);
        let mut bad = uv_sphere(1.0, 8, 4);
        bad.normals.truncate(3);

        assert!(matches!(
            try_merge(&[good.clone(), bad.clone()]),
            Err(MeshError::NormalCountMismatch { .. })
        ));
        assert_eq!(merge(&[good.clone(), bad]).vertex_count(), good.vertex_count());
    }

    #[test]
    fn test_try_merge_rejects_foreign_indices() {
        let good = cylinder(0.5, 0.5, 1.0, 4);
        let bad = Mesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            uvs: Vec::new(),
            indices: Some(vec![0, 1, 5]),
        };

        assert!(matches!(
            try_merge(&[bad.clone(), good.clone()]),
            Err(MeshError::IndexOutOfRange { index: 5, slot: 2, vertex_count: 3 })
        ));

        let merged = merge(&[bad, good.clone()]);
        assert_eq!(merged.vertex_count(), good.vertex_count());
        assert_eq!(merged.indices, good.indices);
    }

    proptest! {
        #[test]
        fn prop_merge_preserves_counts_and_offsets(
            segments in prop::collection::vec((3u32..12, 2u32..8), 0..5)
        ) {
            let meshes: Vec<Mesh> = segments.iter().map(|&(w, h)| uv_sphere(0.5, w, h)).collect();
            let merged = merge(&meshes);

            let total: usize = meshes.iter().map(Mesh::vertex_count).sum();
            prop_assert_eq!(merged.vertex_count(), total);

            let mut offset = 0u32;
            let mut cursor = 0usize;
            let indices = merged.index_buffer();
            for mesh in &meshes {
                for &i in mesh.indices.as_ref().unwrap() {
                    prop_assert_eq!(indices[cursor], i + offset);
                    cursor += 1;
                }
                offset += mesh.vertex_count() as u32;
            }
            prop_assert!(merged.validate().is_ok());
        }
    }
}
