//! Vertex normal recomputation.

use visceral_core::Vec3;

use crate::mesh::Mesh;

/// Accumulated normals shorter than this keep their previous direction.
const DEGENERATE_LENGTH_SQ: f32 = 1e-20;

impl Mesh {
    /// Replace every normal with the normalized sum of adjacent face normals.
    ///
    /// Face normals are unnormalized cross products, so larger triangles
    /// weigh more. Vertices no triangle touches (or whose faces cancel out)
    /// keep their existing normal if it is usable, else fall back to the
    /// direction from the origin, else `+Y`. Every output normal is unit
    /// length.
    pub fn recompute_normals(&mut self) {
        let mut accumulated = vec![Vec3::zero(); self.positions.len()];

        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let pa = Vec3::from_array(self.positions[a]);
            let pb = Vec3::from_array(self.positions[b]);
            let pc = Vec3::from_array(self.positions[c]);

            let face = (pc - pb).cross(&(pa - pb));
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        self.normals.resize(self.positions.len(), [0.0, 0.0, 0.0]);

        for (i, sum) in accumulated.into_iter().enumerate() {
            let normal = if sum.length_squared() > DEGENERATE_LENGTH_SQ {
                sum.normalized()
            } else {
                fallback_normal(Vec3::from_array(self.normals[i]), self.position(i))
            };
            self.normals[i] = normal.to_array();
        }
    }
}

fn fallback_normal(previous: Vec3, position: Vec3) -> Vec3 {
    [previous, position]
        .into_iter()
        .map(|v| v.normalized())
        .find(|v| v.length_squared() > 0.5)
        .unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_quad_points_up() {
        let mut mesh = Mesh::with_capacity(4, 6);
        for p in [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0]] {
            mesh.push_vertex(p, [1.0, 0.0, 0.0], [0.0, 0.0]);
        }
        mesh.push_triangle(0, 1, 2);
        mesh.push_triangle(0, 2, 3);
        mesh.recompute_normals();

        for n in &mesh.normals {
            assert_relative_eq!(n[1], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_area_weighting() {
        // Two triangles sharing vertex 0: a large one facing +Y, a small one facing +Z.
        let mut mesh = Mesh::with_capacity(5, 6);
        mesh.push_vertex([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]);
        mesh.push_vertex([0.0, 0.0, 4.0], [0.0, 1.0, 0.0], [0.0, 0.0]);
        mesh.push_vertex([4.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]);
        mesh.push_vertex([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]);
        mesh.push_vertex([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]);
        mesh.push_triangle(0, 1, 2);
        mesh.push_triangle(0, 3, 4);
        mesh.recompute_normals();

        let n = mesh.normal(0);
        assert!(n.y > n.z && n.z > 0.0);
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unreferenced_vertex_keeps_unit_normal() {
        let mut mesh = Mesh::with_capacity(4, 3);
        mesh.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
        mesh.push_vertex([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
        mesh.push_vertex([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]);
        mesh.push_vertex([0.0, 0.0, 5.0], [0.0, 0.0, 0.0], [0.0, 0.0]);
        mesh.push_triangle(0, 1, 2);
        mesh.recompute_normals();

        assert_eq!(mesh.normals[3], [0.0, 0.0, 1.0]);
        assert!(mesh.validate().is_ok());
    }
}
