//! Closed-form base surfaces.
//!
//! Every organ starts from one of these: a UV sphere, a lathe revolve of a
//! radius profile, or a tube swept along a [`Curve`]. Cylinders and capsules
//! build the skeleton and body shell. Vertex layout, winding and UVs follow
//! the conventional grid ordering (rings by columns, `u` around, `v` along).

use std::f32::consts::{PI, TAU};

use nalgebra::{Rotation3, Unit, Vector3};
use visceral_core::{Curve, LatheProfile, Vec3};

use crate::mesh::Mesh;

/// UV sphere centered at the origin with analytic normals.
///
/// `width_segments` divides the longitude, `height_segments` the latitude.
/// The poles are fans of degenerate quads; one duplicate vertex per pole row
/// is left unreferenced, which normal recomputation tolerates.
#[must_use]
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row = width_segments + 1;

    let mut mesh = Mesh::with_capacity(
        (row * (height_segments + 1)) as usize,
        (width_segments * height_segments * 6) as usize,
    );

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        // nudge pole uvs to the middle of their fan
        let u_offset = if iy == 0 {
            0.5 / width_segments as f32
        } else if iy == height_segments {
            -0.5 / width_segments as f32
        } else {
            0.0
        };
        let (sin_theta, cos_theta) = (v * PI).sin_cos();

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();

            let position = [
                -radius * cos_phi * sin_theta,
                radius * cos_theta,
                radius * sin_phi * sin_theta,
            ];
            let normal = Vec3::from_array(position).normalized();
            let normal = if normal.length_squared() > 0.0 {
                normal
            } else {
                Vec3::Y
            };
            mesh.push_vertex(position, normal.to_array(), [u + u_offset, 1.0 - v]);
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                mesh.push_triangle(a, b, d);
            }
            if iy != height_segments - 1 {
                mesh.push_triangle(b, c, d);
            }
        }
    }

    mesh
}

/// Revolve `profile` around the Y axis in `segments` steps.
///
/// Samples map to `(radius * sin(phi), height, radius * cos(phi))`. Normals
/// are recomputed from the faces.
#[must_use]
pub fn lathe(profile: &LatheProfile, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let samples = profile.samples();
    let count = samples.len() as u32;

    let mut mesh = Mesh::with_capacity(
        ((segments + 1) * count) as usize,
        (segments * (count - 1) * 6) as usize,
    );

    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let (sin, cos) = (u * TAU).sin_cos();

        for (j, s) in samples.iter().enumerate() {
            let v = j as f32 / (count - 1) as f32;
            mesh.push_vertex(
                [s.radius * sin, s.height, s.radius * cos],
                [sin, 0.0, cos],
                [u, v],
            );
        }
    }

    for i in 0..segments {
        for j in 0..count - 1 {
            let a = j + i * count;
            let b = a + count;
            let c = a + count + 1;
            let d = a + 1;

            mesh.push_triangle(a, b, d);
            mesh.push_triangle(c, d, b);
        }
    }

    mesh.recompute_normals();
    mesh
}

/// Rotation-minimizing frame along a curve.
struct Frames {
    tangents: Vec<Vec3>,
    normals: Vec<Vec3>,
    binormals: Vec<Vec3>,
}

fn frenet_frames(curve: &Curve, segments: u32) -> Frames {
    let count = segments as usize + 1;
    let tangents: Vec<Vec3> = (0..count)
        .map(|i| curve.tangent_at(i as f32 / segments as f32))
        .collect();

    let mut normals = Vec::with_capacity(count);
    let mut binormals = Vec::with_capacity(count);

    // seed normal: the axis least aligned with the first tangent
    let t0 = tangents[0];
    let (tx, ty, tz) = (t0.x.abs(), t0.y.abs(), t0.z.abs());
    let mut min = f32::MAX;
    let mut seed = Vec3::X;
    if tx <= min {
        min = tx;
        seed = Vec3::X;
    }
    if ty <= min {
        min = ty;
        seed = Vec3::Y;
    }
    if tz <= min {
        seed = Vec3::Z;
    }

    let side = t0.cross(&seed).normalized();
    let n0 = t0.cross(&side);
    normals.push(n0);
    binormals.push(t0.cross(&n0));

    for i in 1..count {
        let mut normal = normals[i - 1];
        let axis = tangents[i - 1].cross(&tangents[i]);

        if axis.length() > f32::EPSILON {
            let theta = tangents[i - 1].dot(&tangents[i]).clamp(-1.0, 1.0).acos();
            let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(axis.to_vector3()), theta);
            let rotated: Vector3<f32> = rotation * normal.to_vector3();
            normal = Vec3::from_vector3(&rotated);
        }

        normals.push(normal);
        binormals.push(tangents[i].cross(&normal));
    }

    Frames {
        tangents,
        normals,
        binormals,
    }
}

/// Open tube of `radius` swept along `curve`.
///
/// Rings are placed at `tubular_segments + 1` arc-length-even stations, each
/// with `radial_segments + 1` vertices (the seam is duplicated for UVs).
/// Normals are the analytic ring directions.
#[must_use]
pub fn tube(curve: &Curve, tubular_segments: u32, radius: f32, radial_segments: u32) -> Mesh {
    let tubular_segments = tubular_segments.max(1);
    let radial_segments = radial_segments.max(3);
    let ring = radial_segments + 1;
    let frames = frenet_frames(curve, tubular_segments);

    let mut mesh = Mesh::with_capacity(
        (ring * (tubular_segments + 1)) as usize,
        (tubular_segments * radial_segments * 6) as usize,
    );

    for i in 0..=tubular_segments {
        let u = i as f32 / tubular_segments as f32;
        let center = curve.point_at(u);
        let n = frames.normals[i as usize];
        let b = frames.binormals[i as usize];

        for j in 0..=radial_segments {
            let v = j as f32 / radial_segments as f32;
            let (sin, cos) = (v * TAU).sin_cos();

            let dir = (n * -cos + b * sin).normalized();
            let dir = if dir.length_squared() > 0.0 {
                dir
            } else {
                frames.tangents[i as usize].cross(&Vec3::Y).normalized()
            };
            let position = center + dir * radius;
            mesh.push_vertex(position.to_array(), dir.to_array(), [u, v]);
        }
    }

    for j in 1..=tubular_segments {
        for i in 1..=radial_segments {
            let a = ring * (j - 1) + (i - 1);
            let b = ring * j + (i - 1);
            let c = ring * j + i;
            let d = ring * (j - 1) + i;

            mesh.push_triangle(a, b, d);
            mesh.push_triangle(b, c, d);
        }
    }

    mesh
}

/// Capped cylinder along Y, centered at the origin.
///
/// Side normals tilt with the radius slope; caps face straight up and down.
#[must_use]
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Mesh {
    let radial_segments = radial_segments.max(3);
    let half_height = height / 2.0;
    let slope = if height != 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };
    let row = radial_segments + 1;

    let mut mesh = Mesh::with_capacity(
        (row * 2 + (radial_segments + row) * 2) as usize,
        (radial_segments * 12) as usize,
    );

    // side wall: top row then bottom row
    for (y, radius) in [(half_height, radius_top), (-half_height, radius_bottom)] {
        let v = if y > 0.0 { 0.0 } else { 1.0 };
        for x in 0..=radial_segments {
            let u = x as f32 / radial_segments as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalized();
            mesh.push_vertex([radius * sin, y, radius * cos], normal.to_array(), [u, 1.0 - v]);
        }
    }

    for x in 0..radial_segments {
        let a = x;
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        mesh.push_triangle(a, b, d);
        mesh.push_triangle(b, c, d);
    }

    for (top, radius) in [(true, radius_top), (false, radius_bottom)] {
        let sign = if top { 1.0 } else { -1.0 };
        let y = half_height * sign;

        let center_start = mesh.vertex_count() as u32;
        for _ in 0..radial_segments {
            mesh.push_vertex([0.0, y, 0.0], [0.0, sign, 0.0], [0.5, 0.5]);
        }

        let rim_start = mesh.vertex_count() as u32;
        for x in 0..=radial_segments {
            let u = x as f32 / radial_segments as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            mesh.push_vertex(
                [radius * sin, y, radius * cos],
                [0.0, sign, 0.0],
                [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
            );
        }

        for x in 0..radial_segments {
            let c = center_start + x;
            let i = rim_start + x;
            if top {
                mesh.push_triangle(i, i + 1, c);
            } else {
                mesh.push_triangle(i + 1, i, c);
            }
        }
    }

    mesh
}

/// Capsule along Y: a cylinder of `length` with hemispherical ends.
///
/// Built as a lathe of the silhouette, with `cap_segments * 2` steps per
/// hemisphere. Total height is `length + 2 * radius`.
#[must_use]
pub fn capsule(radius: f32, length: f32, cap_segments: u32, radial_segments: u32) -> Mesh {
    let steps = cap_segments.max(1) * 2;
    let half = length / 2.0;

    let bottom = (0..=steps).map(|k| {
        let a = -PI / 2.0 + (k as f32 / steps as f32) * (PI / 2.0);
        (radius * a.cos(), -half + radius * a.sin())
    });
    let top = (0..=steps).map(|k| {
        let a = (k as f32 / steps as f32) * (PI / 2.0);
        (radius * a.cos(), half + radius * a.sin())
    });

    match LatheProfile::from_samples(bottom.chain(top)) {
        Ok(profile) => lathe(&profile, radial_segments),
        Err(err) => {
            tracing::warn!(%err, radius, length, "Capsule profile rejected; using empty mesh");
            Mesh::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use visceral_core::MIN_RADIUS;

    #[test]
    fn test_sphere_counts_and_radius() {
        let mesh = uv_sphere(0.5, 16, 8);
        assert_eq!(mesh.vertex_count(), 17 * 9);
        // two pole rows contribute one triangle per quad
        assert_eq!(mesh.triangle_count(), 16 * 8 * 2 - 2 * 16);
        for p in &mesh.positions {
            assert_relative_eq!(Vec3::from_array(*p).length(), 0.5, epsilon = 1e-5);
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_sphere_normals_point_outward() {
        let mut mesh = uv_sphere(1.0, 24, 12);
        mesh.recompute_normals();
        for i in 0..mesh.vertex_count() {
            let p = mesh.position(i);
            if p.length_squared() > 0.0 && p.y.abs() < 0.99 {
                assert!(mesh.normal(i).dot(&p) > 0.0, "vertex {i} faces inward");
            }
        }
    }

    #[test]
    fn test_lathe_respects_floor() {
        let profile = LatheProfile::from_samples([(0.0, -1.0), (0.5, 0.0), (0.0, 1.0)]).unwrap();
        let mesh = lathe(&profile, 12);
        assert_eq!(mesh.vertex_count(), 13 * 3);
        assert_eq!(mesh.triangle_count(), 12 * 2 * 2);

        let bottom = Vec3::from_array(mesh.positions[0]);
        assert_relative_eq!(Vec3::new(bottom.x, 0.0, bottom.z).length(), MIN_RADIUS, epsilon = 1e-6);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_tube_rings_sit_at_radius() {
        let curve = Curve::from_arrays(&[[0.0, 0.0, 0.0], [0.0, 0.5, 0.1], [0.2, 1.0, 0.0]]).unwrap();
        let mesh = tube(&curve, 10, 0.05, 6);
        assert_eq!(mesh.vertex_count(), 11 * 7);
        assert_eq!(mesh.triangle_count(), 10 * 6 * 2);
        assert!(mesh.validate().is_ok());

        let center = curve.point_at(0.5);
        for j in 0..7 {
            let p = mesh.position(5 * 7 + j);
            assert_relative_eq!((p - center).length(), 0.05, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_cylinder_layout() {
        let mesh = cylinder(0.025, 0.025, 0.04, 8);
        assert_eq!(mesh.vertex_count(), 9 * 2 + (8 + 9) * 2);
        assert_eq!(mesh.triangle_count(), 8 * 2 + 8 * 2);
        assert!(mesh.validate().is_ok());

        let bounds = mesh.bounds().unwrap();
        assert_relative_eq!(bounds.size().y, 0.04, epsilon = 1e-6);
    }

    #[test]
    fn test_capsule_height() {
        let mesh = capsule(0.07, 0.55, 8, 16);
        let bounds = mesh.bounds().unwrap();
        assert_relative_eq!(bounds.size().y, 0.55 + 0.14, epsilon = 1e-5);
        assert!(mesh.validate().is_ok());
    }
}
