//! Centerline splines and lathe profiles.
//!
//! [`Curve`] is a centripetal Catmull-Rom spline through its control points,
//! reparameterized by arc length so tube rings are spaced evenly.
//! [`LatheProfile`] is a radius-versus-height polyline revolved around the
//! vertical axis; radii are floored to [`MIN_RADIUS`](crate::MIN_RADIUS).

use serde::{Deserialize, Serialize};

use crate::error::CurveError;
use crate::types::Vec3;
use crate::MIN_RADIUS;

/// Samples used to build the arc-length table.
const ARC_LENGTH_DIVISIONS: usize = 200;

/// Parameter step for finite-difference tangents.
const TANGENT_DELTA: f32 = 1e-4;

/// Smooth 3D spline through a fixed list of control points.
#[derive(Clone, Debug)]
pub struct Curve {
    points: Vec<Vec3>,
    /// Cumulative chord length at `i / ARC_LENGTH_DIVISIONS`.
    arc_lengths: Vec<f32>,
}

impl Curve {
    /// Build a curve through `points`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::TooFewPoints`] for fewer than two points and
    /// [`CurveError::NonFinitePoint`] if any coordinate is NaN or infinite.
    pub fn new(points: Vec<Vec3>) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints {
                got: points.len(),
                need: 2,
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(CurveError::NonFinitePoint { index });
        }

        let mut curve = Self {
            points,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.compute_arc_lengths();
        Ok(curve)
    }

    /// Build from `[x, y, z]` arrays; used by the fixed anatomical centerlines.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Curve::new`].
    pub fn from_arrays(points: &[[f32; 3]]) -> Result<Self, CurveError> {
        Self::new(points.iter().copied().map(Vec3::from_array).collect())
    }

    /// Control points.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Approximate total length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at spline parameter `t` in `[0, 1]` (uniform per segment).
    #[must_use]
    pub fn point(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let points = &self.points;
        let l = points.len();

        let p = (l - 1) as f32 * t;
        let mut int_point = p.floor() as usize;
        let mut weight = p - int_point as f32;

        if int_point >= l - 1 {
            int_point = l - 2;
            weight = 1.0;
        }

        let p0 = if int_point > 0 {
            points[int_point - 1]
        } else {
            points[0] * 2.0 - points[1]
        };
        let p1 = points[int_point];
        let p2 = points[int_point + 1];
        let p3 = if int_point + 2 < l {
            points[int_point + 2]
        } else {
            points[l - 1] * 2.0 - points[l - 2]
        };

        // Centripetal parameterization: knot spacing is chord length^0.5.
        let mut dt0 = p0.distance_squared(&p1).powf(0.25);
        let mut dt1 = p1.distance_squared(&p2).powf(0.25);
        let mut dt2 = p2.distance_squared(&p3).powf(0.25);

        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        Vec3::new(
            nonuniform_catmull_rom(p0.x, p1.x, p2.x, p3.x, dt0, dt1, dt2, weight),
            nonuniform_catmull_rom(p0.y, p1.y, p2.y, p3.y, dt0, dt1, dt2, weight),
            nonuniform_catmull_rom(p0.z, p1.z, p2.z, p3.z, dt0, dt1, dt2, weight),
        )
    }

    /// Point at arc-length fraction `u` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, u: f32) -> Vec3 {
        self.point(self.arc_to_parameter(u))
    }

    /// Unit tangent at arc-length fraction `u`.
    #[must_use]
    pub fn tangent_at(&self, u: f32) -> Vec3 {
        let t = self.arc_to_parameter(u);
        let t1 = (t - TANGENT_DELTA).max(0.0);
        let t2 = (t + TANGENT_DELTA).min(1.0);
        let tangent = (self.point(t2) - self.point(t1)).normalized();
        if tangent.length_squared() > 0.0 {
            tangent
        } else {
            (self.points[self.points.len() - 1] - self.points[0]).normalized()
        }
    }

    /// Map an arc-length fraction to the spline parameter.
    fn arc_to_parameter(&self, u: f32) -> f32 {
        let lengths = &self.arc_lengths;
        let total = self.length();
        if total <= 0.0 {
            return u.clamp(0.0, 1.0);
        }

        let target = u.clamp(0.0, 1.0) * total;
        // first index whose cumulative length is >= target
        let hi = lengths.partition_point(|&len| len < target);
        if hi == 0 {
            return 0.0;
        }
        if hi >= lengths.len() {
            return 1.0;
        }

        let lo = hi - 1;
        let segment = lengths[hi] - lengths[lo];
        let fraction = if segment > 0.0 {
            (target - lengths[lo]) / segment
        } else {
            0.0
        };

        (lo as f32 + fraction) / ARC_LENGTH_DIVISIONS as f32
    }

    fn compute_arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(0.0);

        for i in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            sum += (current - last).length();
            lengths.push(sum);
            last = current;
        }

        lengths
    }
}

#[allow(clippy::too_many_arguments)]
fn nonuniform_catmull_rom(
    x0: f32,
    x1: f32,
    x2: f32,
    x3: f32,
    dt0: f32,
    dt1: f32,
    dt2: f32,
    t: f32,
) -> f32 {
    let mut t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
    let mut t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;

    // rescale tangents for parameter range [0, 1]
    t1 *= dt1;
    t2 *= dt1;

    let c0 = x1;
    let c1 = t1;
    let c2 = -3.0 * x1 + 3.0 * x2 - 2.0 * t1 - t2;
    let c3 = 2.0 * x1 - 2.0 * x2 + t1 + t2;

    let t_sq = t * t;
    c0 + c1 * t + c2 * t_sq + c3 * t_sq * t
}

/// One revolve sample: distance from the axis and height along it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatheSample {
    /// Distance from the vertical axis (always >= `MIN_RADIUS`)
    pub radius: f32,
    /// Height along the vertical axis
    pub height: f32,
}

/// Radius-versus-height samples revolved around the Y axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatheProfile {
    samples: Vec<LatheSample>,
}

impl LatheProfile {
    /// Build from `(radius, height)` pairs, flooring every radius.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::TooFewPoints`] for fewer than two samples and
    /// [`CurveError::NonFinitePoint`] for NaN or infinite values.
    pub fn from_samples<I>(samples: I) -> Result<Self, CurveError>
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        let mut out = Vec::new();
        for (index, (radius, height)) in samples.into_iter().enumerate() {
            if !radius.is_finite() || !height.is_finite() {
                return Err(CurveError::NonFinitePoint { index });
            }
            out.push(LatheSample {
                radius: radius.max(MIN_RADIUS),
                height,
            });
        }

        if out.len() < 2 {
            return Err(CurveError::TooFewPoints {
                got: out.len(),
                need: 2,
            });
        }

        Ok(Self { samples: out })
    }

    /// Sample `segments + 1` points of a closed-form profile at `t = i / segments`.
    ///
    /// `f` returns `(radius, height)`; radii are floored like
    /// [`from_samples`](Self::from_samples).
    ///
    /// # Errors
    ///
    /// Fails if `segments` is zero or `f` yields a non-finite value.
    pub fn from_fn<F>(segments: u32, f: F) -> Result<Self, CurveError>
    where
        F: Fn(f32) -> (f32, f32),
    {
        Self::from_samples((0..=segments).map(|i| f(i as f32 / segments.max(1) as f32)))
    }

    /// The floored samples, bottom to top in authoring order.
    #[must_use]
    pub fn samples(&self) -> &[LatheSample] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a profile holds at least two samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Smallest radius in the profile.
    #[must_use]
    pub fn min_radius(&self) -> f32 {
        self.samples
            .iter()
            .map(|s| s.radius)
            .fold(f32::INFINITY, f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight() -> Curve {
        Curve::from_arrays(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 2.0, 0.0]]).unwrap()
    }

    #[test]
    fn test_curve_interpolates_endpoints() {
        let curve = Curve::from_arrays(&[
            [0.0, 0.35, 0.0],
            [0.0, 0.2, 0.0],
            [0.0, 0.05, 0.0],
            [0.0, -0.15, 0.01],
        ])
        .unwrap();

        let start = curve.point_at(0.0);
        let end = curve.point_at(1.0);
        assert_relative_eq!(start.y, 0.35, epsilon = 1e-5);
        assert_relative_eq!(end.y, -0.15, epsilon = 1e-5);
        assert_relative_eq!(end.z, 0.01, epsilon = 1e-5);
    }

    #[test]
    fn test_straight_curve_length_and_tangent() {
        let curve = straight();
        assert_relative_eq!(curve.length(), 2.0, epsilon = 1e-3);

        let t = curve.tangent_at(0.5);
        assert_relative_eq!(t.y, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_arc_length_parameterization_is_even() {
        let curve = Curve::from_arrays(&[[0.0, 0.0, 0.0], [0.1, 0.0, 0.0], [2.0, 0.0, 0.0]]).unwrap();
        let quarter = curve.point_at(0.25);
        let half = curve.point_at(0.5);
        // even spacing along a straight line
        assert_relative_eq!(half.x - quarter.x, quarter.x, epsilon = 2e-2);
    }

    #[test]
    fn test_curve_rejects_bad_input() {
        assert!(matches!(
            Curve::from_arrays(&[[0.0, 0.0, 0.0]]),
            Err(CurveError::TooFewPoints { got: 1, need: 2 })
        ));
        assert!(matches!(
            Curve::from_arrays(&[[0.0, 0.0, 0.0], [f32::NAN, 0.0, 0.0]]),
            Err(CurveError::NonFinitePoint { index: 1 })
        ));
    }

    #[test]
    fn test_lathe_profile_floors_radius() {
        let profile = LatheProfile::from_samples([(-0.2, 0.0), (0.0, 0.1), (0.3, 0.2)]).unwrap();
        assert!(profile.samples().iter().all(|s| s.radius >= MIN_RADIUS));
        assert_relative_eq!(profile.min_radius(), MIN_RADIUS);
        assert_relative_eq!(profile.samples()[2].radius, 0.3);
    }

    #[test]
    fn test_lathe_profile_from_fn_sample_count() {
        let profile = LatheProfile::from_fn(24, |t| (t, t * 2.0)).unwrap();
        assert_eq!(profile.len(), 25);
        assert_relative_eq!(profile.samples()[24].height, 2.0);
    }
}
