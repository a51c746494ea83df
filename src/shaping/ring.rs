//! Cross-section rings: angularly sampled offset points with normals.
//!
//! A ring with `n` samples spans a full turn in `n - 1` even steps, so the
//! last sample closes the loop on top of the first one.

use std::f32::consts::TAU;

use crate::core::types::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::math::{Lerp, normalize_angle};

/// Angles closer to zero than this return the first sample directly.
const ANGLE_EPSILON: f32 = 1e-6;

/// One cross-section in the branch's local frame (z ≈ 0 plane).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RingData", into = "RingData")]
pub struct Ring {
    radial_positions: Vec<f32>,
    points: Vec<Vec3>,
    normals: Vec<Vec3>,
}

/// Unvalidated serialized form of a [`Ring`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RingData {
    radial_positions: Vec<f32>,
    points: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl Ring {
    /// Create a ring, checking that all three sequences match and hold at
    /// least two samples.
    pub fn new(radial_positions: Vec<f32>, points: Vec<Vec3>, normals: Vec<Vec3>) -> Result<Self> {
        if radial_positions.len() != points.len() || points.len() != normals.len() {
            return Err(Error::RingLengthMismatch {
                angles: radial_positions.len(),
                points: points.len(),
                normals: normals.len(),
            });
        }
        match points.len() {
            0 => return Err(Error::EmptyRing),
            1 => return Err(Error::TooFewSamples(1)),
            _ => {}
        }
        Ok(Self { radial_positions, points, normals })
    }

    /// Elliptical ring with `samples` evenly spaced samples (at least 2).
    pub fn ellipse(samples: usize, radius_x: f32, radius_y: f32) -> Self {
        let angles = even_angles(samples.max(2));
        let points = angles.iter().map(|&a| ellipse_point(a, radius_x, radius_y)).collect();
        let normals = angles.iter().map(|&a| ellipse_normal(a, radius_x, radius_y)).collect();
        Self {
            radial_positions: angles,
            points,
            normals,
        }
    }

    /// Ring through counter-clockwise points, last point closing onto the first.
    ///
    /// Normals point outward in the ring plane, taken perpendicular to the
    /// chord between each sample's neighbours.
    pub fn from_points(points: Vec<Vec3>) -> Result<Self> {
        match points.len() {
            0 => return Err(Error::EmptyRing),
            1 => return Err(Error::TooFewSamples(1)),
            _ => {}
        }
        let count = points.len();
        let angles = even_angles(count);

        let normals = if count < 3 {
            points.iter().map(|p| p.normalize_or_zero()).collect()
        } else {
            // Distinct samples; the closing sample mirrors the first
            let sides = count - 1;
            (0..count)
                .map(|i| {
                    let i = i % sides;
                    let prev = points[(i + sides - 1) % sides];
                    let next = points[(i + 1) % sides];
                    let chord = next - prev;
                    let outward = Vec3::new(chord.y, -chord.x, 0.0);
                    outward.try_normalize().unwrap_or_else(|| points[i].normalize_or_zero())
                })
                .collect()
        };

        Self::new(angles, points, normals)
    }

    pub fn radial_positions(&self) -> &[f32] {
        &self.radial_positions
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn sample_count(&self) -> usize {
        self.points.len()
    }

    /// Polygon sides described by this ring
    pub fn side_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn point_at_angle(&self, angle: f32) -> Vec3 {
        value_at_angle(&self.points, angle)
    }

    pub fn normal_at_angle(&self, angle: f32) -> Vec3 {
        value_at_angle(&self.normals, angle)
    }

    /// Ring with the same outline sampled at `samples` even angles.
    pub fn resample(&self, samples: usize) -> Ring {
        let angles = even_angles(samples.max(2));
        let points = angles.iter().map(|&a| self.point_at_angle(a)).collect();
        let normals = angles.iter().map(|&a| self.normal_at_angle(a)).collect();
        Ring {
            radial_positions: angles,
            points,
            normals,
        }
    }

    /// Sample-wise linear blend towards `other`.
    ///
    /// Both rings are expected to share one even angular scheme. If the
    /// sample counts differ, `other` is resampled to this ring's count first.
    pub fn interpolate(&self, other: &Ring, t: f32) -> Ring {
        if other.sample_count() != self.sample_count() {
            log::warn!(
                "Interpolating rings with {} and {} samples, resampling",
                self.sample_count(),
                other.sample_count()
            );
            return self.interpolate(&other.resample(self.sample_count()), t);
        }

        let points = self
            .points
            .iter()
            .zip(&other.points)
            .map(|(a, b)| Lerp::lerp(a, b, t))
            .collect();
        let normals = self
            .normals
            .iter()
            .zip(&other.normals)
            .map(|(a, b)| Lerp::lerp(a, b, t))
            .collect();

        Ring {
            radial_positions: self.radial_positions.clone(),
            points,
            normals,
        }
    }
}

impl TryFrom<RingData> for Ring {
    type Error = Error;

    fn try_from(data: RingData) -> Result<Self> {
        Ring::new(data.radial_positions, data.points, data.normals)
    }
}

impl From<Ring> for RingData {
    fn from(ring: Ring) -> Self {
        RingData {
            radial_positions: ring.radial_positions,
            points: ring.points,
            normals: ring.normals,
        }
    }
}

/// `count` angles stepping a full turn in `count - 1` steps
fn even_angles(count: usize) -> Vec<f32> {
    if count < 2 {
        return vec![0.0; count];
    }
    let step = TAU / (count - 1) as f32;
    (0..count).map(|i| i as f32 * step).collect()
}

/// Sample an evenly subdivided closed ring at `angle`.
///
/// `samples` must not be empty.
pub fn value_at_angle<T: Lerp>(samples: &[T], angle: f32) -> T {
    let count = samples.len();
    if count == 1 {
        return samples[0].clone();
    }

    let angle = normalize_angle(angle);
    if angle < ANGLE_EPSILON {
        return samples[0].clone();
    }

    let step = TAU / (count - 1) as f32;
    let scaled = angle / step;
    let index = (scaled.floor() as usize).min(count - 2);
    let t = (scaled - index as f32).clamp(0.0, 1.0);

    samples[index].lerp(&samples[index + 1], t)
}

/// Point on an axis-aligned ellipse in the local cross-section plane
pub fn ellipse_point(angle: f32, radius_x: f32, radius_y: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius_x, angle.sin() * radius_y, 0.0)
}

/// Outward unit normal of an axis-aligned ellipse at `angle`
pub fn ellipse_normal(angle: f32, radius_x: f32, radius_y: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    if radius_x.abs() < f32::EPSILON || radius_y.abs() < f32::EPSILON {
        return Vec3::new(cos, sin, 0.0);
    }
    let gradient = Vec2::new(cos / radius_x, sin / radius_y).normalize_or(Vec2::new(cos, sin));
    gradient.extend(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx_eq_vec3(a: Vec3, b: Vec3, eps: f32) -> bool {
        a.abs_diff_eq(b, eps)
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let result = Ring::new(vec![0.0, 1.0], vec![Vec3::X], vec![Vec3::X]);
        assert!(matches!(
            result,
            Err(Error::RingLengthMismatch { angles: 2, points: 1, normals: 1 })
        ));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(Ring::new(vec![], vec![], vec![]), Err(Error::EmptyRing)));
    }

    #[test]
    fn test_ellipse_closes_loop() {
        let ring = Ring::ellipse(9, 2.0, 1.0);
        assert_eq!(ring.sample_count(), 9);
        assert_eq!(ring.side_count(), 8);
        assert!(approx_eq_vec3(ring.points()[0], Vec3::new(2.0, 0.0, 0.0), 1e-5));
        assert!(approx_eq_vec3(ring.points()[8], ring.points()[0], 1e-5));
        assert!(approx_eq_vec3(ring.points()[2], Vec3::new(0.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_value_at_angle_hits_samples() {
        let ring = Ring::ellipse(5, 1.0, 1.0);
        assert!(approx_eq_vec3(ring.point_at_angle(0.0), Vec3::X, 1e-5));
        assert!(approx_eq_vec3(ring.point_at_angle(FRAC_PI_2), Vec3::Y, 1e-5));
        assert!(approx_eq_vec3(ring.point_at_angle(PI), Vec3::NEG_X, 1e-5));
        // Full turn wraps onto the first sample
        assert!(approx_eq_vec3(ring.point_at_angle(TAU), Vec3::X, 1e-5));
    }

    #[test]
    fn test_value_at_angle_interpolates_between_samples() {
        let ring = Ring::ellipse(5, 1.0, 1.0);
        // Halfway between X and Y samples is the chord midpoint, not the arc
        let mid = ring.point_at_angle(PI / 4.0);
        assert!(approx_eq_vec3(mid, Vec3::new(0.5, 0.5, 0.0), 1e-5));
    }

    #[test]
    fn test_value_at_negative_angle() {
        let ring = Ring::ellipse(5, 1.0, 1.0);
        assert!(approx_eq_vec3(ring.point_at_angle(-FRAC_PI_2), Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn test_single_sample_ring_rejected() {
        assert!(matches!(
            Ring::new(vec![0.0], vec![Vec3::ONE], vec![Vec3::X]),
            Err(Error::TooFewSamples(1))
        ));
        assert!(matches!(Ring::from_points(vec![Vec3::X]), Err(Error::TooFewSamples(1))));

        let json = r#"{"radial_positions":[0.0],"points":[[1,0,0]],"normals":[[1,0,0]]}"#;
        assert!(serde_json::from_str::<Ring>(json).is_err());
    }

    #[test]
    fn test_two_sample_ring_interpolates_with_larger_ring() {
        let pair = Ring::new(vec![0.0, TAU], vec![Vec3::X, Vec3::X], vec![Vec3::X, Vec3::X]).unwrap();
        let wide = Ring::ellipse(9, 3.0, 3.0);

        let blended = pair.interpolate(&wide, 0.5);
        assert_eq!(blended.sample_count(), 2);
        assert!(approx_eq_vec3(blended.points()[0], Vec3::new(2.0, 0.0, 0.0), 1e-5));

        let blended = wide.interpolate(&pair, 0.5);
        assert_eq!(blended.sample_count(), 9);
    }

    #[test]
    fn test_from_points_outward_normals() {
        let square = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let ring = Ring::from_points(square).unwrap();
        assert_eq!(ring.sample_count(), 5);
        assert!(approx_eq_vec3(ring.normals()[0], Vec3::X, 1e-5));
        assert!(approx_eq_vec3(ring.normals()[1], Vec3::Y, 1e-5));
        assert!(approx_eq_vec3(ring.normals()[4], ring.normals()[0], 1e-5));
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = Ring::ellipse(7, 1.0, 1.0);
        let b = Ring::ellipse(7, 3.0, 2.0);
        let mid = a.interpolate(&b, 0.5);
        for i in 0..7 {
            let expected = Lerp::lerp(&a.points()[i], &b.points()[i], 0.5);
            assert!(approx_eq_vec3(mid.points()[i], expected, 1e-6));
        }
        assert_eq!(mid.radial_positions(), a.radial_positions());
    }

    #[test]
    fn test_interpolate_resamples_mismatched_counts() {
        let a = Ring::ellipse(9, 1.0, 1.0);
        let b = Ring::ellipse(5, 1.0, 1.0);
        let blended = a.interpolate(&b, 1.0);
        assert_eq!(blended.sample_count(), 9);
        // Sample at 90 degrees exists in both schemes
        assert!(approx_eq_vec3(blended.points()[2], Vec3::Y, 1e-5));
    }

    #[test]
    fn test_ellipse_normal_is_unit() {
        for i in 0..16 {
            let angle = i as f32 * TAU / 16.0;
            let normal = ellipse_normal(angle, 2.0, 0.5);
            assert!((normal.length() - 1.0).abs() < 1e-5);
        }
        assert!(approx_eq_vec3(ellipse_normal(0.0, 2.0, 0.5), Vec3::X, 1e-5));
    }

    #[test]
    fn test_ring_json_roundtrip_and_validation() {
        let ring = Ring::ellipse(4, 1.0, 0.5);
        let json = serde_json::to_string(&ring).unwrap();
        let loaded: Ring = serde_json::from_str(&json).unwrap();
        assert_eq!(ring, loaded);

        let bad = r#"{"radial_positions":[0.0],"points":[[1,0,0],[0,1,0]],"normals":[[1,0,0]]}"#;
        assert!(serde_json::from_str::<Ring>(bad).is_err());
    }
}
