//! Branch curves and the sampling interface the shaper reads from.

use crate::core::types::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Frame of a branch curve at one length-relative position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSample {
    /// Length-relative position (0..1)
    pub position: f32,
    /// Point on the curve, relative to the branch origin
    pub point: Vec3,
    pub forward: Vec3,
    pub normal: Vec3,
    pub bitangent: Vec3,
}

/// Read-only view of a branch as needed by the shaping queries.
pub trait CurveProvider {
    /// Branch length in world units
    fn length(&self) -> f32;

    /// Girth (radius) at a length-relative position
    fn girth(&self, position: f32) -> f32;

    /// Curve frame at a length-relative position
    fn curve_sample(&self, position: f32) -> CurveSample;

    /// World offset added to every curve point
    fn origin(&self) -> Vec3 {
        Vec3::ZERO
    }
}

/// Polyline branch curve parameterized by arc length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec3>", into = "Vec<Vec3>")]
pub struct BranchCurve {
    points: Vec<Vec3>,
    /// Cumulative arc length at each point
    distances: Vec<f32>,
}

impl BranchCurve {
    /// Build a curve through at least two points.
    pub fn new(points: Vec<Vec3>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::InvalidConfig(format!(
                "branch curve needs at least 2 points, got {}",
                points.len()
            )));
        }

        let mut distances = Vec::with_capacity(points.len());
        let mut total = 0.0;
        distances.push(0.0);
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            distances.push(total);
        }

        Ok(Self { points, distances })
    }

    /// Straight curve from the origin along `direction`.
    pub fn straight(direction: Vec3, length: f32) -> Self {
        let end = direction.normalize_or(Vec3::Y) * length;
        Self {
            points: vec![Vec3::ZERO, end],
            distances: vec![0.0, length.abs()],
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Total arc length
    pub fn length(&self) -> f32 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Sample the curve frame at a length-relative position.
    pub fn sample(&self, position: f32) -> CurveSample {
        let position = position.clamp(0.0, 1.0);
        let target = position * self.length();

        // Segment containing the target distance
        let upper = self
            .distances
            .partition_point(|&d| d < target)
            .clamp(1, self.points.len() - 1);
        let lower = upper - 1;

        let start = self.points[lower];
        let end = self.points[upper];
        let span = self.distances[upper] - self.distances[lower];
        let t = if span > f32::EPSILON {
            (target - self.distances[lower]) / span
        } else {
            0.0
        };

        let forward = (end - start).normalize_or(Vec3::Y);
        let reference = if forward.abs_diff_eq(Vec3::Y, 1e-4) || forward.abs_diff_eq(Vec3::NEG_Y, 1e-4) {
            Vec3::X
        } else {
            Vec3::Y
        };
        let normal = reference.cross(forward).normalize();
        let bitangent = forward.cross(normal);

        CurveSample {
            position,
            point: start.lerp(end, t),
            forward,
            normal,
            bitangent,
        }
    }
}

impl TryFrom<Vec<Vec3>> for BranchCurve {
    type Error = Error;

    fn try_from(points: Vec<Vec3>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<BranchCurve> for Vec<Vec3> {
    fn from(curve: BranchCurve) -> Self {
        curve.points
    }
}
