//! A single branch of a limb chain and its shaper slot.

use std::sync::Arc;

use crate::core::types::Vec3;
use serde::{Deserialize, Serialize};

use crate::shaping::{CrossSection, Ring, ShaperKind, cross_section};
use crate::skeleton::curve::{BranchCurve, CurveProvider, CurveSample};

/// Index of a branch inside its [`Skeleton`](crate::skeleton::Skeleton).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BranchId(pub u32);

/// Linear girth falloff from base to tip.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GirthProfile {
    /// Girth at position 0
    pub base: f32,
    /// Girth at position 1
    pub tip: f32,
}

impl GirthProfile {
    pub fn new(base: f32, tip: f32) -> Self {
        Self { base, tip }
    }

    /// Constant girth along the whole branch
    pub fn uniform(girth: f32) -> Self {
        Self { base: girth, tip: girth }
    }

    pub fn at(&self, position: f32) -> f32 {
        let t = position.clamp(0.0, 1.0);
        self.base + (self.tip - self.base) * t
    }

    /// Mean girth over the branch
    pub fn average(&self) -> f32 {
        (self.base + self.tip) * 0.5
    }
}

impl Default for GirthProfile {
    fn default() -> Self {
        Self::new(0.1, 0.05)
    }
}

/// One segment of a tree limb.
#[derive(Clone, Debug)]
pub struct Branch {
    pub id: BranchId,
    /// World offset of the curve
    pub origin: Vec3,
    pub curve: BranchCurve,
    pub girth: GirthProfile,
    /// Next branch in the same limb
    pub follow_up: Option<BranchId>,
    pub shaper: ShaperKind,
}

impl Branch {
    /// Create an unlinked branch. The id is assigned when added to a skeleton.
    pub fn new(curve: BranchCurve, girth: GirthProfile) -> Self {
        Self {
            id: BranchId(0),
            origin: Vec3::ZERO,
            curve,
            girth,
            follow_up: None,
            shaper: ShaperKind::None,
        }
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_shaper(mut self, shaper: ShaperKind) -> Self {
        self.shaper = shaper;
        self
    }

    pub fn surface_point(&self, position: f32, roll_angle: f32, apply_transforms: bool) -> Vec3 {
        self.shaper.surface_point(position, roll_angle, self, apply_transforms)
    }

    pub fn surface_normal(&self, position: f32, roll_angle: f32) -> Vec3 {
        self.shaper.surface_normal(position, roll_angle, self)
    }

    pub fn surface_distance(&self, position: f32, roll_angle: f32) -> f32 {
        self.shaper.surface_distance(position, roll_angle, self)
    }

    /// Custom ring resolved at `position`, if the shaper has one
    pub fn resolve_ring(&self, position: f32) -> Option<Arc<Ring>> {
        self.shaper.resolve_ring(position, self)
    }

    pub fn cross_section(&self, position: f32, sides: usize, apply_transforms: bool) -> CrossSection {
        cross_section(&self.shaper, self, position, sides, apply_transforms)
    }
}

impl CurveProvider for Branch {
    fn length(&self) -> f32 {
        self.curve.length()
    }

    fn girth(&self, position: f32) -> f32 {
        self.girth.at(position)
    }

    fn curve_sample(&self, position: f32) -> CurveSample {
        self.curve.sample(position)
    }

    fn origin(&self) -> Vec3 {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_girth_profile() {
        let girth = GirthProfile::new(0.2, 0.1);
        assert!((girth.at(0.0) - 0.2).abs() < 1e-6);
        assert!((girth.at(0.5) - 0.15).abs() < 1e-6);
        assert!((girth.at(2.0) - 0.1).abs() < 1e-6);
        assert!((girth.average() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_branch_reports_curve_length() {
        let branch = Branch::new(BranchCurve::straight(Vec3::Y, 3.0), GirthProfile::uniform(0.1));
        assert!((branch.length() - 3.0).abs() < 1e-6);
        assert!(matches!(branch.shaper, ShaperKind::None));
    }

    #[test]
    fn test_surface_point_without_shaper_is_girth_circle() {
        let branch = Branch::new(BranchCurve::straight(Vec3::Y, 1.0), GirthProfile::uniform(0.25));
        let point = branch.surface_point(0.5, std::f32::consts::FRAC_PI_2, false);
        assert!(point.abs_diff_eq(Vec3::new(0.0, 0.25, 0.0), 1e-5));
        assert!((branch.surface_distance(0.5, 1.0) - 0.25).abs() < 1e-5);
    }
}
