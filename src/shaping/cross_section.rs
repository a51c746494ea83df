//! Full cross-section sampling for tessellators.

use std::f32::consts::TAU;

use crate::core::types::Vec3;

use crate::shaping::shaper::ShaperKind;
use crate::skeleton::CurveProvider;

/// Points and normals around one branch position.
///
/// Holds `sides + 1` samples; the closing sample repeats the first angle so
/// seams can carry their own UVs.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossSection {
    pub position: f32,
    pub points: Vec<Vec3>,
    pub normals: Vec<Vec3>,
}

impl CrossSection {
    pub fn sides(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Sample `sides` evenly spaced roll angles at `position` (at least 3 sides).
pub fn cross_section<B: CurveProvider + ?Sized>(
    shaper: &ShaperKind,
    branch: &B,
    position: f32,
    sides: usize,
    apply_transforms: bool,
) -> CrossSection {
    let position = position.clamp(0.0, 1.0);
    let sides = sides.max(3);
    let step = TAU / sides as f32;

    let (points, normals) = (0..=sides)
        .map(|i| {
            let angle = (i % sides) as f32 * step;
            (
                shaper.surface_point(position, angle, branch, apply_transforms),
                shaper.surface_normal(position, angle, branch),
            )
        })
        .unzip();

    CrossSection { position, points, normals }
}
