//! Shaper strategies and the surface queries built on them.
//!
//! Every branch carries one [`ShaperKind`]. Queries first try to resolve a
//! custom ring at the requested position and otherwise fall back to the
//! default ellipse: girth at the position scaled by the section table.

use std::sync::Arc;

use crate::core::types::Vec3;

use crate::math::look_rotation;
use crate::shaping::registry::RingRegistry;
use crate::shaping::ring::{Ring, ellipse_normal, ellipse_point};
use crate::shaping::section::SectionTable;
use crate::skeleton::CurveProvider;

/// Who produced a custom shaper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaperOrigin {
    /// Set by hand; generated shaping never replaces it
    Authored,
    /// Produced by the assignment pass for the current build
    Generated,
}

/// Ring-registry based shaper.
#[derive(Clone, Debug)]
pub struct CustomShaper {
    registry: RingRegistry,
    sections: SectionTable,
    origin: ShaperOrigin,
}

impl CustomShaper {
    pub fn authored(registry: RingRegistry, sections: SectionTable) -> Self {
        Self { registry, sections, origin: ShaperOrigin::Authored }
    }

    pub fn generated(registry: RingRegistry, sections: SectionTable) -> Self {
        Self { registry, sections, origin: ShaperOrigin::Generated }
    }

    pub fn registry(&self) -> &RingRegistry {
        &self.registry
    }

    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    pub fn origin(&self) -> ShaperOrigin {
        self.origin
    }

    pub fn is_authored(&self) -> bool {
        self.origin == ShaperOrigin::Authored
    }
}

/// Shaper slot of a branch.
#[derive(Clone, Debug, Default)]
pub enum ShaperKind {
    /// No shaper: plain girth circle
    #[default]
    None,
    /// Default tapered ellipse
    Default(SectionTable),
    /// Explicit rings, default ellipse between markers
    Custom(CustomShaper),
}

impl ShaperKind {
    pub fn sections(&self) -> Option<&SectionTable> {
        match self {
            ShaperKind::None => None,
            ShaperKind::Default(sections) => Some(sections),
            ShaperKind::Custom(custom) => Some(&custom.sections),
        }
    }

    pub fn registry(&self) -> Option<&RingRegistry> {
        match self {
            ShaperKind::Custom(custom) => Some(&custom.registry),
            _ => None,
        }
    }

    /// Whether this is a hand-authored custom shaper
    pub fn is_authored(&self) -> bool {
        matches!(self, ShaperKind::Custom(custom) if custom.is_authored())
    }

    /// Default-ellipse radius at `position`
    pub fn default_radius<B: CurveProvider + ?Sized>(&self, position: f32, branch: &B) -> f32 {
        let scale = self
            .sections()
            .map_or(1.0, |sections| sections.scale_at(position * branch.length()));
        branch.girth(position) * scale
    }

    /// Default-ellipse ring at `position` with `samples` samples
    pub fn default_ring<B: CurveProvider + ?Sized>(&self, position: f32, samples: usize, branch: &B) -> Ring {
        let radius = self.default_radius(position, branch);
        Ring::ellipse(samples, radius, radius)
    }

    /// Custom ring at `position`, or `None` when the default ellipse applies
    pub fn resolve_ring<B: CurveProvider + ?Sized>(&self, position: f32, branch: &B) -> Option<Arc<Ring>> {
        let registry = self.registry()?;
        registry.resolve_with(position, |at, samples| self.default_ring(at, samples, branch))
    }

    /// Cross-section point in the local plane
    fn local_point<B: CurveProvider + ?Sized>(&self, position: f32, roll_angle: f32, branch: &B) -> Vec3 {
        match self.resolve_ring(position, branch) {
            Some(ring) => ring.point_at_angle(roll_angle),
            None => {
                let radius = self.default_radius(position, branch);
                ellipse_point(roll_angle, radius, radius)
            }
        }
    }

    /// Surface point at `position` and `roll_angle`.
    ///
    /// With `apply_transforms` the local point is rotated into the curve frame
    /// and moved to the curve point plus the branch origin.
    pub fn surface_point<B: CurveProvider + ?Sized>(
        &self,
        position: f32,
        roll_angle: f32,
        branch: &B,
        apply_transforms: bool,
    ) -> Vec3 {
        let position = position.clamp(0.0, 1.0);
        let local = self.local_point(position, roll_angle, branch);
        if !apply_transforms {
            return local;
        }

        let sample = branch.curve_sample(position);
        let rotation = look_rotation(sample.forward, sample.bitangent);
        rotation * local + sample.point + branch.origin()
    }

    /// Unit surface normal at `position` and `roll_angle`, in the curve frame
    pub fn surface_normal<B: CurveProvider + ?Sized>(&self, position: f32, roll_angle: f32, branch: &B) -> Vec3 {
        let position = position.clamp(0.0, 1.0);
        let local = match self.resolve_ring(position, branch) {
            Some(ring) => ring.normal_at_angle(roll_angle).normalize_or_zero(),
            None => {
                let radius = self.default_radius(position, branch);
                ellipse_normal(roll_angle, radius, radius)
            }
        };

        let sample = branch.curve_sample(position);
        look_rotation(sample.forward, sample.bitangent) * local
    }

    /// Distance of the surface from the branch axis
    pub fn surface_distance<B: CurveProvider + ?Sized>(&self, position: f32, roll_angle: f32, branch: &B) -> f32 {
        let position = position.clamp(0.0, 1.0);
        self.local_point(position, roll_angle, branch).length()
    }
}
