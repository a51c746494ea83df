//! Polygon resolution selection for generated cross-sections.

use crate::config::ShapingConfig;
use crate::math::{Lerp, inverse_lerp};
use crate::shaping::shaper::ShaperKind;
use crate::skeleton::CurveProvider;

/// Side-count bounds and the girth range they map onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolutionParams {
    pub min_sides: usize,
    pub max_sides: usize,
    /// Smallest average branch girth in the tree
    pub min_avg_girth: f32,
    /// Largest average branch girth in the tree
    pub max_avg_girth: f32,
}

impl ResolutionParams {
    pub fn new(min_sides: usize, max_sides: usize, min_avg_girth: f32, max_avg_girth: f32) -> Self {
        Self { min_sides, max_sides, min_avg_girth, max_avg_girth }
    }

    /// Side bounds from the config with the given girth range
    pub fn from_config(config: &ShapingConfig, min_avg_girth: f32, max_avg_girth: f32) -> Self {
        Self::new(config.min_sides, config.max_sides, min_avg_girth, max_avg_girth)
    }

    /// Sides for a branch of `avg_girth`, ignoring any custom ring
    pub fn sides_for_girth(&self, avg_girth: f32) -> usize {
        let girth_pos = inverse_lerp(self.min_avg_girth, self.max_avg_girth, avg_girth);
        let sides = Lerp::lerp(&(self.min_sides as f32), &(self.max_sides as f32), girth_pos).round();
        (sides.max(0.0) as usize).clamp(self.min_sides, self.max_sides.max(self.min_sides))
    }
}

impl Default for ResolutionParams {
    fn default() -> Self {
        Self::new(6, 18, 0.0, 1.0)
    }
}

/// Number of angular sides to generate at `position` on a branch.
///
/// A custom ring resolved at the position dictates its own side count.
/// Otherwise the count scales with the branch's average girth.
pub fn side_count<B: CurveProvider + ?Sized>(
    shaper: &ShaperKind,
    branch: &B,
    position: f32,
    params: &ResolutionParams,
    avg_girth: f32,
) -> usize {
    if let Some(ring) = shaper.resolve_ring(position, branch) {
        return ring.side_count();
    }
    params.sides_for_girth(avg_girth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaping::{CustomShaper, Ring, RingRegistry, SectionTable};
    use crate::skeleton::{Branch, BranchCurve, GirthProfile};
    use crate::core::types::Vec3;

    fn plain_branch() -> Branch {
        Branch::new(BranchCurve::straight(Vec3::Y, 1.0), GirthProfile::uniform(0.055))
    }

    #[test]
    fn test_end_to_end_girth_scenario() {
        let params = ResolutionParams::new(6, 18, 0.01, 0.1);
        let branch = plain_branch();
        assert_eq!(side_count(&branch.shaper, &branch, 0.5, &params, 0.055), 12);
    }

    #[test]
    fn test_bounds_at_range_ends() {
        let params = ResolutionParams::new(6, 18, 0.01, 0.1);
        assert_eq!(params.sides_for_girth(0.01), 6);
        assert_eq!(params.sides_for_girth(0.1), 18);
    }

    #[test]
    fn test_always_within_bounds() {
        let params = ResolutionParams::new(6, 18, 0.01, 0.1);
        for i in 0..=100 {
            let girth = -0.05 + i as f32 * 0.002;
            let sides = params.sides_for_girth(girth);
            assert!((6..=18).contains(&sides), "girth {} gave {} sides", girth, sides);
        }
    }

    #[test]
    fn test_degenerate_girth_range() {
        let params = ResolutionParams::new(6, 18, 0.05, 0.05);
        assert_eq!(params.sides_for_girth(0.05), 6);
        assert_eq!(params.sides_for_girth(0.5), 6);
    }

    #[test]
    fn test_custom_ring_dictates_sides() {
        let mut registry = RingRegistry::new();
        registry.insert_ring(0.5, Ring::ellipse(11, 0.1, 0.1));
        let branch = plain_branch()
            .with_shaper(ShaperKind::Custom(CustomShaper::generated(registry, SectionTable::new())));
        let params = ResolutionParams::new(6, 18, 0.01, 0.1);

        assert_eq!(side_count(&branch.shaper, &branch, 0.5, &params, 0.055), 10);
        // Interpolated towards the virtual default ends, still the ring's count
        assert_eq!(side_count(&branch.shaper, &branch, 0.2, &params, 0.055), 10);
    }

    #[test]
    fn test_default_marker_falls_back_to_girth() {
        let mut registry = RingRegistry::new();
        registry.insert_default(0.0);
        registry.insert_default(1.0);
        let branch = plain_branch()
            .with_shaper(ShaperKind::Custom(CustomShaper::generated(registry, SectionTable::new())));
        let params = ResolutionParams::new(6, 18, 0.01, 0.1);

        assert_eq!(side_count(&branch.shaper, &branch, 0.5, &params, 0.1), 18);
    }

    #[test]
    fn test_smallest_ring_never_gives_zero_sides() {
        assert!(Ring::new(vec![0.0], vec![Vec3::X], vec![Vec3::X]).is_err());

        let pair = Ring::new(
            vec![0.0, std::f32::consts::TAU],
            vec![Vec3::X, Vec3::X],
            vec![Vec3::X, Vec3::X],
        )
        .unwrap();
        let mut registry = RingRegistry::new();
        registry.insert_ring(0.5, pair);
        let branch = plain_branch()
            .with_shaper(ShaperKind::Custom(CustomShaper::generated(registry, SectionTable::new())));
        let params = ResolutionParams::new(6, 18, 0.01, 0.1);

        assert_eq!(side_count(&branch.shaper, &branch, 0.5, &params, 0.055), 1);
        assert_eq!(side_count(&branch.shaper, &branch, 0.3, &params, 0.055), 1);
    }

    #[test]
    fn test_side_count_independent_of_query_order() {
        let mut registry = RingRegistry::new();
        registry.insert_default(0.5);
        registry.insert_ring(0.8, Ring::ellipse(11, 0.1, 0.1));
        let branch = plain_branch()
            .with_shaper(ShaperKind::Custom(CustomShaper::generated(registry, SectionTable::new())));
        let params = ResolutionParams::new(6, 18, 0.01, 0.1);

        let near = f32::from_bits(0.5_f32.to_bits() + 1);
        assert_eq!(side_count(&branch.shaper, &branch, near, &params, 0.1), 10);
        assert_eq!(side_count(&branch.shaper, &branch, 0.5, &params, 0.1), 18);
    }

    #[test]
    fn test_from_config_defaults() {
        let params = ResolutionParams::from_config(&ShapingConfig::default(), 0.0, 1.0);
        assert_eq!(params.min_sides, 6);
        assert_eq!(params.max_sides, 18);
    }
}
