//! Distribution of collected rings onto the branches of a skin's chain.
//!
//! Rings are walked range by range in ascending order. Each one is mapped to
//! a branch and branch-local position and inserted into that branch's
//! registry. A ring landing at local 0 is also copied to position 1 of the
//! previously filled branch so both sides of the joint match. Finally every
//! branch of the chain gets a registry with resolvable ends.

use std::collections::HashMap;
use std::sync::Arc;

use crate::assembly::collector::SegmentCollector;
use crate::config::ShapingConfig;
use crate::core::{Error, Result};
use crate::shaping::{CustomShaper, Ring, RingRegistry, ShaperKind};
use crate::skeleton::{BranchId, Skeleton, Skin};

/// Counters describing one assignment pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssignmentReport {
    /// Pass skipped because the first branch has an authored shaper
    pub skipped: bool,
    /// Branches that received a generated shaper
    pub branches: usize,
    pub rings_inserted: usize,
    /// Registrations dropped because their position was taken
    pub duplicates: usize,
    /// Rings copied across a joint
    pub stitches: usize,
    pub default_markers: usize,
    /// Registrations that could not be mapped onto a branch
    pub unmapped: usize,
    /// Registrations dropped because they landed on an authored branch
    pub on_authored: usize,
}

/// Snap a branch-local position onto 0 or 1 when within `tolerance`.
pub fn snap_boundary(position: f32, tolerance: f32) -> f32 {
    let position = position.clamp(0.0, 1.0);
    if position <= tolerance {
        0.0
    } else if position >= 1.0 - tolerance {
        1.0
    } else {
        position
    }
}

/// Build generated shapers for the chain of `skin` from `collector`.
///
/// Does nothing when the first branch already owns an authored shaper. An
/// authored shaper further down the chain is left untouched, receives no
/// rings, and its own ring at position 1 carries over to the next branch.
pub fn assign_shapers(
    skeleton: &mut Skeleton,
    skin: &Skin,
    collector: &SegmentCollector,
    config: &ShapingConfig,
) -> Result<AssignmentReport> {
    let first = skeleton
        .get(skin.first_branch)
        .ok_or(Error::UnknownBranch(skin.first_branch))?;

    let mut report = AssignmentReport::default();
    if first.shaper.is_authored() {
        log::debug!("Skin {}: first branch {:?} has an authored shaper, skipping", skin.id, first.id);
        report.skipped = true;
        return Ok(report);
    }

    let mut registries: HashMap<BranchId, RingRegistry> = HashMap::new();
    let mut current: Option<BranchId> = None;
    let mut previous: Option<BranchId> = None;

    for (_, entries) in collector.ranges_for(skin.id) {
        for entry in entries {
            let Some((branch, local)) = skin.locate(skeleton, entry.position) else {
                report.unmapped += 1;
                continue;
            };
            let local = snap_boundary(local, config.boundary_snap);

            // Branch transition
            if current != Some(branch) {
                previous = current;
                current = Some(branch);
            }

            if is_authored(skeleton, branch) {
                report.on_authored += 1;
                continue;
            }

            let registry = registries.entry(branch).or_default();
            if registry.insert(local, Some(entry.ring.clone())) {
                report.rings_inserted += 1;
            } else {
                report.duplicates += 1;
            }

            if local == 0.0 {
                let stitched = previous
                    .and_then(|prev| registries.get_mut(&prev))
                    .is_some_and(|prev| prev.insert(1.0, Some(entry.ring.clone())));
                if stitched {
                    report.stitches += 1;
                }
            }
        }
    }

    // Give every branch of the chain resolvable ends
    let chain = skeleton.chain(skin.first_branch);
    let mut preceding: Option<BranchId> = None;
    for &id in &chain {
        if is_authored(skeleton, id) {
            preceding = Some(id);
            continue;
        }

        if !registries.contains_key(&id) {
            let mut registry = RingRegistry::new();
            let carried = preceding.and_then(|prev| end_ring(skeleton, &registries, prev));
            if let Some(ring) = carried {
                registry.insert(0.0, Some(ring));
                report.stitches += 1;
            }
            registries.insert(id, registry);
        }

        if let Some(registry) = registries.get_mut(&id) {
            for end in [0.0, 1.0] {
                if registry.insert_default(end) {
                    report.default_markers += 1;
                }
            }
        }
        preceding = Some(id);
    }

    for id in chain {
        let Some(registry) = registries.remove(&id) else { continue };
        let Some(branch) = skeleton.get_mut(id) else { continue };
        if branch.shaper.is_authored() {
            log::debug!("Skin {}: keeping authored shaper on branch {:?}", skin.id, id);
            continue;
        }
        let sections = branch.shaper.sections().cloned().unwrap_or_default();
        branch.shaper = ShaperKind::Custom(CustomShaper::generated(registry, sections));
        report.branches += 1;
    }

    log::debug!(
        "Skin {}: assigned {} branches, {} rings, {} stitches, {} default markers ({} duplicates, {} unmapped, {} on authored)",
        skin.id,
        report.branches,
        report.rings_inserted,
        report.stitches,
        report.default_markers,
        report.duplicates,
        report.unmapped,
        report.on_authored
    );

    Ok(report)
}

fn is_authored(skeleton: &Skeleton, id: BranchId) -> bool {
    skeleton.get(id).is_some_and(|branch| branch.shaper.is_authored())
}

/// Ring at position 1 of `id`: its authored registry, else the one being built
fn end_ring(skeleton: &Skeleton, registries: &HashMap<BranchId, RingRegistry>, id: BranchId) -> Option<Arc<Ring>> {
    let registry = match skeleton.get(id).map(|branch| &branch.shaper) {
        Some(shaper) if shaper.is_authored() => shaper.registry(),
        _ => registries.get(&id),
    };
    registry.and_then(|registry| registry.ring_at(1.0)).cloned()
}
