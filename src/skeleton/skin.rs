//! Skins: multi-branch spans with range-partitioned global positions.

use serde::{Deserialize, Serialize};

use crate::skeleton::branch::BranchId;
use crate::skeleton::chain::Skeleton;
use crate::skeleton::curve::CurveProvider;

/// Sub-range of a skin's global 0..1 position space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkinRange {
    pub from: f32,
    pub to: f32,
}

impl SkinRange {
    pub fn new(from: f32, to: f32) -> Self {
        Self { from, to }
    }

    /// Map a range-local position into skin-global space
    pub fn to_global(&self, local: f32) -> f32 {
        self.from + local * (self.to - self.from)
    }
}

/// A skin spanning the branch chain that starts at `first_branch`.
///
/// Global position 0 is the start of the first branch and 1 the end of the
/// last, with each branch taking a share proportional to its length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Skin {
    pub id: u32,
    pub first_branch: BranchId,
    ranges: Vec<SkinRange>,
}

impl Skin {
    pub fn new(id: u32, first_branch: BranchId) -> Self {
        Self {
            id,
            first_branch,
            ranges: Vec::new(),
        }
    }

    pub fn with_range(mut self, from: f32, to: f32) -> Self {
        self.ranges.push(SkinRange::new(from, to));
        self
    }

    pub fn ranges(&self) -> &[SkinRange] {
        &self.ranges
    }

    pub fn range(&self, index: usize) -> Option<SkinRange> {
        self.ranges.get(index).copied()
    }

    /// Resolve a skin-global position into a branch and a branch-local position.
    ///
    /// A position exactly on a joint belongs to the later branch at local 0.
    /// Returns `None` when the chain is empty.
    pub fn locate(&self, skeleton: &Skeleton, global: f32) -> Option<(BranchId, f32)> {
        let chain = skeleton.chain(self.first_branch);
        let last = *chain.last()?;
        let global = global.clamp(0.0, 1.0);

        let lengths: Vec<f32> = chain
            .iter()
            .filter_map(|&id| skeleton.get(id))
            .map(|branch| branch.length().max(0.0))
            .collect();
        let total: f32 = lengths.iter().sum();

        // Degenerate chains share the space evenly
        let shares: Vec<f32> = if total > f32::EPSILON {
            lengths.iter().map(|length| length / total).collect()
        } else {
            vec![1.0 / chain.len() as f32; chain.len()]
        };

        let mut start = 0.0;
        for (&id, &share) in chain.iter().zip(&shares) {
            let end = start + share;
            if global < end || id == last {
                let local = if share > f32::EPSILON { (global - start) / share } else { 0.0 };
                return Some((id, local.clamp(0.0, 1.0)));
            }
            start = end;
        }

        Some((last, 1.0))
    }
}
