//! Transient collection of rings registered at skin positions.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::shaping::Ring;

/// Composite key of one skin sub-range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey {
    pub skin_id: u32,
    pub range_index: usize,
}

/// A ring registered at a skin-global position.
#[derive(Clone, Debug)]
pub struct SegmentEntry {
    pub position: f32,
    pub ring: Arc<Ring>,
}

/// Rings per (skin, range), each list kept in ascending position order.
///
/// Equal positions are kept in arrival order. Build a fresh collector per
/// build pass.
#[derive(Clone, Debug, Default)]
pub struct SegmentCollector {
    index: BTreeMap<SegmentKey, usize>,
    lists: Vec<Vec<SegmentEntry>>,
}

impl SegmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ring` at a range-local position of a skin range.
    ///
    /// The global position is `range_from + local * (range_to - range_from)`.
    /// Nothing is clamped here.
    pub fn register(
        &mut self,
        skin_id: u32,
        range_index: usize,
        range_local_position: f32,
        range_from: f32,
        range_to: f32,
        ring: Ring,
    ) {
        let position = range_from + range_local_position * (range_to - range_from);
        let key = SegmentKey { skin_id, range_index };

        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.lists.push(Vec::new());
                let slot = self.lists.len() - 1;
                self.index.insert(key, slot);
                slot
            }
        };

        let list = &mut self.lists[slot];
        // Upper bound keeps ties in arrival order
        let at = list.partition_point(|entry| entry.position <= position);
        list.insert(at, SegmentEntry { position, ring: Arc::new(ring) });
    }

    /// Entries of one range in ascending position order
    pub fn entries(&self, key: SegmentKey) -> &[SegmentEntry] {
        self.index
            .get(&key)
            .map(|&slot| self.lists[slot].as_slice())
            .unwrap_or(&[])
    }

    /// Ranges of a skin in ascending range index order
    pub fn ranges_for(&self, skin_id: u32) -> impl Iterator<Item = (usize, &[SegmentEntry])> + '_ {
        let from = SegmentKey { skin_id, range_index: 0 };
        let to = SegmentKey { skin_id, range_index: usize::MAX };
        self.index
            .range(from..=to)
            .map(move |(key, &slot)| (key.range_index, self.lists[slot].as_slice()))
    }

    /// Total registered rings
    pub fn len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.lists.clear();
    }
}
