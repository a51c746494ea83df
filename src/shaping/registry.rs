//! Per-branch registry of cross-section rings keyed by relative position.
//!
//! Positions are strictly ascending in [0, 1]. Each position holds either a
//! real ring or a default marker (`None`), which means "use the default
//! ellipse here". Resolved rings are cached per query position, because
//! one tessellated cross-section queries the same position at many roll
//! angles.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use crate::math::inverse_lerp;
use crate::shaping::ring::Ring;

/// Cache key: bit pattern of a clamped query position.
///
/// Only bit-identical positions share a slot, so a query next to a
/// registered position never answers for the position itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PositionKey(u32);

impl PositionKey {
    fn new(position: f32) -> Self {
        Self(canonical(position).to_bits())
    }
}

/// Clamp into [0, 1], folding -0.0 onto 0.0 so `total_cmp` treats them alike.
fn canonical(position: f32) -> f32 {
    position.clamp(0.0, 1.0) + 0.0
}

/// Registry entry at one position: a ring or a default marker.
pub type RingEntry = Option<Arc<Ring>>;

/// Neighbourhood of a query position inside the registry.
#[derive(Clone, Debug)]
pub(crate) enum Neighborhood<'a> {
    /// No entries at all
    Empty,
    /// The position is registered
    Exact(Option<&'a Arc<Ring>>),
    /// Straddling entries; missing ends act as default markers at 0 or 1
    Between {
        lower: (f32, Option<&'a Arc<Ring>>),
        upper: (f32, Option<&'a Arc<Ring>>),
    },
}

/// Ordered position → ring mapping with a lazily filled resolve cache.
#[derive(Clone, Debug, Default)]
pub struct RingRegistry {
    positions: Vec<f32>,
    entries: Vec<RingEntry>,
    cache: RefCell<HashMap<PositionKey, RingEntry>>,
}

impl RingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry unless the position is already taken.
    ///
    /// The first registration at a position wins. Returns whether the entry
    /// was inserted. Any insert invalidates the resolve cache.
    pub fn insert(&mut self, position: f32, entry: RingEntry) -> bool {
        let position = canonical(position);
        match self.positions.binary_search_by(|p| p.total_cmp(&position)) {
            Ok(_) => false,
            Err(index) => {
                self.positions.insert(index, position);
                self.entries.insert(index, entry);
                self.cache.get_mut().clear();
                true
            }
        }
    }

    pub fn insert_ring(&mut self, position: f32, ring: Ring) -> bool {
        self.insert(position, Some(Arc::new(ring)))
    }

    /// Register a default marker (no custom ring) at `position`
    pub fn insert_default(&mut self, position: f32) -> bool {
        self.insert(position, None)
    }

    fn index_of(&self, position: f32) -> Option<usize> {
        let position = canonical(position);
        self.positions.binary_search_by(|p| p.total_cmp(&position)).ok()
    }

    /// Whether any entry (ring or marker) exists exactly at `position`
    pub fn has_entry(&self, position: f32) -> bool {
        self.index_of(position).is_some()
    }

    /// Whether a real ring exists exactly at `position`
    pub fn has_ring(&self, position: f32) -> bool {
        self.ring_at(position).is_some()
    }

    /// Ring registered exactly at `position`
    pub fn ring_at(&self, position: f32) -> Option<&Arc<Ring>> {
        self.index_of(position).and_then(|i| self.entries[i].as_ref())
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of cached query positions
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    pub(crate) fn neighborhood(&self, position: f32) -> Neighborhood<'_> {
        if self.positions.is_empty() {
            return Neighborhood::Empty;
        }

        match self.positions.binary_search_by(|p| p.total_cmp(&position)) {
            Ok(index) => Neighborhood::Exact(self.entries[index].as_ref()),
            Err(index) => {
                let lower = match index {
                    0 => (0.0, None),
                    i => (self.positions[i - 1], self.entries[i - 1].as_ref()),
                };
                let upper = match self.positions.get(index) {
                    Some(&p) => (p, self.entries[index].as_ref()),
                    None => (1.0, None),
                };
                Neighborhood::Between { lower, upper }
            }
        }
    }

    /// Resolve the ring at `position`, interpolating between neighbours.
    ///
    /// `default_ring(position, samples)` builds the default-ellipse ring used
    /// when only one neighbour is a real ring. `None` means the default
    /// ellipse applies. Results are cached per position.
    pub fn resolve_with<F>(&self, position: f32, default_ring: F) -> RingEntry
    where
        F: Fn(f32, usize) -> Ring,
    {
        let position = canonical(position);
        let key = PositionKey::new(position);
        if let Some(hit) = self.cache.borrow().get(&key) {
            return hit.clone();
        }

        log::trace!("Ring cache miss at {:.6}", position);
        let resolved = match self.neighborhood(position) {
            Neighborhood::Empty => None,
            Neighborhood::Exact(entry) => entry.cloned(),
            Neighborhood::Between { lower, upper } => {
                let t = inverse_lerp(lower.0, upper.0, position);
                match (lower.1, upper.1) {
                    (None, None) => None,
                    (Some(a), None) => {
                        let b = default_ring(upper.0, a.sample_count());
                        Some(Arc::new(a.interpolate(&b, t)))
                    }
                    (None, Some(b)) => {
                        let a = default_ring(lower.0, b.sample_count());
                        Some(Arc::new(a.interpolate(b, t)))
                    }
                    (Some(a), Some(b)) => Some(Arc::new(a.interpolate(b, t))),
                }
            }
        };

        self.cache.borrow_mut().insert(key, resolved.clone());
        resolved
    }
}
