//! Build-pass assembly of per-branch ring registries
//!
//! A [`SegmentCollector`] gathers rings at skin-range positions during a
//! pre-pass; [`assign_shapers`] then distributes them onto the branches of
//! each skin's chain. Both live for exactly one build.

pub mod collector;
pub mod assignment;

pub use collector::{SegmentCollector, SegmentEntry, SegmentKey};
pub use assignment::{AssignmentReport, assign_shapers, snap_boundary};
