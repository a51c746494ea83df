//! Branch shaper - cross-section geometry for procedural tree limbs
//!
//! Given a position along a branch and a roll angle around its axis, the
//! shaping queries produce a surface point, a surface normal and a surface
//! distance. Branches either use the default tapered ellipse or a registry of
//! explicit cross-section rings distributed by the assignment pass.
//!
//! Typical build flow:
//! 1. Fill a [`assembly::SegmentCollector`] with rings at skin-range positions
//! 2. Run [`assembly::assign_shapers`] once per skin
//! 3. Call [`shaping::side_count`] and the surface queries per mesh ring

pub mod core;
pub mod math;
pub mod skeleton;
pub mod shaping;
pub mod assembly;
pub mod config;
