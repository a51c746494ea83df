//! Branch skeleton model consumed by the shaper
//!
//! Branches live in a [`Skeleton`] arena and are chained through their
//! follow-up link. A [`Skin`] spans one chain and maps skin-global positions
//! onto individual branches.

pub mod curve;
pub mod branch;
pub mod chain;
pub mod skin;

pub use curve::{BranchCurve, CurveProvider, CurveSample};
pub use branch::{Branch, BranchId, GirthProfile};
pub use chain::Skeleton;
pub use skin::{Skin, SkinRange};
