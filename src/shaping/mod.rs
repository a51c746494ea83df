//! Branch surface shaping
//!
//! - [`Ring`]: one explicit cross-section
//! - [`SectionTable`]: taper and cap scaling of the default ellipse
//! - [`RingRegistry`]: rings keyed by branch position, with a resolve cache
//! - [`ShaperKind`]: per-branch strategy answering the surface queries
//! - [`side_count`]: polygon resolution for a cross-section

pub mod ring;
pub mod section;
pub mod registry;
pub mod shaper;
pub mod cross_section;
pub mod sides;

pub use ring::{Ring, ellipse_normal, ellipse_point, value_at_angle};
pub use section::{Section, SectionTable};
pub use registry::{RingEntry, RingRegistry};
pub use shaper::{CustomShaper, ShaperKind, ShaperOrigin};
pub use cross_section::{CrossSection, cross_section};
pub use sides::{ResolutionParams, side_count};
