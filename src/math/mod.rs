//! Mathematical utilities

pub mod interp;
pub mod frame;

pub use interp::{Lerp, inverse_lerp, normalize_angle};
pub use frame::look_rotation;
