//! Core type aliases and re-exports

pub use glam::{
    Vec2, Vec3,
    Mat3,
    Quat,
};

/// Standard Result type for the shaper
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
