//! Error types for the branch shaper
//!
//! Only construction and IO can fail. Surface queries never return errors,
//! they fall back to the default ellipse instead.

use thiserror::Error;

use crate::skeleton::BranchId;

/// Main error type for the shaper
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ring sequences differ in length: {angles} angles, {points} points, {normals} normals")]
    RingLengthMismatch {
        angles: usize,
        points: usize,
        normals: usize,
    },

    #[error("ring has no samples")]
    EmptyRing,

    #[error("ring needs at least 2 samples, got {0}")]
    TooFewSamples(usize),

    #[error("invalid section range {from}..{to}")]
    InvalidSection { from: f32, to: f32 },

    #[error("unknown branch {0:?}")]
    UnknownBranch(BranchId),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
