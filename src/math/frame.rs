//! Orientation frames for placing cross-sections along a curve.

use crate::core::types::{Mat3, Quat, Vec3};

/// Rotation taking local +Z to `forward` and local +Y towards `up`.
///
/// `up` is orthogonalized against `forward`. When the two are parallel a
/// fallback reference axis is used, same as any other look rotation.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let forward = forward.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    // Pick a reference axis that is NOT parallel
    let reference = if up.cross(forward).length_squared() > 1e-8 {
        up
    } else if forward.abs_diff_eq(Vec3::Y, 1e-4) || forward.abs_diff_eq(Vec3::NEG_Y, 1e-4) {
        Vec3::X
    } else {
        Vec3::Y
    };

    let right = reference.cross(forward).normalize();
    let up = forward.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}
