//! Degree-based angle wrapping and pitch/yaw <-> quaternion conversion.

use glam::{Quat, Vec2, Vec3};

/// Local forward axis of every rig, camera and character frame.
pub const FORWARD: Vec3 = Vec3::NEG_Z;

/// Local back axis (the direction a follow camera trails its subject).
pub const BACK: Vec3 = Vec3::Z;

/// Wrap an angle into `[-180, 180)`.
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Shortest signed difference `target - current`, in `[-180, 180)`.
#[inline]
pub fn delta_degrees(current: f32, target: f32) -> f32 {
    wrap_degrees(target - current)
}

/// Rotation for a `(pitch, yaw)` pair in degrees: yaw around +Y, then pitch
/// around the yawed +X.
pub fn rotation_from_euler(euler: Vec2) -> Quat {
    Quat::from_rotation_y(euler.y.to_radians()) * Quat::from_rotation_x(euler.x.to_radians())
}

/// Rotation around world +Y only.
#[inline]
pub fn yaw_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw.to_radians())
}

/// `(pitch, yaw)` in degrees whose rotation maps [`FORWARD`] onto `dir`.
///
/// Zero-length input yields `(0, 0)`. Looking straight up or down keeps
/// yaw at 0 because it is undefined there.
pub fn euler_from_direction(dir: Vec3) -> Vec2 {
    let d = dir.normalize_or_zero();
    if d == Vec3::ZERO {
        return Vec2::ZERO;
    }
    let pitch = d.y.clamp(-1.0, 1.0).asin().to_degrees();
    let horizontal = Vec2::new(d.x, d.z);
    let yaw = if horizontal.length_squared() < 1e-12 {
        0.0
    } else {
        (-d.x).atan2(-d.z).to_degrees()
    };
    Vec2::new(pitch, wrap_degrees(yaw))
}

/// `(pitch, yaw)` of a rotation, ignoring roll.
pub fn euler_from_rotation(rotation: Quat) -> Vec2 {
    euler_from_direction(rotation * FORWARD)
}
