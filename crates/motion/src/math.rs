//! Small scalar and direction helpers shared by the stages.

use glam::Vec3;

/// Linear interpolation with `t` already clamped by the caller.
#[inline]
pub fn lerp(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t
}

/// Horizontal forward direction for a yaw in degrees.
///
/// Yaw 0 faces +Z, yaw 90 faces +X.
#[inline]
pub fn forward_from_yaw(yaw_degrees: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw_degrees.to_radians().sin_cos();
    Vec3::new(sin_yaw, 0.0, cos_yaw)
}

/// Horizontal right direction for a yaw in degrees.
#[inline]
pub fn right_from_yaw(yaw_degrees: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw_degrees.to_radians().sin_cos();
    Vec3::new(cos_yaw, 0.0, -sin_yaw)
}

/// Drop the vertical component.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}
