//! First-person camera for the runner.

use glam::{Quat, Vec3};
use stride_motion::CameraRig;

/// A camera parented to the player body.
///
/// The motion controller owns its local offset, pitch and field of view;
/// yaw comes from the body.
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    /// Offset from the body centre, in body space.
    pub local_offset: Vec3,

    /// Pitch in degrees, positive looking down.
    pub pitch: f32,

    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            local_offset: Vec3::new(0.0, 0.8, 0.0), // 20cm below the top of a 2m capsule
            pitch: 0.0,
            fov: 60.0,
        }
    }
}

impl FirstPersonCamera {
    /// Copy the current pose out of a rig.
    pub fn from_rig(rig: &dyn CameraRig) -> Self {
        Self {
            local_offset: rig.local_position(),
            pitch: rig.pitch(),
            fov: rig.fov(),
        }
    }

    /// Eye position for a body at `body_position` facing `yaw_degrees`.
    pub fn eye(&self, body_position: Vec3, yaw_degrees: f32) -> Vec3 {
        body_position + Quat::from_rotation_y(yaw_degrees.to_radians()) * self.local_offset
    }

    /// View direction. Yaw 0 looks along +Z.
    pub fn forward(&self, yaw_degrees: f32) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        let (sin_yaw, cos_yaw) = yaw_degrees.to_radians().sin_cos();
        Vec3::new(sin_yaw * cos_pitch, -sin_pitch, cos_yaw * cos_pitch)
    }
}

impl CameraRig for FirstPersonCamera {
    fn fov(&self) -> f32 {
        self.fov
    }

    fn set_fov(&mut self, fov_degrees: f32) {
        self.fov = fov_degrees;
    }

    fn local_position(&self) -> Vec3 {
        self.local_offset
    }

    fn set_local_position(&mut self, offset: Vec3) {
        self.local_offset = offset;
    }

    fn pitch(&self) -> f32 {
        self.pitch
    }

    fn set_pitch(&mut self, pitch_degrees: f32) {
        self.pitch = pitch_degrees;
    }
}
