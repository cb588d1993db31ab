//! Motion state and per-frame input structures.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::MotionConfig;
use crate::math::{forward_from_yaw, right_from_yaw};

/// A digital button sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    /// The button went down this frame.
    pub down: bool,
    /// The button is currently held.
    pub held: bool,
}

impl ButtonState {
    /// A button pressed this frame (and therefore held).
    pub const PRESSED: Self = Self {
        down: true,
        held: true,
    };

    /// A button held from an earlier frame.
    pub const HELD: Self = Self {
        down: false,
        held: true,
    };

    /// A released button.
    pub const RELEASED: Self = Self {
        down: false,
        held: false,
    };

    /// Derive the state from this frame's and last frame's raw level.
    pub fn from_levels(held: bool, was_held: bool) -> Self {
        Self {
            down: held && !was_held,
            held,
        }
    }
}

/// Already-sampled input for a single frame.
///
/// The controller never polls devices; the owner fills this in and hands it
/// to [`MotionController::tick`](crate::MotionController::tick).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Raw look delta (x = horizontal, y = vertical, positive = up).
    pub look: Vec2,

    /// Raw movement axes (x = strafe right, y = forward).
    pub movement: Vec2,

    /// Jump button.
    pub jump: ButtonState,

    /// Sprint button.
    pub sprint: ButtonState,

    /// Crouch button.
    pub crouch: ButtonState,
}

impl FrameInput {
    /// Input with only movement axes set.
    pub fn moving(x: f32, z: f32) -> Self {
        Self {
            movement: Vec2::new(x, z),
            ..Default::default()
        }
    }
}

/// Pose read from the collaborators when the controller is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachPose {
    /// Body yaw (degrees).
    pub yaw: f32,
    /// Camera pitch (degrees).
    pub pitch: f32,
    /// Camera local offset at standing height.
    pub camera_offset: Vec3,
    /// Camera field of view (degrees).
    pub fov: f32,
    /// Body step-climb allowance while standing (meters).
    pub step_offset: f32,
}

/// The complete per-frame motion record.
///
/// Owned by one controller and mutated once per frame by the stages in
/// [`crate::stages`]. Each stage documents which fields it reads and writes.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    // Kinematics
    /// Horizontal velocity; `y` is always zero.
    pub horizontal_velocity: Vec3,
    /// Vertical velocity, never below `-terminal_velocity` after gravity.
    pub vertical_velocity: f32,

    // Ground contact
    pub is_grounded: bool,
    /// Last frame's `is_grounded`.
    pub was_grounded: bool,
    pub time_since_grounded: f32,
    /// Descent speed captured on the landing edge, before the grounded bias.
    pub landing_speed: f32,

    // Jump
    /// Seconds since the last jump press; `+inf` when nothing is pending.
    pub time_since_jump_pressed: f32,
    /// Cleared only on grounded frames.
    pub jump_consumed: bool,

    // Stance
    pub current_height: f32,
    /// Arbitrated stance. Stays true while headroom blocks standing.
    pub is_crouching: bool,
    /// Raw crouch intent.
    pub wants_to_crouch: bool,
    pub is_sprinting: bool,
    /// Step-climb allowance while standing.
    pub standing_step_offset: f32,

    // Look (degrees)
    pub current_yaw: f32,
    pub current_pitch: f32,
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub cursor_captured: bool,

    // Camera presentation
    /// Camera offset captured at attach, standing height.
    pub camera_standing_offset: Vec3,
    /// Stance-tracked camera offset before bob and landing.
    pub camera_base_offset: Vec3,
    /// Offset last written to the camera.
    pub camera_offset: Vec3,
    pub current_fov: f32,
    pub bob_timer: f32,
    pub landing_impact_offset: f32,
    pub footstep_timer: f32,
}

impl MotionState {
    /// Create the state for a freshly attached controller.
    pub fn new(config: &MotionConfig, pose: AttachPose) -> Self {
        let pitch = pose.pitch.clamp(-config.max_look_up, config.max_look_down);
        Self {
            horizontal_velocity: Vec3::ZERO,
            vertical_velocity: 0.0,
            is_grounded: false,
            was_grounded: false,
            time_since_grounded: 0.0,
            landing_speed: 0.0,
            time_since_jump_pressed: f32::INFINITY,
            jump_consumed: false,
            current_height: config.standing_height,
            is_crouching: false,
            wants_to_crouch: false,
            is_sprinting: false,
            standing_step_offset: pose.step_offset,
            current_yaw: pose.yaw,
            current_pitch: pitch,
            target_yaw: pose.yaw,
            target_pitch: pitch,
            cursor_captured: false,
            camera_standing_offset: pose.camera_offset,
            camera_base_offset: pose.camera_offset,
            camera_offset: pose.camera_offset,
            current_fov: pose.fov,
            bob_timer: 0.0,
            landing_impact_offset: 0.0,
            footstep_timer: 0.0,
        }
    }

    /// Horizontal speed (meters/second).
    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_velocity.length()
    }

    /// Full velocity vector.
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.horizontal_velocity + Vec3::Y * self.vertical_velocity
    }

    /// Body forward direction (horizontal only).
    #[inline]
    pub fn forward_direction(&self) -> Vec3 {
        forward_from_yaw(self.current_yaw)
    }

    /// Body right direction (horizontal only).
    #[inline]
    pub fn right_direction(&self) -> Vec3 {
        right_from_yaw(self.current_yaw)
    }

    /// Whether a jump is still inside the coyote window.
    #[inline]
    pub fn in_coyote_window(&self, coyote_time: f32) -> bool {
        self.is_grounded || self.time_since_grounded <= coyote_time
    }

    /// Zero every velocity component.
    pub fn stop(&mut self) {
        self.horizontal_velocity = Vec3::ZERO;
        self.vertical_velocity = 0.0;
    }

    /// Read-only copy for polling between frames.
    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            grounded: self.is_grounded,
            sprinting: self.is_sprinting,
            crouching: self.is_crouching,
            speed: self.horizontal_speed(),
            horizontal_velocity: self.horizontal_velocity,
            vertical_velocity: self.vertical_velocity,
            yaw: self.current_yaw,
            pitch: self.current_pitch,
            height: self.current_height,
            fov: self.current_fov,
        }
    }
}

/// Derived state exposed to the rest of the application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSnapshot {
    pub grounded: bool,
    pub sprinting: bool,
    pub crouching: bool,
    /// Horizontal speed (meters/second).
    pub speed: f32,
    pub horizontal_velocity: Vec3,
    pub vertical_velocity: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub height: f32,
    pub fov: f32,
}

/// Standing state with a neutral pose, for stage tests.
#[cfg(test)]
pub(crate) fn test_state(config: &MotionConfig) -> MotionState {
    MotionState::new(
        config,
        AttachPose {
            yaw: 0.0,
            pitch: 0.0,
            camera_offset: Vec3::new(0.0, 0.8, 0.0),
            fov: config.normal_fov,
            step_offset: 0.3,
        },
    )
}
