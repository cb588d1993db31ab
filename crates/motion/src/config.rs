//! Motion tuning parameters.
//!
//! Every knob the controller reads lives here so a whole feel can be swapped
//! by replacing one struct. Values are metric (meters, seconds, degrees).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How crouch input is turned into crouch intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrouchMode {
    /// Crouch while the key is held.
    #[default]
    Hold,
    /// Each key press flips crouch intent.
    Toggle,
}

/// Interpolation model used by the look, locomotion, crouch and camera easing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingModel {
    /// `lerp(current, target, rate * dt)`. Frame-rate dependent; the default
    /// because all stock tunings were authored against it.
    #[default]
    Linear,
    /// `lerp(current, target, 1 - exp(-rate * dt))`. Frame-rate independent.
    Exponential,
}

impl SmoothingModel {
    /// Fraction of the remaining distance to cover this frame, in `[0, 1]`.
    #[inline]
    pub fn fraction(self, rate: f32, dt: f32) -> f32 {
        let t = match self {
            SmoothingModel::Linear => rate * dt,
            SmoothingModel::Exponential => 1.0 - (-rate * dt).exp(),
        };
        t.clamp(0.0, 1.0)
    }
}

/// Configuration rejected at controller construction.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f32 },

    #[error("crouch_height ({crouch}) must be below standing_height ({standing})")]
    CrouchNotBelowStanding { crouch: f32, standing: f32 },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
}

/// Configuration for the motion controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    // ========================================================================
    // Look
    // ========================================================================
    /// Yaw degrees per unit of raw horizontal look delta.
    pub look_sensitivity_x: f32,

    /// Pitch degrees per unit of raw vertical look delta.
    pub look_sensitivity_y: f32,

    /// Flip the horizontal look axis.
    pub invert_x: bool,

    /// Flip the vertical look axis.
    pub invert_y: bool,

    /// How far up the camera may pitch (degrees, positive).
    pub max_look_up: f32,

    /// How far down the camera may pitch (degrees, positive).
    pub max_look_down: f32,

    /// Look smoothing rate (1/s). Zero applies the target immediately.
    pub look_smoothing: f32,

    /// Capture the cursor when the controller is attached.
    pub capture_cursor_on_start: bool,

    // ========================================================================
    // Locomotion
    // ========================================================================
    /// Walking speed (meters/second).
    pub walk_speed: f32,

    /// Sprinting speed (meters/second).
    pub sprint_speed: f32,

    /// Crouched speed (meters/second).
    pub crouch_speed: f32,

    /// Blend rate toward the target velocity while input is present (1/s).
    pub acceleration: f32,

    /// Blend rate toward rest while input is absent on the ground (1/s).
    pub deceleration: f32,

    /// Multiplier on `acceleration` while airborne (0 = no air control).
    pub air_control: f32,

    /// Blend rate toward rest while input is absent in the air (1/s).
    pub air_deceleration: f32,

    // ========================================================================
    // Jump and gravity
    // ========================================================================
    /// Apex height of a full jump (meters).
    pub jump_height: f32,

    /// Scale applied to the environment gravity constant.
    pub gravity_multiplier: f32,

    /// Extra gravity factor while falling, or rising without jump held.
    pub fall_multiplier: f32,

    /// Maximum fall speed (meters/second, positive).
    pub terminal_velocity: f32,

    /// Vertical velocity pinned while grounded (meters/second, negative).
    pub grounded_bias: f32,

    /// Grace window after leaving the ground in which a jump still fires (s).
    pub coyote_time: f32,

    /// How long a jump press is remembered before landing (s).
    pub jump_buffer_time: f32,

    // ========================================================================
    // Crouch
    // ========================================================================
    /// Hold or toggle crouch intent.
    pub crouch_mode: CrouchMode,

    /// Capsule height when standing (meters).
    pub standing_height: f32,

    /// Capsule height when crouched (meters).
    pub crouch_height: f32,

    /// Height interpolation rate (1/s).
    pub crouch_transition_speed: f32,

    // ========================================================================
    // Head bob
    // ========================================================================
    /// Bob phase speed at walk speed (radians/second).
    pub bob_frequency: f32,

    /// Vertical bob amplitude (meters).
    pub bob_vertical_amplitude: f32,

    /// Horizontal bob amplitude (meters).
    pub bob_horizontal_amplitude: f32,

    /// Horizontal speed above which the body counts as moving (meters/second).
    pub bob_speed_threshold: f32,

    /// Rate at which the camera eases back to rest when not bobbing (1/s).
    pub bob_return_speed: f32,

    // ========================================================================
    // Landing impact
    // ========================================================================
    /// Descent speed a landing must exceed to dip the camera (meters/second).
    pub landing_speed_threshold: f32,

    /// Descent speed that produces the full dip (meters/second).
    pub landing_max_speed: f32,

    /// Camera dip at full strength (meters).
    pub landing_impact_depth: f32,

    /// Rate at which the dip recovers (1/s).
    pub landing_recovery_speed: f32,

    // ========================================================================
    // Field of view
    // ========================================================================
    /// Field of view when not sprinting (degrees).
    pub normal_fov: f32,

    /// Field of view while sprinting (degrees).
    pub sprint_fov: f32,

    /// FOV easing rate (1/s).
    pub fov_transition_speed: f32,

    // ========================================================================
    // Footsteps
    // ========================================================================
    /// Seconds between footsteps while walking.
    pub walk_step_interval: f32,

    /// Seconds between footsteps while sprinting.
    pub sprint_step_interval: f32,

    /// Footstep playback volume (0..1).
    pub footstep_volume: f32,

    /// Lowest randomized footstep pitch.
    pub footstep_pitch_min: f32,

    /// Highest randomized footstep pitch.
    pub footstep_pitch_max: f32,

    /// Footstep clip names handed to the audio collaborator.
    pub footstep_clips: Vec<String>,

    /// Seed for clip and pitch selection.
    pub footstep_seed: u64,

    // ========================================================================
    // Smoothing
    // ========================================================================
    /// Interpolation model for every `rate * dt` blend.
    pub smoothing: SmoothingModel,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            // Look
            look_sensitivity_x: 2.0,
            look_sensitivity_y: 2.0,
            invert_x: false,
            invert_y: false,
            max_look_up: 90.0,
            max_look_down: 90.0,
            look_smoothing: 0.0,
            capture_cursor_on_start: true,

            // Locomotion
            walk_speed: 5.0,
            sprint_speed: 8.0,
            crouch_speed: 2.5,
            acceleration: 10.0,
            deceleration: 10.0,
            air_control: 0.3,
            air_deceleration: 2.0,

            // Jump and gravity
            jump_height: 1.2,
            gravity_multiplier: 2.5,
            fall_multiplier: 1.5,
            terminal_velocity: 50.0,
            grounded_bias: -2.0,
            coyote_time: 0.15,
            jump_buffer_time: 0.2,

            // Crouch
            crouch_mode: CrouchMode::Hold,
            standing_height: 2.0,
            crouch_height: 1.0,
            crouch_transition_speed: 10.0,

            // Head bob
            bob_frequency: 10.0,
            bob_vertical_amplitude: 0.05,
            bob_horizontal_amplitude: 0.025,
            bob_speed_threshold: 0.1,
            bob_return_speed: 10.0,

            // Landing
            landing_speed_threshold: 5.0,
            landing_max_speed: 20.0,
            landing_impact_depth: 0.3,
            landing_recovery_speed: 8.0,

            // FOV
            normal_fov: 60.0,
            sprint_fov: 70.0,
            fov_transition_speed: 8.0,

            // Footsteps
            walk_step_interval: 0.5,
            sprint_step_interval: 0.3,
            footstep_volume: 0.5,
            footstep_pitch_min: 0.9,
            footstep_pitch_max: 1.1,
            footstep_clips: Vec::new(),
            footstep_seed: 0x5EED,

            smoothing: SmoothingModel::Linear,
        }
    }
}

impl MotionConfig {
    /// Snappy, forgiving movement with generous air control.
    pub fn arcade() -> Self {
        Self {
            walk_speed: 7.0,
            sprint_speed: 11.0,
            crouch_speed: 3.5,
            acceleration: 15.0,
            deceleration: 15.0,
            air_control: 0.6,
            jump_height: 1.6,
            coyote_time: 0.2,
            jump_buffer_time: 0.25,
            sprint_fov: 80.0,
            ..Default::default()
        }
    }

    /// Slower, weightier movement with little air control.
    pub fn tactical() -> Self {
        Self {
            walk_speed: 3.5,
            sprint_speed: 5.5,
            crouch_speed: 1.5,
            acceleration: 8.0,
            deceleration: 12.0,
            air_control: 0.05,
            air_deceleration: 0.5,
            jump_height: 0.9,
            coyote_time: 0.1,
            jump_buffer_time: 0.1,
            sprint_fov: 65.0,
            walk_step_interval: 0.6,
            sprint_step_interval: 0.4,
            ..Default::default()
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "arcade" => Some(Self::arcade()),
            "tactical" => Some(Self::tactical()),
            _ => None,
        }
    }

    /// Target horizontal speed for the current movement mode.
    ///
    /// Crouching wins over sprinting.
    pub fn target_speed(&self, is_crouching: bool, is_sprinting: bool) -> f32 {
        if is_crouching {
            self.crouch_speed
        } else if is_sprinting {
            self.sprint_speed
        } else {
            self.walk_speed
        }
    }

    /// Initial vertical velocity that reaches `jump_height` under the flight
    /// gravity (`|gravity| * gravity_multiplier`).
    pub fn jump_velocity(&self, gravity: f32) -> f32 {
        (2.0 * self.jump_height * gravity.abs() * self.gravity_multiplier).sqrt()
    }

    /// Footstep interval for the current movement mode.
    pub fn step_interval(&self, is_sprinting: bool) -> f32 {
        if is_sprinting {
            self.sprint_step_interval
        } else {
            self.walk_step_interval
        }
    }

    /// Check that the configuration describes a usable controller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("crouch_speed", self.crouch_speed),
            ("standing_height", self.standing_height),
            ("crouch_height", self.crouch_height),
            ("gravity_multiplier", self.gravity_multiplier),
            ("fall_multiplier", self.fall_multiplier),
            ("terminal_velocity", self.terminal_velocity),
            ("walk_step_interval", self.walk_step_interval),
            ("sprint_step_interval", self.sprint_step_interval),
            ("landing_max_speed", self.landing_max_speed),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("look_sensitivity_x", self.look_sensitivity_x),
            ("look_sensitivity_y", self.look_sensitivity_y),
            ("max_look_up", self.max_look_up),
            ("max_look_down", self.max_look_down),
            ("look_smoothing", self.look_smoothing),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("air_control", self.air_control),
            ("air_deceleration", self.air_deceleration),
            ("jump_height", self.jump_height),
            ("coyote_time", self.coyote_time),
            ("jump_buffer_time", self.jump_buffer_time),
            ("crouch_transition_speed", self.crouch_transition_speed),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let finite = [
            ("grounded_bias", self.grounded_bias),
            ("bob_frequency", self.bob_frequency),
            ("bob_vertical_amplitude", self.bob_vertical_amplitude),
            ("bob_horizontal_amplitude", self.bob_horizontal_amplitude),
            ("bob_speed_threshold", self.bob_speed_threshold),
            ("bob_return_speed", self.bob_return_speed),
            ("landing_speed_threshold", self.landing_speed_threshold),
            ("landing_impact_depth", self.landing_impact_depth),
            ("landing_recovery_speed", self.landing_recovery_speed),
            ("normal_fov", self.normal_fov),
            ("sprint_fov", self.sprint_fov),
            ("fov_transition_speed", self.fov_transition_speed),
            ("footstep_volume", self.footstep_volume),
            ("footstep_pitch_min", self.footstep_pitch_min),
            ("footstep_pitch_max", self.footstep_pitch_max),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        if self.crouch_height >= self.standing_height {
            return Err(ConfigError::CrouchNotBelowStanding {
                crouch: self.crouch_height,
                standing: self.standing_height,
            });
        }

        if self.footstep_pitch_min > self.footstep_pitch_max {
            return Err(ConfigError::InvertedRange {
                field: "footstep_pitch",
                min: self.footstep_pitch_min,
                max: self.footstep_pitch_max,
            });
        }

        Ok(())
    }
}
