//! Camera feel and footstep audio.
//!
//! Reads: `is_grounded`, `is_sprinting`, `horizontal_velocity`,
//! `landing_speed`, `camera_base_offset`.
//! Writes: `landing_impact_offset`, `bob_timer`, `camera_offset`,
//! `current_fov`, `footstep_timer`.
//!
//! Nothing here feeds back into movement. The camera half only runs when a
//! camera is attached and the footstep half only when audio is.

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::collaborators::{AudioSink, CameraRig};
use crate::config::MotionConfig;
use crate::math::lerp;
use crate::state::MotionState;

/// Dip the camera on a hard landing and ease it back up.
pub fn update_landing(state: &mut MotionState, landed: bool, dt: f32, config: &MotionConfig) {
    if landed && state.landing_speed > config.landing_speed_threshold {
        let strength = (state.landing_speed / config.landing_max_speed).min(1.0);
        state.landing_impact_offset = -strength * config.landing_impact_depth;
        trace!(strength, "landing impact");
        return;
    }

    let t = config.smoothing.fraction(config.landing_recovery_speed, dt);
    state.landing_impact_offset = lerp(state.landing_impact_offset, 0.0, t);
}

/// Sway the camera while walking, settle it otherwise.
pub fn update_head_bob(state: &mut MotionState, dt: f32, config: &MotionConfig) {
    let landing = Vec3::Y * state.landing_impact_offset;

    if state.is_grounded && state.horizontal_speed() > config.bob_speed_threshold {
        // Faster movement bobs at a faster cadence
        let pace = state.horizontal_speed() / config.walk_speed;
        state.bob_timer += dt * config.bob_frequency * pace;
        let vertical = state.bob_timer.sin() * config.bob_vertical_amplitude;
        // Half frequency side to side, one sway per two steps
        let horizontal = (state.bob_timer * 0.5).cos() * config.bob_horizontal_amplitude;
        state.camera_offset =
            state.camera_base_offset + Vec3::new(horizontal, vertical, 0.0) + landing;
    } else {
        state.bob_timer = 0.0;
        let rest = state.camera_base_offset + landing;
        let t = config.smoothing.fraction(config.bob_return_speed, dt);
        state.camera_offset = state.camera_offset.lerp(rest, t);
    }
}

/// Widen the view while sprinting.
pub fn update_fov(state: &mut MotionState, dt: f32, config: &MotionConfig) {
    let target = if state.is_sprinting {
        config.sprint_fov
    } else {
        config.normal_fov
    };
    let t = config.smoothing.fraction(config.fov_transition_speed, dt);
    state.current_fov = lerp(state.current_fov, target, t);
}

/// Push the presented offset and field of view to the camera.
pub fn write_camera(state: &MotionState, camera: &mut dyn CameraRig) {
    camera.set_local_position(state.camera_offset);
    camera.set_fov(state.current_fov);
}

/// Advance the step cadence. Returns true when a footstep is due.
pub fn update_footsteps(state: &mut MotionState, dt: f32, config: &MotionConfig) -> bool {
    if !state.is_grounded || state.horizontal_speed() <= config.bob_speed_threshold {
        state.footstep_timer = 0.0;
        return false;
    }

    state.footstep_timer += dt;
    if state.footstep_timer >= config.step_interval(state.is_sprinting) {
        state.footstep_timer = 0.0;
        return true;
    }
    false
}

/// Play a random clip at a random pitch. Does nothing without clips.
pub fn play_footstep<R: Rng + ?Sized>(config: &MotionConfig, rng: &mut R, audio: &mut dyn AudioSink) {
    let Some(clip) = config.footstep_clips.choose(rng) else {
        return;
    };
    let pitch = rng.gen_range(config.footstep_pitch_min..=config.footstep_pitch_max);
    trace!(clip = clip.as_str(), pitch, "footstep");
    audio.play_once(clip, config.footstep_volume, pitch);
}
