//! Mouse look.
//!
//! Reads: `cursor_captured`, `target_yaw`, `target_pitch`.
//! Writes: `target_yaw`, `target_pitch`, `current_yaw`, `current_pitch`.
//!
//! Yaw turns the body, pitch turns only the camera. Positive pitch looks
//! down, so a positive (upward) vertical delta decreases pitch.

use glam::Vec2;

use crate::collaborators::{CameraRig, CharacterBody};
use crate::config::MotionConfig;
use crate::math::lerp;
use crate::state::MotionState;

/// Accumulate the look delta into the targets and ease toward them.
///
/// Deltas are raw device units and are not scaled by `dt`. They are ignored
/// while the cursor is released.
pub fn update(state: &mut MotionState, delta: Vec2, dt: f32, config: &MotionConfig) {
    if state.cursor_captured {
        let mut dx = delta.x * config.look_sensitivity_x;
        let mut dy = delta.y * config.look_sensitivity_y;
        if config.invert_x {
            dx = -dx;
        }
        if config.invert_y {
            dy = -dy;
        }

        state.target_yaw += dx;
        state.target_pitch -= dy;
    }

    state.target_pitch = state
        .target_pitch
        .clamp(-config.max_look_up, config.max_look_down);

    if config.look_smoothing > 0.0 {
        let t = config.smoothing.fraction(config.look_smoothing, dt);
        state.current_yaw = lerp(state.current_yaw, state.target_yaw, t);
        state.current_pitch = lerp(state.current_pitch, state.target_pitch, t);
    } else {
        state.current_yaw = state.target_yaw;
        state.current_pitch = state.target_pitch;
    }

    wrap_yaw(state);
}

/// Keep yaw bounded over long sessions.
///
/// Both angles shift by the same whole turn so smoothing never sees a jump.
fn wrap_yaw(state: &mut MotionState) {
    let turns = (state.current_yaw / 360.0).trunc();
    if turns != 0.0 {
        state.current_yaw -= turns * 360.0;
        state.target_yaw -= turns * 360.0;
    }
}

/// Write yaw to the body.
pub fn write_body(state: &MotionState, body: &mut dyn CharacterBody) {
    body.set_yaw(state.current_yaw);
}

/// Write pitch to the camera.
pub fn write_camera(state: &MotionState, camera: &mut dyn CameraRig) {
    camera.set_pitch(state.current_pitch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    const DT: f32 = 1.0 / 64.0;

    fn captured(config: &MotionConfig) -> MotionState {
        let mut state = test_state(config);
        state.cursor_captured = true;
        state
    }

    #[test]
    fn test_look_applies_sensitivity() {
        let config = MotionConfig::default();
        let mut state = captured(&config);

        update(&mut state, Vec2::new(3.0, 0.0), DT, &config);
        assert_eq!(state.current_yaw, 3.0 * config.look_sensitivity_x);

        // Upward delta looks up, which is negative pitch
        update(&mut state, Vec2::new(0.0, 5.0), DT, &config);
        assert_eq!(state.current_pitch, -5.0 * config.look_sensitivity_y);
    }

    #[test]
    fn test_invert_y() {
        let config = MotionConfig {
            invert_y: true,
            ..Default::default()
        };
        let mut state = captured(&config);

        update(&mut state, Vec2::new(0.0, 5.0), DT, &config);
        assert!(state.current_pitch > 0.0);
    }

    #[test]
    fn test_pitch_clamped() {
        let config = MotionConfig::default();
        let mut state = captured(&config);

        update(&mut state, Vec2::new(0.0, 10_000.0), DT, &config);
        assert_eq!(state.target_pitch, -config.max_look_up);
        assert_eq!(state.current_pitch, -config.max_look_up);

        update(&mut state, Vec2::new(0.0, -1.0e9), DT, &config);
        assert_eq!(state.current_pitch, config.max_look_down);
    }

    #[test]
    fn test_released_cursor_ignores_delta() {
        let config = MotionConfig::default();
        let mut state = test_state(&config);

        update(&mut state, Vec2::new(50.0, 50.0), DT, &config);
        assert_eq!(state.current_yaw, 0.0);
        assert_eq!(state.current_pitch, 0.0);
    }

    #[test]
    fn test_smoothing_eases_toward_target() {
        let config = MotionConfig {
            look_smoothing: 16.0,
            ..Default::default()
        };
        let mut state = captured(&config);

        update(&mut state, Vec2::new(10.0, 0.0), DT, &config);
        assert!(state.current_yaw > 0.0);
        assert!(state.current_yaw < state.target_yaw);

        for _ in 0..256 {
            update(&mut state, Vec2::ZERO, DT, &config);
        }
        assert!((state.current_yaw - state.target_yaw).abs() < 1e-3);
    }

    #[test]
    fn test_yaw_wraps_together() {
        let config = MotionConfig::default();
        let mut state = captured(&config);

        update(&mut state, Vec2::new(200.0, 0.0), DT, &config);
        assert!(state.current_yaw.abs() < 360.0);
        assert_eq!(state.current_yaw, state.target_yaw);
        assert!((state.current_yaw - 40.0).abs() < 1e-3);
    }
}
