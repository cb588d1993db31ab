//! Jumping with coyote time and input buffering.
//!
//! Reads: `is_grounded`, `time_since_grounded`, `jump_consumed`,
//! `is_crouching`, `current_height`.
//! Writes: `time_since_jump_pressed`, `vertical_velocity`, `jump_consumed`,
//! `wants_to_crouch`.

use glam::Vec3;
use tracing::debug;

use crate::collaborators::HeadroomProbe;
use crate::config::MotionConfig;
use crate::state::{ButtonState, MotionState};

/// What the jump stage did this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpOutcome {
    /// A jump was launched.
    pub jumped: bool,
    /// A jump was due but a crouched player had no room to stand.
    pub suppressed: bool,
}

/// Buffer the press and launch when the player is allowed to.
///
/// A press counts for `jump_buffer_time` seconds, and the player may still
/// jump for `coyote_time` seconds after walking off a ledge. Each ground
/// contact allows one jump.
pub fn update(
    state: &mut MotionState,
    jump: ButtonState,
    dt: f32,
    config: &MotionConfig,
    gravity: f32,
    headroom: &dyn HeadroomProbe,
    body_position: Vec3,
) -> JumpOutcome {
    if jump.down {
        state.time_since_jump_pressed = 0.0;
    } else {
        state.time_since_jump_pressed += dt;
    }

    let eligible = state.in_coyote_window(config.coyote_time)
        && !state.jump_consumed
        && state.time_since_jump_pressed <= config.jump_buffer_time;
    if !eligible {
        return JumpOutcome::default();
    }

    if state.is_crouching {
        let top = body_position + Vec3::Y * (state.current_height * 0.5);
        let clearance = config.standing_height - state.current_height;
        if headroom.is_obstructed(top, clearance) {
            debug!("jump suppressed, no headroom to stand");
            state.time_since_jump_pressed = f32::INFINITY;
            return JumpOutcome {
                jumped: false,
                suppressed: true,
            };
        }
    }

    state.vertical_velocity = config.jump_velocity(gravity);
    state.jump_consumed = true;
    state.time_since_jump_pressed = f32::INFINITY;
    // Jumping stands the player up
    state.wants_to_crouch = false;

    debug!(
        velocity = state.vertical_velocity,
        coyote = !state.is_grounded,
        "jump"
    );

    JumpOutcome {
        jumped: true,
        suppressed: false,
    }
}
