//! Stance and capsule height.
//!
//! Reads: `wants_to_crouch`, `is_grounded`, `current_height`,
//! `standing_step_offset`.
//! Writes: `wants_to_crouch`, `is_crouching`, `current_height`,
//! `camera_base_offset`.

use glam::Vec3;
use tracing::debug;

use crate::collaborators::{CharacterBody, HeadroomProbe};
use crate::config::{CrouchMode, MotionConfig};
use crate::math::lerp;
use crate::state::{ButtonState, MotionState};

/// Height difference treated as "already there" (meters).
const HEIGHT_EPSILON: f32 = 0.001;

/// What the crouch stage did this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrouchOutcome {
    /// `is_crouching` flipped this frame.
    pub stance_changed: bool,
    /// The player wants to stand but something is overhead.
    pub stand_blocked: bool,
}

/// Resolve intent, arbitrate stance against headroom and resize the capsule.
pub fn update(
    state: &mut MotionState,
    crouch: ButtonState,
    dt: f32,
    config: &MotionConfig,
    body: &mut dyn CharacterBody,
    headroom: &dyn HeadroomProbe,
) -> CrouchOutcome {
    match config.crouch_mode {
        CrouchMode::Hold => state.wants_to_crouch = crouch.held,
        CrouchMode::Toggle => {
            if crouch.down {
                state.wants_to_crouch = !state.wants_to_crouch;
            }
        }
    }

    let was_crouching = state.is_crouching;
    let mut stand_blocked = false;

    let target_height = if state.wants_to_crouch {
        state.is_crouching = true;
        config.crouch_height
    } else if blocked_overhead(state, config, body, headroom) {
        stand_blocked = true;
        state.is_crouching = true;
        config.crouch_height
    } else {
        state.is_crouching = false;
        config.standing_height
    };

    if (target_height - state.current_height).abs() > HEIGHT_EPSILON {
        resize(state, target_height, dt, config, body);
    }

    let step_offset = if state.is_crouching {
        state.standing_step_offset * 0.5
    } else {
        state.standing_step_offset
    };
    body.set_step_offset(step_offset);

    let stance_changed = was_crouching != state.is_crouching;
    if stance_changed {
        debug!(crouching = state.is_crouching, "stance changed");
    }

    CrouchOutcome {
        stance_changed,
        stand_blocked,
    }
}

/// Probe from the current capsule top up by the missing height.
fn blocked_overhead(
    state: &MotionState,
    config: &MotionConfig,
    body: &dyn CharacterBody,
    headroom: &dyn HeadroomProbe,
) -> bool {
    let clearance = config.standing_height - state.current_height;
    if clearance <= HEIGHT_EPSILON {
        return false;
    }
    let top = body.position() + Vec3::Y * (state.current_height * 0.5);
    headroom.is_obstructed(top, clearance)
}

fn resize(
    state: &mut MotionState,
    target_height: f32,
    dt: f32,
    config: &MotionConfig,
    body: &mut dyn CharacterBody,
) {
    let t = config.smoothing.fraction(config.crouch_transition_speed, dt);
    let mut height = lerp(state.current_height, target_height, t);
    if (target_height - height).abs() <= HEIGHT_EPSILON {
        height = target_height;
    }

    let delta = height - state.current_height;
    state.current_height = height;
    body.set_height(height);

    // The capsule grows about its centre; lift it so the feet stay clear of
    // the floor.
    if delta > 0.0 && state.is_grounded {
        body.warp_to(body.position() + Vec3::Y * (delta * 0.5));
    }

    state.camera_base_offset.y =
        state.camera_standing_offset.y - (config.standing_height - height) * 0.5;
}
