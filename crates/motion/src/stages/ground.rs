//! Ground contact sensing.
//!
//! Reads: `is_grounded`, `vertical_velocity`.
//! Writes: `is_grounded`, `was_grounded`, `time_since_grounded`,
//! `jump_consumed`, `vertical_velocity`, `landing_speed`.

use tracing::debug;

use crate::config::MotionConfig;
use crate::state::MotionState;

/// Ground transitions detected this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundEvent {
    /// Airborne last frame, supported now.
    pub landed: bool,
    /// Supported last frame, airborne now.
    pub left_ground: bool,
}

/// Fold the collision collaborator's support report into the state.
///
/// While supported, downward velocity is pinned to `grounded_bias` so the
/// capsule keeps pressing into the floor and the support report stays stable
/// on uneven ground.
pub fn sense(
    state: &mut MotionState,
    supported: bool,
    dt: f32,
    config: &MotionConfig,
) -> GroundEvent {
    state.was_grounded = state.is_grounded;
    state.is_grounded = supported;

    let event = GroundEvent {
        landed: supported && !state.was_grounded,
        left_ground: !supported && state.was_grounded,
    };

    if supported {
        state.landing_speed = if event.landed {
            (-state.vertical_velocity).max(0.0)
        } else {
            0.0
        };
        if event.landed {
            debug!(speed = state.landing_speed, "landed");
        }

        state.time_since_grounded = 0.0;
        // A body still rising off the floor has not settled yet
        if state.vertical_velocity <= 0.0 {
            state.jump_consumed = false;
        }
        if state.vertical_velocity < 0.0 {
            state.vertical_velocity = config.grounded_bias;
        }
    } else {
        state.landing_speed = 0.0;
        state.time_since_grounded += dt;
        if event.left_ground {
            debug!(vertical_velocity = state.vertical_velocity, "left ground");
        }
    }

    event
}
