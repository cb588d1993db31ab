//! Horizontal locomotion.
//!
//! Reads: `is_grounded`, `is_crouching`, `current_yaw`, `horizontal_velocity`.
//! Writes: `is_sprinting`, `horizontal_velocity`.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::config::MotionConfig;
use crate::state::MotionState;

/// Squared input magnitude below which the stick counts as centred.
const INPUT_DEADZONE_SQ: f32 = 0.0001;

/// Resolve sprinting and ease horizontal velocity toward the input target.
///
/// `movement` is `(strafe, forward)`. Diagonal input is normalized so it is
/// never faster than a single axis.
pub fn update(
    state: &mut MotionState,
    movement: Vec2,
    sprint_held: bool,
    dt: f32,
    config: &MotionConfig,
) {
    let has_input = movement.length_squared() >= INPUT_DEADZONE_SQ;

    let sprinting = sprint_held
        && has_input
        && movement.y > 0.0
        && !state.is_crouching
        && state.is_grounded;
    if sprinting != state.is_sprinting {
        debug!(sprinting, "sprint state changed");
        state.is_sprinting = sprinting;
    }

    let target = if has_input {
        let input = movement.normalize_or_zero();
        let direction = state.right_direction() * input.x + state.forward_direction() * input.y;
        direction * config.target_speed(state.is_crouching, state.is_sprinting)
    } else {
        Vec3::ZERO
    };

    let rate = match (has_input, state.is_grounded) {
        (true, true) => config.acceleration,
        (true, false) => config.acceleration * config.air_control,
        (false, true) => config.deceleration,
        (false, false) => config.air_deceleration,
    };

    let t = config.smoothing.fraction(rate, dt);
    let mut velocity = state.horizontal_velocity.lerp(target, t);
    velocity.y = 0.0;
    state.horizontal_velocity = velocity;
}
