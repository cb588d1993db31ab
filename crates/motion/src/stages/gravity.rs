//! Vertical acceleration.
//!
//! Reads: `vertical_velocity`.
//! Writes: `vertical_velocity`.

use crate::config::MotionConfig;
use crate::state::MotionState;

/// Integrate gravity into the vertical velocity.
///
/// Falling, or rising with the jump button released, uses the heavier
/// `fall_multiplier` so short taps give short hops. The result never drops
/// below `-terminal_velocity`.
pub fn update(
    state: &mut MotionState,
    jump_held: bool,
    dt: f32,
    config: &MotionConfig,
    gravity: f32,
) {
    let mut g = gravity * config.gravity_multiplier;

    let descending = state.vertical_velocity < 0.0;
    let cut_short = state.vertical_velocity > 0.0 && !jump_held;
    if descending || cut_short {
        g *= config.fall_multiplier;
    }

    state.vertical_velocity += g * dt;
    state.vertical_velocity = state.vertical_velocity.max(-config.terminal_velocity);
}
