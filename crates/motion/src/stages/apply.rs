//! Hand the frame's displacement to the body.
//!
//! Reads: `horizontal_velocity`, `vertical_velocity`.

use glam::Vec3;

use crate::collaborators::CharacterBody;
use crate::state::MotionState;

/// Move the body by `velocity * dt` and return the requested displacement.
///
/// Collision resolution is the body's job; the resulting support state is
/// picked up by the ground stage next frame.
pub fn apply(state: &MotionState, dt: f32, body: &mut dyn CharacterBody) -> Vec3 {
    let displacement = state.velocity() * dt;
    body.move_by(displacement);
    displacement
}
