//! Stride Motion
//!
//! A first-person character motion controller. It turns per-frame sampled
//! input into body movement, view orientation and camera feel, under a
//! variable time step.
//!
//! # Architecture
//!
//! The controller never touches physics, devices, audio or rendering
//! directly. It owns a single [`MotionState`] and runs eight stages over it
//! each frame:
//!
//! - **Ground**: folds the body's support report into the state
//! - **Look**: yaw on the body, clamped pitch on the camera
//! - **Locomotion**: walk/sprint/crouch speed with accel/decel blending
//! - **Jump**: coyote time, input buffering, one jump per ground contact
//! - **Crouch**: stance arbitration against headroom, capsule resizing
//! - **Gravity**: asymmetric gravity with a terminal speed
//! - **Apply**: hands the displacement to the body
//! - **Presentation**: head bob, landing dip, sprint FOV, footsteps
//!
//! Everything outside the state is reached through the traits in
//! [`collaborators`].
//!
//! # Design Principles
//!
//! 1. **Determinism**: the same inputs, `dt` sequence and seed give the same frames
//! 2. **Graceful degradation**: a missing camera or audio sink skips its stage
//! 3. **No panics in the loop**: bad numbers are clamped or the frame is skipped

pub mod collaborators;
pub mod config;
pub mod controller;
pub mod math;
pub mod stages;
pub mod state;

// Re-export commonly used types
pub use collaborators::{
    AudioSink, CameraRig, CharacterBody, Collaborators, CursorControl, HeadroomProbe, OpenSky,
    STANDARD_GRAVITY,
};
pub use config::{ConfigError, CrouchMode, MotionConfig, SmoothingModel};
pub use controller::{FrameReport, MotionController};
pub use state::{ButtonState, FrameInput, MotionSnapshot, MotionState};
