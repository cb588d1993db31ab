//! Interfaces to the host engine.
//!
//! The controller owns none of the physics, input, audio or camera
//! machinery. It talks to them only through these traits, which keeps the
//! core deterministic and lets tests replay input against a scripted world.
//!
//! Required collaborators are a [`CharacterBody`] and a [`HeadroomProbe`].
//! Camera, audio and cursor control are optional; the stages that need them
//! are skipped when they are missing.

use glam::Vec3;

/// The player's capsule in the host's collision world.
///
/// The capsule is centred on [`position`](Self::position), so shrinking it
/// lifts the feet and growing it lowers them.
pub trait CharacterBody {
    /// Capsule centre in world space.
    fn position(&self) -> Vec3;

    /// Reposition without collision resolution.
    fn warp_to(&mut self, position: Vec3);

    /// Whether the capsule rested on a walkable surface after the last move.
    fn is_grounded(&self) -> bool;

    /// Sweep the capsule by `displacement`, resolving collisions.
    fn move_by(&mut self, displacement: Vec3);

    /// Total capsule height.
    fn height(&self) -> f32;

    /// Change the capsule height, keeping the centre fixed.
    fn set_height(&mut self, height: f32);

    /// Tallest step the capsule climbs automatically.
    fn step_offset(&self) -> f32;

    fn set_step_offset(&mut self, step_offset: f32);

    /// Body yaw in degrees.
    fn yaw(&self) -> f32;

    /// Rotate the body about the vertical axis.
    fn set_yaw(&mut self, yaw_degrees: f32);
}

/// Upward obstruction test used before standing or jumping from a crouch.
pub trait HeadroomProbe {
    /// Whether anything blocks the span from `origin` up by `distance`.
    fn is_obstructed(&self, origin: Vec3, distance: f32) -> bool;
}

/// The camera node parented to the body.
pub trait CameraRig {
    fn fov(&self) -> f32;

    fn set_fov(&mut self, fov_degrees: f32);

    fn local_position(&self) -> Vec3;

    fn set_local_position(&mut self, offset: Vec3);

    fn pitch(&self) -> f32;

    /// Pitch the camera about its local right axis. Never applied to the body.
    fn set_pitch(&mut self, pitch_degrees: f32);
}

/// One-shot audio playback.
pub trait AudioSink {
    fn play_once(&mut self, clip: &str, volume: f32, pitch: f32);
}

/// Engine-level pointer lock.
pub trait CursorControl {
    fn set_captured(&mut self, captured: bool);
}

/// Capabilities injected into [`MotionController`](crate::MotionController).
///
/// `gravity` is the environment's vertical gravitational constant. It
/// always pulls down: the controller uses `-gravity.abs()`, so `9.81` and
/// `-9.81` behave the same.
pub struct Collaborators<B, P> {
    pub body: B,
    pub headroom: P,
    pub gravity: f32,
    pub camera: Option<Box<dyn CameraRig>>,
    pub audio: Option<Box<dyn AudioSink>>,
    pub cursor: Option<Box<dyn CursorControl>>,
}

/// Standard gravity (meters/second², downward).
pub const STANDARD_GRAVITY: f32 = -9.81;

impl<B: CharacterBody, P: HeadroomProbe> Collaborators<B, P> {
    /// Body and probe under standard gravity, with no optional collaborators.
    pub fn new(body: B, headroom: P) -> Self {
        Self {
            body,
            headroom,
            gravity: STANDARD_GRAVITY,
            camera: None,
            audio: None,
            cursor: None,
        }
    }

    /// Override the gravitational constant. Only its magnitude is used.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_camera(mut self, camera: impl CameraRig + 'static) -> Self {
        self.camera = Some(Box::new(camera));
        self
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_cursor(mut self, cursor: impl CursorControl + 'static) -> Self {
        self.cursor = Some(Box::new(cursor));
        self
    }
}

/// A probe that never reports an obstruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSky;

impl HeadroomProbe for OpenSky {
    fn is_obstructed(&self, _origin: Vec3, _distance: f32) -> bool {
        false
    }
}
