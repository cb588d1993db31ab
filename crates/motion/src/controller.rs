//! The per-frame motion controller.
//!
//! This is the main entry point. It owns the [`MotionState`] and the
//! collaborators, and runs the stages once per frame in a fixed order.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::collaborators::{
    AudioSink, CameraRig, CharacterBody, Collaborators, CursorControl, HeadroomProbe,
};
use crate::config::{ConfigError, MotionConfig};
use crate::math::flatten;
use crate::stages::{apply, crouch, gravity, ground, jump, locomotion, look, presentation};
use crate::state::{AttachPose, FrameInput, MotionSnapshot, MotionState};

/// Discrete events from one [`MotionController::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameReport {
    /// The frame was skipped because `dt` was unusable.
    pub skipped: bool,
    pub landed: bool,
    pub left_ground: bool,
    pub jumped: bool,
    /// A due jump was dropped because a crouched player had no headroom.
    pub jump_suppressed: bool,
    pub stance_changed: bool,
    pub stand_blocked: bool,
    pub footstep: bool,
}

/// First-person motion controller.
///
/// # Example
///
/// ```ignore
/// let collaborators = Collaborators::new(body, probe).with_camera(camera);
/// let mut controller = MotionController::new(MotionConfig::default(), collaborators)?;
///
/// // Each frame:
/// let report = controller.tick(&input, delta_time);
/// ```
pub struct MotionController<B, P> {
    config: MotionConfig,
    state: MotionState,
    body: B,
    headroom: P,
    gravity: f32,
    camera: Option<Box<dyn CameraRig>>,
    audio: Option<Box<dyn AudioSink>>,
    cursor: Option<Box<dyn CursorControl>>,
    rng: StdRng,
    frame: u64,
}

impl<B: CharacterBody, P: HeadroomProbe> MotionController<B, P> {
    /// Validate the configuration and attach to the collaborators.
    ///
    /// The initial yaw, pitch, camera offset, field of view and step offset
    /// are read back from the body and camera. The capsule is set to standing
    /// height.
    pub fn new(
        config: MotionConfig,
        collaborators: Collaborators<B, P>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let Collaborators {
            mut body,
            headroom,
            gravity,
            camera,
            audio,
            cursor,
        } = collaborators;

        let pose = AttachPose {
            yaw: body.yaw(),
            pitch: camera.as_ref().map_or(0.0, |c| c.pitch()),
            camera_offset: camera.as_ref().map_or(Vec3::ZERO, |c| c.local_position()),
            fov: camera.as_ref().map_or(config.normal_fov, |c| c.fov()),
            step_offset: body.step_offset(),
        };
        body.set_height(config.standing_height);

        let state = MotionState::new(&config, pose);
        let rng = StdRng::seed_from_u64(config.footstep_seed);

        let mut controller = Self {
            config,
            state,
            body,
            headroom,
            gravity: -gravity.abs(),
            camera,
            audio,
            cursor,
            rng,
            frame: 0,
        };

        if controller.config.capture_cursor_on_start {
            controller.set_cursor_capture(true);
        }

        debug!(
            yaw = controller.state.current_yaw,
            pitch = controller.state.current_pitch,
            camera = controller.camera.is_some(),
            audio = controller.audio.is_some(),
            "motion controller attached"
        );

        Ok(controller)
    }

    /// Run one frame.
    ///
    /// `dt` is used as given. A frame with a negative or non-finite `dt` is
    /// skipped entirely.
    pub fn tick(&mut self, input: &FrameInput, dt: f32) -> FrameReport {
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, frame = self.frame, "skipping frame with unusable dt");
            return FrameReport {
                skipped: true,
                ..Default::default()
            };
        }
        self.frame += 1;

        let config = &self.config;
        let state = &mut self.state;

        // Sense
        let contact = ground::sense(state, self.body.is_grounded(), dt, config);

        // Look
        look::update(state, input.look, dt, config);
        look::write_body(state, &mut self.body);
        if let Some(camera) = self.camera.as_mut() {
            look::write_camera(state, &mut **camera);
        }

        // Move
        locomotion::update(state, input.movement, input.sprint.held, dt, config);
        let jumped = jump::update(
            state,
            input.jump,
            dt,
            config,
            self.gravity,
            &self.headroom,
            self.body.position(),
        );
        let stance = crouch::update(state, input.crouch, dt, config, &mut self.body, &self.headroom);
        gravity::update(state, input.jump.held, dt, config, self.gravity);
        apply::apply(state, dt, &mut self.body);

        // Present
        if let Some(camera) = self.camera.as_mut() {
            presentation::update_landing(state, contact.landed, dt, config);
            presentation::update_head_bob(state, dt, config);
            presentation::update_fov(state, dt, config);
            presentation::write_camera(state, &mut **camera);
        }

        let mut footstep = false;
        if let Some(audio) = self.audio.as_mut() {
            if !config.footstep_clips.is_empty() && presentation::update_footsteps(state, dt, config)
            {
                presentation::play_footstep(config, &mut self.rng, &mut **audio);
                footstep = true;
            }
        }

        trace!(
            frame = self.frame,
            grounded = state.is_grounded,
            speed = state.horizontal_speed(),
            vertical = state.vertical_velocity,
            height = state.current_height,
            "motion frame"
        );

        FrameReport {
            skipped: false,
            landed: contact.landed,
            left_ground: contact.left_ground,
            jumped: jumped.jumped,
            jump_suppressed: jumped.suppressed,
            stance_changed: stance.stance_changed,
            stand_blocked: stance.stand_blocked,
            footstep,
        }
    }

    // ========================================================================
    // Owner operations
    // ========================================================================

    /// Move the body without collision and stop it.
    ///
    /// Ground contact is re-sensed from the body on the next frame.
    pub fn teleport(&mut self, position: Vec3) {
        self.body.warp_to(position);
        self.state.stop();
        self.state.time_since_jump_pressed = f32::INFINITY;
        debug!(x = position.x, y = position.y, z = position.z, "teleport");
    }

    /// Point the view, clamping pitch. Smoothing is bypassed.
    pub fn set_look_direction(&mut self, yaw_degrees: f32, pitch_degrees: f32) {
        let pitch = pitch_degrees.clamp(-self.config.max_look_up, self.config.max_look_down);
        self.state.target_yaw = yaw_degrees;
        self.state.current_yaw = yaw_degrees;
        self.state.target_pitch = pitch;
        self.state.current_pitch = pitch;

        look::write_body(&self.state, &mut self.body);
        if let Some(camera) = self.camera.as_mut() {
            look::write_camera(&self.state, &mut **camera);
        }
    }

    /// Add an instantaneous velocity change (explosions, launch pads).
    pub fn add_external_force(&mut self, impulse: Vec3) {
        self.state.horizontal_velocity += flatten(impulse);
        self.state.vertical_velocity += impulse.y;

        // Launched off the ground counts as this contact's jump
        if impulse.y > 0.0 && self.state.is_grounded {
            self.state.jump_consumed = true;
        }

        debug!(x = impulse.x, y = impulse.y, z = impulse.z, "external force");
    }

    /// Lock or release the pointer. Look input is ignored while released.
    pub fn set_cursor_capture(&mut self, captured: bool) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.set_captured(captured);
        }
        if self.state.cursor_captured != captured {
            debug!(captured, "cursor capture changed");
        }
        self.state.cursor_captured = captured;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded
    }

    pub fn is_sprinting(&self) -> bool {
        self.state.is_sprinting
    }

    pub fn is_crouching(&self) -> bool {
        self.state.is_crouching
    }

    /// Horizontal speed (meters/second).
    pub fn current_speed(&self) -> f32 {
        self.state.horizontal_speed()
    }

    pub fn snapshot(&self) -> MotionSnapshot {
        self.state.snapshot()
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Frames run so far, not counting skipped ones.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn headroom(&self) -> &P {
        &self.headroom
    }

    pub fn camera(&self) -> Option<&dyn CameraRig> {
        self.camera.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::OpenSky;
    use crate::state::ButtonState;
    use glam::Vec2;

    const DT: f32 = 1.0 / 64.0;

    /// Body resting on an infinite floor at y = 0.
    struct Floor {
        position: Vec3,
        height: f32,
        step_offset: f32,
        yaw: f32,
    }

    impl Floor {
        fn new() -> Self {
            Self {
                position: Vec3::new(0.0, 1.0, 0.0),
                height: 2.0,
                step_offset: 0.3,
                yaw: 0.0,
            }
        }

        fn bottom(&self) -> f32 {
            self.position.y - self.height * 0.5
        }
    }

    impl CharacterBody for Floor {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn warp_to(&mut self, position: Vec3) {
            self.position = position;
        }
        fn is_grounded(&self) -> bool {
            self.bottom() <= 1e-4
        }
        fn move_by(&mut self, displacement: Vec3) {
            self.position += displacement;
            let bottom = self.bottom();
            if bottom < 0.0 {
                self.position.y -= bottom;
            }
        }
        fn height(&self) -> f32 {
            self.height
        }
        fn set_height(&mut self, height: f32) {
            self.height = height;
        }
        fn step_offset(&self) -> f32 {
            self.step_offset
        }
        fn set_step_offset(&mut self, step_offset: f32) {
            self.step_offset = step_offset;
        }
        fn yaw(&self) -> f32 {
            self.yaw
        }
        fn set_yaw(&mut self, yaw_degrees: f32) {
            self.yaw = yaw_degrees;
        }
    }

    fn controller() -> MotionController<Floor, OpenSky> {
        MotionController::new(
            MotionConfig::default(),
            Collaborators::new(Floor::new(), OpenSky),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MotionConfig {
            walk_speed: -1.0,
            ..Default::default()
        };
        let result = MotionController::new(config, Collaborators::new(Floor::new(), OpenSky));
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_dt_skips_frame() {
        let mut controller = controller();
        let before = controller.state().clone();

        let report = controller.tick(&FrameInput::moving(0.0, 1.0), f32::NAN);
        assert!(report.skipped);
        assert_eq!(controller.state(), &before);
        assert_eq!(controller.frame(), 0);

        assert!(controller.tick(&FrameInput::default(), -0.1).skipped);
    }

    #[test]
    fn test_first_frame_lands() {
        let mut controller = controller();
        let report = controller.tick(&FrameInput::default(), DT);
        assert!(report.landed);
        assert!(controller.is_grounded());
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut controller = controller();
        controller.tick(&FrameInput::default(), DT);

        let input = FrameInput {
            jump: ButtonState::PRESSED,
            ..Default::default()
        };
        let report = controller.tick(&input, DT);
        assert!(report.jumped);
        assert!(controller.body().position.y > 1.0);

        let report = controller.tick(&FrameInput::default(), DT);
        assert!(report.left_ground);
        assert!(!controller.is_grounded());
    }

    #[test]
    fn test_positive_gravity_still_pulls_down() {
        let mut controller = MotionController::new(
            MotionConfig::default(),
            Collaborators::new(Floor::new(), OpenSky).with_gravity(9.81),
        )
        .unwrap();
        controller.teleport(Vec3::new(0.0, 5.0, 0.0));

        controller.tick(&FrameInput::default(), DT);
        assert!(controller.state().vertical_velocity < 0.0);
        assert!(controller.body().position.y < 5.0);
    }

    #[test]
    fn test_set_look_direction_clamps_and_writes_body() {
        let mut controller = controller();
        controller.set_look_direction(45.0, 500.0);

        assert_eq!(controller.state().current_yaw, 45.0);
        assert_eq!(controller.state().current_pitch, controller.config().max_look_down);
        assert_eq!(controller.body().yaw, 45.0);
    }

    #[test]
    fn test_cursor_capture_gates_look() {
        let mut controller = controller();
        assert!(controller.state().cursor_captured);

        controller.set_cursor_capture(false);
        let input = FrameInput {
            look: Vec2::new(10.0, 0.0),
            ..Default::default()
        };
        controller.tick(&input, DT);
        assert_eq!(controller.state().current_yaw, 0.0);

        controller.set_cursor_capture(true);
        controller.tick(&input, DT);
        assert!(controller.state().current_yaw > 0.0);
    }

    #[test]
    fn test_external_force_consumes_jump() {
        let mut controller = controller();
        controller.tick(&FrameInput::default(), DT);

        controller.add_external_force(Vec3::new(3.0, 6.0, 0.0));
        assert!(controller.state().jump_consumed);
        assert_eq!(controller.state().horizontal_velocity.x, 3.0);

        // Pressing jump in the coyote window after the launch does nothing
        controller.tick(&FrameInput::default(), DT);
        let input = FrameInput {
            jump: ButtonState::PRESSED,
            ..Default::default()
        };
        assert!(!controller.tick(&input, DT).jumped);
    }
}
