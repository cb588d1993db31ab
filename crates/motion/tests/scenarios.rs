//! Whole-controller scenarios against the flat-floor test double.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::*;
use glam::{Vec2, Vec3};
use stride_motion::{
    ButtonState, Collaborators, FrameInput, MotionConfig, MotionController, OpenSky,
    STANDARD_GRAVITY,
};

type Controller = MotionController<FlatBody, Ceiling>;

fn attach(config: MotionConfig, body: FlatBody) -> (Controller, Ceiling) {
    let ceiling = Ceiling::open();
    let controller =
        MotionController::new(config, Collaborators::new(body, ceiling.clone())).unwrap();
    (controller, ceiling)
}

fn settled(config: MotionConfig) -> (Controller, Ceiling) {
    let (mut controller, ceiling) = attach(config, FlatBody::standing());
    controller.tick(&FrameInput::default(), DT);
    assert!(controller.is_grounded());
    (controller, ceiling)
}

fn press_jump() -> FrameInput {
    FrameInput {
        jump: ButtonState::PRESSED,
        ..Default::default()
    }
}

fn hold_jump() -> FrameInput {
    FrameInput {
        jump: ButtonState::HELD,
        ..Default::default()
    }
}

fn hold_crouch() -> FrameInput {
    FrameInput {
        crouch: ButtonState::HELD,
        ..Default::default()
    }
}

#[test]
fn test_fall_never_exceeds_terminal_velocity() {
    let mut body = FlatBody::standing();
    body.floor = -1.0e6;
    let (mut controller, _) = attach(MotionConfig::default(), body);
    let terminal = controller.config().terminal_velocity;

    for _ in 0..600 {
        controller.tick(&FrameInput::default(), DT);
        assert!(controller.state().vertical_velocity >= -terminal);
    }
    assert_eq!(controller.state().vertical_velocity, -terminal);
}

#[test]
fn test_pitch_stays_within_limits() {
    let (camera, log) = RecordingCamera::new();
    let collaborators = Collaborators::new(FlatBody::standing(), OpenSky).with_camera(camera);
    let mut controller = MotionController::new(MotionConfig::default(), collaborators).unwrap();
    let config = controller.config().clone();

    for delta in [1.0e6, -1.0e6, 3.0e4, -7.0e5] {
        let input = FrameInput {
            look: Vec2::new(0.0, delta),
            ..Default::default()
        };
        controller.tick(&input, DT);

        let pitch = controller.state().current_pitch;
        assert!(pitch >= -config.max_look_up && pitch <= config.max_look_down);
        assert_eq!(log.borrow().pitch, pitch);
    }
}

#[test]
fn test_held_jump_fires_once() {
    let (mut controller, _) = settled(MotionConfig::default());

    let mut jumps = usize::from(controller.tick(&press_jump(), DT).jumped);
    for _ in 0..400 {
        jumps += usize::from(controller.tick(&hold_jump(), DT).jumped);
    }

    assert_eq!(jumps, 1);
    assert!(controller.is_grounded());
}

#[test]
fn test_jump_reaches_configured_height() {
    let (mut controller, _) = settled(MotionConfig::default());
    let launch = controller.config().jump_velocity(STANDARD_GRAVITY);
    assert!((launch - 7.67).abs() < 0.01);

    assert!(controller.tick(&press_jump(), DT).jumped);
    let mut apex: f32 = 0.0;
    for _ in 0..120 {
        controller.tick(&hold_jump(), DT);
        apex = apex.max(controller.body().bottom());
    }

    let height = controller.config().jump_height;
    assert!((apex - height).abs() < 0.1, "apex {apex}");
}

#[test]
fn test_coyote_jump_after_leaving_ledge() {
    let (mut controller, _) = settled(MotionConfig::default());
    controller.body_mut().floor = -100.0;

    for _ in 0..4 {
        controller.tick(&FrameInput::default(), DT);
    }
    assert!(!controller.is_grounded());
    assert!(controller.tick(&press_jump(), DT).jumped);
}

#[test]
fn test_coyote_window_expires() {
    let (mut controller, _) = settled(MotionConfig::default());
    controller.body_mut().floor = -100.0;

    // Past the 0.15 s window at 64 Hz
    for _ in 0..11 {
        controller.tick(&FrameInput::default(), DT);
    }
    assert!(!controller.tick(&press_jump(), DT).jumped);
}

#[test]
fn test_buffered_jump_fires_on_landing() {
    let (mut controller, _) = attach(
        MotionConfig::default(),
        FlatBody::at(Vec3::new(0.0, 3.0, 0.0)),
    );

    let mut pressed = false;
    let mut landing_jump = None;
    for frame in 0..200 {
        let bottom = controller.body().bottom();
        let input = if !pressed && bottom > 1e-3 && bottom < 0.3 {
            pressed = true;
            press_jump()
        } else {
            FrameInput::default()
        };

        let report = controller.tick(&input, DT);
        if report.jumped {
            landing_jump = Some((frame, report));
            break;
        }
    }

    assert!(pressed);
    let (_, report) = landing_jump.expect("buffered jump never fired");
    assert!(report.landed);
}

#[test]
fn test_ceiling_keeps_player_crouched() {
    let (mut controller, ceiling) = settled(MotionConfig::default());

    for _ in 0..128 {
        controller.tick(&hold_crouch(), DT);
    }
    assert!(controller.is_crouching());
    assert_eq!(controller.state().current_height, 1.0);

    ceiling.height.set(1.5);

    // Released, but no room to stand
    let report = controller.tick(&FrameInput::default(), DT);
    assert!(report.stand_blocked);
    assert!(controller.is_crouching());

    // Jumping would stand up, so it is suppressed too
    let report = controller.tick(&press_jump(), DT);
    assert!(report.jump_suppressed);
    assert!(!report.jumped);

    ceiling.height.set(f32::INFINITY);
    for _ in 0..128 {
        controller.tick(&FrameInput::default(), DT);
    }
    assert!(!controller.is_crouching());
    assert_eq!(controller.state().current_height, 2.0);
    assert!(controller.is_grounded());
}

#[test]
fn test_teleport_stops_and_regrounds() {
    let mut body = FlatBody::at(Vec3::new(0.0, 20.0, 0.0));
    body.floor = 0.0;
    let (mut controller, _) = attach(MotionConfig::default(), body);

    for _ in 0..30 {
        controller.tick(&FrameInput::moving(1.0, 1.0), DT);
    }
    assert!(controller.state().vertical_velocity < 0.0);

    controller.teleport(Vec3::new(5.0, 1.0, 5.0));
    assert_eq!(controller.state().velocity(), Vec3::ZERO);
    assert_eq!(controller.body().position, Vec3::new(5.0, 1.0, 5.0));

    controller.tick(&FrameInput::default(), DT);
    assert!(controller.is_grounded());
}

#[test]
fn test_sprint_converges_and_widens_fov() {
    let (camera, log) = RecordingCamera::new();
    let collaborators = Collaborators::new(FlatBody::standing(), OpenSky).with_camera(camera);
    let mut controller = MotionController::new(MotionConfig::default(), collaborators).unwrap();
    controller.tick(&FrameInput::default(), DT);

    let input = FrameInput {
        movement: Vec2::new(0.0, 1.0),
        sprint: ButtonState::HELD,
        ..Default::default()
    };
    for _ in 0..640 {
        controller.tick(&input, DT);
    }

    assert!(controller.is_sprinting());
    assert!((controller.current_speed() - 8.0).abs() < 1e-3);
    assert!((log.borrow().fov - 70.0).abs() < 0.01);
}

#[test]
fn test_walking_footsteps_cadence() {
    let config = MotionConfig {
        footstep_clips: vec!["step_1".into(), "step_2".into(), "step_3".into()],
        ..Default::default()
    };
    let (audio, played) = RecordingAudio::new();
    let collaborators = Collaborators::new(FlatBody::standing(), OpenSky).with_audio(audio);
    let mut controller = MotionController::new(config.clone(), collaborators).unwrap();
    controller.tick(&FrameInput::default(), DT);

    // Two seconds of walking at a 0.5 s interval
    let mut reported = 0;
    for _ in 0..128 {
        if controller.tick(&FrameInput::moving(0.0, 1.0), DT).footstep {
            reported += 1;
        }
    }

    assert_eq!(reported, 4);
    let played = played.borrow();
    assert_eq!(played.len(), 4);
    for (clip, volume, pitch) in played.iter() {
        assert!(config.footstep_clips.contains(clip));
        assert_eq!(*volume, config.footstep_volume);
        assert!(*pitch >= config.footstep_pitch_min && *pitch <= config.footstep_pitch_max);
    }
}

#[test]
fn test_same_seed_same_footsteps() {
    let run = || {
        let config = MotionConfig {
            footstep_clips: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..Default::default()
        };
        let (audio, played) = RecordingAudio::new();
        let collaborators = Collaborators::new(FlatBody::standing(), OpenSky).with_audio(audio);
        let mut controller = MotionController::new(config, collaborators).unwrap();
        for _ in 0..256 {
            controller.tick(&FrameInput::moving(0.0, 1.0), DT);
        }
        let log = played.borrow().clone();
        log
    };

    assert_eq!(run(), run());
}

#[test]
fn test_missing_camera_and_audio_degrade() {
    let (mut controller, _) = settled(MotionConfig::default());

    let input = FrameInput {
        look: Vec2::new(5.0, 2.0),
        movement: Vec2::new(0.3, 1.0),
        jump: ButtonState::PRESSED,
        ..Default::default()
    };
    let report = controller.tick(&input, DT);
    assert!(report.jumped);
    assert!(!report.footstep);

    for _ in 0..200 {
        let report = controller.tick(&FrameInput::moving(0.0, 1.0), DT);
        assert!(!report.footstep);
    }
    assert!(controller.is_grounded());
    assert!(controller.current_speed() > 4.9);
    // Presentation state untouched without a camera
    assert_eq!(controller.state().current_fov, controller.config().normal_fov);
}

#[test]
fn test_audio_without_clips_is_silent() {
    let (audio, played) = RecordingAudio::new();
    let collaborators = Collaborators::new(FlatBody::standing(), OpenSky).with_audio(audio);
    let mut controller = MotionController::new(MotionConfig::default(), collaborators).unwrap();

    for _ in 0..256 {
        controller.tick(&FrameInput::moving(0.0, 1.0), DT);
    }
    assert!(played.borrow().is_empty());
}

#[test]
fn test_cursor_captured_on_attach() {
    let captured = Rc::new(Cell::new(false));
    let cursor = RecordingCursor {
        captured: captured.clone(),
    };
    let collaborators = Collaborators::new(FlatBody::standing(), OpenSky).with_cursor(cursor);
    let mut controller = MotionController::new(MotionConfig::default(), collaborators).unwrap();
    assert!(captured.get());

    controller.set_cursor_capture(false);
    assert!(!captured.get());
}

#[test]
fn test_snapshot_serializes() {
    let (mut controller, _) = settled(MotionConfig::default());
    controller.tick(&FrameInput::moving(0.0, 1.0), DT);

    let json = serde_json::to_value(controller.snapshot()).unwrap();
    assert_eq!(json["grounded"], true);
    assert!(json["speed"].as_f64().unwrap() > 0.0);
}
