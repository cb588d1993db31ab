//! In-memory collaborators for driving the controller in tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec3;
use stride_motion::{AudioSink, CameraRig, CharacterBody, CursorControl, HeadroomProbe};

pub const DT: f32 = 1.0 / 64.0;

/// Support tolerance for the flat floor (meters).
const GROUND_EPSILON: f32 = 1e-4;

/// A centred capsule over an infinite flat floor.
pub struct FlatBody {
    pub position: Vec3,
    pub height: f32,
    pub step_offset: f32,
    pub yaw: f32,
    /// Floor height; the capsule bottom never goes below it.
    pub floor: f32,
}

impl FlatBody {
    /// Standing on the floor at the origin.
    pub fn standing() -> Self {
        Self::at(Vec3::new(0.0, 1.0, 0.0))
    }

    /// Capsule centre at `position` over a floor at y = 0.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            height: 2.0,
            step_offset: 0.3,
            yaw: 0.0,
            floor: 0.0,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - self.height * 0.5
    }
}

impl CharacterBody for FlatBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn warp_to(&mut self, position: Vec3) {
        self.position = position;
    }

    fn is_grounded(&self) -> bool {
        self.bottom() - self.floor <= GROUND_EPSILON
    }

    fn move_by(&mut self, displacement: Vec3) {
        self.position += displacement;
        let penetration = self.floor - self.bottom();
        if penetration > 0.0 {
            self.position.y += penetration;
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

/// A ceiling at an adjustable world height. `INFINITY` means open sky.
#[derive(Clone)]
pub struct Ceiling {
    pub height: Rc<Cell<f32>>,
}

impl Ceiling {
    pub fn open() -> Self {
        Self {
            height: Rc::new(Cell::new(f32::INFINITY)),
        }
    }
}

impl HeadroomProbe for Ceiling {
    fn is_obstructed(&self, origin: Vec3, distance: f32) -> bool {
        origin.y + distance > self.height.get()
    }
}

/// Last values written to the camera.
#[derive(Debug, Clone, Default)]
pub struct CameraLog {
    pub fov: f32,
    pub offset: Vec3,
    pub pitch: f32,
    pub writes: usize,
}

pub struct RecordingCamera {
    pub log: Rc<RefCell<CameraLog>>,
}

impl RecordingCamera {
    pub fn new() -> (Self, Rc<RefCell<CameraLog>>) {
        let log = Rc::new(RefCell::new(CameraLog {
            fov: 60.0,
            offset: Vec3::new(0.0, 0.8, 0.0),
            ..Default::default()
        }));
        (Self { log: log.clone() }, log)
    }
}

impl CameraRig for RecordingCamera {
    fn fov(&self) -> f32 {
        self.log.borrow().fov
    }

    fn set_fov(&mut self, fov_degrees: f32) {
        let mut log = self.log.borrow_mut();
        log.fov = fov_degrees;
        log.writes += 1;
    }

    fn local_position(&self) -> Vec3 {
        self.log.borrow().offset
    }

    fn set_local_position(&mut self, offset: Vec3) {
        self.log.borrow_mut().offset = offset;
    }

    fn pitch(&self) -> f32 {
        self.log.borrow().pitch
    }

    fn set_pitch(&mut self, pitch_degrees: f32) {
        self.log.borrow_mut().pitch = pitch_degrees;
    }
}

/// Clip name, volume and pitch of every one-shot played.
pub type PlayLog = Rc<RefCell<Vec<(String, f32, f32)>>>;

pub struct RecordingAudio {
    pub played: PlayLog,
}

impl RecordingAudio {
    pub fn new() -> (Self, PlayLog) {
        let played = PlayLog::default();
        (
            Self {
                played: played.clone(),
            },
            played,
        )
    }
}

impl AudioSink for RecordingAudio {
    fn play_once(&mut self, clip: &str, volume: f32, pitch: f32) {
        self.played.borrow_mut().push((clip.to_string(), volume, pitch));
    }
}

pub struct RecordingCursor {
    pub captured: Rc<Cell<bool>>,
}

impl CursorControl for RecordingCursor {
    fn set_captured(&mut self, captured: bool) {
        self.captured.set(captured);
    }
}
