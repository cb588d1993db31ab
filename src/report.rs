//! JSON run report.

use std::ops::AddAssign;

use glam::Vec3;
use serde::Serialize;
use stride_motion::{FrameReport, MotionSnapshot};

/// How often each frame event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub skipped: u32,
    pub landings: u32,
    pub left_ground: u32,
    pub jumps: u32,
    pub jumps_suppressed: u32,
    pub stance_changes: u32,
    pub stand_blocked: u32,
    pub footsteps: u32,
}

impl EventCounts {
    pub fn record(&mut self, frame: &FrameReport) {
        self.skipped += u32::from(frame.skipped);
        self.landings += u32::from(frame.landed);
        self.left_ground += u32::from(frame.left_ground);
        self.jumps += u32::from(frame.jumped);
        self.jumps_suppressed += u32::from(frame.jump_suppressed);
        self.stance_changes += u32::from(frame.stance_changed);
        self.stand_blocked += u32::from(frame.stand_blocked);
        self.footsteps += u32::from(frame.footstep);
    }
}

impl AddAssign for EventCounts {
    fn add_assign(&mut self, other: Self) {
        self.skipped += other.skipped;
        self.landings += other.landings;
        self.left_ground += other.left_ground;
        self.jumps += other.jumps;
        self.jumps_suppressed += other.jumps_suppressed;
        self.stance_changes += other.stance_changes;
        self.stand_blocked += other.stand_blocked;
        self.footsteps += other.footsteps;
    }
}

/// State at the end of one timeline segment.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentSummary {
    pub label: String,
    pub start_frame: u64,
    pub frames: u32,
    pub events: EventCounts,
    pub position: Vec3,
    pub motion: MotionSnapshot,
}

/// Where the camera ended up.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CameraSummary {
    pub eye: Vec3,
    pub forward: Vec3,
    pub fov: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub preset: String,
    pub probe: String,
    pub dt: f32,
    pub frames: u64,
    pub segments: Vec<SegmentSummary>,
    pub totals: EventCounts,
    pub position: Vec3,
    pub motion: MotionSnapshot,
    pub camera: Option<CameraSummary>,
}
