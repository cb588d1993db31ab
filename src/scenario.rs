//! Scenario files and scripted input.
//!
//! A scenario is an optional TOML file:
//!
//! ```toml
//! preset = "tactical"
//! spawn = [0.0, 1.0, 0.0]
//!
//! [motion]            # overlays the preset
//! walk_speed = 4.5
//! crouch_mode = "toggle"
//!
//! [body]
//! radius = 0.35
//!
//! [[timeline]]
//! label = "walk"
//! frames = 120
//! forward = 1.0
//! ```

use std::path::Path;

use anyhow::{anyhow, Context};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use stride_collision::BodySettings;
use stride_motion::{ButtonState, FrameInput, MotionConfig};

/// Everything a scenario file may set.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioFile {
    pub preset: Option<String>,
    pub spawn: Option<Vec3>,
    /// Partial [`MotionConfig`], merged over the preset.
    pub motion: toml::Table,
    pub body: BodySettings,
    pub timeline: Vec<Segment>,
}

/// A run of frames with constant input.
///
/// Buttons are held for the whole segment. The one-shot actions fire
/// before its first frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Segment {
    pub label: String,
    pub frames: u32,
    pub forward: f32,
    pub strafe: f32,
    /// Raw look delta applied every frame.
    pub look: Vec2,
    pub jump: bool,
    pub sprint: bool,
    pub crouch: bool,
    pub teleport: Option<Vec3>,
    /// `[yaw, pitch]` in degrees.
    pub look_at: Option<Vec2>,
    pub impulse: Option<Vec3>,
}

impl Default for Segment {
    fn default() -> Self {
        Self {
            label: String::from("idle"),
            frames: 0,
            forward: 0.0,
            strafe: 0.0,
            look: Vec2::ZERO,
            jump: false,
            sprint: false,
            crouch: false,
            teleport: None,
            look_at: None,
            impulse: None,
        }
    }
}

impl Segment {
    fn new(label: &str, frames: u32) -> Self {
        Self {
            label: label.to_string(),
            frames,
            ..Default::default()
        }
    }

    fn forward(mut self) -> Self {
        self.forward = 1.0;
        self
    }

    fn crouching(mut self) -> Self {
        self.crouch = true;
        self
    }
}

/// Read and parse a scenario file.
pub fn load(path: &Path) -> anyhow::Result<ScenarioFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
}

/// The named preset with `patch` merged over it.
pub fn motion_config(preset: &str, patch: &toml::Table) -> anyhow::Result<MotionConfig> {
    let base = MotionConfig::preset(preset)
        .ok_or_else(|| anyhow!("unknown preset `{preset}` (expected default, arcade or tactical)"))?;

    let mut value = toml::Value::try_from(&base).context("serializing preset")?;
    if let toml::Value::Table(table) = &mut value {
        merge(table, patch);
    }
    value.try_into().context("invalid [motion] section")
}

fn merge(base: &mut toml::Table, patch: &toml::Table) {
    for (key, value) in patch {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(inner)), toml::Value::Table(patch_inner)) => {
                merge(inner, patch_inner);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Tour of the test arena: the step, a jump, the tunnel and a blast.
pub fn default_timeline() -> Vec<Segment> {
    let mut sprint = Segment::new("sprint onto the step", 15).forward();
    sprint.sprint = true;

    let mut jump = Segment::new("running jump", 60).forward();
    jump.jump = true;

    let mut to_tunnel = Segment::new("face the tunnel", 20);
    to_tunnel.teleport = Some(Vec3::new(-3.5, 1.0, 0.0));
    to_tunnel.look_at = Some(Vec2::new(-90.0, 0.0));

    let mut bump_head = Segment::new("jump under the roof", 5);
    bump_head.jump = true;

    let mut blast = Segment::new("blast", 90);
    blast.impulse = Some(Vec3::new(4.0, 6.0, 0.0));

    let mut look_around = Segment::new("look around", 60);
    look_around.look = Vec2::new(3.0, 0.5);

    vec![
        Segment::new("settle", 30),
        Segment::new("walk to the step", 90).forward(),
        sprint,
        jump,
        to_tunnel,
        Segment::new("crouch", 45).crouching(),
        Segment::new("crawl into the tunnel", 90).forward().crouching(),
        Segment::new("stand under the roof", 30),
        bump_head,
        Segment::new("crawl out", 120).forward().crouching(),
        Segment::new("stand up", 40),
        blast,
        look_around,
    ]
}

/// Trim or pad the timeline to exactly `frames` frames.
pub fn fit_to(mut timeline: Vec<Segment>, frames: Option<u32>) -> Vec<Segment> {
    let Some(limit) = frames else {
        return timeline;
    };

    let mut remaining = limit;
    timeline.retain_mut(|segment| {
        if remaining == 0 {
            return false;
        }
        segment.frames = segment.frames.min(remaining);
        remaining -= segment.frames;
        true
    });
    if remaining > 0 {
        timeline.push(Segment::new("idle", remaining));
    }
    timeline
}

/// Turns held segment buttons into per-frame edges.
#[derive(Debug, Default)]
pub struct Replay {
    jump: bool,
    sprint: bool,
    crouch: bool,
}

impl Replay {
    pub fn next(&mut self, segment: &Segment) -> FrameInput {
        let input = FrameInput {
            look: segment.look,
            movement: Vec2::new(segment.strafe, segment.forward),
            jump: ButtonState::from_levels(segment.jump, self.jump),
            sprint: ButtonState::from_levels(segment.sprint, self.sprint),
            crouch: ButtonState::from_levels(segment.crouch, self.crouch),
        };
        self.jump = segment.jump;
        self.sprint = segment.sprint;
        self.crouch = segment.crouch;
        input
    }
}
