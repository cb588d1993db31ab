//! Stride scenario runner
//!
//! Drives the motion controller through a scripted input timeline inside
//! the built-in test arena and prints a JSON report to stdout. Logs go to
//! stderr; set `RUST_LOG=stride=debug` for per-footstep output.

mod camera;
mod report;
mod scenario;
mod sinks;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use glam::Vec3;
use stride_collision::{arena, CapsuleBody, RayHeadroomProbe, SweepHeadroomProbe};
use stride_motion::{CharacterBody, Collaborators, HeadroomProbe, MotionController};
use tracing::info;

use camera::FirstPersonCamera;
use report::{CameraSummary, EventCounts, RunReport, SegmentSummary};
use scenario::{Replay, ScenarioFile};
use sinks::{LogAudio, LogCursor};

const DEFAULT_CLIPS: [&str; 4] = [
    "footstep_concrete_1",
    "footstep_concrete_2",
    "footstep_concrete_3",
    "footstep_concrete_4",
];

#[derive(Parser, Debug)]
#[command(name = "stride", version, about = "Replay scripted input through the first-person motion controller")]
struct Args {
    /// Scenario file (TOML) overlaying the preset and replacing the timeline
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run exactly this many frames, trimming or padding the timeline
    #[arg(short, long)]
    frames: Option<u32>,

    /// Fixed frame time in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Footstep RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Tuning preset: default, arcade or tactical
    #[arg(long)]
    preset: Option<String>,

    /// Headroom test used before standing up or jumping from a crouch
    #[arg(long, value_enum, default_value_t = ProbeKind::Sweep)]
    probe: ProbeKind,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ProbeKind {
    /// Single ray from the top of the capsule
    Ray,
    /// Ball swept with the capsule radius
    Sweep,
}

enum Probe {
    Ray(RayHeadroomProbe),
    Sweep(SweepHeadroomProbe),
}

impl HeadroomProbe for Probe {
    fn is_obstructed(&self, origin: Vec3, distance: f32) -> bool {
        match self {
            Probe::Ray(probe) => probe.is_obstructed(origin, distance),
            Probe::Sweep(probe) => probe.is_obstructed(origin, distance),
        }
    }
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("stride=info".parse()?))
        .init();

    let args = Args::parse();
    let report = run(&args)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}

fn run(args: &Args) -> anyhow::Result<RunReport> {
    if !args.dt.is_finite() || args.dt <= 0.0 {
        bail!("--dt must be a positive number of seconds, got {}", args.dt);
    }

    let file = match &args.config {
        Some(path) => scenario::load(path)?,
        None => ScenarioFile::default(),
    };

    let preset = args
        .preset
        .clone()
        .or_else(|| file.preset.clone())
        .unwrap_or_else(|| String::from("default"));
    let mut config = scenario::motion_config(&preset, &file.motion)?;
    if let Some(seed) = args.seed {
        config.footstep_seed = seed;
    }
    if config.footstep_clips.is_empty() {
        config.footstep_clips = DEFAULT_CLIPS.iter().map(|clip| clip.to_string()).collect();
    }

    let world = Arc::new(arena::build().context("building test arena")?);
    info!(brushes = world.brush_count(), "arena ready");

    let spawn = file.spawn.unwrap_or(arena::SPAWN);
    let body = CapsuleBody::new(world.clone(), file.body.clone(), spawn, config.standing_height);
    let probe = match args.probe {
        ProbeKind::Ray => Probe::Ray(RayHeadroomProbe::new(world)),
        ProbeKind::Sweep => Probe::Sweep(SweepHeadroomProbe::new(world, file.body.radius)),
    };

    let collaborators = Collaborators::new(body, probe)
        .with_camera(FirstPersonCamera::default())
        .with_audio(LogAudio)
        .with_cursor(LogCursor);
    let mut controller =
        MotionController::new(config, collaborators).context("invalid motion configuration")?;

    let timeline = if file.timeline.is_empty() {
        scenario::default_timeline()
    } else {
        file.timeline
    };
    let timeline = scenario::fit_to(timeline, args.frames);
    info!(preset = %preset, probe = ?args.probe, segments = timeline.len(), "running scenario");

    let mut replay = Replay::default();
    let mut totals = EventCounts::default();
    let mut segments = Vec::with_capacity(timeline.len());

    for segment in &timeline {
        if let Some(position) = segment.teleport {
            controller.teleport(position);
        }
        if let Some(look) = segment.look_at {
            controller.set_look_direction(look.x, look.y);
        }
        if let Some(impulse) = segment.impulse {
            controller.add_external_force(impulse);
        }

        let start_frame = controller.frame();
        let mut events = EventCounts::default();
        for _ in 0..segment.frames {
            let input = replay.next(segment);
            let frame = controller.tick(&input, args.dt);
            events.record(&frame);
        }

        let position = controller.body().position();
        info!(
            segment = %segment.label,
            x = position.x,
            y = position.y,
            z = position.z,
            grounded = controller.is_grounded(),
            crouching = controller.is_crouching(),
            jumps = events.jumps,
            footsteps = events.footsteps,
            "segment done"
        );

        totals += events;
        segments.push(SegmentSummary {
            label: segment.label.clone(),
            start_frame,
            frames: segment.frames,
            events,
            position,
            motion: controller.snapshot(),
        });
    }

    let position = controller.body().position();
    let yaw = controller.body().yaw();
    let camera = controller.camera().map(|rig| {
        let camera = FirstPersonCamera::from_rig(rig);
        CameraSummary {
            eye: camera.eye(position, yaw),
            forward: camera.forward(yaw),
            fov: camera.fov,
        }
    });

    Ok(RunReport {
        preset,
        probe: format!("{:?}", args.probe).to_lowercase(),
        dt: args.dt,
        frames: controller.frame(),
        segments,
        totals,
        position,
        motion: controller.snapshot(),
        camera,
    })
}
