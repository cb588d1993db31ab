//! Trace results and query shapes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::flags::ContentFlags;

/// Result of sweeping a shape through the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the path the shape got.
    ///
    /// - `1.0` = the full distance
    /// - `0.0` = blocked at the start
    pub fraction: f32,

    /// Shape position where the trace stopped.
    pub end_position: Vec3,

    /// Surface normal at the impact, pointing out of the surface.
    pub hit_normal: Option<Vec3>,

    /// Contents of what was hit.
    pub hit_contents: ContentFlags,

    /// The shape already overlapped solid geometry at the start.
    pub started_in_solid: bool,

    /// The shape could not move at all.
    pub all_solid: bool,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_contents: ContentFlags::EMPTY,
            started_in_solid: false,
            all_solid: false,
        }
    }

    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }
}

/// Shape swept by a trace.
///
/// Positions passed alongside a shape are its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// A vertical capsule.
    Capsule {
        /// Radius of the cylinder and end caps.
        radius: f32,
        /// Total height, caps included.
        height: f32,
    },

    /// A sphere.
    Ball { radius: f32 },

    /// An infinitely small point, for line traces.
    Point,
}

impl TraceShape {
    pub fn capsule(radius: f32, height: f32) -> Self {
        Self::Capsule { radius, height }
    }

    pub fn radius(&self) -> f32 {
        match self {
            Self::Capsule { radius, .. } | Self::Ball { radius } => *radius,
            Self::Point => 0.0,
        }
    }

    /// Distance from the centre to the lowest point.
    pub fn half_height(&self) -> f32 {
        match self {
            Self::Capsule { radius, height } => (height * 0.5).max(*radius),
            Self::Ball { radius } => *radius,
            Self::Point => 0.0,
        }
    }
}
