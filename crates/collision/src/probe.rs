//! Headroom probes over a [`CollisionWorld`].
//!
//! Two flavours: a single ray straight up from the top of the capsule, and a
//! sphere of the capsule's radius swept up the same span. The ray is cheap
//! but misses ledges that only overhang the edge of the capsule.

use std::sync::Arc;

use glam::Vec3;
use stride_motion::HeadroomProbe;
use tracing::trace;

use crate::flags::ContentFlags;
use crate::trace::TraceShape;
use crate::world::CollisionWorld;

/// Raycast headroom check.
#[derive(Debug, Clone)]
pub struct RayHeadroomProbe {
    world: Arc<CollisionWorld>,
    mask: ContentFlags,
}

impl RayHeadroomProbe {
    pub fn new(world: Arc<CollisionWorld>) -> Self {
        Self {
            world,
            mask: ContentFlags::MASK_PLAYER_SOLID,
        }
    }
}

impl HeadroomProbe for RayHeadroomProbe {
    fn is_obstructed(&self, origin: Vec3, distance: f32) -> bool {
        let hit = self
            .world
            .raycast(origin, Vec3::Y, distance, self.mask)
            .hit_something();
        if hit {
            trace!(distance, "ray headroom blocked");
        }
        hit
    }
}

/// Sphere-sweep headroom check covering the full capsule footprint.
#[derive(Debug, Clone)]
pub struct SweepHeadroomProbe {
    world: Arc<CollisionWorld>,
    radius: f32,
    mask: ContentFlags,
}

impl SweepHeadroomProbe {
    /// `radius` should match the body's capsule radius.
    pub fn new(world: Arc<CollisionWorld>, radius: f32) -> Self {
        Self {
            world,
            radius,
            mask: ContentFlags::MASK_PLAYER_SOLID,
        }
    }
}

impl HeadroomProbe for SweepHeadroomProbe {
    fn is_obstructed(&self, origin: Vec3, distance: f32) -> bool {
        if distance <= 0.0 {
            return false;
        }

        // The sphere sits inside the capsule's upper cap, its top at `origin`
        let start = origin - Vec3::Y * self.radius;
        let shape = TraceShape::Ball {
            radius: self.radius,
        };
        let result = self
            .world
            .trace(start, start + Vec3::Y * distance, shape, self.mask);

        let hit = result.hit_something();
        if hit {
            trace!(distance, fraction = result.fraction, "sweep headroom blocked");
        }
        hit
    }
}
