//! A small test arena.
//!
//! ```text
//!            +z (north wall)
//!   +-------------------------+
//!   |          step           |
//!   |       [=======]         |
//!   |                         |
//!   | tunnel     spawn   ramp |
//!   | [####]       *    /|    |
//!   |                         |
//!   |   ~water~   platform    |
//!   +-------------------------+
//! ```
//!
//! The tunnel ceiling is low enough that a standing capsule cannot fit but a
//! crouched one can.

use glam::Vec3;

use crate::flags::ContentFlags;
use crate::world::{CollisionError, CollisionWorld};

/// Half the floor width (meters).
pub const HALF_EXTENT: f32 = 20.0;

/// Capsule centre for a 2m standing body at the spawn point.
pub const SPAWN: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Height of the step riser (meters).
pub const STEP_HEIGHT: f32 = 0.25;

/// Near edge of the step, along +Z.
pub const STEP_EDGE_Z: f32 = 6.0;

/// Underside of the tunnel ceiling (meters).
pub const TUNNEL_CEILING: f32 = 1.5;

/// Centre of the tunnel on the floor.
pub const TUNNEL_CENTER: Vec3 = Vec3::new(-8.0, 0.0, 0.0);

/// Build the arena.
pub fn build() -> Result<CollisionWorld, CollisionError> {
    let mut world = CollisionWorld::new();

    // Floor, top at y = 0
    world.add_box(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(HALF_EXTENT, 0.5, HALF_EXTENT),
        ContentFlags::SOLID,
    );

    // Perimeter walls
    let wall_height = 4.0;
    for (center, half) in [
        (Vec3::new(0.0, wall_height, HALF_EXTENT + 0.5), Vec3::new(HALF_EXTENT, wall_height, 0.5)),
        (Vec3::new(0.0, wall_height, -HALF_EXTENT - 0.5), Vec3::new(HALF_EXTENT, wall_height, 0.5)),
        (Vec3::new(HALF_EXTENT + 0.5, wall_height, 0.0), Vec3::new(0.5, wall_height, HALF_EXTENT)),
        (Vec3::new(-HALF_EXTENT - 0.5, wall_height, 0.0), Vec3::new(0.5, wall_height, HALF_EXTENT)),
    ] {
        world.add_box(center, half, ContentFlags::SOLID);
    }

    // Step, 4m deep
    world.add_box(
        Vec3::new(0.0, STEP_HEIGHT * 0.5, STEP_EDGE_Z + 2.0),
        Vec3::new(3.0, STEP_HEIGHT * 0.5, 2.0),
        ContentFlags::SOLID,
    );

    // Tunnel: two side walls and a slab roof
    let roof_thickness = 0.5;
    world.add_box(
        TUNNEL_CENTER + Vec3::new(0.0, TUNNEL_CEILING + roof_thickness * 0.5, 0.0),
        Vec3::new(2.0, roof_thickness * 0.5, 1.5),
        ContentFlags::SOLID,
    );
    for side in [-1.0, 1.0] {
        world.add_box(
            TUNNEL_CENTER + Vec3::new(0.0, TUNNEL_CEILING * 0.5, side * 1.75),
            Vec3::new(2.0, TUNNEL_CEILING * 0.5, 0.25),
            ContentFlags::SOLID,
        );
    }

    // Ramp wedge rising toward +X
    world.add_convex_hull(
        &[
            Vec3::new(8.0, 0.0, -2.0),
            Vec3::new(8.0, 0.0, 2.0),
            Vec3::new(12.0, 0.0, -2.0),
            Vec3::new(12.0, 0.0, 2.0),
            Vec3::new(12.0, 1.5, -2.0),
            Vec3::new(12.0, 1.5, 2.0),
        ],
        ContentFlags::SOLID,
    )?;

    // Raised platform surface
    world.add_triangle_mesh(
        &[
            Vec3::new(4.0, 1.0, -12.0),
            Vec3::new(8.0, 1.0, -12.0),
            Vec3::new(8.0, 1.0, -8.0),
            Vec3::new(4.0, 1.0, -8.0),
        ],
        &[[0, 2, 1], [0, 3, 2]],
        ContentFlags::SOLID,
    )?;

    // Water pool and a trigger at the spawn; neither blocks the capsule
    world.add_box(
        Vec3::new(-8.0, 0.5, -10.0),
        Vec3::new(2.0, 0.5, 2.0),
        ContentFlags::WATER,
    );
    world.add_box(SPAWN, Vec3::new(1.0, 1.0, 1.0), ContentFlags::TRIGGER);

    Ok(world)
}
