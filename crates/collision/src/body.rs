//! A capsule body that slides along walls and climbs steps.

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use stride_motion::CharacterBody;
use tracing::trace;

use crate::flags::ContentFlags;
use crate::trace::TraceShape;
use crate::world::CollisionWorld;

/// Maximum number of surfaces a single move slides along.
const MAX_CLIP_PLANES: usize = 5;

/// Displacements shorter than this are dropped (meters).
const MIN_MOVE: f32 = 1e-5;

/// Gap left above a ledge while stepping onto it (meters).
const STEP_CLEARANCE: f32 = 0.01;

/// Collision tuning for [`CapsuleBody`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodySettings {
    /// Capsule radius (meters).
    pub radius: f32,

    /// Minimum normal Y for a walkable surface (0.7 is about 45 degrees).
    pub min_ground_normal: f32,

    /// How far below the feet to look for ground (meters).
    pub ground_probe: f32,

    /// Overbounce when clipping against a surface. Slightly above 1 keeps
    /// the capsule from sticking.
    pub overbounce: f32,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            radius: 0.4,           // 40cm
            min_ground_normal: 0.7,
            ground_probe: 0.05,    // 5cm
            overbounce: 1.001,
        }
    }
}

/// Remove the part of `motion` that goes into a surface.
pub fn clip_velocity(motion: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = motion.dot(normal);
    let backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };
    motion - normal * backoff
}

/// The player capsule in a static [`CollisionWorld`].
///
/// Positions are the capsule centre, matching [`CharacterBody`].
#[derive(Debug, Clone)]
pub struct CapsuleBody {
    world: Arc<CollisionWorld>,
    settings: BodySettings,
    position: Vec3,
    height: f32,
    step_offset: f32,
    yaw: f32,
    grounded: bool,
    ground_normal: Option<Vec3>,
}

impl CapsuleBody {
    /// A capsule centred at `position`, resting on whatever is below it.
    pub fn new(world: Arc<CollisionWorld>, settings: BodySettings, position: Vec3, height: f32) -> Self {
        let mut body = Self {
            world,
            settings,
            position,
            height,
            step_offset: 0.3,
            yaw: 0.0,
            grounded: false,
            ground_normal: None,
        };
        body.depenetrate();
        body.sense_ground(true);
        body
    }

    pub fn with_step_offset(mut self, step_offset: f32) -> Self {
        self.step_offset = step_offset;
        self
    }

    pub fn with_yaw(mut self, yaw_degrees: f32) -> Self {
        self.yaw = yaw_degrees;
        self
    }

    pub fn settings(&self) -> &BodySettings {
        &self.settings
    }

    pub fn world(&self) -> &Arc<CollisionWorld> {
        &self.world
    }

    /// Normal of the surface under the feet, if grounded.
    pub fn ground_normal(&self) -> Option<Vec3> {
        self.ground_normal
    }

    /// Lowest point of the capsule.
    pub fn feet(&self) -> Vec3 {
        self.position - Vec3::Y * self.shape().half_height()
    }

    pub fn shape(&self) -> TraceShape {
        TraceShape::capsule(self.settings.radius, self.height)
    }

    /// Slide along every surface hit. Returns true if anything was touched.
    fn slide(&self, position: &mut Vec3, displacement: Vec3) -> bool {
        let shape = self.shape();
        let mut remaining = displacement;
        let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
        let mut num_planes = 0;

        for _ in 0..MAX_CLIP_PLANES {
            if remaining.length_squared() < MIN_MOVE * MIN_MOVE {
                break;
            }

            let trace = self.world.trace(
                *position,
                *position + remaining,
                shape,
                ContentFlags::MASK_PLAYER_SOLID,
            );
            if trace.all_solid {
                return true;
            }
            *position = trace.end_position;
            if !trace.hit_something() {
                break;
            }

            remaining *= 1.0 - trace.fraction;
            let normal = trace.hit_normal.unwrap_or(Vec3::Y);
            if num_planes < MAX_CLIP_PLANES {
                planes[num_planes] = normal;
                num_planes += 1;
            }

            // Find a clip that leaves every touched plane
            let mut next = None;
            for i in 0..num_planes {
                let clipped = clip_velocity(remaining, planes[i], self.settings.overbounce);
                let valid = (0..num_planes)
                    .filter(|&j| j != i)
                    .all(|j| clipped.dot(planes[j]) >= -0.01);
                if valid {
                    next = Some(clipped);
                    break;
                }
            }

            remaining = match next {
                Some(clipped) => clipped,
                // Wedged in a corner, run along the crease
                None if num_planes >= 2 => {
                    let crease = planes[0].cross(planes[1]).normalize_or_zero();
                    crease * remaining.dot(crease)
                }
                None => Vec3::ZERO,
            };
        }

        num_planes > 0
    }

    /// Slide, and if a riser stopped the horizontal motion, climb onto it
    /// when there is a walkable ledge no higher than `step_offset`.
    fn step_slide(&self, displacement: Vec3) -> Vec3 {
        let start = self.position;
        let mut plain = start;
        let blocked = self.slide(&mut plain, displacement);

        let sideways = horizontal(displacement);
        if !blocked
            || !self.grounded
            || self.step_offset <= 0.0
            || sideways.length_squared() < MIN_MOVE * MIN_MOVE
        {
            return plain;
        }

        let Some(rise) = self.step_rise(start, sideways) else {
            return plain;
        };

        let shape = self.shape();
        let lift = self.world.trace(
            start,
            start + Vec3::Y * (rise + STEP_CLEARANCE),
            shape,
            ContentFlags::MASK_PLAYER_SOLID,
        );
        if lift.hit_something() {
            return plain;
        }

        let mut stepped = lift.end_position;
        self.slide(&mut stepped, sideways);

        // Settle onto the ledge. Touching only its edge leaves the body
        // at ledge height for the next move to carry it over.
        let down = self.world.trace(
            stepped,
            stepped - Vec3::Y * (rise + STEP_CLEARANCE),
            shape,
            ContentFlags::MASK_PLAYER_SOLID,
        );
        let walkable = down
            .hit_normal
            .is_some_and(|n| n.y >= self.settings.min_ground_normal);
        if walkable && !down.all_solid {
            stepped = down.end_position;
        }

        let plain_dist = horizontal(plain - start).length_squared();
        let stepped_dist = horizontal(stepped - start).length_squared();
        if stepped_dist > plain_dist {
            trace!(rise, "stepped up");
            stepped
        } else {
            plain
        }
    }

    /// Height of the walkable ledge ahead, if it can be stepped onto.
    ///
    /// The ledge is probed at least one radius ahead. Closer than that the
    /// rounded bottom of the capsule meets the ledge's edge, whose normal is
    /// too steep to stand on.
    fn step_rise(&self, start: Vec3, sideways: Vec3) -> Option<f32> {
        let shape = self.shape();
        let up = self.world.trace(
            start,
            start + Vec3::Y * self.step_offset,
            shape,
            ContentFlags::MASK_PLAYER_SOLID,
        );
        if up.all_solid {
            return None;
        }

        let reach = sideways.normalize_or_zero() * sideways.length().max(self.settings.radius);
        let mut ahead = up.end_position;
        self.slide(&mut ahead, reach);

        let down = self.world.trace(
            ahead,
            ahead - Vec3::Y * (ahead.y - start.y + self.settings.ground_probe),
            shape,
            ContentFlags::MASK_PLAYER_SOLID,
        );
        let walkable = down
            .hit_normal
            .is_some_and(|n| n.y >= self.settings.min_ground_normal);
        if down.all_solid || !walkable {
            return None;
        }

        let rise = down.end_position.y - start.y;
        (rise > MIN_MOVE && rise <= self.step_offset).then_some(rise)
    }

    /// Push out of anything the capsule overlaps.
    fn depenetrate(&mut self) {
        let shape = self.shape();
        if self.world.point_in_solid(self.position, shape, ContentFlags::MASK_PLAYER_SOLID) {
            self.position =
                self.world
                    .resolve_penetration(self.position, shape, ContentFlags::MASK_PLAYER_SOLID);
        }
    }

    /// Look for walkable ground just below the feet and snap onto it.
    ///
    /// A body moving upward is never grounded.
    fn sense_ground(&mut self, descending: bool) {
        self.grounded = false;
        self.ground_normal = None;
        if !descending {
            return;
        }

        let trace = self.world.trace(
            self.position,
            self.position - Vec3::Y * self.settings.ground_probe,
            self.shape(),
            ContentFlags::MASK_PLAYER_SOLID,
        );
        if !trace.hit_something() || trace.all_solid {
            return;
        }
        if let Some(normal) = trace.hit_normal {
            if normal.y >= self.settings.min_ground_normal {
                self.grounded = true;
                self.ground_normal = Some(normal);
                self.position = trace.end_position;
            }
        }
    }
}

/// Horizontal part of a vector.
#[inline]
fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

impl CharacterBody for CapsuleBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn warp_to(&mut self, position: Vec3) {
        self.position = position;
        self.sense_ground(true);
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn move_by(&mut self, displacement: Vec3) {
        self.depenetrate();
        if displacement.length_squared() >= MIN_MOVE * MIN_MOVE {
            self.position = self.step_slide(displacement);
        }
        // Rising bodies never stick to the floor
        self.sense_ground(displacement.y <= 0.0);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );
        world
    }

    fn body_in(world: CollisionWorld) -> CapsuleBody {
        CapsuleBody::new(Arc::new(world), BodySettings::default(), Vec3::new(0.0, 1.0, 0.0), 2.0)
    }

    #[test]
    fn test_clip_velocity_wall() {
        let clipped = clip_velocity(Vec3::new(10.0, 0.0, 5.0), -Vec3::X, 1.0);
        assert!(clipped.x.abs() < 0.01);
        assert!((clipped.z - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_rests_on_floor() {
        let body = body_in(floor_world());
        assert!(body.is_grounded());
        assert!(body.feet().y.abs() < 0.01);
        assert_eq!(body.ground_normal().map(|n| n.y > 0.99), Some(true));
    }

    #[test]
    fn test_gravity_bias_keeps_contact() {
        let mut body = body_in(floor_world());
        for _ in 0..64 {
            body.move_by(Vec3::new(0.05, -2.0 / 64.0, 0.0));
            assert!(body.is_grounded());
        }
        assert!(body.feet().y.abs() < 0.01);
        assert!((body.position().x - 3.2).abs() < 0.05);
    }

    #[test]
    fn test_rising_leaves_ground() {
        let mut body = body_in(floor_world());
        body.move_by(Vec3::new(0.0, 0.12, 0.0));
        assert!(!body.is_grounded());
        assert!(body.feet().y > 0.1);
    }

    #[test]
    fn test_slides_along_wall() {
        let mut world = floor_world();
        world.add_box(Vec3::new(5.5, 2.0, 0.0), Vec3::new(0.5, 2.0, 10.0), ContentFlags::SOLID);
        let mut body = body_in(world);

        for _ in 0..100 {
            body.move_by(Vec3::new(0.1, 0.0, 0.05));
        }
        // Stopped by the wall face at x = 5 but still moved along it
        assert!(body.position().x < 5.0 - 0.39);
        assert!(body.position().z > 4.0);
    }

    #[test]
    fn test_climbs_step() {
        let mut world = floor_world();
        // 25cm step starting at x = 2
        world.add_box(Vec3::new(4.0, 0.125, 0.0), Vec3::new(2.0, 0.125, 5.0), ContentFlags::SOLID);
        let mut body = body_in(world);

        for _ in 0..60 {
            body.move_by(Vec3::new(0.05, -2.0 / 64.0, 0.0));
        }
        assert!(body.position().x > 2.5);
        assert!((body.feet().y - 0.25).abs() < 0.02);
        assert!(body.is_grounded());
    }

    #[test]
    fn test_step_too_tall() {
        let mut world = floor_world();
        world.add_box(Vec3::new(4.0, 0.25, 0.0), Vec3::new(2.0, 0.25, 5.0), ContentFlags::SOLID);
        let mut body = body_in(world).with_step_offset(0.3);

        for _ in 0..60 {
            body.move_by(Vec3::new(0.05, -2.0 / 64.0, 0.0));
        }
        // 50cm ledge stops the capsule at its face
        assert!(body.position().x < 2.0 - 0.39);
        assert!(body.feet().y.abs() < 0.01);
    }

    #[test]
    fn test_warp_senses_ground() {
        let mut body = body_in(floor_world());
        body.warp_to(Vec3::new(3.0, 10.0, 3.0));
        assert!(!body.is_grounded());

        body.warp_to(Vec3::new(3.0, 1.0, 3.0));
        assert!(body.is_grounded());
    }
}
