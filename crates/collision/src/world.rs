//! Static collision geometry and the queries the player capsule needs.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{contact, Ray, RayCast};
use parry3d::shape::SharedShape;
use thiserror::Error;

use crate::flags::ContentFlags;
use crate::trace::{TraceResult, TraceShape};

/// Traces shorter than this only test the start position.
const MIN_TRACE_DISTANCE: f32 = 0.0001;

/// Longest march step for point traces (meters).
const MIN_MARCH_STEP: f32 = 0.05;

/// 12 halvings put the impact within 1/4096 of the bracketing step.
const BISECTION_STEPS: usize = 12;

/// Extra push when resolving penetration (meters).
const PENETRATION_SLOP: f32 = 0.001;

/// Geometry rejected while building the world.
#[derive(Debug, Error, PartialEq)]
pub enum CollisionError {
    #[error("could not build a convex hull from {points} points")]
    InvalidHull { points: usize },

    #[error("invalid triangle mesh: {reason}")]
    InvalidMesh { reason: String },
}

/// A piece of collision geometry.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    pub id: u32,
    pub shape: SharedShape,
    pub transform: Isometry<Real>,
    pub contents: ContentFlags,
}

/// Static world geometry.
///
/// Immutable once built; share it between the body and the probes with an
/// `Arc`.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned box.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> u32 {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);
        self.push(shape, transform, contents)
    }

    /// Add the convex hull of `points` (world space).
    pub fn add_convex_hull(
        &mut self,
        points: &[Vec3],
        contents: ContentFlags,
    ) -> Result<u32, CollisionError> {
        let invalid = CollisionError::InvalidHull {
            points: points.len(),
        };
        if !spans_volume(points) {
            return Err(invalid);
        }
        let hull_points: Vec<Point<Real>> = points.iter().copied().map(to_point).collect();
        let shape = SharedShape::convex_hull(&hull_points).ok_or(invalid)?;
        Ok(self.push(shape, Isometry::identity(), contents))
    }

    /// Add a triangle mesh (world space, 3 indices per triangle).
    ///
    /// Meshes are surfaces, not volumes; use them for floors and ramps that
    /// the capsule only ever touches from one side.
    pub fn add_triangle_mesh(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        contents: ContentFlags,
    ) -> Result<u32, CollisionError> {
        if indices.is_empty() {
            return Err(CollisionError::InvalidMesh {
                reason: "no triangles".to_string(),
            });
        }

        let mut triangles = Vec::with_capacity(indices.len());
        for (triangle, corners) in indices.iter().enumerate() {
            let mut points = [Point::origin(); 3];
            for (slot, &index) in points.iter_mut().zip(corners) {
                let vertex = vertices.get(index as usize).ok_or_else(|| {
                    CollisionError::InvalidMesh {
                        reason: format!(
                            "triangle {triangle} uses vertex {index} of {}",
                            vertices.len()
                        ),
                    }
                })?;
                *slot = to_point(*vertex);
            }
            let [a, b, c] = points;
            triangles.push((Isometry::identity(), SharedShape::triangle(a, b, c)));
        }

        let shape = SharedShape::compound(triangles);
        Ok(self.push(shape, Isometry::identity(), contents))
    }

    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    pub fn brushes(&self) -> &[CollisionBrush] {
        &self.brushes
    }

    /// Sweep `shape` from `start` to `end` (centre positions).
    ///
    /// The path is marched in steps no longer than the shape radius, so
    /// thin brushes are not skipped, then the first blocked step is bisected.
    pub fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape, mask: ContentFlags) -> TraceResult {
        let delta = end - start;
        let distance = delta.length();
        let started_in_solid = self.contents_at(start, shape, mask).is_some();

        if distance < MIN_TRACE_DISTANCE {
            return if started_in_solid {
                TraceResult {
                    fraction: 0.0,
                    end_position: start,
                    hit_normal: Some(Vec3::Y),
                    hit_contents: ContentFlags::SOLID,
                    started_in_solid: true,
                    all_solid: true,
                }
            } else {
                TraceResult::no_hit(start)
            };
        }

        let step = shape.radius().max(MIN_MARCH_STEP);
        let samples = (distance / step).ceil().max(1.0) as usize;

        let mut lo = 0.0_f32;
        let mut blocked = None;
        for i in 1..=samples {
            let fraction = i as f32 / samples as f32;
            if let Some(contents) = self.contents_at(start + delta * fraction, shape, mask) {
                blocked = Some((fraction, contents));
                break;
            }
            lo = fraction;
        }

        let Some((mut hi, hit_contents)) = blocked else {
            return TraceResult {
                started_in_solid,
                ..TraceResult::no_hit(end)
            };
        };

        for _ in 0..BISECTION_STEPS {
            let mid = (lo + hi) * 0.5;
            if self.point_in_solid(start + delta * mid, shape, mask) {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        // The push-out direction at the first blocked spot is the surface normal
        let inside = start + delta * hi;
        let push = self.resolve_penetration(inside, shape, mask) - inside;
        let hit_normal = if push.length_squared() > 1e-8 {
            push.normalize()
        } else {
            let back = Vec3::new(-delta.x, 0.0, -delta.z);
            if back.length_squared() > 1e-8 {
                back.normalize()
            } else {
                -delta / distance
            }
        };

        TraceResult {
            fraction: lo,
            end_position: start + delta * lo,
            hit_normal: Some(hit_normal),
            hit_contents,
            started_in_solid,
            all_solid: started_in_solid && lo < 0.001,
        }
    }

    /// Cast a ray and report the closest hit.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: ContentFlags,
    ) -> TraceResult {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return TraceResult::no_hit(origin);
        }

        let ray = Ray::new(to_point(origin), to_vector(dir));

        let mut closest: Option<(f32, &CollisionBrush)> = None;
        for brush in self.brushes.iter().filter(|b| mask.intersects(b.contents)) {
            if let Some(toi) = brush.shape.cast_ray(&brush.transform, &ray, max_distance, true) {
                if closest.map_or(true, |(best, _)| toi < best) {
                    closest = Some((toi, brush));
                }
            }
        }

        let Some((distance, brush)) = closest else {
            return TraceResult::no_hit(origin + dir * max_distance);
        };

        let normal = brush
            .shape
            .cast_ray_and_get_normal(&brush.transform, &ray, max_distance, true)
            .map_or(-dir, |hit| from_vector(hit.normal));

        TraceResult {
            fraction: distance / max_distance,
            end_position: origin + dir * distance,
            hit_normal: Some(normal),
            hit_contents: brush.contents,
            started_in_solid: distance <= 0.0,
            all_solid: false,
        }
    }

    /// Whether `shape` centred at `position` overlaps anything in `mask`.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> bool {
        self.contents_at(position, shape, mask).is_some()
    }

    /// Push `shape` out of everything it overlaps. Returns the new centre.
    pub fn resolve_penetration(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> Vec3 {
        let query = parry_shape(shape);
        let transform = translation(position);

        let mut correction = Vec3::ZERO;
        for brush in self.brushes.iter().filter(|b| mask.intersects(b.contents)) {
            if let Ok(Some(hit)) = contact(
                &transform,
                query.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
                0.0,
            ) {
                // Negative distance is penetration depth
                let depth = -hit.dist;
                if depth > 0.0 {
                    correction += from_vector(-hit.normal1.into_inner()) * (depth + PENETRATION_SLOP);
                }
            }
        }

        position + correction
    }

    /// Contents of the first brush in `mask` that `shape` overlaps.
    fn contents_at(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> Option<ContentFlags> {
        let query = parry_shape(shape);
        let transform = translation(position);

        self.brushes
            .iter()
            .filter(|b| mask.intersects(b.contents))
            .find(|brush| {
                matches!(
                    contact(
                        &transform,
                        query.as_ref(),
                        &brush.transform,
                        brush.shape.as_ref(),
                        0.0,
                    ),
                    Ok(Some(hit)) if hit.dist < 0.0
                )
            })
            .map(|brush| brush.contents)
    }

    fn push(&mut self, shape: SharedShape, transform: Isometry<Real>, contents: ContentFlags) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            contents,
        });
        id
    }
}

/// Whether the points enclose a non-zero volume.
fn spans_volume(points: &[Vec3]) -> bool {
    const EPSILON: f32 = 1e-6;

    let Some((&origin, rest)) = points.split_first() else {
        return false;
    };
    let Some(a) = rest.iter().map(|p| *p - origin).find(|d| d.length_squared() > EPSILON) else {
        return false;
    };
    let Some(normal) = rest
        .iter()
        .map(|p| a.cross(*p - origin))
        .find(|n| n.length_squared() > EPSILON)
    else {
        return false;
    };
    rest.iter().any(|p| normal.dot(*p - origin).abs() > EPSILON)
}

// ============================================================================
// glam <-> parry
// ============================================================================

fn parry_shape(shape: TraceShape) -> SharedShape {
    match shape {
        TraceShape::Capsule { radius, height } => {
            let half_segment = (height * 0.5 - radius).max(0.0);
            SharedShape::capsule_y(half_segment, radius)
        }
        TraceShape::Ball { radius } => SharedShape::ball(radius),
        TraceShape::Point => SharedShape::ball(0.001),
    }
}

#[inline]
fn translation(v: Vec3) -> Isometry<Real> {
    Isometry::translation(v.x, v.y, v.z)
}

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
fn from_vector(v: Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}
