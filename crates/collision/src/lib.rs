//! Stride Collision
//!
//! A static collision world for [`stride_motion`], built on parry3d.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: boxes, convex hulls and triangle meshes with trace
//!   and raycast queries
//! - [`CapsuleBody`]: a [`CharacterBody`](stride_motion::CharacterBody) that
//!   slides along walls and climbs steps
//! - [`RayHeadroomProbe`] / [`SweepHeadroomProbe`]: the two
//!   [`HeadroomProbe`](stride_motion::HeadroomProbe) flavours
//!
//! All positions are capsule centres.

pub mod arena;
mod body;
mod flags;
mod probe;
mod trace;
mod world;

pub use body::{clip_velocity, BodySettings, CapsuleBody};
pub use flags::ContentFlags;
pub use probe::{RayHeadroomProbe, SweepHeadroomProbe};
pub use trace::{TraceResult, TraceShape};
pub use world::{CollisionBrush, CollisionError, CollisionWorld};
