//! The per-frame pipeline.
//!
//! Each stage is a free function over an exclusive `&mut MotionState`, run by
//! [`MotionController::tick`](crate::MotionController::tick) in this order:
//!
//! ```text
//! ground ─► look ─► locomotion ─► jump ─► crouch ─► gravity ─► apply ─► presentation
//! ```
//!
//! Stages only talk to each other through the state record. The field list in
//! each module's docs is the full set it touches.

pub mod apply;
pub mod crouch;
pub mod gravity;
pub mod ground;
pub mod jump;
pub mod locomotion;
pub mod look;
pub mod presentation;
