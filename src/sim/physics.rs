//! Physics engine interface
//!
//! The game logic never integrates motion or detects contacts itself. It talks
//! to a rigid-body engine through [`PhysicsEngine`]: add walls, spawn and remove
//! circular bodies, read positions, and step the world. Contacts between bodies
//! of a watched collision group are reported after the step has resolved them,
//! so a contact handler can only schedule work; it never sees a half-updated
//! world.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a dynamic body (and its single circle shape)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Collision group id; contacts are reported only when both sides share it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionGroup(pub u32);

/// Surface response properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub elasticity: f32,
    pub friction: f32,
}

/// Everything needed to create a dynamic circle
#[derive(Debug, Clone, Copy)]
pub struct CircleDesc {
    pub position: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub material: Material,
    pub group: CollisionGroup,
}

/// A resolved contact between two bodies of the watched group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
    /// Body positions after the step
    pub position_a: Vec2,
    pub position_b: Vec2,
}

/// Rigid-body world as seen by the game
pub trait PhysicsEngine {
    /// Add an immovable wall segment
    fn add_static_segment(&mut self, a: Vec2, b: Vec2, thickness: f32, material: Material);

    /// Create a dynamic circular body
    fn spawn_dynamic_circle(&mut self, desc: CircleDesc) -> BodyHandle;

    /// Remove a body. Returns false (and does nothing) if it is not present.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;

    fn body_position(&self, handle: BodyHandle) -> Option<Vec2>;

    /// All dynamic bodies with their positions, in engine order
    fn bodies(&self) -> Vec<(BodyHandle, Vec2)>;

    /// Advance the world by `dt`, then report each touching pair whose bodies
    /// are both in `watch` exactly once.
    fn step(&mut self, dt: f32, watch: CollisionGroup, on_contact: &mut dyn FnMut(Contact));
}
