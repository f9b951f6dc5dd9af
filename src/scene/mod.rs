//! Spatial queries the brush and the baker need from the host scene.
//!
//! The painter never owns colliders itself. Hosts with a physics engine
//! implement [`PaintScene`] over it; [`MeshScene`] is a self-contained
//! implementation over the paint targets' own triangles.

mod colliders;
mod mesh_scene;

pub use colliders::TemporaryColliders;
pub use mesh_scene::MeshScene;

use bevy::prelude::*;

use crate::target::{PaintTarget, TargetId};

/// First intersection along a line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// The target whose collider was hit.
    pub target: TargetId,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the segment start to the hit point.
    pub distance: f32,
    /// Surface normal at the hit, facing the segment start.
    pub normal: Vec3,
}

/// Geometry queries provided by the host scene.
pub trait PaintScene {
    /// Targets whose collider intersects the sphere.
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<TargetId>;

    /// The nearest hit on the segment from `start` to `end`, if any.
    fn linecast(&self, start: Vec3, end: Vec3) -> Option<RayHit>;

    fn has_collider(&self, id: TargetId) -> bool;

    /// Adds (or rebuilds) a collider for `target`.
    fn insert_collider(&mut self, id: TargetId, target: &PaintTarget);

    fn remove_collider(&mut self, id: TargetId);
}
