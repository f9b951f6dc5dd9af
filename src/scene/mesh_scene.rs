//! Triangle-mesh implementation of [`PaintScene`].

use std::collections::BTreeMap;

use bevy::math::Vec3A;
use bevy::math::bounding::{Aabb3d, BoundingSphere, IntersectsVolume, RayCast3d};
use bevy::prelude::*;

use super::{PaintScene, RayHit};
use crate::target::{PaintTarget, PaintTargets, TargetId};

/// Padding added to collider bounds so flat meshes have non-zero thickness.
const BOUNDS_PADDING: f32 = 1e-4;

/// World-space triangles of one target plus their bounds.
#[derive(Clone, Debug)]
struct TriangleCollider {
    bounds: Aabb3d,
    triangles: Vec<[Vec3; 3]>,
}

impl TriangleCollider {
    fn from_target(target: &PaintTarget) -> Self {
        let positions = target.world_positions();

        let triangles = match target.indices() {
            Some(indices) => indices
                .chunks_exact(3)
                .filter_map(|tri| {
                    Some([
                        *positions.get(tri[0] as usize)?,
                        *positions.get(tri[1] as usize)?,
                        *positions.get(tri[2] as usize)?,
                    ])
                })
                .collect(),
            None => positions
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
                .collect(),
        };

        let (min, max) = positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), &p| (min.min(p), max.max(p)),
        );
        let bounds = if positions.is_empty() {
            Aabb3d::new(Vec3::ZERO, Vec3::ZERO)
        } else {
            Aabb3d {
                min: Vec3A::from(min - Vec3::splat(BOUNDS_PADDING)),
                max: Vec3A::from(max + Vec3::splat(BOUNDS_PADDING)),
            }
        };

        Self { bounds, triangles }
    }
}

/// Brute-force scene over the world-space triangles of paint targets.
///
/// Targets without indices are treated as a plain triangle list. Colliders
/// are snapshots: call [`PaintScene::insert_collider`] again after moving or
/// editing a target.
///
/// Line casts are single-sided by default, hitting only faces whose
/// counter-clockwise front side points toward the segment start.
#[derive(Resource, Clone, Debug, Default)]
pub struct MeshScene {
    colliders: BTreeMap<TargetId, TriangleCollider>,
    /// Also report hits on back faces.
    pub double_sided: bool,
}

impl MeshScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds colliders for every target in the registry.
    pub fn from_targets(targets: &PaintTargets) -> Self {
        let mut scene = Self::new();
        for (id, target) in targets.iter() {
            scene.insert_collider(id, target);
        }
        scene
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl PaintScene for MeshScene {
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<TargetId> {
        let sphere = BoundingSphere::new(center, radius.max(0.0));
        self.colliders
            .iter()
            .filter(|(_, collider)| sphere.intersects(&collider.bounds))
            .map(|(&id, _)| id)
            .collect()
    }

    fn linecast(&self, start: Vec3, end: Vec3) -> Option<RayHit> {
        let length = start.distance(end);
        let direction = Dir3::new(end - start).ok()?;
        let ray = RayCast3d::new(start, direction, length);

        let mut nearest: Option<RayHit> = None;
        for (&id, collider) in &self.colliders {
            if ray.aabb_intersection_at(&collider.bounds).is_none() {
                continue;
            }
            for triangle in &collider.triangles {
                let Some((distance, normal)) =
                    intersect_triangle(start, *direction, triangle, self.double_sided)
                else {
                    continue;
                };
                if distance <= length && nearest.is_none_or(|hit| distance < hit.distance) {
                    nearest = Some(RayHit {
                        target: id,
                        point: start + *direction * distance,
                        distance,
                        normal,
                    });
                }
            }
        }
        nearest
    }

    fn has_collider(&self, id: TargetId) -> bool {
        self.colliders.contains_key(&id)
    }

    fn insert_collider(&mut self, id: TargetId, target: &PaintTarget) {
        self.colliders.insert(id, TriangleCollider::from_target(target));
    }

    fn remove_collider(&mut self, id: TargetId) {
        self.colliders.remove(&id);
    }
}

/// Möller–Trumbore ray/triangle test.
///
/// Returns the distance along `direction` (unit length) and the triangle
/// normal oriented toward the ray origin.
fn intersect_triangle(
    origin: Vec3,
    direction: Vec3,
    [a, b, c]: &[Vec3; 3],
    double_sided: bool,
) -> Option<(f32, Vec3)> {
    let edge1 = *b - *a;
    let edge2 = *c - *a;
    let p = direction.cross(edge2);
    let det = edge1.dot(p);

    // det > 0 means the ray travels against the counter-clockwise normal.
    if det.abs() < f32::EPSILON || (!double_sided && det < 0.0) {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - *a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    if t <= f32::EPSILON {
        return None;
    }

    let normal = edge1.cross(edge2).normalize_or_zero();
    Some((t, if det > 0.0 { normal } else { -normal }))
}
