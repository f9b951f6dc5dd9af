//! Random ray directions for occlusion sampling.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

/// Uniform direction on the spherical cap around +Z whose half-angle has
/// cosine `cos_half_angle`.
pub fn sample_cone<R: Rng + ?Sized>(rng: &mut R, cos_half_angle: f32) -> Vec3 {
    let z = if cos_half_angle < 1.0 {
        rng.gen_range(cos_half_angle..=1.0)
    } else {
        1.0
    };
    let theta = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    vec3(r * theta.cos(), r * theta.sin(), z)
}

/// Rotation taking +Z onto `normal`. Identity for a zero normal.
pub fn orientation(normal: Vec3) -> Quat {
    match normal.try_normalize() {
        Some(n) => Quat::from_rotation_arc(Vec3::Z, n),
        None => Quat::IDENTITY,
    }
}

/// Mirrors `direction` about the plane with normal `normal`.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}
