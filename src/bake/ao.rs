//! Ambient occlusion baked into each target's active paint layer.

use std::ops::ControlFlow;

use bevy::color::LinearRgba;
use bevy::log::{info, warn};
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::sampling::{orientation, reflect, sample_cone};
use crate::color::{BlendMode, ChannelMask, lerp_color};
use crate::error::PainterError;
use crate::scene::{PaintScene, TemporaryColliders};
use crate::target::{PaintTarget, PaintTargets, TargetId};

/// How baked occlusion combines with the target layer's existing colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AoBlendMode {
    /// Masked channels take the occlusion color.
    #[default]
    Replace,
    /// Masked channels are multiplied by the occlusion color.
    Multiply,
}

impl AoBlendMode {
    fn layer_blend(self) -> BlendMode {
        match self {
            AoBlendMode::Replace => BlendMode::Normal,
            AoBlendMode::Multiply => BlendMode::Multiply,
        }
    }
}

/// Ambient occlusion bake parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AoSettings {
    /// Rays per vertex. Zero bakes every vertex as unoccluded.
    ///
    /// Default: 256
    pub samples: u32,

    /// Full cone angle around the normal, in degrees, clamped to `[0, 180]`.
    ///
    /// Default: 162.0
    pub spread: f32,

    /// Ray length. Hits closer than this occlude more.
    ///
    /// Default: 4.0
    pub max_distance: f32,

    /// Default: 1.0
    pub intensity: f32,

    /// Ray start offset off the surface.
    ///
    /// Default: 0.1
    pub bias: f32,

    /// Color of fully occluded vertices.
    pub min_color: LinearRgba,

    /// Color of unoccluded vertices.
    pub max_color: LinearRgba,

    /// Default: RGB
    pub channel_mask: ChannelMask,

    pub blend_mode: AoBlendMode,

    /// Fixed seed for reproducible bakes. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for AoSettings {
    fn default() -> Self {
        Self {
            samples: 256,
            spread: 162.0,
            max_distance: 4.0,
            intensity: 1.0,
            bias: 0.1,
            min_color: LinearRgba::BLACK,
            max_color: LinearRgba::WHITE,
            channel_mask: ChannelMask::RGB,
            blend_mode: AoBlendMode::Replace,
            seed: None,
        }
    }
}

/// Reported before each target is baked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BakeProgress {
    /// The target about to be baked.
    pub target: TargetId,
    /// Targets finished so far.
    pub completed: usize,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BakeReport {
    pub targets: usize,
    pub vertices: usize,
    pub rays: u64,
}

/// Bakes ambient occlusion into the target layer of every listed target.
///
/// See [`bake_ambient_occlusion_with_progress`].
pub fn bake_ambient_occlusion<S: PaintScene + ?Sized>(
    targets: &mut PaintTargets,
    ids: &[TargetId],
    scene: &mut S,
    settings: &AoSettings,
) -> Result<BakeReport, PainterError> {
    bake_ambient_occlusion_with_progress(targets, ids, scene, settings, |_| ControlFlow::Continue(()))
}

/// Bakes ambient occlusion, reporting progress before each target.
///
/// Every listed target blocks rays for the duration of the bake; targets the
/// scene has no collider for get a temporary one. The occlusion color is
/// combined into the target layer per [`AoSettings::blend_mode`], the layer's
/// transparency is set to 1 everywhere and the output is recomposited.
///
/// Returning [`ControlFlow::Break`] from `on_progress` stops with
/// [`PainterError::BakeCancelled`]. Targets already baked keep their result;
/// the rest are untouched.
pub fn bake_ambient_occlusion_with_progress<S, F>(
    targets: &mut PaintTargets,
    ids: &[TargetId],
    scene: &mut S,
    settings: &AoSettings,
    mut on_progress: F,
) -> Result<BakeReport, PainterError>
where
    S: PaintScene + ?Sized,
    F: FnMut(BakeProgress) -> ControlFlow<()>,
{
    for &id in ids {
        let target = targets.try_get(id)?;
        if target.layer_stack().target_layer().is_some()
            && target.normals().len() != target.vertex_count()
        {
            return Err(PainterError::MissingNormals {
                expected: target.vertex_count(),
                found: target.normals().len(),
            });
        }
    }

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let scene = TemporaryColliders::acquire(scene, targets, ids);

    info!(
        "Baking ambient occlusion for {} targets with {} samples",
        ids.len(),
        settings.samples
    );

    let mut report = BakeReport::default();
    for (completed, &id) in ids.iter().enumerate() {
        let progress = BakeProgress {
            target: id,
            completed,
            total: ids.len(),
        };
        if on_progress(progress).is_break() {
            warn!("Bake cancelled after {} of {} targets", completed, ids.len());
            return Err(PainterError::BakeCancelled);
        }

        let target = targets.try_get(id)?;
        let Some(existing) = target.layer_stack().target_layer().map(|layer| layer.colors().to_vec())
        else {
            warn!("Skipping '{}': no target layer", target.name);
            continue;
        };
        let vertex_count = target.vertex_count();

        let occlusion = occlusion_colors(target, &*scene, settings, &mut rng, &mut report.rays);
        let blend = settings.blend_mode.layer_blend();
        let colors: Vec<LinearRgba> = occlusion
            .iter()
            .enumerate()
            .map(|(i, &ao)| {
                let base = existing.get(i).copied().unwrap_or(LinearRgba::NONE);
                blend.blend(base, ao, settings.channel_mask)
            })
            .collect();

        let target = targets.try_get_mut(id)?;
        if let Some(layer) = target.layer_stack_mut().target_layer_mut() {
            layer.set_vertex_data(colors, vec![1.0; vertex_count]);
        }
        target.recalculate_output_colors()?;

        report.targets += 1;
        report.vertices += vertex_count;
    }

    info!(
        "Baked {} vertices on {} targets ({} rays)",
        report.vertices, report.targets, report.rays
    );
    Ok(report)
}

/// Occlusion color for every vertex of `target`.
fn occlusion_colors<S: PaintScene + ?Sized>(
    target: &PaintTarget,
    scene: &S,
    settings: &AoSettings,
    rng: &mut StdRng,
    rays: &mut u64,
) -> Vec<LinearRgba> {
    (0..target.vertex_count())
        .map(|i| {
            let position = target.world_position(i);
            let normal = target.world_normal(i).normalize_or_zero();
            let factor = occlusion_factor(scene, position, normal, settings, rng, rays);
            lerp_color(settings.max_color, settings.min_color, factor)
        })
        .collect()
}

/// Fraction of cone rays from `position` blocked within `max_distance`,
/// weighted by hit proximity and scaled by intensity, clamped to `[0, 1]`.
pub fn occlusion_factor<S: PaintScene + ?Sized>(
    scene: &S,
    position: Vec3,
    normal: Vec3,
    settings: &AoSettings,
    rng: &mut StdRng,
    rays: &mut u64,
) -> f32 {
    let max_distance = settings.max_distance;
    if settings.samples == 0 || !(max_distance > 0.0) {
        return 0.0;
    }

    let rotation = orientation(normal);
    let cos_half_angle = (settings.spread.clamp(0.0, 180.0).to_radians() / 2.0).cos();

    let mut sum = 0.0;
    for _ in 0..settings.samples {
        let direction = rotation * sample_cone(rng, cos_half_angle);
        let offset = reflect(direction, normal) * -settings.bias;
        let start = position + offset;
        let end = position + direction * max_distance + offset;

        *rays += 1;
        if let Some(hit) = scene.linecast(start, end) {
            sum += (1.0 - hit.distance / max_distance).clamp(0.0, 1.0);
            continue;
        }

        // Geometry the outward ray started behind is only seen coming back.
        *rays += 1;
        if let Some(hit) = scene.linecast(end, start) {
            sum += (1.0 - (max_distance - hit.distance) / max_distance).clamp(0.0, 1.0);
        }
    }

    (sum * settings.intensity / settings.samples as f32).clamp(0.0, 1.0)
}
