//! Brush stroke state machine and the per-sample paint kernel.

use std::collections::BTreeMap;

use bevy::color::{ColorToComponents, LinearRgba};
use bevy::log::{debug, info};
use bevy::prelude::*;

use super::history::{LayerSnapshot, StrokeChange, StrokeRecord};
use super::settings::{BrushSettings, PaintMode};
use crate::color::{lerp, lerp_color};
use crate::error::PainterError;
use crate::scene::PaintScene;
use crate::target::{PaintTarget, PaintTargets, TargetId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrokePhase {
    #[default]
    Idle,
    Active,
}

/// Outcome of one [`BrushStroke::update_stroke`] sample.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeSample {
    /// Targets whose target layer was painted.
    pub painted: Vec<TargetId>,
    /// Targets under the brush that had no usable target layer.
    pub skipped: Vec<TargetId>,
    /// Shared average color, for [`PaintMode::Blend`] samples with vertices in range.
    pub blend_color: Option<LinearRgba>,
}

/// One paint gesture, from press to release.
///
/// Targets join the stroke through [`add_target`](Self::add_target) (usually
/// when the cursor ray first hits them), which records their state for
/// [`cancel`](Self::cancel) and the [`StrokeRecord`] returned by
/// [`end`](Self::end).
#[derive(Clone, Debug, Default)]
pub struct BrushStroke {
    phase: StrokePhase,
    before: BTreeMap<TargetId, LayerSnapshot>,
}

impl BrushStroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == StrokePhase::Active
    }

    /// Targets registered with the current stroke, in id order.
    pub fn registered(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.before.keys().copied()
    }

    pub fn begin(&mut self) -> Result<(), PainterError> {
        if self.is_active() {
            return Err(PainterError::StrokeAlreadyActive);
        }
        self.phase = StrokePhase::Active;
        self.before.clear();
        debug!("Brush stroke started");
        Ok(())
    }

    /// Registers a target with the active stroke.
    ///
    /// Returns `Ok(false)` when the target is already registered, has
    /// painting disabled or has no target layer.
    pub fn add_target(&mut self, targets: &PaintTargets, id: TargetId) -> Result<bool, PainterError> {
        if !self.is_active() {
            return Err(PainterError::StrokeNotActive);
        }
        if self.before.contains_key(&id) {
            return Ok(false);
        }

        let target = targets.try_get(id)?;
        if !target.paint_enabled {
            return Ok(false);
        }
        let Some(snapshot) = LayerSnapshot::capture(target) else {
            return Ok(false);
        };

        debug!("Target {:?} joined the stroke", id);
        self.before.insert(id, snapshot);
        Ok(true)
    }

    /// Paints one stroke sample at `position`.
    ///
    /// Only registered targets that the scene reports inside the brush sphere
    /// are affected. In [`PaintMode::Blend`] the average displayed color of
    /// every in-range vertex across all affected targets is computed before
    /// any target is written.
    pub fn update_stroke<S: PaintScene + ?Sized>(
        &mut self,
        targets: &mut PaintTargets,
        scene: &S,
        position: Vec3,
        settings: &BrushSettings,
    ) -> Result<StrokeSample, PainterError> {
        if !self.is_active() {
            return Err(PainterError::StrokeNotActive);
        }

        let mut candidates: Vec<TargetId> = scene
            .overlap_sphere(position, settings.radius)
            .into_iter()
            .filter(|id| self.before.contains_key(id))
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let mut sample = StrokeSample::default();
        for id in candidates {
            let Some(target) = targets.get(id) else {
                continue;
            };
            match target.layer_stack().target_layer() {
                Some(layer) if layer.is_active && layer.vertex_count() == target.vertex_count() => {
                    sample.painted.push(id);
                }
                _ => {
                    debug!("Skipping target {:?}: no active target layer", id);
                    sample.skipped.push(id);
                }
            }
        }

        if settings.mode == PaintMode::Blend {
            sample.blend_color = blend_average(
                sample.painted.iter().filter_map(|&id| targets.get(id)),
                position,
                settings,
            );
        }

        for &id in &sample.painted {
            let target = targets.try_get_mut(id)?;
            let Some(snapshot) = LayerSnapshot::capture(target) else {
                continue;
            };
            let next = apply_stroke(
                &snapshot,
                target.output_colors(),
                &target.world_positions(),
                position,
                settings,
                sample.blend_color,
            );
            next.restore(target)?;
        }

        Ok(sample)
    }

    /// Finishes the stroke.
    ///
    /// Returns `None` when idle or when no target was registered.
    pub fn end(&mut self, targets: &PaintTargets) -> Option<StrokeRecord> {
        if !self.is_active() {
            return None;
        }
        self.phase = StrokePhase::Idle;

        let changes: Vec<StrokeChange> = std::mem::take(&mut self.before)
            .into_iter()
            .filter_map(|(id, before)| {
                let after = LayerSnapshot::capture(targets.get(id)?)?;
                Some(StrokeChange {
                    target: id,
                    before,
                    after,
                })
            })
            .collect();

        info!("Brush stroke finished on {} targets", changes.len());
        (!changes.is_empty()).then_some(StrokeRecord { changes })
    }

    /// Aborts the stroke and restores every registered target.
    pub fn cancel(&mut self, targets: &mut PaintTargets) -> Result<(), PainterError> {
        if !self.is_active() {
            return Ok(());
        }
        self.phase = StrokePhase::Idle;

        for (id, before) in std::mem::take(&mut self.before) {
            if let Some(target) = targets.get_mut(id) {
                before.restore(target)?;
            }
        }
        debug!("Brush stroke cancelled");
        Ok(())
    }
}

/// Mean displayed color of every vertex strictly inside the brush radius.
///
/// Returns `None` when color painting is disabled or no vertex is in range.
pub fn blend_average<'a>(
    targets: impl IntoIterator<Item = &'a PaintTarget>,
    position: Vec3,
    settings: &BrushSettings,
) -> Option<LinearRgba> {
    if !settings.color_enabled {
        return None;
    }

    let mut sum = [0.0f32; 4];
    let mut count = 0usize;
    for target in targets {
        for (world, color) in target.world_positions().iter().zip(target.output_colors()) {
            if position.distance(*world) < settings.radius {
                let c = color.to_f32_array();
                for (s, c) in sum.iter_mut().zip(c) {
                    *s += c;
                }
                count += 1;
            }
        }
    }

    (count > 0).then(|| LinearRgba::from_f32_array(sum.map(|s| s / count as f32)))
}

/// Applies one brush sample to a copy of a layer.
///
/// `displayed` are the target's current output colors and supply the
/// channels the brush mask leaves unset in [`PaintMode::Paint`].
/// `blend_color` is the shared average for [`PaintMode::Blend`]; without it
/// blend samples change nothing.
pub fn apply_stroke(
    snapshot: &LayerSnapshot,
    displayed: &[LinearRgba],
    world_positions: &[Vec3],
    position: Vec3,
    settings: &BrushSettings,
    blend_color: Option<LinearRgba>,
) -> LayerSnapshot {
    let mut next = snapshot.clone();
    if !settings.color_enabled {
        return next;
    }

    let len = next
        .colors
        .len()
        .min(next.transparency.len())
        .min(displayed.len())
        .min(world_positions.len());

    for i in 0..len {
        let distance = position.distance(world_positions[i]);
        if !(distance < settings.radius) {
            continue;
        }
        let influence = settings.influence(distance);
        if !(influence > 0.0) {
            continue;
        }

        match settings.mode {
            PaintMode::Paint => {
                let target_color = settings.channel_mask.select(settings.color, displayed[i]);
                next.colors[i] = if next.transparency[i] == 0.0 {
                    target_color
                } else {
                    lerp_color(next.colors[i], target_color, influence)
                };
                if next.transparency[i] < 1.0 {
                    next.transparency[i] = lerp(next.transparency[i], 1.0, influence);
                }
            }
            PaintMode::Erase => {
                if next.transparency[i] > 0.0 {
                    next.transparency[i] = lerp(next.transparency[i], 0.0, influence);
                }
            }
            PaintMode::Blend => {
                if let Some(blend_color) = blend_color {
                    next.colors[i] = lerp_color(next.colors[i], blend_color, influence);
                }
            }
        }
    }

    next
}
