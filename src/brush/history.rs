//! Layer snapshots and per-stroke undo records.

use bevy::color::LinearRgba;
use bevy::log::debug;

use crate::error::PainterError;
use crate::target::{PaintTarget, PaintTargets, TargetId};

/// Copy of one layer's per-vertex data.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSnapshot {
    /// Index of the layer in its stack.
    pub layer_index: usize,
    pub colors: Vec<LinearRgba>,
    pub transparency: Vec<f32>,
}

impl LayerSnapshot {
    /// Copies the target layer of `target`, sizing empty arrays first.
    ///
    /// Returns `None` when the stack has no target layer.
    pub fn capture(target: &PaintTarget) -> Option<Self> {
        let stack = target.layer_stack();
        let layer_index = stack.target_layer_index();
        let layer = stack.get(layer_index)?;

        let vertex_count = layer.vertex_count();
        let colors = if layer.colors().is_empty() {
            vec![LinearRgba::NONE; vertex_count]
        } else {
            layer.colors().to_vec()
        };
        let transparency = if layer.transparency().is_empty() {
            vec![0.0; vertex_count]
        } else {
            layer.transparency().to_vec()
        };

        Some(Self {
            layer_index,
            colors,
            transparency,
        })
    }

    /// Writes the snapshot back into its layer and recomposites.
    pub fn restore(&self, target: &mut PaintTarget) -> Result<(), PainterError> {
        let stack = target.layer_stack_mut();
        let len = stack.len();
        let layer = stack
            .get_mut(self.layer_index)
            .ok_or(PainterError::LayerIndexOutOfBounds {
                index: self.layer_index,
                len,
            })?;

        layer.set_vertex_data(self.colors.clone(), self.transparency.clone());
        target.recalculate_output_colors()?;
        Ok(())
    }
}

/// Before and after state of one target touched by a stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeChange {
    pub target: TargetId,
    pub before: LayerSnapshot,
    pub after: LayerSnapshot,
}

/// Everything one finished stroke changed. Undo and redo are snapshot swaps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeRecord {
    pub changes: Vec<StrokeChange>,
}

impl StrokeRecord {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.changes.iter().map(|change| change.target)
    }

    /// Restores every target to its state before the stroke.
    pub fn undo(&self, targets: &mut PaintTargets) -> Result<(), PainterError> {
        for change in &self.changes {
            change.before.restore(targets.try_get_mut(change.target)?)?;
        }
        debug!("Undid stroke over {} targets", self.changes.len());
        Ok(())
    }

    /// Reapplies the stroke after an [`undo`](Self::undo).
    pub fn redo(&self, targets: &mut PaintTargets) -> Result<(), PainterError> {
        for change in &self.changes {
            change.after.restore(targets.try_get_mut(change.target)?)?;
        }
        debug!("Redid stroke over {} targets", self.changes.len());
        Ok(())
    }
}
