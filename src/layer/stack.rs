//! Ordered layer stack for one paint target.

use bevy::color::LinearRgba;
use bevy::log::debug;
use serde::{Deserialize, Serialize};

use super::Layer;
use crate::error::PainterError;

/// Layers in paint order: the first layer is the bottom of the stack.
///
/// The stack also owns the target layer cursor that brush strokes and bakes
/// write into. While the stack is non-empty the cursor is a valid index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerStack {
    layers: Vec<Layer>,
    target_layer_index: usize,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack holding one default layer.
    pub fn with_default_layer(vertex_count: usize) -> Self {
        let mut stack = Self::new();
        stack.add(Layer::default(), vertex_count);
        stack
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn target_layer_index(&self) -> usize {
        self.target_layer_index
    }

    /// The layer brush strokes and bakes currently write into.
    pub fn target_layer(&self) -> Option<&Layer> {
        self.layers.get(self.target_layer_index)
    }

    pub fn target_layer_mut(&mut self) -> Option<&mut Layer> {
        self.layers.get_mut(self.target_layer_index)
    }

    pub fn set_target_layer(&mut self, index: usize) -> Result<(), PainterError> {
        self.check_index(index)?;
        self.target_layer_index = index;
        Ok(())
    }

    /// Appends a layer sized to `vertex_count` and makes it the target layer.
    ///
    /// Unnamed layers are given the name `"New Paint Layer {index}"`.
    pub fn add(&mut self, mut layer: Layer, vertex_count: usize) -> &mut Layer {
        let index = self.layers.len();
        layer.resize(vertex_count);
        if layer.name.is_empty() {
            layer.name = format!("New Paint Layer {index}");
        }
        debug!("Adding layer '{}' at index {}", layer.name, index);

        self.layers.push(layer);
        self.target_layer_index = index;
        &mut self.layers[index]
    }

    /// Removes the layer at `index` and moves the cursor to the layer below it.
    ///
    /// Removing the bottom layer leaves the cursor at 0. The last remaining
    /// layer cannot be removed.
    pub fn remove(&mut self, index: usize) -> Result<Layer, PainterError> {
        self.check_index(index)?;
        if self.layers.len() == 1 {
            return Err(PainterError::LastLayer);
        }

        let layer = self.layers.remove(index);
        self.target_layer_index = index.saturating_sub(1);
        debug!("Removed layer '{}' from index {}", layer.name, index);
        Ok(layer)
    }

    /// Moves a layer to a new position. The cursor keeps pointing at the same layer.
    pub fn move_layer(&mut self, from: usize, to: usize) -> Result<(), PainterError> {
        self.check_index(from)?;
        self.check_index(to)?;

        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);

        let target = self.target_layer_index;
        self.target_layer_index = if target == from {
            to
        } else if from < target && target <= to {
            target - 1
        } else if to <= target && target < from {
            target + 1
        } else {
            target
        };
        Ok(())
    }

    /// Truncates or pads every layer to `vertex_count`.
    pub fn resize_layers(&mut self, vertex_count: usize) {
        for layer in &mut self.layers {
            layer.resize(vertex_count);
        }
    }

    /// Composites every active layer, bottom to top, over `source_colors`.
    ///
    /// Inactive layers are skipped. An empty stack returns the source colors.
    pub fn recalculate_output_colors(
        &mut self,
        source_colors: &[LinearRgba],
    ) -> Result<Vec<LinearRgba>, PainterError> {
        let mut output = source_colors.to_vec();
        for layer in self.layers.iter_mut().filter(|layer| layer.is_active) {
            layer.ensure_allocated();
            output = layer.output_colors(&output)?;
        }
        Ok(output)
    }

    fn check_index(&self, index: usize) -> Result<(), PainterError> {
        if index >= self.layers.len() {
            return Err(PainterError::LayerIndexOutOfBounds {
                index,
                len: self.layers.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BlendMode;

    fn painted(vertex_count: usize, color: LinearRgba) -> Layer {
        let mut layer = Layer::new(vertex_count);
        layer.colors_mut().fill(color);
        layer.transparency_mut().fill(1.0);
        layer
    }

    #[test]
    fn test_add_names_and_targets() {
        let mut stack = LayerStack::new();
        stack.add(Layer::default(), 4);
        let layer = stack.add(Layer::default(), 4);
        assert_eq!(layer.name, "New Paint Layer 1");
        assert_eq!(layer.colors().len(), 4);
        assert_eq!(stack.target_layer_index(), 1);

        stack.add(Layer::default().with_name("Dirt"), 4);
        assert_eq!(stack.layers()[2].name, "Dirt");
    }

    #[test]
    fn test_empty_stack_is_identity() {
        let mut stack = LayerStack::new();
        let source = vec![LinearRgba::RED, LinearRgba::BLUE];
        assert_eq!(stack.recalculate_output_colors(&source).unwrap(), source);
        assert!(stack.target_layer().is_none());
    }

    #[test]
    fn test_composites_bottom_to_top() {
        let mut stack = LayerStack::new();
        stack.add(painted(1, LinearRgba::new(0.5, 0.5, 0.5, 1.0)), 1);
        let top = stack.add(painted(1, LinearRgba::new(0.5, 0.5, 0.5, 1.0)), 1);
        top.blend_mode = BlendMode::Multiply;

        let out = stack.recalculate_output_colors(&[LinearRgba::WHITE]).unwrap();
        assert_eq!(out[0], LinearRgba::new(0.25, 0.25, 0.25, 1.0));
    }

    #[test]
    fn test_inactive_layer_is_skipped() {
        let mut stack = LayerStack::new();
        let layer = stack.add(painted(2, LinearRgba::RED), 2);
        layer.is_active = false;

        let source = vec![LinearRgba::WHITE; 2];
        assert_eq!(stack.recalculate_output_colors(&source).unwrap(), source);
    }

    #[test]
    fn test_inactive_layer_with_bad_length_is_skipped() {
        let mut stack = LayerStack::new();
        let layer = stack.add(painted(5, LinearRgba::RED), 5);
        layer.is_active = false;

        let source = vec![LinearRgba::WHITE; 2];
        assert_eq!(stack.recalculate_output_colors(&source).unwrap(), source);
    }

    #[test]
    fn test_remove_moves_cursor_down() {
        let mut stack = LayerStack::new();
        for _ in 0..3 {
            stack.add(Layer::default(), 1);
        }
        stack.remove(2).unwrap();
        assert_eq!(stack.target_layer_index(), 1);

        stack.remove(0).unwrap();
        assert_eq!(stack.target_layer_index(), 0);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_remove_last_layer_refused() {
        let mut stack = LayerStack::with_default_layer(3);
        assert!(matches!(stack.remove(0), Err(PainterError::LastLayer)));
        assert!(matches!(
            stack.remove(7),
            Err(PainterError::LayerIndexOutOfBounds { index: 7, len: 1 })
        ));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_set_target_layer() {
        let mut stack = LayerStack::with_default_layer(1);
        stack.add(Layer::default(), 1);
        stack.set_target_layer(0).unwrap();
        assert_eq!(stack.target_layer_index(), 0);
        assert!(stack.set_target_layer(2).is_err());
        assert_eq!(stack.target_layer_index(), 0);
    }

    #[test]
    fn test_move_layer_keeps_target() {
        let mut stack = LayerStack::new();
        for name in ["a", "b", "c", "d"] {
            stack.add(Layer::default().with_name(name), 1);
        }
        stack.set_target_layer(1).unwrap();

        stack.move_layer(0, 3).unwrap();
        let names: Vec<_> = stack.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "d", "a"]);
        assert_eq!(stack.target_layer().unwrap().name, "b");

        stack.move_layer(0, 2).unwrap();
        assert_eq!(stack.target_layer().unwrap().name, "b");
        assert_eq!(stack.target_layer_index(), 2);

        stack.move_layer(3, 0).unwrap();
        assert_eq!(stack.target_layer().unwrap().name, "b");
    }

    #[test]
    fn test_serde_roundtrip_is_bit_identical() {
        let mut stack = LayerStack::new();
        let base = stack.add(painted(3, LinearRgba::new(0.25, 0.5, 0.75, 1.0)), 3);
        base.transparency_mut().copy_from_slice(&[1.0, 0.5, 0.0]);
        base.opacity = 0.75;
        let top = stack.add(painted(3, LinearRgba::new(0.1, 0.9, 0.3, 0.5)), 3);
        top.blend_mode = BlendMode::SoftLight;
        top.channel_mask = crate::color::ChannelMask::RGB;
        stack.set_target_layer(0).unwrap();

        let source = vec![
            LinearRgba::new(0.2, 0.4, 0.6, 1.0),
            LinearRgba::new(0.9, 0.1, 0.5, 1.0),
            LinearRgba::new(0.0, 1.0, 0.3, 0.7),
        ];
        let before = stack.recalculate_output_colors(&source).unwrap();

        let json = serde_json::to_string(&stack).unwrap();
        let mut restored: LayerStack = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, stack);

        let after = restored.recalculate_output_colors(&source).unwrap();
        for (a, b) in before.iter().zip(&after) {
            assert_eq!(a.red.to_bits(), b.red.to_bits());
            assert_eq!(a.green.to_bits(), b.green.to_bits());
            assert_eq!(a.blue.to_bits(), b.blue.to_bits());
            assert_eq!(a.alpha.to_bits(), b.alpha.to_bits());
        }
    }
}
