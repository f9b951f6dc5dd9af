//! A single editable paint layer.

use bevy::color::LinearRgba;
use serde::{Deserialize, Serialize};

use crate::color::{BlendMode, ChannelMask, clamp01, lerp_color};
use crate::error::PainterError;

/// One layer of per-vertex color data.
///
/// `colors` and `transparency` are index-aligned with the mesh vertices.
/// Transparency is the per-vertex influence of the layer (0 = no effect,
/// 1 = full effect) and is independent of the color's alpha channel.
/// [`opacity`](Self::opacity) multiplies it uniformly.
///
/// # Example
///
/// ```
/// use bevy::color::LinearRgba;
/// use bevy_vertex_painter::color::BlendMode;
/// use bevy_vertex_painter::layer::Layer;
///
/// let mut layer = Layer::new(1).with_blend_mode(BlendMode::Multiply);
/// layer.colors_mut()[0] = LinearRgba::new(0.5, 0.5, 0.5, 1.0);
/// layer.transparency_mut()[0] = 1.0;
///
/// let out = layer.output_colors(&[LinearRgba::WHITE]).unwrap();
/// assert_eq!(out[0], LinearRgba::new(0.5, 0.5, 0.5, 1.0));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Display name.
    pub name: String,

    /// Uniform multiplier on top of the per-vertex transparency.
    ///
    /// Default: 1.0
    pub opacity: f32,

    pub blend_mode: BlendMode,

    /// Channels this layer's blend may modify.
    pub channel_mask: ChannelMask,

    /// Inactive layers are skipped entirely during compositing.
    pub is_active: bool,

    /// Advisory only; painting does not check it.
    pub is_locked: bool,

    vertex_count: usize,

    #[serde(default)]
    colors: Vec<LinearRgba>,

    #[serde(default)]
    transparency: Vec<f32>,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            name: String::new(),
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            channel_mask: ChannelMask::RGBA,
            is_active: true,
            is_locked: false,
            vertex_count: 0,
            colors: Vec::new(),
            transparency: Vec::new(),
        }
    }
}

impl Layer {
    /// Creates an unnamed layer with default data for `vertex_count` vertices.
    ///
    /// Colors start as transparent black and transparency as 0, so a fresh
    /// layer has no effect on the composite.
    pub fn new(vertex_count: usize) -> Self {
        let mut layer = Self::default();
        layer.resize(vertex_count);
        layer
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_channel_mask(mut self, mask: ChannelMask) -> Self {
        self.channel_mask = mask;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Per-vertex colors. May be empty until the layer is first written.
    pub fn colors(&self) -> &[LinearRgba] {
        &self.colors
    }

    /// Per-vertex transparency. May be empty until the layer is first written.
    pub fn transparency(&self) -> &[f32] {
        &self.transparency
    }

    pub fn colors_mut(&mut self) -> &mut [LinearRgba] {
        self.ensure_allocated();
        &mut self.colors
    }

    pub fn transparency_mut(&mut self) -> &mut [f32] {
        self.ensure_allocated();
        &mut self.transparency
    }

    /// Replaces both per-vertex arrays and adopts their length as the vertex count.
    pub fn set_vertex_data(&mut self, colors: Vec<LinearRgba>, transparency: Vec<f32>) {
        self.vertex_count = colors.len();
        self.colors = colors;
        self.transparency = transparency;
    }

    /// Sizes empty arrays to the vertex count.
    pub fn ensure_allocated(&mut self) {
        if self.colors.is_empty() {
            self.colors = vec![LinearRgba::NONE; self.vertex_count];
        }
        if self.transparency.is_empty() {
            self.transparency = vec![0.0; self.vertex_count];
        }
    }

    /// Truncates or pads both arrays to `vertex_count` with default data.
    pub fn resize(&mut self, vertex_count: usize) {
        self.vertex_count = vertex_count;
        self.colors.resize(vertex_count, LinearRgba::NONE);
        self.transparency.resize(vertex_count, 0.0);
    }

    /// Whether the layer can be composited over `vertex_count` vertices.
    ///
    /// Arrays that were never allocated count as fitting.
    pub fn fits(&self, vertex_count: usize) -> bool {
        self.vertex_count == vertex_count
            && (self.colors.is_empty() || self.colors.len() == vertex_count)
            && (self.transparency.is_empty() || self.transparency.len() == vertex_count)
    }

    /// Composites this layer over `input_colors`.
    ///
    /// For each vertex with `opacity * transparency > 0`, the blended color is
    /// lerped in by that amount and clamped to `[0, 1]`. Every other vertex
    /// passes through unchanged, so zero-influence vertices never evaluate a
    /// blend that could divide by zero.
    pub fn output_colors(&self, input_colors: &[LinearRgba]) -> Result<Vec<LinearRgba>, PainterError> {
        self.check_len(input_colors.len())?;

        let output = input_colors
            .iter()
            .zip(self.colors.iter().zip(&self.transparency))
            .map(|(&input, (&color, &transparency))| {
                let influence = self.opacity * transparency;
                if influence > 0.0 {
                    let blended = self.blend_mode.blend(input, color, self.channel_mask);
                    clamp01(lerp_color(input, blended, influence))
                } else {
                    input
                }
            })
            .collect();

        Ok(output)
    }

    /// Checks that both arrays hold exactly `expected` entries.
    pub fn check_len(&self, expected: usize) -> Result<(), PainterError> {
        let found = if self.colors.len() != expected {
            self.colors.len()
        } else {
            self.transparency.len()
        };
        if found != expected {
            return Err(PainterError::VertexCountMismatch {
                layer: self.name.clone(),
                expected,
                found,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey(v: f32) -> LinearRgba {
        LinearRgba::new(v, v, v, 1.0)
    }

    #[test]
    fn test_new_layer_defaults() {
        let layer = Layer::new(3);
        assert_eq!(layer.vertex_count(), 3);
        assert_eq!(layer.colors(), &[LinearRgba::NONE; 3]);
        assert_eq!(layer.transparency(), &[0.0; 3]);
        assert_eq!(layer.opacity, 1.0);
        assert!(layer.is_active);
        assert!(!layer.is_locked);
    }

    #[test]
    fn test_multiply_rgb_only() {
        let mut layer = Layer::new(1)
            .with_blend_mode(BlendMode::Multiply)
            .with_channel_mask(ChannelMask::RGB);
        layer.colors_mut()[0] = LinearRgba::new(0.5, 0.5, 0.5, 1.0);
        layer.transparency_mut()[0] = 1.0;

        let out = layer.output_colors(&[LinearRgba::WHITE]).unwrap();
        assert_eq!(out[0], LinearRgba::new(0.5, 0.5, 0.5, 1.0));
    }

    #[test]
    fn test_zero_opacity_is_noop() {
        let mut layer = Layer::new(2).with_opacity(0.0).with_blend_mode(BlendMode::Divide);
        layer.transparency_mut().fill(1.0);

        let input = [grey(0.3), grey(0.7)];
        assert_eq!(layer.output_colors(&input).unwrap(), input.to_vec());
    }

    #[test]
    fn test_zero_transparency_is_noop_and_avoids_nan() {
        // Colors are zero, so Divide would produce NaN if evaluated.
        let layer = Layer::new(2).with_blend_mode(BlendMode::Divide);

        let input = [grey(0.3), grey(0.7)];
        let out = layer.output_colors(&input).unwrap();
        assert_eq!(out, input.to_vec());
    }

    #[test]
    fn test_transparency_and_opacity_multiply() {
        let mut layer = Layer::new(1).with_opacity(0.5);
        layer.colors_mut()[0] = grey(1.0);
        layer.transparency_mut()[0] = 0.5;

        let out = layer.output_colors(&[grey(0.0)]).unwrap();
        assert!((out[0].red - 0.25).abs() < 1e-6);
        assert_eq!(out[0].alpha, 1.0);
    }

    #[test]
    fn test_output_is_clamped() {
        let mut layer = Layer::new(1).with_blend_mode(BlendMode::Add);
        layer.colors_mut()[0] = grey(0.8);
        layer.transparency_mut()[0] = 1.0;

        let out = layer.output_colors(&[grey(0.8)]).unwrap();
        assert_eq!(out[0], grey(1.0));
    }

    #[test]
    fn test_length_mismatch() {
        let layer = Layer::new(2).with_name("Base");
        let err = layer.output_colors(&[grey(0.0); 3]).unwrap_err();
        assert!(matches!(
            err,
            PainterError::VertexCountMismatch { expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn test_fits() {
        let mut layer = Layer::new(2);
        assert!(layer.fits(2));
        assert!(!layer.fits(3));

        layer.set_vertex_data(vec![LinearRgba::NONE; 3], vec![0.0; 2]);
        assert!(!layer.fits(3));

        layer.resize(3);
        assert!(layer.fits(3));
    }

    #[test]
    fn test_lazy_allocation() {
        let mut layer: Layer = serde_json::from_str(
            r#"{"name":"x","opacity":1.0,"blend_mode":"Normal","channel_mask":[true,true,true,true],
                "is_active":true,"is_locked":false,"vertex_count":4}"#,
        )
        .unwrap();
        assert!(layer.colors().is_empty());
        assert_eq!(layer.colors_mut().len(), 4);
        assert_eq!(layer.transparency().len(), 4);
    }
}
