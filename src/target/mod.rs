//! Paint targets: meshes bound to a layer stack.
//!
//! A [`PaintTarget`] owns the vertex data the brush and the baker read, the
//! source colors layers are composited over, and the cached composite that
//! is written back to the mesh for rendering.

mod mesh;
mod registry;
mod reproject;

pub use mesh::MeshVertexPaintExt;
pub use registry::{PaintTargets, TargetId};
pub use reproject::{nearest_vertex_map, reproject_layer};

use bevy::color::LinearRgba;
use bevy::log::{info, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::PainterError;
use crate::layer::LayerStack;

/// Where the colors beneath the bottom layer come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceColorMode {
    /// The mesh's own vertex colors, or the override color if it has none.
    #[default]
    Import,
    /// The override color on every vertex.
    Override,
}

/// A mesh that can be painted.
///
/// Layers are index-aligned with [`vertices`](Self::vertices). When the
/// mesh changes shape use [`set_mesh_vertices`](Self::set_mesh_vertices) so
/// the layers follow.
///
/// After changing layers, layer properties or the source colors, call
/// [`recalculate_output_colors`](Self::recalculate_output_colors). The brush
/// and the baker do this themselves.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaintTarget {
    pub name: String,

    /// Local-to-world transform used for brush distances and bake rays.
    pub transform: Transform,

    /// Reproject layers by nearest vertex when the vertex count changes.
    ///
    /// Default: true
    pub auto_reprojection: bool,

    /// Whether brush strokes may register this target.
    ///
    /// Default: true
    pub paint_enabled: bool,

    source_color_mode: SourceColorMode,
    source_override_color: LinearRgba,
    layer_stack: LayerStack,
    vertices: Vec<Vec3>,

    #[serde(default)]
    normals: Vec<Vec3>,

    #[serde(default)]
    mesh_colors: Option<Vec<LinearRgba>>,

    #[serde(default)]
    indices: Option<Vec<u32>>,

    #[serde(skip)]
    output_colors: Vec<LinearRgba>,

    #[serde(skip)]
    revision: u64,
}

impl PaintTarget {
    /// Creates a target with one empty layer and a white override color.
    pub fn new(vertices: Vec<Vec3>) -> Self {
        let mut target = Self {
            name: String::new(),
            transform: Transform::IDENTITY,
            auto_reprojection: true,
            paint_enabled: true,
            source_color_mode: SourceColorMode::Import,
            source_override_color: LinearRgba::WHITE,
            layer_stack: LayerStack::with_default_layer(vertices.len()),
            vertices,
            normals: Vec::new(),
            mesh_colors: None,
            indices: None,
            output_colors: Vec::new(),
            revision: 0,
        };
        target.output_colors = target.source_colors();
        target
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Sets the mesh's own vertex colors. Intended for freshly built targets
    /// whose layers are still empty; the output is reset to the source colors.
    pub fn with_mesh_colors(mut self, colors: Vec<LinearRgba>) -> Self {
        self.mesh_colors = Some(colors);
        self.output_colors = self.source_colors();
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Local-space vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Local-space vertex normals. Empty when the mesh has none.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn mesh_colors(&self) -> Option<&[LinearRgba]> {
        self.mesh_colors.as_deref()
    }

    pub fn layer_stack(&self) -> &LayerStack {
        &self.layer_stack
    }

    pub fn layer_stack_mut(&mut self) -> &mut LayerStack {
        &mut self.layer_stack
    }

    pub fn source_color_mode(&self) -> SourceColorMode {
        self.source_color_mode
    }

    pub fn source_override_color(&self) -> LinearRgba {
        self.source_override_color
    }

    /// The last composite, as displayed on the mesh.
    pub fn output_colors(&self) -> &[LinearRgba] {
        &self.output_colors
    }

    /// Incremented every time the output colors are recomputed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn world_position(&self, index: usize) -> Vec3 {
        self.transform.transform_point(self.vertices[index])
    }

    /// World-space vertex positions.
    pub fn world_positions(&self) -> Vec<Vec3> {
        self.vertices
            .iter()
            .map(|&v| self.transform.transform_point(v))
            .collect()
    }

    /// Rotates a local normal into world space.
    #[inline]
    pub fn world_normal(&self, index: usize) -> Vec3 {
        self.transform.rotation * self.normals[index]
    }

    /// The colors beneath the bottom layer.
    ///
    /// In [`SourceColorMode::Import`] the mesh colors are used when there is
    /// exactly one per vertex; otherwise every vertex gets the override color.
    pub fn source_colors(&self) -> Vec<LinearRgba> {
        let vertex_count = self.vertices.len();
        match (self.source_color_mode, &self.mesh_colors) {
            (SourceColorMode::Import, Some(colors)) if colors.len() == vertex_count => {
                colors.clone()
            }
            _ => vec![self.source_override_color; vertex_count],
        }
    }

    /// Changes where the source colors come from and recomposites.
    pub fn set_source_colors(
        &mut self,
        mode: SourceColorMode,
        override_color: LinearRgba,
    ) -> Result<(), PainterError> {
        self.source_color_mode = mode;
        self.source_override_color = override_color;
        self.recalculate_output_colors().map(|_| ())
    }

    /// Replaces the mesh's own vertex colors and recomposites.
    pub fn set_mesh_colors(&mut self, colors: Option<Vec<LinearRgba>>) -> Result<(), PainterError> {
        self.mesh_colors = colors;
        self.recalculate_output_colors().map(|_| ())
    }

    pub fn set_normals(&mut self, normals: Vec<Vec3>) {
        self.normals = normals;
    }

    pub fn set_indices(&mut self, indices: Option<Vec<u32>>) {
        self.indices = indices;
    }

    /// Replaces the vertex positions after an external mesh edit.
    ///
    /// If the vertex count changed, layer data is carried over from the
    /// nearest old vertex when [`auto_reprojection`](Self::auto_reprojection)
    /// is set, and otherwise truncated or padded with empty data.
    pub fn set_mesh_vertices(&mut self, vertices: Vec<Vec3>) -> Result<(), PainterError> {
        if vertices.len() != self.vertices.len() {
            if self.auto_reprojection && !self.vertices.is_empty() {
                self.repair_layers();
                let map = nearest_vertex_map(&self.vertices, &vertices);
                for layer in self.layer_stack.layers_mut() {
                    reproject_layer(layer, &map);
                }
                info!(
                    "Reprojected {} layers of '{}' from {} to {} vertices",
                    self.layer_stack.len(),
                    self.name,
                    self.vertices.len(),
                    vertices.len()
                );
            } else {
                self.layer_stack.resize_layers(vertices.len());
            }
        }

        self.vertices = vertices;
        self.recalculate_output_colors().map(|_| ())
    }

    /// Composites the layer stack over the source colors and caches the result.
    ///
    /// Layers whose length no longer matches the mesh are resized first.
    pub fn recalculate_output_colors(&mut self) -> Result<&[LinearRgba], PainterError> {
        self.repair_layers();
        let source = self.source_colors();
        self.output_colors = self.layer_stack.recalculate_output_colors(&source)?;
        self.revision += 1;
        Ok(&self.output_colors)
    }

    /// Truncates or pads layers that do not fit the current vertex count.
    fn repair_layers(&mut self) {
        let vertex_count = self.vertices.len();
        for layer in self.layer_stack.layers_mut() {
            if !layer.fits(vertex_count) {
                warn!(
                    "Layer '{}' of '{}' has {} vertices, resizing to {}",
                    layer.name,
                    self.name,
                    layer.vertex_count(),
                    vertex_count
                );
                layer.resize(vertex_count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;

    fn line(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| vec3(i as f32, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_new_target_has_one_layer() {
        let target = PaintTarget::new(line(3));
        assert_eq!(target.layer_stack().len(), 1);
        assert_eq!(target.layer_stack().layers()[0].vertex_count(), 3);
        assert_eq!(target.output_colors(), &[LinearRgba::WHITE; 3]);
    }

    #[test]
    fn test_import_uses_mesh_colors_when_count_matches() {
        let target = PaintTarget::new(line(2)).with_mesh_colors(vec![LinearRgba::RED; 2]);
        assert_eq!(target.source_colors(), vec![LinearRgba::RED; 2]);

        let target = PaintTarget::new(line(2)).with_mesh_colors(vec![LinearRgba::RED; 3]);
        assert_eq!(target.source_colors(), vec![LinearRgba::WHITE; 2]);
    }

    #[test]
    fn test_override_mode() {
        let mut target = PaintTarget::new(line(2)).with_mesh_colors(vec![LinearRgba::RED; 2]);
        target
            .set_source_colors(SourceColorMode::Override, LinearRgba::BLUE)
            .unwrap();
        assert_eq!(target.output_colors(), &[LinearRgba::BLUE; 2]);
    }

    #[test]
    fn test_recalculate_bumps_revision() {
        let mut target = PaintTarget::new(line(1));
        let layer = target.layer_stack_mut().target_layer_mut().unwrap();
        layer.colors_mut()[0] = LinearRgba::GREEN;
        layer.transparency_mut()[0] = 1.0;

        let before = target.revision();
        let out = target.recalculate_output_colors().unwrap().to_vec();
        assert_eq!(out, vec![LinearRgba::GREEN]);
        assert_eq!(target.revision(), before + 1);
    }

    #[test]
    fn test_set_mesh_vertices_reprojects() {
        let mut target = PaintTarget::new(line(2));
        let layer = target.layer_stack_mut().target_layer_mut().unwrap();
        layer.colors_mut().copy_from_slice(&[LinearRgba::RED, LinearRgba::BLUE]);
        layer.transparency_mut().copy_from_slice(&[1.0, 0.5]);

        target
            .set_mesh_vertices(vec![vec3(0.1, 0.0, 0.0), vec3(0.9, 0.0, 0.0), vec3(1.2, 0.0, 0.0)])
            .unwrap();

        let layer = target.layer_stack().target_layer().unwrap();
        assert_eq!(layer.colors(), &[LinearRgba::RED, LinearRgba::BLUE, LinearRgba::BLUE]);
        assert_eq!(layer.transparency(), &[1.0, 0.5, 0.5]);
        assert_eq!(target.output_colors().len(), 3);
    }

    #[test]
    fn test_set_mesh_vertices_without_reprojection_resizes() {
        let mut target = PaintTarget::new(line(2));
        target.auto_reprojection = false;
        target.layer_stack_mut().add(Layer::default(), 2);

        target.set_mesh_vertices(line(4)).unwrap();
        for layer in target.layer_stack().layers() {
            assert_eq!(layer.colors().len(), 4);
            assert_eq!(layer.transparency(), &[0.0; 4]);
        }
    }

    #[test]
    fn test_set_mesh_vertices_with_stale_layer() {
        let mut target = PaintTarget::new(line(3));
        let stale = target.layer_stack_mut().add(Layer::default(), 2);
        stale.colors_mut().fill(LinearRgba::RED);
        stale.transparency_mut().fill(1.0);

        target.set_mesh_vertices(line(5)).unwrap();

        for layer in target.layer_stack().layers() {
            assert_eq!(layer.vertex_count(), 5);
            assert_eq!(layer.colors().len(), 5);
            assert_eq!(layer.transparency().len(), 5);
        }
        let stale = target.layer_stack().target_layer().unwrap();
        assert_eq!(&stale.transparency()[..2], &[1.0, 1.0]);
        assert_eq!(target.output_colors().len(), 5);
    }

    #[test]
    fn test_recalculate_repairs_mismatched_layer() {
        let mut target = PaintTarget::new(line(3));
        let layer = target.layer_stack_mut().add(Layer::default(), 2);
        layer.colors_mut().fill(LinearRgba::GREEN);
        layer.transparency_mut().fill(1.0);

        let out = target.recalculate_output_colors().unwrap().to_vec();
        assert_eq!(out, vec![LinearRgba::GREEN, LinearRgba::GREEN, LinearRgba::WHITE]);

        let layer = target.layer_stack().target_layer().unwrap();
        assert_eq!(layer.vertex_count(), 3);
        assert_eq!(layer.transparency(), &[1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_world_space() {
        let target = PaintTarget::new(vec![Vec3::X])
            .with_normals(vec![Vec3::X])
            .with_transform(
                Transform::from_xyz(0.0, 2.0, 0.0)
                    .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
            );

        assert!(target.world_position(0).abs_diff_eq(vec3(0.0, 3.0, 0.0), 1e-5));
        assert!(target.world_normal(0).abs_diff_eq(Vec3::Y, 1e-5));
    }
}
