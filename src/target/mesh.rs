//! Bridging paint targets and Bevy meshes.
//!
//! Painted colors are written to the standard [`Mesh::ATTRIBUTE_COLOR`]
//! attribute as `Float32x4`, so any material that reads vertex colors
//! displays them.

use bevy::color::{ColorToComponents, LinearRgba};
use bevy::mesh::{Mesh, VertexAttributeValues};
use bevy::prelude::*;

use super::PaintTarget;
use crate::error::PainterError;

impl PaintTarget {
    /// Builds a target from a mesh's positions, normals, colors and indices.
    ///
    /// Only positions are required. Colors are imported when stored as
    /// `Float32x4`.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, PainterError> {
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(VertexAttributeValues::as_float3)
            .ok_or(PainterError::MissingAttribute("Vertex_Position"))?;

        let mut target = PaintTarget::new(positions.iter().copied().map(Vec3::from).collect());

        if let Some(normals) = mesh
            .attribute(Mesh::ATTRIBUTE_NORMAL)
            .and_then(VertexAttributeValues::as_float3)
        {
            target = target.with_normals(normals.iter().copied().map(Vec3::from).collect());
        }

        if let Some(VertexAttributeValues::Float32x4(colors)) = mesh.attribute(Mesh::ATTRIBUTE_COLOR) {
            target = target.with_mesh_colors(
                colors
                    .iter()
                    .copied()
                    .map(LinearRgba::from_f32_array)
                    .collect(),
            );
        }

        if let Some(indices) = mesh.indices() {
            target = target.with_indices(indices.iter().map(|i| i as u32).collect());
        }

        Ok(target)
    }
}

/// Extension trait for writing painted colors into a mesh.
pub trait MeshVertexPaintExt {
    /// Replaces the mesh's vertex colors with `colors`.
    ///
    /// Returns an error if the color count does not match the vertex count.
    fn write_painted_colors(&mut self, colors: &[LinearRgba]) -> Result<(), PainterError>;

    /// Builder form of [`write_painted_colors`](Self::write_painted_colors).
    fn with_painted_colors(self, colors: &[LinearRgba]) -> Result<Self, PainterError>
    where
        Self: Sized;
}

impl MeshVertexPaintExt for Mesh {
    fn write_painted_colors(&mut self, colors: &[LinearRgba]) -> Result<(), PainterError> {
        let vertex_count = self
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .map(|a| a.len())
            .unwrap_or(0);

        if colors.len() != vertex_count {
            return Err(PainterError::VertexCountMismatch {
                layer: "output".into(),
                expected: vertex_count,
                found: colors.len(),
            });
        }

        let data: Vec<[f32; 4]> = bytemuck::cast_slice(colors).to_vec();
        self.insert_attribute(Mesh::ATTRIBUTE_COLOR, data);
        Ok(())
    }

    fn with_painted_colors(mut self, colors: &[LinearRgba]) -> Result<Self, PainterError> {
        self.write_painted_colors(colors)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::RenderAssetUsages;
    use bevy::mesh::{Indices, PrimitiveTopology};

    fn triangle() -> Mesh {
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(
                Mesh::ATTRIBUTE_POSITION,
                vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            )
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, vec![[0.0, 1.0, 0.0]; 3])
            .with_inserted_indices(Indices::U32(vec![0, 2, 1]))
    }

    #[test]
    fn test_from_mesh() {
        let mesh = triangle().with_inserted_attribute(
            Mesh::ATTRIBUTE_COLOR,
            vec![[1.0, 0.0, 0.0, 1.0]; 3],
        );
        let target = PaintTarget::from_mesh(&mesh).unwrap();

        assert_eq!(target.vertex_count(), 3);
        assert_eq!(target.normals(), &[Vec3::Y; 3]);
        assert_eq!(target.indices(), Some(&[0, 2, 1][..]));
        assert_eq!(target.output_colors(), &[LinearRgba::RED; 3]);
    }

    #[test]
    fn test_from_mesh_without_positions() {
        let mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        assert!(matches!(
            PaintTarget::from_mesh(&mesh),
            Err(PainterError::MissingAttribute(_))
        ));
    }

    #[test]
    fn test_write_painted_colors() {
        let colors = [LinearRgba::RED, LinearRgba::GREEN, LinearRgba::BLUE];
        let mesh = triangle().with_painted_colors(&colors).unwrap();

        let Some(VertexAttributeValues::Float32x4(written)) = mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("color attribute missing");
        };
        assert_eq!(written[1], [0.0, 1.0, 0.0, 1.0]);

        let mut mesh = triangle();
        assert!(mesh.write_painted_colors(&colors[..2]).is_err());
    }
}
