//! Plugin wiring paint targets to rendered meshes.
use bevy::prelude::*;
use bevy::transform::TransformSystems;

use crate::config::PainterConfig;
use crate::target::{MeshVertexPaintExt, PaintTargets, TargetId};

/// Plugin that adds vertex painting resources and mesh syncing to Bevy.
///
/// This plugin registers:
/// - [`PaintTargets`] and [`PainterConfig`] resources
/// - [`sync_painted_meshes`] in `PostUpdate`
///
/// # Example
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_vertex_painter::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(VertexPainterPlugin)
///     .run();
/// ```
pub struct VertexPainterPlugin;

impl Plugin for VertexPainterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PaintTargets>()
            .init_resource::<PainterConfig>()
            .add_systems(
                PostUpdate,
                sync_painted_meshes
                    .in_set(VertexPainterSystems)
                    .after(TransformSystems::Propagate),
            );
    }
}

/// System set for vertex painter systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexPainterSystems;

/// Links an entity's [`Mesh3d`] to a registered paint target.
#[derive(Component, Clone, Copy, Debug)]
pub struct PaintedMesh {
    pub target: TargetId,
    synced_revision: Option<u64>,
}

impl PaintedMesh {
    pub fn new(target: TargetId) -> Self {
        Self {
            target,
            synced_revision: None,
        }
    }
}

/// Keeps paint targets and their meshes in step.
///
/// Copies each entity's world transform into its target, and writes the
/// target's output colors into the mesh asset whenever they were recomputed
/// since the last sync.
pub fn sync_painted_meshes(
    mut targets: ResMut<PaintTargets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut painted: Query<(&mut PaintedMesh, &Mesh3d, &GlobalTransform)>,
) {
    for (mut painted, mesh3d, global) in &mut painted {
        let Some(target) = targets.bypass_change_detection().get_mut(painted.target) else {
            continue;
        };

        let transform = global.compute_transform();
        if target.transform != transform {
            target.transform = transform;
        }

        let revision = target.revision();
        if painted.synced_revision == Some(revision) {
            continue;
        }
        let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
            continue;
        };

        if let Err(e) = mesh.write_painted_colors(target.output_colors()) {
            warn!("Cannot sync paint target {:?}: {}", painted.target, e);
        }
        painted.synced_revision = Some(revision);
    }
}
