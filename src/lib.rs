//! # bevy_vertex_painter
//!
//! Layered per-vertex color painting and ambient occlusion baking for Bevy
//! meshes.
//!
//! ## Features
//!
//! - Layer stacks with 14 blend modes, per-layer opacity and channel masks
//! - Per-vertex transparency acting as each layer's blend weight
//! - Paint, erase and blend brushes with radius, falloff and strength
//! - Stroke snapshots for cancel, undo and redo
//! - Monte-Carlo ambient occlusion baked into a layer
//! - Nearest-vertex reprojection when a mesh's topology changes
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_vertex_painter::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(VertexPainterPlugin)
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(
//!     mut commands: Commands,
//!     mut meshes: ResMut<Assets<Mesh>>,
//!     mut materials: ResMut<Assets<StandardMaterial>>,
//!     mut targets: ResMut<PaintTargets>,
//! ) {
//!     let mesh = Mesh::from(Sphere::new(1.0));
//!
//!     // Register the mesh as a paint target
//!     let target = targets.insert(PaintTarget::from_mesh(&mesh).unwrap());
//!
//!     commands.spawn((
//!         Mesh3d(meshes.add(mesh)),
//!         MeshMaterial3d(materials.add(StandardMaterial::default())),
//!         PaintedMesh::new(target),
//!     ));
//! }
//! ```
//!
//! Painting itself runs through [`brush::BrushStroke`] and baking through
//! [`bake::bake_ambient_occlusion`]; both need a [`scene::PaintScene`] for
//! spatial queries.

pub mod bake;
pub mod brush;
pub mod color;
pub mod config;
pub mod error;
pub mod layer;
pub mod scene;
pub mod target;

/// Bevy integration: resources and mesh syncing.
#[cfg(feature = "plugin")]
mod plugin;

pub mod prelude {
    pub use crate::bake::{
        AoBlendMode, AoSettings, BakeProgress, BakeReport, bake_ambient_occlusion,
        bake_ambient_occlusion_with_progress,
    };
    pub use crate::brush::{
        BrushSettings, BrushStroke, LayerSnapshot, PaintMode, StrokeRecord, apply_stroke,
    };
    pub use crate::color::{BlendMode, ChannelMask};
    pub use crate::config::PainterConfig;
    pub use crate::error::PainterError;
    pub use crate::layer::{Layer, LayerStack};
    pub use crate::scene::{MeshScene, PaintScene, RayHit};
    pub use crate::target::{
        MeshVertexPaintExt, PaintTarget, PaintTargets, SourceColorMode, TargetId,
    };

    #[cfg(feature = "plugin")]
    pub use crate::plugin::{PaintedMesh, VertexPainterPlugin, VertexPainterSystems, sync_painted_meshes};
}
