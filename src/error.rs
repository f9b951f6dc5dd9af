//! Error type shared by the painting, compositing and baking engines.

use thiserror::Error;

use crate::target::TargetId;

/// Errors that can occur while editing layers, painting or baking.
///
/// Degenerate numeric input (zero radius, zero falloff range, no vertices in
/// range) is never reported here; it resolves to zero influence instead.
#[derive(Error, Debug)]
pub enum PainterError {
    #[error("Cannot remove the last remaining layer of a stack")]
    LastLayer,

    #[error("Layer index {index} is out of bounds for a stack of {len} layers")]
    LayerIndexOutOfBounds { index: usize, len: usize },

    #[error(
        "Layer '{layer}' holds data for {found} vertices but the mesh has {expected} vertices"
    )]
    VertexCountMismatch {
        layer: String,
        expected: usize,
        found: usize,
    },

    #[error("No paint target registered with id {0:?}")]
    UnknownTarget(TargetId),

    #[error("No brush stroke is active")]
    StrokeNotActive,

    #[error("A brush stroke is already active")]
    StrokeAlreadyActive,

    #[error("Mesh has {found} normals but {expected} vertices")]
    MissingNormals { expected: usize, found: usize },

    #[error("Mesh is missing the '{0}' attribute")]
    MissingAttribute(&'static str),

    #[error("Bake was cancelled")]
    BakeCancelled,

    #[error("Invalid painter configuration: {0}")]
    Config(#[from] serde_json::Error),
}
