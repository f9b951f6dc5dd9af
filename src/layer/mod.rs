//! Paint layers and the ordered stack that composites them.
//!
//! This module provides:
//! - [`Layer`]: per-vertex colors and transparency with a blend mode and opacity
//! - [`LayerStack`]: bottom-to-top compositing and the target layer cursor

mod paint_layer;
mod stack;

pub use paint_layer::Layer;
pub use stack::LayerStack;
