//! Vertex brush: settings, the stroke state machine and undo history.
//!
//! A stroke is driven by the host:
//!
//! 1. [`BrushStroke::begin`] on press
//! 2. [`BrushStroke::add_target`] for every target the cursor touches
//! 3. [`BrushStroke::update_stroke`] for every cursor sample
//! 4. [`BrushStroke::end`] on release, keeping the returned [`StrokeRecord`]
//!    for undo

mod history;
mod settings;
mod stroke;

pub use history::{LayerSnapshot, StrokeChange, StrokeRecord};
pub use settings::{BrushSettings, PaintMode, brush_influence};
pub use stroke::{BrushStroke, StrokePhase, StrokeSample, apply_stroke, blend_average};
