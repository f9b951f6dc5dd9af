//! Persisted painter preferences.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bake::AoSettings;
use crate::brush::BrushSettings;
use crate::error::PainterError;

/// Smallest brush radius reachable with [`PainterConfig::shrink_radius`].
pub const MIN_RADIUS: f32 = 0.0;
/// Largest brush radius reachable with [`PainterConfig::grow_radius`].
pub const MAX_RADIUS: f32 = 5.0;
pub const RADIUS_STEP: f32 = 0.05;

/// Brush and bake settings for a painting session.
///
/// Serialized as JSON. Fields missing from the input keep their defaults, so
/// files written by older versions still load.
///
/// # Example
///
/// ```
/// use bevy_vertex_painter::config::PainterConfig;
///
/// let config = PainterConfig::from_json(r#"{"brush":{"radius":0.5}}"#).unwrap();
/// assert_eq!(config.brush.radius, 0.5);
/// assert_eq!(config.ao.samples, 256);
/// ```
#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    pub brush: BrushSettings,
    pub ao: AoSettings,
}

impl PainterConfig {
    pub fn from_json(json: &str) -> Result<Self, PainterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, PainterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Enlarges the brush by one step, up to [`MAX_RADIUS`].
    pub fn grow_radius(&mut self) -> f32 {
        self.brush.radius = (self.brush.radius + RADIUS_STEP).clamp(MIN_RADIUS, MAX_RADIUS);
        self.brush.radius
    }

    /// Shrinks the brush by one step, down to [`MIN_RADIUS`].
    pub fn shrink_radius(&mut self) -> f32 {
        self.brush.radius = (self.brush.radius - RADIUS_STEP).clamp(MIN_RADIUS, MAX_RADIUS);
        self.brush.radius
    }
}
