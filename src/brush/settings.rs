//! Brush settings and the distance falloff that scales each stroke.

use bevy::color::LinearRgba;
use serde::{Deserialize, Serialize};

use crate::color::ChannelMask;

/// What a stroke does to the target layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintMode {
    /// Push the brush color in and raise transparency.
    #[default]
    Paint,
    /// Lower transparency; colors are kept.
    Erase,
    /// Pull colors toward the average displayed color under the brush.
    Blend,
}

/// Brush configuration for one stroke sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// World-space radius.
    ///
    /// Default: 1.0
    pub radius: f32,

    /// Fraction of the radius, measured inward from the edge, over which
    /// influence ramps up.
    ///
    /// Default: 1.0
    pub falloff: f32,

    /// Cubed before use.
    ///
    /// Default: 0.1
    pub strength: f32,

    pub mode: PaintMode,

    /// Default: white
    pub color: LinearRgba,

    /// Channels of [`color`](Self::color) that [`PaintMode::Paint`] writes.
    /// The rest keep the vertex's displayed value.
    ///
    /// Default: RGB
    pub channel_mask: ChannelMask,

    /// When false the brush changes nothing.
    ///
    /// Default: true
    pub color_enabled: bool,

    /// Accepted for compatibility. Backfacing vertices are not excluded.
    pub ignore_backfacing: bool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: 1.0,
            falloff: 1.0,
            strength: 0.1,
            mode: PaintMode::Paint,
            color: LinearRgba::WHITE,
            channel_mask: ChannelMask::RGB,
            color_enabled: true,
            ignore_backfacing: false,
        }
    }
}

impl BrushSettings {
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_falloff(mut self, falloff: f32) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_mode(mut self, mode: PaintMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_color(mut self, color: LinearRgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_channel_mask(mut self, mask: ChannelMask) -> Self {
        self.channel_mask = mask;
        self
    }

    /// Influence at `distance` from the brush center.
    #[inline]
    pub fn influence(&self, distance: f32) -> f32 {
        brush_influence(distance, self.strength, self.radius, self.falloff)
    }
}

/// Brush influence at `distance` from the center.
///
/// Inside the ramp, `(1 - (d - inner) / (radius - inner)) * strength³` where
/// `inner = radius * (1 - falloff)`. The ramp is not clamped, so values
/// inside `inner` exceed `strength³`; callers lerp with a clamped factor.
///
/// A zero-width ramp (`falloff == 0`) gives a hard edge at full strength. A
/// non-positive radius has no paintable area and gives 0.
pub fn brush_influence(distance: f32, strength: f32, radius: f32, falloff: f32) -> f32 {
    if !(radius > 0.0) {
        return 0.0;
    }

    let inner = radius * (1.0 - falloff);
    let ramp_width = radius - inner;
    let full = strength * strength * strength;

    if !(ramp_width > 0.0) {
        return if distance < radius { full } else { 0.0 };
    }

    (1.0 - (distance - inner) / ramp_width) * full
}
