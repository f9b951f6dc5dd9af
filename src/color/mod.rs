//! Per-channel color math for layer compositing.
//!
//! Colors are [`LinearRgba`] values. Blend functions work channel by channel
//! on the `[r, g, b, a]` components and are gated by a [`ChannelMask`].

mod blend;
mod mask;

pub use blend::BlendMode;
pub use mask::ChannelMask;

use bevy::color::{ColorToComponents, LinearRgba};

/// Clamps every channel of a color to `[0, 1]`.
#[inline]
pub fn clamp01(color: LinearRgba) -> LinearRgba {
    LinearRgba::from_f32_array(color.to_f32_array().map(|c| c.clamp(0.0, 1.0)))
}

/// Linear interpolation with the factor clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Channel-wise [`lerp`] between two colors, factor clamped to `[0, 1]`.
#[inline]
pub fn lerp_color(a: LinearRgba, b: LinearRgba, t: f32) -> LinearRgba {
    let a = a.to_f32_array();
    let b = b.to_f32_array();
    LinearRgba::from_f32_array(std::array::from_fn(|i| lerp(a[i], b[i], t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_clamps_factor() {
        assert_eq!(lerp(0.0, 1.0, 0.25), 0.25);
        assert_eq!(lerp(0.0, 1.0, 2.0), 1.0);
        assert_eq!(lerp(0.0, 1.0, -1.0), 0.0);
        assert_eq!(lerp(1.0, 0.0, 0.5), 0.5);
    }

    #[test]
    fn test_lerp_color_includes_alpha() {
        let c = lerp_color(LinearRgba::NONE, LinearRgba::WHITE, 0.5);
        assert_eq!(c, LinearRgba::new(0.5, 0.5, 0.5, 0.5));
    }

    #[test]
    fn test_clamp01() {
        let c = clamp01(LinearRgba::new(-0.5, 1.5, 0.25, f32::INFINITY));
        assert_eq!(c, LinearRgba::new(0.0, 1.0, 0.25, 1.0));
    }
}
