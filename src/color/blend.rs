//! Blend modes used when compositing a layer over the colors below it.

use bevy::color::{ColorToComponents, LinearRgba};
use serde::{Deserialize, Serialize};

use super::ChannelMask;

/// How a layer color `b` is combined with the color `a` beneath it.
///
/// The results are not clamped here. Dodge, Burn and Divide produce
/// infinities or NaN for a zero divisor; the layer only evaluates a blend
/// where it has non-zero influence and clamps after the opacity lerp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    HardLight,
    SoftLight,
    Dodge,
    Burn,
    Divide,
    Add,
    Subtract,
    Difference,
    DarkerColor,
    LighterColor,
}

impl BlendMode {
    /// All blend modes in menu order.
    pub const ALL: [BlendMode; 14] = [
        Self::Normal,
        Self::Multiply,
        Self::Screen,
        Self::Overlay,
        Self::HardLight,
        Self::SoftLight,
        Self::Dodge,
        Self::Burn,
        Self::Divide,
        Self::Add,
        Self::Subtract,
        Self::Difference,
        Self::DarkerColor,
        Self::LighterColor,
    ];

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Multiply => "Multiply",
            Self::Screen => "Screen",
            Self::Overlay => "Overlay",
            Self::HardLight => "Hard Light",
            Self::SoftLight => "Soft Light",
            Self::Dodge => "Dodge",
            Self::Burn => "Burn",
            Self::Divide => "Divide",
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Difference => "Difference",
            Self::DarkerColor => "Darker Color",
            Self::LighterColor => "Lighter Color",
        }
    }

    /// Blends a single channel value.
    #[inline]
    pub fn blend_channel(self, a: f32, b: f32) -> f32 {
        match self {
            Self::Normal => b,
            Self::Multiply => a * b,
            Self::Screen => 1.0 - (1.0 - a) * (1.0 - b),
            Self::Overlay => {
                if a < 0.5 {
                    2.0 * a * b
                } else {
                    1.0 - 2.0 * (1.0 - a) * (1.0 - b)
                }
            }
            Self::HardLight => {
                if b < 0.5 {
                    2.0 * a * b
                } else {
                    1.0 - 2.0 * (1.0 - a) * (1.0 - b)
                }
            }
            Self::SoftLight => {
                if b < 0.5 {
                    2.0 * a * b + a * a * (1.0 - 2.0 * b)
                } else {
                    a.sqrt() * (2.0 * b - 1.0) + 2.0 * a * (1.0 - b)
                }
            }
            Self::Dodge => a / (1.0 - b),
            Self::Burn => 1.0 - (1.0 - a) / b,
            Self::Divide => a / b,
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Difference => (a - b).abs(),
            Self::DarkerColor => a.min(b),
            Self::LighterColor => a.max(b),
        }
    }

    /// Blends `b` over `a` on the channels selected by `mask`.
    ///
    /// Unmasked channels keep the value of `a`.
    pub fn blend(self, a: LinearRgba, b: LinearRgba, mask: ChannelMask) -> LinearRgba {
        let mut out = a.to_f32_array();
        let b = b.to_f32_array();
        for (i, channel) in out.iter_mut().enumerate() {
            if mask.is_set(i) {
                *channel = self.blend_channel(*channel, b[i]);
            }
        }
        LinearRgba::from_f32_array(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::clamp01;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_normal_respects_mask() {
        let a = LinearRgba::new(0.2, 0.4, 0.6, 0.8);
        let b = LinearRgba::new(0.9, 0.1, 0.3, 0.5);

        for bits in 0..16u8 {
            let mask = ChannelMask::new(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let out = clamp01(BlendMode::Normal.blend(a, b, mask)).to_f32_array();
            let (a, b) = (a.to_f32_array(), b.to_f32_array());
            for i in 0..4 {
                let expected = if mask.is_set(i) { b[i] } else { a[i] };
                assert_eq!(out[i], expected, "mask {bits:04b} channel {i}");
            }
        }
    }

    #[test]
    fn test_channel_formulas() {
        assert!(approx(BlendMode::Multiply.blend_channel(0.5, 0.5), 0.25));
        assert!(approx(BlendMode::Screen.blend_channel(0.5, 0.5), 0.75));
        assert!(approx(BlendMode::Overlay.blend_channel(0.25, 0.5), 0.25));
        assert!(approx(BlendMode::Overlay.blend_channel(0.75, 0.5), 0.75));
        assert!(approx(BlendMode::HardLight.blend_channel(0.5, 0.25), 0.25));
        assert!(approx(BlendMode::HardLight.blend_channel(0.5, 0.75), 0.75));
        assert!(approx(BlendMode::SoftLight.blend_channel(0.25, 0.25), 0.15625));
        assert!(approx(BlendMode::SoftLight.blend_channel(0.25, 0.75), 0.375));
        assert!(approx(BlendMode::Dodge.blend_channel(0.25, 0.5), 0.5));
        assert!(approx(BlendMode::Burn.blend_channel(0.75, 0.5), 0.5));
        assert!(approx(BlendMode::Divide.blend_channel(0.25, 0.5), 0.5));
        assert!(approx(BlendMode::Add.blend_channel(0.25, 0.5), 0.75));
        assert!(approx(BlendMode::Subtract.blend_channel(0.25, 0.5), -0.25));
        assert!(approx(BlendMode::Difference.blend_channel(0.25, 0.5), 0.25));
        assert!(approx(BlendMode::DarkerColor.blend_channel(0.25, 0.5), 0.25));
        assert!(approx(BlendMode::LighterColor.blend_channel(0.25, 0.5), 0.5));
    }

    #[test]
    fn test_zero_divisors_are_not_guarded() {
        assert!(BlendMode::Dodge.blend_channel(0.5, 1.0).is_infinite());
        assert!(BlendMode::Divide.blend_channel(0.0, 0.0).is_nan());
        assert!(BlendMode::Burn.blend_channel(0.5, 0.0).is_infinite());
    }

    #[test]
    fn test_all_names_unique() {
        let mut names: Vec<_> = BlendMode::ALL.iter().map(|m| m.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), BlendMode::ALL.len());
    }
}
