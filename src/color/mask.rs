//! Channel masks restricting which of R, G, B, A an operation may modify.

use bevy::color::{ColorToComponents, LinearRgba};
use serde::{Deserialize, Serialize};

/// Four flags selecting the R, G, B and A channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelMask(pub [bool; 4]);

impl Default for ChannelMask {
    fn default() -> Self {
        Self::RGBA
    }
}

impl ChannelMask {
    pub const RGBA: Self = Self([true; 4]);
    pub const RGB: Self = Self([true, true, true, false]);
    pub const ALPHA: Self = Self([false, false, false, true]);
    pub const NONE: Self = Self([false; 4]);

    pub const fn new(r: bool, g: bool, b: bool, a: bool) -> Self {
        Self([r, g, b, a])
    }

    #[inline]
    pub const fn is_set(&self, channel: usize) -> bool {
        self.0[channel]
    }

    /// Takes masked channels from `selected` and the rest from `fallback`.
    pub fn select(&self, selected: LinearRgba, fallback: LinearRgba) -> LinearRgba {
        let s = selected.to_f32_array();
        let f = fallback.to_f32_array();
        LinearRgba::from_f32_array(std::array::from_fn(|i| if self.0[i] { s[i] } else { f[i] }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select() {
        let red = LinearRgba::new(1.0, 0.0, 0.0, 1.0);
        let grey = LinearRgba::new(0.5, 0.5, 0.5, 0.2);

        assert_eq!(ChannelMask::RGB.select(red, grey), LinearRgba::new(1.0, 0.0, 0.0, 0.2));
        assert_eq!(ChannelMask::NONE.select(red, grey), grey);
        assert_eq!(ChannelMask::ALPHA.select(red, grey), LinearRgba::new(0.5, 0.5, 0.5, 1.0));
    }
}
