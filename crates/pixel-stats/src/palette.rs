//! Colour quantisation used for palette-cardinality heuristics

use serde::{Deserialize, Serialize};

/// Quantisation step applied to every channel
pub const QUANT_STEP: u16 = 10;

/// RGB colour with each channel rounded to the nearest multiple of [`QUANT_STEP`].
///
/// Channels are `u16` because 255 rounds up to 260.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantizedColor {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl QuantizedColor {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: quantize(r),
            g: quantize(g),
            b: quantize(b),
        }
    }

    pub fn from_slice(rgb: &[u8]) -> Self {
        Self::from_rgb(rgb[0], rgb[1], rgb[2])
    }
}

#[inline]
fn quantize(channel: u8) -> u16 {
    (channel as u16 + QUANT_STEP / 2) / QUANT_STEP * QUANT_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_nearest_ten() {
        let c = QuantizedColor::from_rgb(14, 15, 255);
        assert_eq!((c.r, c.g, c.b), (10, 20, 260));

        let c = QuantizedColor::from_rgb(0, 4, 5);
        assert_eq!((c.r, c.g, c.b), (0, 0, 10));
    }

    #[test]
    fn test_near_colours_collapse() {
        assert_eq!(QuantizedColor::from_rgb(101, 99, 103), QuantizedColor::from_rgb(100, 100, 100));
        assert_ne!(QuantizedColor::from_rgb(100, 100, 100), QuantizedColor::from_rgb(106, 100, 100));
    }
}
