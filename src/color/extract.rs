use serde::{Deserialize, Serialize};

use crate::color::matrix::ConversionMatrix;

/// Packed `0xRRGGBBAA` glyph color as produced by the subtitle rasterizer.
///
/// `AA` is transparency: `0x00` is opaque, `0xFF` invisible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba32(pub u32);

impl Rgba32 {
    /// Pack components; `transparency` uses the rasterizer convention.
    pub const fn new(r: u8, g: u8, b: u8, transparency: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | transparency as u32)
    }

    /// Red component.
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green component.
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue component.
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Rasterizer-reported transparency.
    pub const fn transparency(self) -> u8 {
        self.0 as u8
    }

    /// Coverage the glyph contributes: `255 - transparency`.
    pub const fn coverage(self) -> u8 {
        255 - self.transparency()
    }
}

/// A glyph's flat color after colorimetry conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Channels {
    /// Channel1/2/3: `[Y, U, V]` for YUV destinations, `[R, G, B]` otherwise.
    pub c: [u8; 3],
    /// Coverage (transparency complement).
    pub alpha: u8,
}

/// Decode `color` and convert it through `matrix` (RGB passthrough when invalid).
pub fn extract_channels(color: Rgba32, matrix: &ConversionMatrix) -> Channels {
    let rgb = [color.r(), color.g(), color.b()];
    let c = if matrix.is_valid() {
        matrix
            .apply(rgb.map(i32::from))
            .map(|v| v.clamp(0, 255) as u8)
    } else {
        rgb
    };
    Channels {
        c,
        alpha: color.coverage(),
    }
}

/// Rescaling of 8-bit glyph channels to the destination bit depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScale {
    /// 8-bit destination.
    Identity,
    /// RGB: stretch `0..=255` onto `0..=max`.
    Stretch {
        /// Maximum code of the destination depth.
        max: u32,
    },
    /// YUV: left shift by `bits - 8`, keeping footroom/headroom proportions.
    Shift(u32),
}

impl ColorScale {
    /// Pick the rescale for `bits` per sample and an RGB or YUV destination.
    pub fn for_depth(bits: u32, rgb: bool) -> Self {
        if bits <= 8 {
            Self::Identity
        } else if rgb {
            Self::Stretch {
                max: (1u32 << bits) - 1,
            }
        } else {
            Self::Shift(bits - 8)
        }
    }

    /// Rescale one 8-bit value.
    pub fn apply(self, v: u8) -> u32 {
        let v = u32::from(v);
        match self {
            Self::Identity => v,
            Self::Stretch { max } => (v as f32 * max as f32 / 255.0 + 0.5) as u32,
            Self::Shift(up) => v << up,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/extract.rs"]
mod tests;
