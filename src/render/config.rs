use serde::{Deserialize, Serialize};

use crate::color::extract::ColorScale;
use crate::color::matrix::MatrixSpec;
use crate::composite::blend::ChromaWeight;
use crate::composite::formats::PixelFormat;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Destination description a [`crate::SubtitleRenderer`] is built for.
///
/// `bits_per_sample` and `matrix` may be left open; see [`RendererConfig::bits`] and
/// [`RendererConfig::resolved_matrix`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Destination layout.
    pub format: PixelFormat,
    /// Significant bits per sample; the format's widest depth when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits_per_sample: Option<u32>,
    /// Glyph color conversion; chosen from the frame size for YUV formats when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<MatrixSpec>,
    /// Weighting used when reducing subsampled chroma blocks.
    #[serde(default)]
    pub chroma_weight: ChromaWeight,
}

impl RendererConfig {
    /// Config with the bit depth and matrix left to their defaults.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            bits_per_sample: None,
            matrix: None,
            chroma_weight: ChromaWeight::default(),
        }
    }

    /// Set the bits per sample.
    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits_per_sample = Some(bits);
        self
    }

    /// Set the conversion matrix.
    pub fn with_matrix(mut self, matrix: MatrixSpec) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Set the chroma reduction weight.
    pub fn with_chroma_weight(mut self, weight: ChromaWeight) -> Self {
        self.chroma_weight = weight;
        self
    }

    /// Parse a JSON config.
    pub fn from_json(src: &str) -> OverlayResult<Self> {
        serde_json::from_str(src).map_err(|e| OverlayError::serde(e.to_string()))
    }

    /// Effective bits per sample.
    pub fn bits(&self) -> u32 {
        self.bits_per_sample
            .unwrap_or_else(|| self.format.default_bits())
    }

    /// Effective matrix: passthrough for RGB layouts unless set, otherwise chosen by frame size.
    pub fn resolved_matrix(&self) -> MatrixSpec {
        match self.matrix {
            Some(spec) => spec,
            None if self.format.is_rgb() => MatrixSpec::NONE,
            None => MatrixSpec::auto_for_resolution(self.width, self.height),
        }
    }

    /// Rescale applied to 8-bit glyph channels for this destination.
    pub fn color_scale(&self) -> ColorScale {
        ColorScale::for_depth(self.bits(), self.format.is_rgb())
    }

    /// Frame size as `(width, height)` in pixels.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    /// Check that the format, depth and matrix fit together.
    pub fn validate(&self) -> OverlayResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OverlayError::config("frame width/height must be > 0"));
        }

        let bits = self.bits();
        let depths = self.format.bit_depths();
        if !depths.contains(&bits) {
            return Err(OverlayError::config(format!(
                "{:?} supports {}..={} bits per sample, got {bits}",
                self.format,
                depths.start(),
                depths.end()
            )));
        }

        let matrix = self.resolved_matrix();
        if self.format.is_rgb() && matrix.is_yuv() {
            return Err(OverlayError::config(format!(
                "{:?} is an RGB layout but matrix {:?} converts to YUV",
                self.format, matrix.kind
            )));
        }
        if !self.format.is_rgb() && !matrix.is_yuv() {
            return Err(OverlayError::config(format!(
                "{:?} is a YUV layout and needs a conversion matrix",
                self.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/config.rs"]
mod tests;
