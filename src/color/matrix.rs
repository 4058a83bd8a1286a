use serde::{Deserialize, Serialize};

use crate::foundation::math::descale;

/// Fixed-point precision used for glyph color conversion.
pub const DEFAULT_SHIFT: u32 = 16;

const MAX_SHIFT: u32 = 30;

/// Colorimetry standard selecting the RGB→YCbCr luma weights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixKind {
    /// RGB destination, no conversion.
    #[default]
    None,
    /// ITU-R BT.601 (Kr=0.299, Kb=0.114).
    Bt601,
    /// ITU-R BT.709 (Kr=0.2126, Kb=0.0722).
    Bt709,
    /// ITU-R BT.2020 non-constant luminance (Kr=0.2627, Kb=0.0593).
    Bt2020,
    /// FCC 73.682 (Kr=0.300, Kb=0.110).
    Fcc,
    /// SMPTE 240M (Kr=0.212, Kb=0.087).
    Smpte240m,
}

impl MatrixKind {
    /// `(Kr, Kb)` for this standard. `Kg` is always derived as `1 - Kr - Kb`.
    pub const fn luma_weights(self) -> Option<(f64, f64)> {
        match self {
            Self::None => None,
            Self::Bt601 => Some((0.299, 0.114)),
            Self::Bt709 => Some((0.2126, 0.0722)),
            Self::Bt2020 => Some((0.2627, 0.0593)),
            Self::Fcc => Some((0.300, 0.110)),
            Self::Smpte240m => Some((0.212, 0.087)),
        }
    }
}

/// Code-value range of the destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRange {
    /// "TV" scale: luma 16–235, chroma 16–240 (scaled to bit depth).
    #[default]
    Limited,
    /// "PC" scale: 0..2^bits-1.
    Full,
}

/// A colorimetry standard paired with a range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MatrixSpec {
    /// Luma weighting standard.
    pub kind: MatrixKind,
    /// Limited or full scale.
    pub range: ColorRange,
}

impl MatrixSpec {
    /// RGB passthrough.
    pub const NONE: Self = Self::new(MatrixKind::None, ColorRange::Full);

    /// Pair a standard with a range.
    pub const fn new(kind: MatrixKind, range: ColorRange) -> Self {
        Self { kind, range }
    }

    /// Parse the host-facing matrix names (`"TV.709"`, `"PC.601"`, `"bt.2020"`, `"none"`, ...).
    ///
    /// Matching is case-insensitive. Unrecognized names resolve to [`MatrixSpec::NONE`].
    pub fn from_name(name: &str) -> Self {
        use ColorRange::{Full, Limited};
        use MatrixKind::*;

        let lowered = name.trim().to_ascii_lowercase();
        let (kind, range) = match lowered.as_str() {
            "tv.601" | "bt.601" | "bt601" | "rec601" => (Bt601, Limited),
            "pc.601" => (Bt601, Full),
            "tv.709" | "bt.709" | "bt709" | "rec709" => (Bt709, Limited),
            "pc.709" => (Bt709, Full),
            "tv.2020" | "bt.2020" | "bt2020" | "rec2020" => (Bt2020, Limited),
            "pc.2020" => (Bt2020, Full),
            "tv.fcc" => (Fcc, Limited),
            "pc.fcc" => (Fcc, Full),
            "tv.240m" => (Smpte240m, Limited),
            "pc.240m" => (Smpte240m, Full),
            _ => return Self::NONE,
        };
        Self::new(kind, range)
    }

    /// Guess a limited-range matrix from frame size: BT.709 above SD, BT.601 otherwise.
    pub fn auto_for_resolution(width: u32, height: u32) -> Self {
        if width > 1280 || height > 576 {
            Self::new(MatrixKind::Bt709, ColorRange::Limited)
        } else {
            Self::new(MatrixKind::Bt601, ColorRange::Limited)
        }
    }

    /// Whether this spec selects a real RGB→YUV conversion.
    pub fn is_yuv(self) -> bool {
        self.kind != MatrixKind::None
    }
}

impl<'de> Deserialize<'de> for MatrixSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Obj {
                kind: MatrixKind,
                #[serde(default)]
                range: ColorRange,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Name(name) => Self::from_name(&name),
            Repr::Obj { kind, range } => Self::new(kind, range),
        })
    }
}

/// Fixed-point affine RGB→YUV transform.
///
/// Rows are channel1/2/3 (Y, U, V), columns the R, G, B contributions, each scaled by
/// `2^shift`. An invalid matrix means "destination is RGB": [`ConversionMatrix::apply`] returns
/// its input unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionMatrix {
    coeffs: [[i32; 3]; 3],
    luma_offset: i32,
    chroma_offset: i32,
    shift: u32,
    valid: bool,
}

impl Default for ConversionMatrix {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ConversionMatrix {
    /// The RGB passthrough matrix.
    pub const fn invalid() -> Self {
        Self {
            coeffs: [[0; 3]; 3],
            luma_offset: 0,
            chroma_offset: 0,
            shift: 0,
            valid: false,
        }
    }

    /// Build the transform for `spec` at `bits` per sample with `shift` fractional bits.
    ///
    /// `bits` is clamped to 8..=16 and `shift` to `bits + 8..=30`. Below `bits + 8` fractional
    /// bits, white and black no longer land exactly on the range extremes.
    pub fn build(spec: MatrixSpec, bits: u32, shift: u32) -> Self {
        let Some((kr, kb)) = spec.kind.luma_weights() else {
            return Self::invalid();
        };
        let bits = bits.clamp(8, 16);
        let shift = shift.clamp(bits + 8, MAX_SHIFT);
        let full = spec.range == ColorRange::Full;
        let up = bits - 8;

        let max_code = (1i32 << bits) - 1;
        let ymin = if full { 0 } else { 16 << up };
        let ymax = if full { max_code } else { 235 << up };
        let cmin = if full { 0 } else { 16 << up };
        let cmax = if full { max_code } else { 240 << up };

        let sy = f64::from(ymax - ymin);
        let suv = f64::from((cmax - cmin) / 2);
        let kg = 1.0 - kr - kb;
        let mulfac = (1u64 << shift) as f64;
        let srgb = f64::from(max_code);

        // `as` truncates toward zero, so negative cross terms round up rather than to nearest.
        let fix = |v: f64| (v * mulfac / srgb + 0.5) as i32;

        let coeffs = [
            [fix(sy * kr), fix(sy * kg), fix(sy * kb)],
            [fix(suv * kr / (kb - 1.0)), fix(suv * kg / (kb - 1.0)), fix(suv)],
            [fix(suv), fix(suv * kg / (kr - 1.0)), fix(suv * kb / (kr - 1.0))],
        ];

        Self {
            coeffs,
            luma_offset: ymin,
            chroma_offset: 1 << (bits - 1),
            shift,
            valid: true,
        }
    }

    /// Whether a YUV conversion is active.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Coefficient rows `[Y, U, V]` × columns `[R, G, B]`.
    pub fn coefficients(&self) -> [[i32; 3]; 3] {
        self.coeffs
    }

    /// Additive luma offset (minimum luma code).
    pub fn luma_offset(&self) -> i32 {
        self.luma_offset
    }

    /// Chroma midpoint added to channel2/3.
    pub fn chroma_offset(&self) -> i32 {
        self.chroma_offset
    }

    /// Fractional bits of the coefficients.
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Map `[r, g, b]` to `[y, u, v]`, or pass through when invalid. Not clamped.
    pub fn apply(&self, rgb: [i32; 3]) -> [i32; 3] {
        if !self.valid {
            return rgb;
        }
        let offsets = [self.luma_offset, self.chroma_offset, self.chroma_offset];
        let mut out = [0i32; 3];
        for (ch, row) in self.coeffs.iter().enumerate() {
            let acc: i64 = row
                .iter()
                .zip(rgb)
                .map(|(&k, c)| i64::from(k) * i64::from(c))
                .sum();
            out[ch] = descale(acc, self.shift) as i32 + offsets[ch];
        }
        out
    }
}

/// Build the 8-bit, 16-fractional-bit matrix used to convert glyph colors.
///
/// Idempotent; call again whenever the configured matrix changes.
pub fn rebuild_matrix(spec: MatrixSpec) -> ConversionMatrix {
    ConversionMatrix::build(spec, 8, DEFAULT_SHIFT)
}

#[cfg(test)]
#[path = "../../tests/unit/color/matrix.rs"]
mod tests;
