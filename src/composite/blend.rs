//! Integer blend primitives shared by the accumulator and every format kernel.
//!
//! Coverage is always on the 0–255 scale; channel values are on the destination scale
//! (`0..=S::MAX`).

use serde::{Deserialize, Serialize};

use crate::foundation::math::{div_round, div255};

/// Opaque-destination blend: `round((a*src + (255-a)*dst) / 255)`.
#[inline]
pub fn blend(a: u8, src: u32, dst: u32) -> u32 {
    let a = u32::from(a);
    div255(a * src + (255 - a) * dst)
}

/// Combined "over" alpha, in units of `255 * max`: `a*max + dst_a*(255-a)`.
///
/// The accumulator and 8-bit RGBA destinations use `max = 255`.
#[inline]
pub fn scale(a: u8, max: u32, dst_a: u32) -> u32 {
    let a = u32::from(a);
    a * max + dst_a * (255 - a)
}

/// Coverage-weighted channel average under "over": `round((a*max*src + dst_a*(255-a)*dst) / out)`.
///
/// `out` is the matching [`scale`] result. A zero `out` (nothing on either side) returns `dst`.
#[inline]
pub fn dblend(a: u8, src: u32, dst_a: u32, dst: u32, out: u32, max: u32) -> u32 {
    if out == 0 {
        return dst;
    }
    let a = u64::from(a);
    let num = a * u64::from(max) * u64::from(src) + u64::from(dst_a) * (255 - a) * u64::from(dst);
    div_round(num, u64::from(out)) as u32
}

/// How a subsampled chroma block weights the averaged chroma when blending it in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromaWeight {
    /// Average by coverage, then blend at `min(255, Σa)`.
    #[default]
    Saturating,
    /// Blend at the mean coverage of the block's samples (the classic `blend2`/`blend4` family).
    Mean,
}

/// Reduce a block of luma-aligned `(coverage, chroma)` samples into one chroma sample.
///
/// Returns `dst` unchanged when the block has no coverage.
pub fn reduce(samples: &[(u8, u32)], dst: u32, weight: ChromaWeight) -> u32 {
    let sum_a: u32 = samples.iter().map(|&(a, _)| u32::from(a)).sum();
    if sum_a == 0 {
        return dst;
    }
    let sum_ac: u64 = samples
        .iter()
        .map(|&(a, c)| u64::from(a) * u64::from(c))
        .sum();

    match weight {
        ChromaWeight::Saturating => {
            let avg = div_round(sum_ac, u64::from(sum_a)) as u32;
            blend(sum_a.min(255) as u8, avg, dst)
        }
        ChromaWeight::Mean => {
            let n = samples.len() as u64;
            let rest = (n * 255 - u64::from(sum_a)) * u64::from(dst);
            let mixed = div_round(sum_ac + rest, n);
            div255(mixed as u32)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/blend.rs"]
mod tests;
