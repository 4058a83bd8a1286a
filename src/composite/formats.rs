use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::composite::blend::{ChromaWeight, blend, dblend, reduce, scale};
use crate::composite::plane::PlaneMut;
use crate::composite::sample::Sample;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::math::div255;
use crate::overlay::buffer::OverlayBuffer;

/// Destination pixel layout.
///
/// Packed RGB layouts are stored B, G, R(, A) in memory. Planar RGB planes are ordered R, G, B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// Packed 8-bit B, G, R, A with a persistent alpha channel.
    Bgra32,
    /// Packed 8-bit B, G, R, x; the fourth byte is ignored.
    Bgrx32,
    /// Packed 8-bit B, G, R.
    Bgr24,
    /// Packed 16-bit B, G, R, A with a persistent alpha channel.
    Bgra64,
    /// Packed 16-bit B, G, R.
    Bgr48,
    /// Planar 8-bit R, G, B.
    RgbP8,
    /// Planar high-bit-depth R, G, B.
    RgbP16,
    /// Packed 8-bit 4:2:2 Y0 U Y1 V.
    Yuy2,
    /// Planar 8-bit 4:2:0.
    Yv12,
    /// Planar 8-bit 4:2:2.
    Yv16,
    /// Planar 8-bit 4:1:1.
    Yv411,
    /// Planar 8-bit 4:4:4.
    Yv24,
    /// Planar high-bit-depth 4:2:0.
    Yuv420P16,
    /// Planar high-bit-depth 4:2:2.
    Yuv422P16,
    /// Planar high-bit-depth 4:4:4.
    Yuv444P16,
    /// 8-bit luma only.
    Y8,
    /// High-bit-depth luma only.
    Y16,
}

impl PixelFormat {
    /// Every supported format.
    pub const ALL: [Self; 17] = [
        Self::Bgra32,
        Self::Bgrx32,
        Self::Bgr24,
        Self::Bgra64,
        Self::Bgr48,
        Self::RgbP8,
        Self::RgbP16,
        Self::Yuy2,
        Self::Yv12,
        Self::Yv16,
        Self::Yv411,
        Self::Yv24,
        Self::Yuv420P16,
        Self::Yuv422P16,
        Self::Yuv444P16,
        Self::Y8,
        Self::Y16,
    ];

    /// Bytes per stored sample.
    pub const fn sample_bytes(self) -> usize {
        match self {
            Self::Bgra64
            | Self::Bgr48
            | Self::RgbP16
            | Self::Yuv420P16
            | Self::Yuv422P16
            | Self::Yuv444P16
            | Self::Y16 => 2,
            _ => 1,
        }
    }

    /// Whether the destination stores RGB (no colorimetry conversion).
    pub const fn is_rgb(self) -> bool {
        matches!(
            self,
            Self::Bgra32
                | Self::Bgrx32
                | Self::Bgr24
                | Self::Bgra64
                | Self::Bgr48
                | Self::RgbP8
                | Self::RgbP16
        )
    }

    /// Whether the destination carries an alpha channel that must accumulate.
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Bgra32 | Self::Bgra64)
    }

    /// Valid bits per sample.
    pub fn bit_depths(self) -> RangeInclusive<u32> {
        match self {
            Self::Bgra64 | Self::Bgr48 => 16..=16,
            Self::RgbP16 | Self::Yuv420P16 | Self::Yuv422P16 | Self::Yuv444P16 | Self::Y16 => {
                9..=16
            }
            _ => 8..=8,
        }
    }

    /// Bits per sample assumed when the configuration leaves it open.
    pub fn default_bits(self) -> u32 {
        *self.bit_depths().end()
    }

    /// Luma samples per chroma sample, horizontally and vertically. `None` for luma-only.
    pub const fn chroma_block(self) -> Option<(usize, usize)> {
        match self {
            Self::Yuy2 | Self::Yv16 | Self::Yuv422P16 => Some((2, 1)),
            Self::Yv12 | Self::Yuv420P16 => Some((2, 2)),
            Self::Yv411 => Some((4, 1)),
            Self::Y8 | Self::Y16 => None,
            _ => Some((1, 1)),
        }
    }

    /// Required `(width in samples, rows)` of every plane for a `width × height` frame.
    pub fn plane_extents(self, width: usize, height: usize) -> Vec<(usize, usize)> {
        match self {
            Self::Bgra32 | Self::Bgrx32 | Self::Bgra64 => vec![(width * 4, height)],
            Self::Bgr24 | Self::Bgr48 => vec![(width * 3, height)],
            Self::Yuy2 => vec![(width.div_ceil(2) * 4, height)],
            Self::Y8 | Self::Y16 => vec![(width, height)],
            _ => {
                let (hs, vs) = self.chroma_block().unwrap_or((1, 1));
                let chroma = (width.div_ceil(hs), height.div_ceil(vs));
                vec![(width, height), chroma, chroma]
            }
        }
    }

    /// Check that `planes` can hold a `width × height` frame of this format.
    pub(crate) fn check_planes<S: Sample>(
        self,
        width: usize,
        height: usize,
        planes: &[PlaneMut<'_, S>],
    ) -> OverlayResult<()> {
        if S::BYTES != self.sample_bytes() {
            return Err(OverlayError::frame(format!(
                "{self:?} stores {}-byte samples, frame has {}-byte samples",
                self.sample_bytes(),
                S::BYTES
            )));
        }
        let extents = self.plane_extents(width, height);
        if planes.len() != extents.len() {
            return Err(OverlayError::frame(format!(
                "{self:?} needs {} planes, frame has {}",
                extents.len(),
                planes.len()
            )));
        }
        for (idx, (plane, (w, h))) in planes.iter().zip(extents).enumerate() {
            if plane.width() < w || plane.height() < h {
                return Err(OverlayError::frame(format!(
                    "plane {idx} is {}x{}, {self:?} at {width}x{height} needs {w}x{h}",
                    plane.width(),
                    plane.height()
                )));
            }
        }
        Ok(())
    }
}

/// Blend the overlay into one destination layout.
///
/// Planes must already have passed [`PixelFormat::check_planes`].
pub(crate) type Compositor<S> = fn(&OverlayBuffer<S>, &mut [PlaneMut<'_, S>], ChromaWeight);

/// Select the kernel for `format`, or `None` when `S` is not its sample type.
pub(crate) fn compositor<S: Sample>(format: PixelFormat) -> Option<Compositor<S>> {
    if format.sample_bytes() != S::BYTES {
        return None;
    }
    let f: Compositor<S> = match format {
        PixelFormat::Bgra32 | PixelFormat::Bgra64 => packed_rgba::<S>,
        PixelFormat::Bgrx32 => packed_rgb::<S, 4>,
        PixelFormat::Bgr24 | PixelFormat::Bgr48 => packed_rgb::<S, 3>,
        PixelFormat::Yuy2 => packed_yuy2::<S>,
        PixelFormat::Yv12 | PixelFormat::Yuv420P16 => planar::<S, 2, 2>,
        PixelFormat::Yv16 | PixelFormat::Yuv422P16 => planar::<S, 2, 1>,
        PixelFormat::Yv411 => planar::<S, 4, 1>,
        PixelFormat::Yv24 | PixelFormat::Yuv444P16 | PixelFormat::RgbP8 | PixelFormat::RgbP16 => {
            planar::<S, 1, 1>
        }
        PixelFormat::Y8 | PixelFormat::Y16 => luma::<S>,
    };
    Some(f)
}

fn blend_row<S: Sample>(coverage: &[u8], src: &[S], dst: &mut [S]) {
    for ((&a, &s), d) in coverage.iter().zip(src).zip(dst.iter_mut()) {
        if a != 0 {
            *d = S::from_u32(blend(a, s.to_u32(), d.to_u32()));
        }
    }
}

/// Packed B, G, R, A with "over" onto the destination alpha.
fn packed_rgba<S: Sample>(buf: &OverlayBuffer<S>, planes: &mut [PlaneMut<'_, S>], _: ChromaWeight) {
    let Some(dst) = planes.first_mut() else {
        return;
    };
    for y in 0..buf.height() {
        let cov = buf.coverage_row(y);
        let [r, g, b] = buf.channel_rows(y);
        let row = dst.row_mut(y);
        for (x, px) in row.chunks_exact_mut(4).take(buf.width()).enumerate() {
            let a = cov[x];
            if a == 0 {
                continue;
            }
            let dst_a = px[3].to_u32();
            let out = scale(a, S::MAX, dst_a);
            for (i, src) in [(2, r[x]), (1, g[x]), (0, b[x])] {
                let v = dblend(a, src.to_u32(), dst_a, px[i].to_u32(), out, S::MAX);
                px[i] = S::from_u32(v);
            }
            px[3] = S::from_u32(div255(out));
        }
    }
}

/// Packed B, G, R with `STEP` samples per pixel; any fourth sample is left alone.
fn packed_rgb<S: Sample, const STEP: usize>(
    buf: &OverlayBuffer<S>,
    planes: &mut [PlaneMut<'_, S>],
    _: ChromaWeight,
) {
    let Some(dst) = planes.first_mut() else {
        return;
    };
    for y in 0..buf.height() {
        let cov = buf.coverage_row(y);
        let [r, g, b] = buf.channel_rows(y);
        let row = dst.row_mut(y);
        for (x, px) in row.chunks_exact_mut(STEP).take(buf.width()).enumerate() {
            let a = cov[x];
            if a == 0 {
                continue;
            }
            px[2] = S::from_u32(blend(a, r[x].to_u32(), px[2].to_u32()));
            px[1] = S::from_u32(blend(a, g[x].to_u32(), px[1].to_u32()));
            px[0] = S::from_u32(blend(a, b[x].to_u32(), px[0].to_u32()));
        }
    }
}

/// Packed Y0 U Y1 V, one chroma pair per two luma samples.
fn packed_yuy2<S: Sample>(
    buf: &OverlayBuffer<S>,
    planes: &mut [PlaneMut<'_, S>],
    weight: ChromaWeight,
) {
    let Some(dst) = planes.first_mut() else {
        return;
    };
    let width = buf.width();
    for y in 0..buf.height() {
        let cov = buf.coverage_row(y);
        let [ys, us, vs] = buf.channel_rows(y);
        let row = dst.row_mut(y);
        for (pair, px) in row.chunks_exact_mut(4).take(width.div_ceil(2)).enumerate() {
            let x0 = pair * 2;
            let x_end = (x0 + 2).min(width);
            let covered = &cov[x0..x_end];
            if covered.iter().all(|&a| a == 0) {
                continue;
            }

            let mut u_block = [(0u8, 0u32); 2];
            let mut v_block = [(0u8, 0u32); 2];
            for (k, x) in (x0..x_end).enumerate() {
                let a = cov[x];
                if a != 0 {
                    let yi = k * 2;
                    px[yi] = S::from_u32(blend(a, ys[x].to_u32(), px[yi].to_u32()));
                }
                u_block[k] = (a, us[x].to_u32());
                v_block[k] = (a, vs[x].to_u32());
            }
            let n = x_end - x0;
            px[1] = S::from_u32(reduce(&u_block[..n], px[1].to_u32(), weight));
            px[3] = S::from_u32(reduce(&v_block[..n], px[3].to_u32(), weight));
        }
    }
}

/// Planar Y/U/V (or R/G/B with `HS = VS = 1`); each chroma sample covers an `HS × VS` luma block.
///
/// Edge blocks of odd-sized frames reduce over the samples that exist.
fn planar<S: Sample, const HS: usize, const VS: usize>(
    buf: &OverlayBuffer<S>,
    planes: &mut [PlaneMut<'_, S>],
    weight: ChromaWeight,
) {
    let [luma, u_plane, v_plane, ..] = planes else {
        return;
    };
    let (width, height) = (buf.width(), buf.height());

    let mut u_block = [(0u8, 0u32); 4];
    let mut v_block = [(0u8, 0u32); 4];

    for cy in 0..height.div_ceil(VS) {
        let y0 = cy * VS;
        let y_end = (y0 + VS).min(height);

        for y in y0..y_end {
            let [ys, _, _] = buf.channel_rows(y);
            blend_row(buf.coverage_row(y), ys, luma.row_mut(y));
        }

        let u_row = u_plane.row_mut(cy);
        let v_row = v_plane.row_mut(cy);
        for cx in 0..width.div_ceil(HS) {
            let x0 = cx * HS;
            let x_end = (x0 + HS).min(width);

            let mut n = 0;
            for y in y0..y_end {
                let cov = buf.coverage_row(y);
                let [_, us, vs] = buf.channel_rows(y);
                for x in x0..x_end {
                    u_block[n] = (cov[x], us[x].to_u32());
                    v_block[n] = (cov[x], vs[x].to_u32());
                    n += 1;
                }
            }
            if u_block[..n].iter().all(|&(a, _)| a == 0) {
                continue;
            }
            u_row[cx] = S::from_u32(reduce(&u_block[..n], u_row[cx].to_u32(), weight));
            v_row[cx] = S::from_u32(reduce(&v_block[..n], v_row[cx].to_u32(), weight));
        }
    }
}

/// Luma plane only; the overlay's chroma is discarded.
fn luma<S: Sample>(buf: &OverlayBuffer<S>, planes: &mut [PlaneMut<'_, S>], _: ChromaWeight) {
    let Some(dst) = planes.first_mut() else {
        return;
    };
    for y in 0..buf.height() {
        let [ys, _, _] = buf.channel_rows(y);
        blend_row(buf.coverage_row(y), ys, dst.row_mut(y));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/formats.rs"]
mod tests;
