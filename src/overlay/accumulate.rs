use crate::color::extract::{ColorScale, extract_channels};
use crate::color::matrix::ConversionMatrix;
use crate::composite::blend::{dblend, scale};
use crate::composite::sample::Sample;
use crate::foundation::math::{div255, mul_div255};
use crate::overlay::buffer::OverlayBuffer;
use crate::overlay::glyph::GlyphBitmap;

/// Counters from one accumulation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccumulateStats {
    /// Glyphs that touched at least their clipped footprint.
    pub painted: usize,
    /// Empty, invisible, fully off-frame or malformed glyphs.
    pub skipped: usize,
    /// Pixel writes into the overlay.
    pub pixels: u64,
}

/// Paint `glyphs` in order into `buf` with associative "over" compositing.
///
/// Glyph colors go through `matrix`, then `scale` lifts them to the destination depth. Pixels
/// where a glyph has zero effective coverage are left exactly as they were.
pub(crate) fn accumulate<S: Sample>(
    buf: &mut OverlayBuffer<S>,
    glyphs: &[GlyphBitmap<'_>],
    matrix: &ConversionMatrix,
    color_scale: ColorScale,
) -> AccumulateStats {
    let mut stats = AccumulateStats::default();
    let (width, height) = (buf.width(), buf.height());
    let (coverage, channels) = buf.planes_mut();

    for glyph in glyphs {
        if glyph.is_empty() {
            stats.skipped += 1;
            continue;
        }
        if !glyph.is_well_formed() {
            tracing::warn!(
                width = glyph.width,
                height = glyph.height,
                stride = glyph.stride,
                len = glyph.bitmap.len(),
                "skipping glyph with inconsistent bitmap geometry"
            );
            stats.skipped += 1;
            continue;
        }
        let channels_8 = extract_channels(glyph.color, matrix);
        let glyph_alpha = u32::from(channels_8.alpha);
        let Some(fp) = glyph.clip(width, height).filter(|_| glyph_alpha != 0) else {
            stats.skipped += 1;
            continue;
        };
        let color = channels_8.c.map(|v| color_scale.apply(v));
        stats.painted += 1;

        for row in 0..fp.height {
            let src_start = (fp.src_y + row) * glyph.stride + fp.src_x;
            let mask = &glyph.bitmap[src_start..src_start + fp.width];
            let dst_start = (fp.dst_y + row) * width + fp.dst_x;

            for (j, &m) in mask.iter().enumerate() {
                let a = mul_div255(u32::from(m), glyph_alpha) as u8;
                if a == 0 {
                    continue;
                }
                let i = dst_start + j;
                let dst_a = u32::from(coverage[i]);
                if dst_a == 0 {
                    for (plane, &c) in channels.iter_mut().zip(&color) {
                        plane[i] = S::from_u32(c);
                    }
                    coverage[i] = a;
                } else {
                    let out = scale(a, 255, dst_a);
                    for (plane, &c) in channels.iter_mut().zip(&color) {
                        let v = dblend(a, c, dst_a, plane[i].to_u32(), out, 255);
                        plane[i] = S::from_u32(v);
                    }
                    coverage[i] = div255(out) as u8;
                }
                stats.pixels += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/accumulate.rs"]
mod tests;
