use crate::color::extract::Rgba32;

/// One positioned glyph bitmap from the subtitle rasterizer (read-only).
///
/// `bitmap` holds `height` rows of `width` 8-bit coverage values, rows `stride` bytes apart.
#[derive(Clone, Copy, Debug)]
pub struct GlyphBitmap<'a> {
    /// Footprint width in pixels.
    pub width: u32,
    /// Footprint height in pixels.
    pub height: u32,
    /// Bytes between bitmap rows.
    pub stride: usize,
    /// Destination column of the bitmap's left edge (may be negative).
    pub dst_x: i32,
    /// Destination row of the bitmap's top edge (may be negative).
    pub dst_y: i32,
    /// Flat glyph color.
    pub color: Rgba32,
    /// Per-pixel coverage mask.
    pub bitmap: &'a [u8],
}

/// The part of a glyph that lands inside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Footprint {
    pub(crate) src_x: usize,
    pub(crate) src_y: usize,
    pub(crate) dst_x: usize,
    pub(crate) dst_y: usize,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl<'a> GlyphBitmap<'a> {
    /// A tightly packed glyph (`stride == width`).
    pub fn new(
        width: u32,
        height: u32,
        dst_x: i32,
        dst_y: i32,
        color: Rgba32,
        bitmap: &'a [u8],
    ) -> Self {
        Self {
            width,
            height,
            stride: width as usize,
            dst_x,
            dst_y,
            color,
            bitmap,
        }
    }

    /// Whether the glyph has no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `bitmap` and `stride` can describe the footprint.
    pub fn is_well_formed(&self) -> bool {
        let (w, h) = (self.width as usize, self.height as usize);
        if self.is_empty() {
            return true;
        }
        if self.stride < w {
            return false;
        }
        (h - 1)
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(w))
            .is_some_and(|needed| self.bitmap.len() >= needed)
    }

    /// Clip to a `frame_w × frame_h` frame. `None` when nothing is visible.
    pub(crate) fn clip(&self, frame_w: usize, frame_h: usize) -> Option<Footprint> {
        let (x0, x1) = clip_axis(self.dst_x, self.width, frame_w)?;
        let (y0, y1) = clip_axis(self.dst_y, self.height, frame_h)?;
        Some(Footprint {
            src_x: (x0 - i64::from(self.dst_x)) as usize,
            src_y: (y0 - i64::from(self.dst_y)) as usize,
            dst_x: x0 as usize,
            dst_y: y0 as usize,
            width: (x1 - x0) as usize,
            height: (y1 - y0) as usize,
        })
    }
}

fn clip_axis(pos: i32, len: u32, frame: usize) -> Option<(i64, i64)> {
    let start = i64::from(pos);
    let lo = start.max(0);
    let hi = (start + i64::from(len)).min(frame as i64);
    (lo < hi).then_some((lo, hi))
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/glyph.rs"]
mod tests;
