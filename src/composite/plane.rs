use crate::composite::sample::Sample;
use crate::foundation::error::{OverlayError, OverlayResult};

/// Mutable 2D view over one caller-owned destination plane.
///
/// Rows are `stride` samples apart; only the first `width` samples of each row are touched.
pub struct PlaneMut<'a, S> {
    data: &'a mut [S],
    stride: usize,
    width: usize,
    height: usize,
}

impl<'a, S: Sample> PlaneMut<'a, S> {
    /// Wrap `data` using the host's byte pitch.
    ///
    /// `width` is in samples (e.g. `4 * pixels` for packed BGRA). The pitch must be a whole number
    /// of samples.
    pub fn new(
        data: &'a mut [S],
        pitch_bytes: usize,
        width: usize,
        height: usize,
    ) -> OverlayResult<Self> {
        if !pitch_bytes.is_multiple_of(S::BYTES) {
            return Err(OverlayError::frame(format!(
                "pitch {pitch_bytes} is not a multiple of the {}-byte sample size",
                S::BYTES
            )));
        }
        Self::from_stride(data, pitch_bytes / S::BYTES, width, height)
    }

    /// Wrap `data` with a stride already expressed in samples.
    pub fn from_stride(
        data: &'a mut [S],
        stride: usize,
        width: usize,
        height: usize,
    ) -> OverlayResult<Self> {
        if stride < width {
            return Err(OverlayError::frame(format!(
                "stride {stride} is smaller than plane width {width}"
            )));
        }
        let needed = match height {
            0 => 0,
            h => (h - 1)
                .checked_mul(stride)
                .and_then(|v| v.checked_add(width))
                .ok_or_else(|| OverlayError::frame("plane size overflow"))?,
        };
        if data.len() < needed {
            return Err(OverlayError::frame(format!(
                "plane holds {} samples, {width}x{height} at stride {stride} needs {needed}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            stride,
            width,
            height,
        })
    }

    /// Row width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Distance between rows in samples.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Row `y`, `width` samples long.
    pub fn row(&self, y: usize) -> &[S] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Mutable row `y`, `width` samples long.
    pub fn row_mut(&mut self, y: usize) -> &mut [S] {
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }
}

/// The planes of one destination frame, in format plane order.
pub struct DestFrame<'a, S> {
    planes: Vec<PlaneMut<'a, S>>,
}

impl<'a, S: Sample> DestFrame<'a, S> {
    /// Collect planes (luma/packed first, then chroma or G/B).
    pub fn new(planes: Vec<PlaneMut<'a, S>>) -> Self {
        Self { planes }
    }

    /// Number of planes.
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Plane `idx`.
    pub fn plane(&self, idx: usize) -> Option<&PlaneMut<'a, S>> {
        self.planes.get(idx)
    }

    pub(crate) fn planes_mut(&mut self) -> &mut [PlaneMut<'a, S>] {
        &mut self.planes
    }
}

/// A destination frame tagged by sample width, used to route it to the matching engine.
pub enum AnyFrame<'f, 'a> {
    /// 8-bit samples.
    Narrow(&'f mut DestFrame<'a, u8>),
    /// 16-bit samples.
    Wide(&'f mut DestFrame<'a, u16>),
}

#[cfg(test)]
#[path = "../../tests/unit/composite/plane.rs"]
mod tests;
