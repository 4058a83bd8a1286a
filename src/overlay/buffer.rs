use crate::composite::sample::Sample;

/// Full-frame intermediate overlay: coverage plus three color channels.
///
/// Coverage is always 0–255; channels are on the destination scale and already converted to the
/// destination colorimetry. Sized once; a new resolution gets a new buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct OverlayBuffer<S> {
    width: usize,
    height: usize,
    coverage: Vec<u8>,
    channels: [Vec<S>; 3],
}

impl<S: Sample> OverlayBuffer<S> {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            coverage: vec![0; len],
            channels: std::array::from_fn(|_| vec![S::default(); len]),
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn clear(&mut self) {
        self.coverage.fill(0);
        for ch in &mut self.channels {
            ch.fill(S::default());
        }
    }

    #[cfg(test)]
    pub(crate) fn is_clear(&self) -> bool {
        self.coverage.iter().all(|&a| a == 0)
    }

    pub(crate) fn coverage_row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.coverage[start..start + self.width]
    }

    pub(crate) fn channel_rows(&self, y: usize) -> [&[S]; 3] {
        let start = y * self.width;
        let end = start + self.width;
        [
            &self.channels[0][start..end],
            &self.channels[1][start..end],
            &self.channels[2][start..end],
        ]
    }

    /// `(coverage, [c1, c2, c3])` at `(x, y)`.
    #[cfg(test)]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> (u8, [S; 3]) {
        let i = y * self.width + x;
        (
            self.coverage[i],
            [self.channels[0][i], self.channels[1][i], self.channels[2][i]],
        )
    }

    #[cfg(test)]
    pub(crate) fn set_pixel(&mut self, x: usize, y: usize, a: u8, c: [S; 3]) {
        let i = y * self.width + x;
        self.coverage[i] = a;
        for (plane, v) in self.channels.iter_mut().zip(c) {
            plane[i] = v;
        }
    }

    pub(crate) fn planes_mut(&mut self) -> (&mut [u8], &mut [Vec<S>; 3]) {
        (&mut self.coverage, &mut self.channels)
    }
}
