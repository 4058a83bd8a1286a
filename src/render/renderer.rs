use crate::color::extract::ColorScale;
use crate::color::matrix::{ConversionMatrix, rebuild_matrix};
use crate::composite::blend::ChromaWeight;
use crate::composite::formats::{Compositor, compositor};
use crate::composite::plane::{AnyFrame, DestFrame, PlaneMut};
use crate::composite::sample::Sample;
use crate::foundation::error::{OverlayError, OverlayResult};
use crate::overlay::accumulate::{AccumulateStats, accumulate};
use crate::overlay::buffer::OverlayBuffer;
use crate::overlay::glyph::GlyphBitmap;
use crate::render::config::RendererConfig;

/// Overlay buffer plus the kernel that blends it into one sample width.
struct Pipeline<S> {
    buffer: OverlayBuffer<S>,
    compositor: Compositor<S>,
    empty: bool,
}

impl<S: Sample> Pipeline<S> {
    fn new(config: &RendererConfig) -> OverlayResult<Self> {
        let compositor = compositor::<S>(config.format).ok_or_else(|| {
            OverlayError::config(format!("no {}-byte kernel for {:?}", S::BYTES, config.format))
        })?;
        let (width, height) = config.dimensions();
        Ok(Self {
            buffer: OverlayBuffer::new(width, height),
            compositor,
            empty: true,
        })
    }

    /// Switch kernels in place; `false` when the buffer cannot be kept.
    fn retarget(&mut self, config: &RendererConfig) -> bool {
        let (width, height) = config.dimensions();
        if self.buffer.width() != width || self.buffer.height() != height {
            return false;
        }
        match compositor::<S>(config.format) {
            Some(f) => {
                self.compositor = f;
                true
            }
            None => false,
        }
    }

    fn run(
        &mut self,
        glyphs: &[GlyphBitmap<'_>],
        repaint: bool,
        matrix: &ConversionMatrix,
        color_scale: ColorScale,
        weight: ChromaWeight,
        planes: &mut [PlaneMut<'_, S>],
    ) -> Option<AccumulateStats> {
        let stats = repaint.then(|| {
            self.buffer.clear();
            let stats = accumulate(&mut self.buffer, glyphs, matrix, color_scale);
            self.empty = stats.pixels == 0;
            stats
        });
        if !self.empty {
            (self.compositor)(&self.buffer, planes, weight);
        }
        stats
    }
}

enum Engine {
    Narrow(Pipeline<u8>),
    Wide(Pipeline<u16>),
}

impl Engine {
    fn for_config(config: &RendererConfig) -> OverlayResult<Self> {
        match config.format.sample_bytes() {
            1 => Ok(Self::Narrow(Pipeline::new(config)?)),
            _ => Ok(Self::Wide(Pipeline::new(config)?)),
        }
    }

    /// Adopt `config`, reallocating only when size or sample width changed. Returns whether it
    /// reallocated.
    fn reconfigure(&mut self, config: &RendererConfig) -> OverlayResult<bool> {
        let kept = match self {
            Self::Narrow(p) => config.format.sample_bytes() == 1 && p.retarget(config),
            Self::Wide(p) => config.format.sample_bytes() == 2 && p.retarget(config),
        };
        if !kept {
            *self = Self::for_config(config)?;
        }
        Ok(!kept)
    }
}

/// Composites positioned glyph bitmaps onto frames of one configured format.
///
/// The overlay is accumulated once per subtitle change and reused for every frame until the
/// next change.
pub struct SubtitleRenderer {
    config: RendererConfig,
    matrix: ConversionMatrix,
    color_scale: ColorScale,
    engine: Engine,
    dirty: bool,
}

impl SubtitleRenderer {
    /// Validate `config` and allocate the overlay buffer.
    #[tracing::instrument]
    pub fn new(config: RendererConfig) -> OverlayResult<Self> {
        config.validate()?;
        let engine = Engine::for_config(&config)?;
        let matrix = rebuild_matrix(config.resolved_matrix());
        tracing::info!(valid = matrix.is_valid(), "renderer configured");
        Ok(Self {
            config,
            matrix,
            color_scale: config.color_scale(),
            engine,
            dirty: true,
        })
    }

    /// Apply a new configuration and return the glyph color matrix now in use.
    ///
    /// On error the previous configuration stays active. The next [`SubtitleRenderer::render`]
    /// repaints the overlay regardless of its `changed` flag.
    #[tracing::instrument(skip(self))]
    pub fn rebuild(&mut self, config: RendererConfig) -> OverlayResult<ConversionMatrix> {
        config.validate()?;
        let reallocated = self.engine.reconfigure(&config)?;
        self.matrix = rebuild_matrix(config.resolved_matrix());
        self.color_scale = config.color_scale();
        self.config = config;
        self.dirty = true;
        tracing::info!(
            reallocated,
            valid = self.matrix.is_valid(),
            "renderer reconfigured"
        );
        Ok(self.matrix)
    }

    /// Composite `glyphs` onto `frame`.
    ///
    /// When `changed` is false the overlay from the previous call is reused and `glyphs` is
    /// ignored. Frames whose planes do not match the configured format are rejected untouched.
    ///
    /// Returns the accumulation counters when the overlay was repainted, `None` when it was reused.
    #[tracing::instrument(
        level = "debug",
        skip(self, glyphs, frame),
        fields(glyphs = glyphs.len())
    )]
    pub fn render<S: Sample>(
        &mut self,
        glyphs: &[GlyphBitmap<'_>],
        changed: bool,
        frame: &mut DestFrame<'_, S>,
    ) -> OverlayResult<Option<AccumulateStats>> {
        let (width, height) = self.config.dimensions();
        self.config
            .format
            .check_planes(width, height, frame.planes_mut())?;

        let repaint = changed || self.dirty;
        let (matrix, color_scale) = (self.matrix, self.color_scale);
        let weight = self.config.chroma_weight;
        let stats = match (&mut self.engine, S::wrap(frame)) {
            (Engine::Narrow(p), AnyFrame::Narrow(f)) => {
                p.run(glyphs, repaint, &matrix, color_scale, weight, f.planes_mut())
            }
            (Engine::Wide(p), AnyFrame::Wide(f)) => {
                p.run(glyphs, repaint, &matrix, color_scale, weight, f.planes_mut())
            }
            _ => {
                return Err(OverlayError::frame(format!(
                    "{:?} frame has {}-byte samples",
                    self.config.format,
                    S::BYTES
                )));
            }
        };

        if let Some(stats) = stats {
            self.dirty = false;
            tracing::debug!(
                painted = stats.painted,
                skipped = stats.skipped,
                pixels = stats.pixels,
                "overlay accumulated"
            );
        }
        Ok(stats)
    }

    /// Active configuration.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Glyph color matrix in use.
    pub fn matrix(&self) -> &ConversionMatrix {
        &self.matrix
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
