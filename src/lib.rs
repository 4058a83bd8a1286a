//! Wavyte overlay composites pre-rendered subtitle glyph bitmaps onto video frame buffers.
//!
//! A subtitle rasterizer hands over positioned 8-bit coverage masks, each with one flat color.
//! The renderer paints them into a full-resolution intermediate overlay, then blends that overlay
//! into the caller's frame in whatever layout it uses.
//!
//! # Pipeline overview
//!
//! 1. **Convert**: glyph colors go through a fixed-point RGB→YUV [`ConversionMatrix`] (or pass
//!    through for RGB layouts) and are lifted to the destination bit depth.
//! 2. **Accumulate**: glyphs are painted in order with associative "over" compositing into a
//!    coverage plane plus three channel planes. This only happens when the subtitles changed.
//! 3. **Composite**: the overlay is blended into the destination [`PixelFormat`], reducing
//!    chroma over each subsampling block.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Integer only**: all per-pixel math is fixed-point and deterministic.
//! - **Caller-owned frames**: the renderer only writes into the [`DestFrame`] it is given.
//! - **One generic engine**: 8-bit and 9–16-bit layouts share every kernel through [`Sample`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod color;
mod composite;
mod foundation;
mod overlay;
mod render;

pub use color::extract::{Channels, ColorScale, Rgba32, extract_channels};
pub use color::matrix::{
    ColorRange, ConversionMatrix, DEFAULT_SHIFT, MatrixKind, MatrixSpec, rebuild_matrix,
};
pub use composite::blend::{ChromaWeight, blend, dblend, reduce, scale};
pub use composite::formats::PixelFormat;
pub use composite::plane::{AnyFrame, DestFrame, PlaneMut};
pub use composite::sample::Sample;
pub use foundation::error::{OverlayError, OverlayResult};
pub use overlay::accumulate::AccumulateStats;
pub use overlay::glyph::GlyphBitmap;
pub use render::config::RendererConfig;
pub use render::renderer::SubtitleRenderer;
