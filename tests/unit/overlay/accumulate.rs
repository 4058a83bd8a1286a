use super::*;
use crate::color::extract::Rgba32;
use crate::color::matrix::{ColorRange, MatrixKind, MatrixSpec, rebuild_matrix};

fn rgb() -> ConversionMatrix {
    rebuild_matrix(MatrixSpec::NONE)
}

fn solid(w: u32, h: u32, x: i32, y: i32, color: Rgba32, mask: &[u8]) -> GlyphBitmap<'_> {
    GlyphBitmap::new(w, h, x, y, color, mask)
}

#[test]
fn empty_list_leaves_buffer_clear() {
    let mut buf = OverlayBuffer::<u8>::new(4, 4);
    let stats = accumulate(&mut buf, &[], &rgb(), ColorScale::Identity);
    assert_eq!(stats, AccumulateStats::default());
    assert!(buf.is_clear());
}

#[test]
fn first_writer_stores_color_and_coverage() {
    let mask = [200u8; 4];
    let mut buf = OverlayBuffer::<u8>::new(4, 4);
    let g = solid(2, 2, 1, 1, Rgba32::new(10, 20, 30, 0), &mask);
    let stats = accumulate(&mut buf, &[g], &rgb(), ColorScale::Identity);
    assert_eq!(stats.painted, 1);
    assert_eq!(stats.pixels, 4);
    assert_eq!(buf.pixel(1, 1), (200, [10, 20, 30]));
    assert_eq!(buf.pixel(2, 2), (200, [10, 20, 30]));
    assert_eq!(buf.pixel(0, 0), (0, [0, 0, 0]));
    assert_eq!(buf.pixel(3, 3), (0, [0, 0, 0]));
}

#[test]
fn glyph_alpha_scales_mask() {
    let mask = [255u8, 128];
    let mut buf = OverlayBuffer::<u8>::new(2, 1);
    // transparency 0x80 -> coverage 127
    let g = solid(2, 1, 0, 0, Rgba32::new(1, 2, 3, 0x80), &mask);
    accumulate(&mut buf, &[g], &rgb(), ColorScale::Identity);
    assert_eq!(buf.pixel(0, 0).0, 127);
    assert_eq!(buf.pixel(1, 0).0, 64);
}

#[test]
fn overlapping_half_layers_match_pinned_over_result() {
    let mask = [128u8];
    let red = solid(1, 1, 0, 0, Rgba32::new(255, 0, 0, 0), &mask);
    let green = solid(1, 1, 0, 0, Rgba32::new(0, 255, 0, 0), &mask);
    let mut buf = OverlayBuffer::<u8>::new(1, 1);
    accumulate(&mut buf, &[red, green], &rgb(), ColorScale::Identity);

    let combined = 128 * 255 + 128 * 127;
    assert_eq!(u32::from(buf.pixel(0, 0).0), div255(combined));
    assert_eq!(buf.pixel(0, 0), (192, [85, 170, 0]));
}

#[test]
fn opaque_glyph_on_top_replaces_color() {
    let half = [128u8];
    let full = [255u8];
    let mut buf = OverlayBuffer::<u8>::new(1, 1);
    let gs = [
        solid(1, 1, 0, 0, Rgba32::new(255, 0, 0, 0), &half),
        solid(1, 1, 0, 0, Rgba32::new(7, 8, 9, 0), &full),
    ];
    accumulate(&mut buf, &gs, &rgb(), ColorScale::Identity);
    assert_eq!(buf.pixel(0, 0), (255, [7, 8, 9]));
}

#[test]
fn batches_compose_like_one_sequence() {
    let masks: [Vec<u8>; 3] = [
        (0..16).map(|v| (v * 17) as u8).collect(),
        (0..16).map(|v| 255 - (v * 13) as u8).collect(),
        (0..16).map(|v| ((v * 97) % 256) as u8).collect(),
    ];
    let colors = [
        Rgba32::new(250, 10, 90, 0x10),
        Rgba32::new(3, 200, 40, 0x00),
        Rgba32::new(120, 120, 255, 0x60),
    ];
    let glyphs: Vec<GlyphBitmap<'_>> = masks
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (m, c))| solid(4, 4, i as i32 - 1, i as i32 / 2, c, m))
        .collect();

    let mut all = OverlayBuffer::<u8>::new(5, 5);
    accumulate(&mut all, &glyphs, &rgb(), ColorScale::Identity);

    let mut split = OverlayBuffer::<u8>::new(5, 5);
    accumulate(&mut split, &glyphs[..1], &rgb(), ColorScale::Identity);
    accumulate(&mut split, &glyphs[1..], &rgb(), ColorScale::Identity);

    assert_eq!(all, split);
}

#[test]
fn zero_coverage_glyph_is_a_no_op() {
    let base_mask = [90u8; 9];
    let zero_mask = [0u8; 9];
    let visible_mask = [255u8; 9];
    let mut buf = OverlayBuffer::<u8>::new(3, 3);
    accumulate(
        &mut buf,
        &[solid(3, 3, 0, 0, Rgba32::new(40, 50, 60, 0), &base_mask)],
        &rgb(),
        ColorScale::Identity,
    );
    let before = buf.clone();

    let blank = solid(3, 3, 0, 0, Rgba32::new(255, 255, 255, 0), &zero_mask);
    let invisible = solid(3, 3, 0, 0, Rgba32::new(255, 255, 255, 0xFF), &visible_mask);
    let stats = accumulate(&mut buf, &[blank, invisible], &rgb(), ColorScale::Identity);
    assert_eq!(stats.pixels, 0);
    assert_eq!(buf, before);
}

#[test]
fn malformed_and_offscreen_glyphs_are_skipped() {
    let short = [255u8; 3];
    let mask = [255u8; 4];
    let mut buf = OverlayBuffer::<u8>::new(4, 4);
    let glyphs = [
        solid(2, 2, 0, 0, Rgba32::new(1, 1, 1, 0), &short),
        solid(2, 2, 10, 10, Rgba32::new(1, 1, 1, 0), &mask),
        solid(0, 2, 0, 0, Rgba32::new(1, 1, 1, 0), &mask),
    ];
    let stats = accumulate(&mut buf, &glyphs, &rgb(), ColorScale::Identity);
    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.painted, 0);
    assert!(buf.is_clear());
}

#[test]
fn partially_visible_glyph_is_clipped() {
    let mask: Vec<u8> = (1..=9).map(|v| v * 20).collect();
    let mut buf = OverlayBuffer::<u8>::new(2, 2);
    let g = solid(3, 3, -1, -1, Rgba32::new(9, 9, 9, 0), &mask);
    accumulate(&mut buf, &[g], &rgb(), ColorScale::Identity);
    assert_eq!(buf.pixel(0, 0).0, 100);
    assert_eq!(buf.pixel(1, 0).0, 120);
    assert_eq!(buf.pixel(0, 1).0, 160);
    assert_eq!(buf.pixel(1, 1).0, 180);
}

#[test]
fn stride_padding_is_skipped() {
    let mask = [255u8, 255, 7, 7, 255, 255];
    let mut g = solid(2, 2, 0, 0, Rgba32::new(5, 5, 5, 0), &mask);
    g.stride = 4;
    let mut buf = OverlayBuffer::<u8>::new(2, 2);
    accumulate(&mut buf, &[g], &rgb(), ColorScale::Identity);
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(buf.pixel(x, y).0, 255);
    }
}

#[test]
fn wide_yuv_colors_are_shifted() {
    let m = rebuild_matrix(MatrixSpec::new(MatrixKind::Bt709, ColorRange::Limited));
    let mask = [255u8];
    let mut buf = OverlayBuffer::<u16>::new(1, 1);
    let g = solid(1, 1, 0, 0, Rgba32::new(255, 255, 255, 0), &mask);
    accumulate(&mut buf, &[g], &m, ColorScale::for_depth(10, false));
    assert_eq!(buf.pixel(0, 0), (255, [940, 512, 512]));
}

#[test]
fn wide_rgb_colors_are_stretched() {
    let mask = [255u8];
    let mut buf = OverlayBuffer::<u16>::new(1, 1);
    let g = solid(1, 1, 0, 0, Rgba32::new(255, 0, 128, 0), &mask);
    accumulate(&mut buf, &[g], &rgb(), ColorScale::for_depth(10, true));
    assert_eq!(buf.pixel(0, 0), (255, [1023, 0, 514]));
}

#[test]
fn wide_overlap_keeps_coverage_on_8bit_scale() {
    let mask = [128u8];
    let mut buf = OverlayBuffer::<u16>::new(1, 1);
    let gs = [
        solid(1, 1, 0, 0, Rgba32::new(255, 0, 0, 0), &mask),
        solid(1, 1, 0, 0, Rgba32::new(0, 255, 0, 0), &mask),
    ];
    accumulate(&mut buf, &gs, &rgb(), ColorScale::for_depth(16, true));
    let (a, [r, g, b]) = buf.pixel(0, 0);
    assert_eq!(a, 192);
    // (128*255*0 + 128*127*65535) / 48896 and the mirrored green term
    assert_eq!((r, g, b), (21788, 43747, 0));
}
