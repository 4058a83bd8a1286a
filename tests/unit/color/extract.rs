use super::*;
use crate::color::matrix::{ColorRange, MatrixKind, MatrixSpec, rebuild_matrix};

#[test]
fn packed_components_decode() {
    let c = Rgba32(0x1122_3344);
    assert_eq!((c.r(), c.g(), c.b()), (0x11, 0x22, 0x33));
    assert_eq!(c.transparency(), 0x44);
    assert_eq!(c.coverage(), 255 - 0x44);
    assert_eq!(Rgba32::new(0x11, 0x22, 0x33, 0x44), c);
}

#[test]
fn alpha_is_transparency_complement() {
    assert_eq!(Rgba32::new(0, 0, 0, 0).coverage(), 255);
    assert_eq!(Rgba32::new(0, 0, 0, 255).coverage(), 0);
    let ch = extract_channels(Rgba32::new(9, 9, 9, 55), &rebuild_matrix(MatrixSpec::NONE));
    assert_eq!(ch.alpha, 200);
}

#[test]
fn rgb_passes_through_without_matrix() {
    let ch = extract_channels(
        Rgba32::new(10, 20, 30, 0),
        &rebuild_matrix(MatrixSpec::NONE),
    );
    assert_eq!(ch.c, [10, 20, 30]);
}

#[test]
fn yuv_conversion_uses_offsets() {
    let m = rebuild_matrix(MatrixSpec::new(MatrixKind::Bt709, ColorRange::Limited));
    let white = extract_channels(Rgba32::new(255, 255, 255, 0), &m);
    assert_eq!(white.c, [235, 128, 128]);
    let black = extract_channels(Rgba32::new(0, 0, 0, 0), &m);
    assert_eq!(black.c, [16, 128, 128]);

    let m = rebuild_matrix(MatrixSpec::new(MatrixKind::Bt709, ColorRange::Full));
    let red = extract_channels(Rgba32::new(255, 0, 0, 0), &m);
    assert_eq!(red.c, [54, 99, 255]);
}

#[test]
fn scale_selection_by_depth_and_family() {
    assert_eq!(ColorScale::for_depth(8, true), ColorScale::Identity);
    assert_eq!(ColorScale::for_depth(8, false), ColorScale::Identity);
    assert_eq!(
        ColorScale::for_depth(10, true),
        ColorScale::Stretch { max: 1023 }
    );
    assert_eq!(ColorScale::for_depth(16, false), ColorScale::Shift(8));
}

#[test]
fn rgb_stretch_reaches_full_scale() {
    let s = ColorScale::for_depth(10, true);
    assert_eq!(s.apply(0), 0);
    assert_eq!(s.apply(255), 1023);
    assert_eq!(s.apply(128), 514);

    let s = ColorScale::for_depth(16, true);
    assert_eq!(s.apply(255), 65535);
    assert_eq!(s.apply(1), 257);
}

#[test]
fn yuv_shift_keeps_code_proportions() {
    let s = ColorScale::for_depth(10, false);
    assert_eq!(s.apply(16), 64);
    assert_eq!(s.apply(235), 940);
    assert_eq!(s.apply(128), 512);
}
