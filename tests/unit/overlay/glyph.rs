use super::*;

const WHITE: Rgba32 = Rgba32::new(255, 255, 255, 0);

#[test]
fn inside_glyph_is_not_clipped() {
    let mask = [255u8; 6];
    let g = GlyphBitmap::new(3, 2, 4, 5, WHITE, &mask);
    assert_eq!(
        g.clip(16, 16),
        Some(Footprint {
            src_x: 0,
            src_y: 0,
            dst_x: 4,
            dst_y: 5,
            width: 3,
            height: 2,
        })
    );
}

#[test]
fn negative_origin_clips_leading_edge() {
    let mask = [255u8; 16];
    let g = GlyphBitmap::new(4, 4, -1, -2, WHITE, &mask);
    let fp = g.clip(8, 8).unwrap();
    assert_eq!((fp.src_x, fp.src_y), (1, 2));
    assert_eq!((fp.dst_x, fp.dst_y), (0, 0));
    assert_eq!((fp.width, fp.height), (3, 2));
}

#[test]
fn overhang_clips_trailing_edge() {
    let mask = [255u8; 16];
    let g = GlyphBitmap::new(4, 4, 6, 7, WHITE, &mask);
    let fp = g.clip(8, 8).unwrap();
    assert_eq!((fp.width, fp.height), (2, 1));
}

#[test]
fn outside_glyph_is_invisible() {
    let mask = [255u8; 4];
    assert!(GlyphBitmap::new(2, 2, 8, 0, WHITE, &mask).clip(8, 8).is_none());
    assert!(GlyphBitmap::new(2, 2, -2, 0, WHITE, &mask).clip(8, 8).is_none());
    assert!(GlyphBitmap::new(0, 2, 0, 0, WHITE, &mask).clip(8, 8).is_none());
}

#[test]
fn well_formedness_checks_stride_and_length() {
    let mask = [0u8; 10];
    let mut g = GlyphBitmap::new(3, 3, 0, 0, WHITE, &mask);
    assert!(g.is_well_formed());
    g.stride = 4;
    assert!(!g.is_well_formed());
    g.stride = 2;
    assert!(!g.is_well_formed());
    let empty = GlyphBitmap::new(0, 0, 0, 0, WHITE, &[]);
    assert!(empty.is_empty());
    assert!(empty.is_well_formed());
}
