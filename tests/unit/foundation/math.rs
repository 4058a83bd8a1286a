use super::*;

fn shift_trick(x: u32) -> u32 {
    let div256 = |v: u32| (v + 128) >> 8;
    div256(x + div256(x))
}

#[test]
fn div255_matches_shift_trick_on_8bit_products() {
    for x in 0..=255u32 * 255 {
        assert_eq!(div255(x), shift_trick(x), "x = {x}");
    }
}

#[test]
fn div255_rounds_to_nearest_on_16bit_products() {
    for x in [65_663u32, 1_000_000, 255 * 65_535, 12_345_678] {
        let exact = f64::from(x) / 255.0;
        assert_eq!(div255(x), exact.round() as u32, "x = {x}");
    }
}

#[test]
fn mul_div255_edges() {
    assert_eq!(mul_div255(255, 255), 255);
    assert_eq!(mul_div255(0, 255), 0);
    assert_eq!(mul_div255(128, 255), 128);
    assert_eq!(mul_div255(1, 127), 0);
    assert_eq!(mul_div255(1, 128), 1);
}

#[test]
fn div_round_is_half_up() {
    assert_eq!(div_round(5, 2), 3);
    assert_eq!(div_round(4, 2), 2);
    assert_eq!(div_round(7, 3), 2);
    assert_eq!(div_round(0, 9), 0);
}

#[test]
fn descale_handles_negative_sums() {
    assert_eq!(descale(1 << 16, 16), 1);
    assert_eq!(descale((1 << 15) - 1, 16), 0);
    assert_eq!(descale(1 << 15, 16), 1);
    assert_eq!(descale(-(1 << 15), 16), 0);
    assert_eq!(descale(-(1 << 15) - 1, 16), -1);
    assert_eq!(descale(42, 0), 42);
}
