/// Round-to-nearest `x / 255`.
///
/// Equal to the `div256(x + div256(x))` shift trick for every `x <= 255 * 255`, and stays exact
/// for the 16-bit products where the trick drifts.
#[inline]
pub(crate) fn div255(x: u32) -> u32 {
    (x + 127) / 255
}

#[inline]
pub(crate) fn mul_div255(x: u32, y: u32) -> u32 {
    div255(x * y)
}

/// Round-half-up `num / den`; `den` must be non-zero.
#[inline]
pub(crate) fn div_round(num: u64, den: u64) -> u64 {
    (num + den / 2) / den
}

/// Fixed-point descale: `(x + 2^(shift-1)) >> shift` with arithmetic shift for negative sums.
#[inline]
pub(crate) fn descale(x: i64, shift: u32) -> i64 {
    if shift == 0 {
        return x;
    }
    (x + (1i64 << (shift - 1))) >> shift
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
