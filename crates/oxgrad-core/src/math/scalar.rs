//! Scalar helpers shared by the normalizer, the tile mapper and both backends

/// Tolerance for "nearly equal" stop comparisons (1/4096)
pub const SCALAR_NEARLY_ZERO: f32 = 1.0 / (1 << 12) as f32;

/// Clamp to [0, 1]. NaN passes through.
#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Pin `x` into `[lo, hi]`. NaN and inverted ranges resolve to `lo`.
#[inline]
pub fn pin(x: f32, lo: f32, hi: f32) -> f32 {
    let x = if x > hi { hi } else { x };
    if x >= lo { x } else { lo }
}

/// |a - b| <= [`SCALAR_NEARLY_ZERO`]
#[inline]
pub fn nearly_equal(a: f32, b: f32) -> bool {
    nearly_equal_within(a, b, SCALAR_NEARLY_ZERO)
}

#[inline]
pub fn nearly_equal_within(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() <= tolerance
}

/// `x - floor(x)`
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}
