//! Matrix operations
//!
//! - [`Matrix3x3`]: f64 3x3 matrices for RGB↔XYZ color transforms
//! - helpers around [`Transform`], the 2D affine transform mapping device
//!   space to gradient space

use tiny_skia_path::{Point, Transform};

/// Row-major f64 3x3 matrix, used for primaries → XYZ conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3x3 {
    pub m: [[f64; 3]; 3],
}

impl Matrix3x3 {
    #[inline]
    pub const fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::diagonal(1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn diagonal(d0: f64, d1: f64, d2: f64) -> Self {
        Self::new([[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]])
    }

    /// `self × v`
    #[inline]
    pub fn multiply_vec(&self, v: [f64; 3]) -> [f64; 3] {
        self.m.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
    }

    /// `self × other`
    pub fn multiply(&self, other: &Self) -> Self {
        let o = &other.m;
        Self::new(self.m.map(|row| {
            [0, 1, 2].map(|j| row[0] * o[0][j] + row[1] * o[1][j] + row[2] * o[2][j])
        }))
    }

    /// Inverse via the adjugate; None for singular or non-finite input
    pub fn inverse(&self) -> Option<Self> {
        let m = &self.m;
        // Cofactors of the first row double as the determinant terms.
        let c00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let c01 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let c02 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02;
        if !det.is_finite() || det.abs() < 1e-14 {
            return None;
        }
        let k = 1.0 / det;
        Some(Self::new([
            [
                c00 * k,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * k,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * k,
            ],
            [
                c01 * k,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * k,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * k,
            ],
            [
                c02 * k,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * k,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * k,
            ],
        ]))
    }

    /// Narrow to f32 for per-pixel evaluation
    pub fn to_f32(&self) -> [[f32; 3]; 3] {
        self.m.map(|row| row.map(|v| v as f32))
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

/// Map one point through `ts`
#[inline]
pub fn map_point(ts: &Transform, x: f32, y: f32) -> (f32, f32) {
    let mut pt = [Point::from_xy(x, y)];
    ts.map_points(&mut pt);
    (pt[0].x, pt[0].y)
}

/// Inverse of `ts`, rejecting results that are not finite
///
/// Scale-only transforms invert by reciprocal, so a zero scale comes back as
/// an infinite matrix rather than `None`.
pub fn invert_finite(ts: &Transform) -> Option<Transform> {
    ts.invert().filter(Transform::is_finite)
}
