//! RGBA Color Primitives
//!
//! Gradient stops and per-pixel results are carried as [`Color4f`], four f32
//! channels in an unspecified RGB space. Whether a value is premultiplied is
//! tracked by the caller.

use std::ops::{Add, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// RGBA color in floating-point
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color4f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4f {
    /// Create a new RGBA color
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from an array
    #[inline]
    pub const fn from_array(arr: [f32; 4]) -> Self {
        Self {
            r: arr[0],
            g: arr[1],
            b: arr[2],
            a: arr[3],
        }
    }

    /// Convert to array
    #[inline]
    pub const fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from 8-bit values (0-255)
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        const ONE_OVER_255: f32 = 1.0 / 255.0;
        Self {
            r: r as f32 * ONE_OVER_255,
            g: g as f32 * ONE_OVER_255,
            b: b as f32 * ONE_OVER_255,
            a: a as f32 * ONE_OVER_255,
        }
    }

    /// Alpha is exactly 1
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.a == 1.0
    }

    /// Scale RGB by alpha
    #[inline]
    pub fn premul(&self) -> Self {
        Self {
            r: self.r * self.a,
            g: self.g * self.a,
            b: self.b * self.a,
            a: self.a,
        }
    }

    /// Divide RGB by alpha; fully transparent colors become transparent black
    #[inline]
    pub fn unpremul(&self) -> Self {
        let scale = if self.a == 0.0 { 0.0 } else { 1.0 / self.a };
        Self {
            r: self.r * scale,
            g: self.g * scale,
            b: self.b * scale,
            a: self.a,
        }
    }

    /// Scale all channels by a factor
    #[inline]
    pub fn scale(&self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a * factor,
        }
    }

    /// Check if approximately equal to another color
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.r - other.r).abs() <= epsilon
            && (self.g - other.g).abs() <= epsilon
            && (self.b - other.b).abs() <= epsilon
            && (self.a - other.a).abs() <= epsilon
    }

    /// Largest per-channel absolute difference
    pub fn max_diff(&self, other: &Self) -> f32 {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }

    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
}

impl From<[f32; 4]> for Color4f {
    fn from(arr: [f32; 4]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Color4f> for [f32; 4] {
    fn from(c: Color4f) -> Self {
        c.to_array()
    }
}

impl Add for Color4f {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl Sub for Color4f {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a - rhs.a)
    }
}

impl Mul<f32> for Color4f {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premul_unpremul() {
        let c = Color4f::new(0.8, 0.4, 0.2, 0.5);
        let pm = c.premul();
        assert_eq!(pm, Color4f::new(0.4, 0.2, 0.1, 0.5));
        assert!(pm.unpremul().approx_eq(&c, 1e-6));
    }

    #[test]
    fn test_unpremul_transparent() {
        let c = Color4f::new(0.3, 0.3, 0.3, 0.0);
        assert_eq!(c.unpremul(), Color4f::TRANSPARENT);
    }

    #[test]
    fn test_opaque() {
        assert!(Color4f::RED.is_opaque());
        assert!(!Color4f::new(1.0, 0.0, 0.0, 0.99).is_opaque());
    }

    #[test]
    fn test_arithmetic() {
        let a = Color4f::RED;
        let b = Color4f::BLUE;
        let mid = a + (b - a) * 0.5;
        assert!(mid.approx_eq(&Color4f::new(0.5, 0.0, 0.5, 1.0), 1e-6));
    }

    #[test]
    fn test_pod_view() {
        let colors = [Color4f::RED, Color4f::GREEN];
        let flat: &[f32] = bytemuck::cast_slice(&colors);
        assert_eq!(flat, &[1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_from_u8() {
        let c = Color4f::from_u8(255, 0, 51, 255);
        assert!(c.approx_eq(&Color4f::new(1.0, 0.0, 0.2, 1.0), 1e-6));
    }
}
