//! Mathematical operations
//!
//! This module provides foundational math used throughout oxgrad:
//! - 3x3 matrix operations for RGB↔XYZ transforms
//! - 2D affine transforms for device → gradient space mapping
//! - Transfer function evaluation
//! - Scalar clamp/pin/nearly-equal helpers

pub mod gamma;
pub mod matrix;
pub mod scalar;

pub use gamma::{srgb_gamma_decode, srgb_gamma_encode, TransferFn};
pub use matrix::{invert_finite, map_point, Matrix3x3};
pub use scalar::{clamp01, fract, nearly_equal, pin, SCALAR_NEARLY_ZERO};
