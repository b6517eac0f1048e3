//! Color types and conversions
//!
//! This module provides:
//! - RGBA float colors
//! - RGB color spaces (primaries + transfer function)
//! - The color space conversion primitive used by gradients

pub mod rgba;
pub mod space;
pub mod xform;

pub use rgba::Color4f;
pub use space::{ColorSpace, Primaries};
pub use xform::{xform_colors, ColorXform};
