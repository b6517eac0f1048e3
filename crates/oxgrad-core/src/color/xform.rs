//! Color Space Conversion
//!
//! Source RGB → TRC decode → Matrix to XYZ → Matrix from XYZ → TRC encode → Dest RGB
//!
//! Two entry points share the same math:
//! - [`xform_colors`] converts a handful of gradient stops per draw in f64
//! - [`ColorXform::apply_rgb`] is the f32 per-pixel form used by the stage
//!   pipeline; the program emitter lowers the exact same operations

use crate::color::{Color4f, ColorSpace};
use crate::math::TransferFn;
use crate::{Error, Result};

/// A conversion between two RGB color spaces
#[derive(Debug, Clone, PartialEq)]
pub struct ColorXform {
    src_transfer: TransferFn,
    dst_transfer: TransferFn,
    /// Source linear RGB → destination linear RGB
    matrix: [[f32; 3]; 3],
    matrix_f64: [[f64; 3]; 3],
    same_primaries: bool,
    identity: bool,
}

impl ColorXform {
    /// Build a conversion from `src` to `dst`
    pub fn new(src: &ColorSpace, dst: &ColorSpace) -> Result<Self> {
        let same_primaries = src.primaries == dst.primaries;
        let m = if same_primaries {
            crate::math::Matrix3x3::identity()
        } else {
            let src_to_xyz = src.primaries.to_xyz()?;
            let dst_to_xyz = dst.primaries.to_xyz()?;
            let xyz_to_dst = dst_to_xyz.inverse().ok_or_else(|| {
                Error::ColorConversion("destination matrix is singular".to_string())
            })?;
            xyz_to_dst.multiply(&src_to_xyz)
        };

        Ok(Self {
            src_transfer: src.transfer,
            dst_transfer: dst.transfer,
            matrix: m.to_f32(),
            matrix_f64: m.m,
            same_primaries,
            identity: same_primaries && src.transfer == dst.transfer,
        })
    }

    /// Source and destination are the same space
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// The gamut matrix is skipped when the primaries agree
    pub fn has_matrix(&self) -> bool {
        !self.same_primaries
    }

    pub fn matrix(&self) -> &[[f32; 3]; 3] {
        &self.matrix
    }

    pub fn src_transfer(&self) -> TransferFn {
        self.src_transfer
    }

    pub fn dst_transfer(&self) -> TransferFn {
        self.dst_transfer
    }

    /// Convert unpremultiplied RGB, f32 per-pixel path
    #[inline]
    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        if self.identity {
            return rgb;
        }
        let lin = rgb.map(|v| self.src_transfer.apply_f32(v, false));
        let lin = if self.same_primaries {
            lin
        } else {
            let m = &self.matrix;
            [
                m[0][0] * lin[0] + m[0][1] * lin[1] + m[0][2] * lin[2],
                m[1][0] * lin[0] + m[1][1] * lin[1] + m[1][2] * lin[2],
                m[2][0] * lin[0] + m[2][1] * lin[1] + m[2][2] * lin[2],
            ]
        };
        lin.map(|v| self.dst_transfer.apply_f32(v, true))
    }

    /// Convert an unpremultiplied color in f64
    pub fn apply(&self, color: Color4f) -> Color4f {
        if self.identity {
            return color;
        }
        let rgb = [color.r, color.g, color.b].map(|v| self.src_transfer.decode(v as f64));
        let rgb = if self.same_primaries {
            rgb
        } else {
            let m = &self.matrix_f64;
            [
                m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
                m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
                m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
            ]
        };
        let out = rgb.map(|v| self.dst_transfer.encode(v) as f32);
        Color4f::new(out[0], out[1], out[2], color.a)
    }
}

/// Convert unpremultiplied stop colors into `dst`, premultiplying if asked
///
/// The input is never modified; a fresh buffer scoped to the caller's draw is
/// returned.
pub fn xform_colors(
    colors: &[Color4f],
    src: &ColorSpace,
    dst: &ColorSpace,
    premul: bool,
) -> Result<Vec<Color4f>> {
    let xform = ColorXform::new(src, dst)?;
    Ok(colors
        .iter()
        .map(|c| {
            let c = xform.apply(*c);
            if premul { c.premul() } else { c }
        })
        .collect())
}
