//! RGB Color Spaces
//!
//! A color space is described the way a matrix-shaper profile is: three
//! colorant chromaticities, a white point, and a transfer function. The
//! RGB → XYZ matrix is derived on demand, so a space with degenerate
//! primaries can be constructed and only fails once a conversion needs it.

use serde::{Deserialize, Serialize};

use crate::math::{Matrix3x3, TransferFn};
use crate::{Error, Result};

/// CIE xy chromaticities of the three colorants and the white point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Primaries {
    pub rx: f32,
    pub ry: f32,
    pub gx: f32,
    pub gy: f32,
    pub bx: f32,
    pub by: f32,
    pub wx: f32,
    pub wy: f32,
}

/// D65 white point chromaticity
const D65_XY: (f32, f32) = (0.3127, 0.3290);

impl Primaries {
    /// ITU-R BT.709 / sRGB
    pub const SRGB: Self = Self::d65(0.640, 0.330, 0.300, 0.600, 0.150, 0.060);
    /// Display P3 (DCI-P3 primaries, D65 white)
    pub const DISPLAY_P3: Self = Self::d65(0.680, 0.320, 0.265, 0.690, 0.150, 0.060);
    /// ITU-R BT.2020
    pub const REC2020: Self = Self::d65(0.708, 0.292, 0.170, 0.797, 0.131, 0.046);
    /// Adobe RGB (1998)
    pub const ADOBE_RGB: Self = Self::d65(0.640, 0.330, 0.210, 0.710, 0.150, 0.060);

    const fn d65(rx: f32, ry: f32, gx: f32, gy: f32, bx: f32, by: f32) -> Self {
        Self {
            rx,
            ry,
            gx,
            gy,
            bx,
            by,
            wx: D65_XY.0,
            wy: D65_XY.1,
        }
    }

    pub fn to_array(&self) -> [f32; 8] {
        [
            self.rx, self.ry, self.gx, self.gy, self.bx, self.by, self.wx, self.wy,
        ]
    }

    pub fn from_array(v: [f32; 8]) -> Self {
        Self {
            rx: v[0],
            ry: v[1],
            gx: v[2],
            gy: v[3],
            bx: v[4],
            by: v[5],
            wx: v[6],
            wy: v[7],
        }
    }

    /// Derive the RGB → XYZ matrix
    ///
    /// Colorant columns are scaled so that RGB (1,1,1) maps to the white point.
    pub fn to_xyz(&self) -> Result<Matrix3x3> {
        let xyz = |x: f32, y: f32| -> Result<[f64; 3]> {
            if y == 0.0 || !x.is_finite() || !y.is_finite() {
                return Err(Error::ColorConversion(format!(
                    "invalid chromaticity ({x}, {y})"
                )));
            }
            let (x, y) = (x as f64, y as f64);
            Ok([x / y, 1.0, (1.0 - x - y) / y])
        };

        let r = xyz(self.rx, self.ry)?;
        let g = xyz(self.gx, self.gy)?;
        let b = xyz(self.bx, self.by)?;
        let w = xyz(self.wx, self.wy)?;

        // Colorants as columns
        let colorants = Matrix3x3::new([
            [r[0], g[0], b[0]],
            [r[1], g[1], b[1]],
            [r[2], g[2], b[2]],
        ]);
        let inv = colorants.inverse().ok_or_else(|| {
            Error::ColorConversion("colorant matrix is singular".to_string())
        })?;
        let s = inv.multiply_vec(w);

        Ok(colorants.multiply(&Matrix3x3::diagonal(s[0], s[1], s[2])))
    }
}

/// An RGB color space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSpace {
    pub primaries: Primaries,
    pub transfer: TransferFn,
}

impl Default for ColorSpace {
    fn default() -> Self {
        Self::srgb()
    }
}

impl ColorSpace {
    pub const fn new(primaries: Primaries, transfer: TransferFn) -> Self {
        Self {
            primaries,
            transfer,
        }
    }

    pub const fn srgb() -> Self {
        Self::new(Primaries::SRGB, TransferFn::Srgb)
    }

    pub const fn srgb_linear() -> Self {
        Self::new(Primaries::SRGB, TransferFn::Linear)
    }

    pub const fn display_p3() -> Self {
        Self::new(Primaries::DISPLAY_P3, TransferFn::Srgb)
    }

    pub const fn rec2020() -> Self {
        Self::new(Primaries::REC2020, TransferFn::Rec709)
    }

    pub const fn adobe_rgb() -> Self {
        Self::new(Primaries::ADOBE_RGB, TransferFn::Gamma(563.0 / 256.0))
    }

    /// Same primaries, different curve
    pub const fn with_transfer(self, transfer: TransferFn) -> Self {
        Self::new(self.primaries, transfer)
    }

    /// Bit pattern identifying this space; used in cache keys
    pub fn key(&self) -> [u32; 10] {
        let p = self.primaries.to_array();
        let mut key = [0u32; 10];
        for (k, v) in key.iter_mut().zip(p.iter()) {
            *k = v.to_bits();
        }
        key[8] = self.transfer.tag();
        key[9] = self.transfer.param().to_bits();
        key
    }
}
