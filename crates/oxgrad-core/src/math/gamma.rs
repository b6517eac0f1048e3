//! Gamma and transfer function operations
//!
//! This module provides:
//! - sRGB gamma encode/decode
//! - BT.709 encode/decode
//! - General gamma power functions
//! - [`TransferFn`], the per-channel curve attached to a color space
//!
//! Curves are odd-extended: negative inputs map to `-f(-x)`, so out-of-gamut
//! colors produced by wide-gamut conversions survive a round trip.

/// sRGB gamma decode (encoded → linear)
///
/// Uses the IEC 61966-2-1 transfer function.
#[inline]
pub fn srgb_gamma_decode(encoded: f64) -> f64 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB gamma encode (linear → encoded)
///
/// Uses the IEC 61966-2-1 transfer function.
#[inline]
pub fn srgb_gamma_encode(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// BT.709 decode (encoded → linear)
#[inline]
pub fn rec709_decode(encoded: f64) -> f64 {
    if encoded < 0.081 {
        encoded / 4.5
    } else {
        ((encoded + 0.099) / 1.099).powf(1.0 / 0.45)
    }
}

/// BT.709 encode (linear → encoded)
#[inline]
pub fn rec709_encode(linear: f64) -> f64 {
    if linear < 0.018 {
        linear * 4.5
    } else {
        1.099 * linear.powf(0.45) - 0.099
    }
}

/// Simple gamma power function (decode)
///
/// y = x^gamma
#[inline]
pub fn gamma_decode(encoded: f64, gamma: f64) -> f64 {
    if encoded <= 0.0 {
        0.0
    } else {
        encoded.powf(gamma)
    }
}

/// Simple gamma power function (encode)
///
/// y = x^(1/gamma)
#[inline]
pub fn gamma_encode(linear: f64, gamma: f64) -> f64 {
    if linear <= 0.0 || gamma == 0.0 {
        linear.max(0.0)
    } else {
        linear.powf(1.0 / gamma)
    }
}

/// Transfer function of an RGB color space
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TransferFn {
    /// Identity (linear light)
    Linear,
    /// IEC 61966-2-1 sRGB curve (also Display P3)
    Srgb,
    /// Pure power curve
    Gamma(f32),
    /// BT.709 / BT.2020 camera curve
    Rec709,
}

impl TransferFn {
    /// Stable tag used by the flattened format
    pub fn tag(&self) -> u32 {
        match self {
            TransferFn::Linear => 0,
            TransferFn::Srgb => 1,
            TransferFn::Gamma(_) => 2,
            TransferFn::Rec709 => 3,
        }
    }

    /// Parameter stored next to the tag (gamma exponent, 0 otherwise)
    pub fn param(&self) -> f32 {
        match self {
            TransferFn::Gamma(g) => *g,
            _ => 0.0,
        }
    }

    /// Rebuild from a tag and parameter
    pub fn from_tag(tag: u32, param: f32) -> Option<Self> {
        match tag {
            0 => Some(TransferFn::Linear),
            1 => Some(TransferFn::Srgb),
            2 => Some(TransferFn::Gamma(param)),
            3 => Some(TransferFn::Rec709),
            _ => None,
        }
    }

    pub fn is_linear(&self) -> bool {
        match self {
            TransferFn::Linear => true,
            TransferFn::Gamma(g) => *g == 1.0,
            _ => false,
        }
    }

    /// Encoded → linear
    #[inline]
    pub fn decode(&self, x: f64) -> f64 {
        odd_extend(x, |v| match self {
            TransferFn::Linear => v,
            TransferFn::Srgb => srgb_gamma_decode(v),
            TransferFn::Gamma(g) => gamma_decode(v, *g as f64),
            TransferFn::Rec709 => rec709_decode(v),
        })
    }

    /// Linear → encoded
    #[inline]
    pub fn encode(&self, x: f64) -> f64 {
        odd_extend(x, |v| match self {
            TransferFn::Linear => v,
            TransferFn::Srgb => srgb_gamma_encode(v),
            TransferFn::Gamma(g) => gamma_encode(v, *g as f64),
            TransferFn::Rec709 => rec709_encode(v),
        })
    }

    /// Per-pixel variant shared by the stage pipeline and the program evaluator
    #[inline]
    pub fn apply_f32(&self, x: f32, inverse: bool) -> f32 {
        if inverse {
            self.encode(x as f64) as f32
        } else {
            self.decode(x as f64) as f32
        }
    }
}

#[inline]
fn odd_extend(x: f64, f: impl Fn(f64) -> f64) -> f64 {
    if x < 0.0 { -f(-x) } else { f(x) }
}
