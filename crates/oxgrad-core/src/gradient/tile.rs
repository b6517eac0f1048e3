//! Tile modes
//!
//! The tile fold is written once, in [`lower_tile`]. Each consumer supplies a
//! [`TileLowering`] that knows how to express repeat, mirror and the decal
//! mask in its own representation: plain floats for [`TileMapper`], pipeline
//! stages for the stage emitter, expression nodes for the program emitter.

use crate::gradient::TileMode;
use crate::math::{clamp01, fract};

/// Representation-specific building blocks of the tile fold
pub trait TileLowering {
    /// Gradient parameter
    type T: Copy;
    /// Decal validity mask
    type Mask;

    /// `t - floor(t)`
    fn repeat(&mut self, t: Self::T) -> Self::T;

    /// `|((t - 1) - 2*floor((t - 1) * 0.5)) - 1|`
    fn mirror(&mut self, t: Self::T) -> Self::T;

    /// `t == clamp01(t)`
    fn decal_mask(&mut self, t: Self::T) -> Self::Mask;
}

/// Fold `t` according to `mode`
///
/// Clamp leaves `t` alone; the table lookup clamps where it needs to.
pub fn lower_tile<L: TileLowering>(mode: TileMode, lowering: &mut L, t: L::T) -> (L::T, Option<L::Mask>) {
    match mode {
        TileMode::Clamp => (t, None),
        TileMode::Repeat => (lowering.repeat(t), None),
        TileMode::Mirror => (lowering.mirror(t), None),
        TileMode::Decal => {
            let mask = lowering.decal_mask(t);
            (t, Some(mask))
        }
    }
}

/// Mirror fold on a scalar
#[inline]
pub fn mirror(t: f32) -> f32 {
    let a = t - 1.0;
    let b = (a * 0.5).floor();
    (a - (b + b) - 1.0).abs()
}

/// Decal mask on a scalar
#[inline]
pub fn decal_mask(t: f32) -> bool {
    t == clamp01(t)
}

/// Tiled parameter together with its decal validity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tiled {
    pub t: f32,
    /// False only for decal samples outside [0, 1]
    pub valid: bool,
}

/// Scalar tile mapper
#[derive(Debug, Clone, Copy, Default)]
pub struct TileMapper;

impl TileMapper {
    pub fn map(mode: TileMode, t: f32) -> Tiled {
        let (t, mask) = lower_tile(mode, &mut TileMapper, t);
        Tiled {
            t,
            valid: mask.unwrap_or(true),
        }
    }
}

impl TileLowering for TileMapper {
    type T = f32;
    type Mask = bool;

    fn repeat(&mut self, t: f32) -> f32 {
        fract(t)
    }

    fn mirror(&mut self, t: f32) -> f32 {
        mirror(t)
    }

    fn decal_mask(&mut self, t: f32) -> bool {
        decal_mask(t)
    }
}
