//! Gradient data model
//!
//! A [`GradientSpec`] is the normalized, immutable description of a gradient:
//! stop colors, optional stop positions, tile mode and interpolation flags.
//! It is built once by [`make_gradient`](super::make_gradient) and then
//! shared read-only (usually behind an `Arc`) by every draw that uses it.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::color::{Color4f, ColorSpace};
use crate::Error;

/// Policy for parameter values outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileMode {
    /// Extend the edge colors
    #[default]
    Clamp,
    /// Wrap around
    Repeat,
    /// Wrap around, reversing every other period
    Mirror,
    /// Transparent outside [0, 1]
    Decal,
}

impl TileMode {
    /// Number of tile modes
    pub const COUNT: u32 = 4;

    /// Stable numeric tag
    pub fn to_u32(self) -> u32 {
        match self {
            TileMode::Clamp => 0,
            TileMode::Repeat => 1,
            TileMode::Mirror => 2,
            TileMode::Decal => 3,
        }
    }
}

impl TryFrom<u32> for TileMode {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TileMode::Clamp),
            1 => Ok(TileMode::Repeat),
            2 => Ok(TileMode::Mirror),
            3 => Ok(TileMode::Decal),
            other => Err(Error::InvalidTileMode(other)),
        }
    }
}

/// How stop colors are interpolated
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Interpolation {
    /// Interpolate premultiplied colors
    pub in_premul: bool,
    /// Working space for interpolation; `None` interpolates in the
    /// destination space of each draw
    pub color_space: Option<ColorSpace>,
}

impl Interpolation {
    pub fn premul() -> Self {
        Self {
            in_premul: true,
            color_space: None,
        }
    }

    pub fn with_color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = Some(color_space);
        self
    }
}

static NEXT_SPEC_ID: AtomicU64 = AtomicU64::new(1);

/// Normalized gradient description
///
/// Invariants (established by the normalizer):
/// - at least two colors
/// - positions, when present, pair up with colors, start at exactly 0, end at
///   exactly 1 and never decrease
/// - absent positions mean the stops are evenly spaced
#[derive(Debug, Clone)]
pub struct GradientSpec {
    id: u64,
    colors: Vec<Color4f>,
    positions: Option<Vec<f32>>,
    tile_mode: TileMode,
    interpolation: Interpolation,
    color_space: ColorSpace,
    colors_are_opaque: bool,
}

impl GradientSpec {
    /// Wrap already-normalized stops
    pub(crate) fn from_normalized(
        colors: Vec<Color4f>,
        positions: Option<Vec<f32>>,
        tile_mode: TileMode,
        interpolation: Interpolation,
        color_space: ColorSpace,
    ) -> Self {
        debug_assert!(colors.len() >= 2);
        debug_assert!(positions.as_ref().is_none_or(|p| p.len() == colors.len()));

        let colors_are_opaque = colors.iter().all(Color4f::is_opaque);
        Self {
            id: NEXT_SPEC_ID.fetch_add(1, Ordering::Relaxed),
            colors,
            positions,
            tile_mode,
            interpolation,
            color_space,
            colors_are_opaque,
        }
    }

    /// Process-unique identity, used to key cached tables
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn colors(&self) -> &[Color4f] {
        &self.colors
    }

    pub fn positions(&self) -> Option<&[f32]> {
        self.positions.as_deref()
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Position of stop `i`, explicit or implied by even spacing
    pub fn position(&self, i: usize) -> f32 {
        match &self.positions {
            Some(p) => p[i],
            None => i as f32 / (self.colors.len() - 1) as f32,
        }
    }

    pub fn tile_mode(&self) -> TileMode {
        self.tile_mode
    }

    pub fn interpolation(&self) -> &Interpolation {
        &self.interpolation
    }

    pub fn interpolate_in_premul(&self) -> bool {
        self.interpolation.in_premul
    }

    /// Color space the stop colors are expressed in
    pub fn color_space(&self) -> &ColorSpace {
        &self.color_space
    }

    /// Every stop has alpha exactly 1
    pub fn colors_are_opaque(&self) -> bool {
        self.colors_are_opaque
    }

    /// Stops are evenly spaced (positions were absent or detected uniform)
    pub fn uniform_stops(&self) -> bool {
        self.positions.is_none()
    }

    /// Every pixel the gradient touches is opaque
    pub fn is_opaque(&self) -> bool {
        self.colors_are_opaque && self.tile_mode != TileMode::Decal
    }
}

/// Content equality; the identity is not compared
impl PartialEq for GradientSpec {
    fn eq(&self, other: &Self) -> bool {
        self.colors == other.colors
            && self.positions == other.positions
            && self.tile_mode == other.tile_mode
            && self.interpolation == other.interpolation
            && self.color_space == other.color_space
    }
}
