//! Stop normalization
//!
//! Turns user-supplied stops into the canonical form every consumer relies on:
//! positions that start at 0, end at 1 and never decrease, or no positions at
//! all when the stops turn out to be evenly spaced.

use log::{debug, trace};

use crate::color::{Color4f, ColorSpace};
use crate::gradient::{GradientSpec, Interpolation, TileMode};
use crate::math::{nearly_equal, pin};
use crate::{Error, Result};

/// Stops after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStops {
    pub colors: Vec<Color4f>,
    /// `None` when the stops are evenly spaced
    pub positions: Option<Vec<f32>>,
}

/// Normalize raw stops
///
/// Out-of-range and decreasing positions are repaired, boundary stops are
/// inserted, redundant three-stop hard edges are collapsed and nearly uniform
/// positions are dropped. Only an empty color list or a position list of the
/// wrong length is rejected.
pub fn normalize_stops(
    colors: &[Color4f],
    positions: Option<&[f32]>,
    tile_mode: TileMode,
) -> Result<NormalizedStops> {
    if colors.is_empty() {
        return Err(Error::EmptyColors);
    }
    let n = colors.len();

    let Some(raw) = positions else {
        let mut colors = colors.to_vec();
        if n == 1 {
            colors.push(colors[0]);
        }
        return Ok(NormalizedStops {
            colors,
            positions: None,
        });
    };

    if raw.len() != n {
        return Err(Error::PositionCount {
            expected: n,
            actual: raw.len(),
        });
    }

    let needs_first = raw[0] != 0.0;
    let needs_last = raw[n - 1] != 1.0;

    let mut out_colors = Vec::with_capacity(n + 2);
    if needs_first {
        out_colors.push(colors[0]);
    }
    out_colors.extend_from_slice(colors);
    if needs_last {
        out_colors.push(colors[n - 1]);
    }

    let mut out_positions = Vec::with_capacity(out_colors.len());
    out_positions.push(0.0);
    let mut prev = 0.0;
    let start = if needs_first { 0 } else { 1 };
    let end = if needs_last { n + 1 } else { n };
    for i in start..end {
        // The appended trailing stop sits exactly at 1.
        let curr = if i == n { 1.0 } else { pin(raw[i], prev, 1.0) };
        if i < n && curr != raw[i] {
            trace!("stop {i}: position {} pinned to {curr}", raw[i]);
        }
        out_positions.push(curr);
        prev = curr;
    }
    debug_assert_eq!(out_positions.len(), out_colors.len());

    let (out_colors, out_positions) = collapse_three_stops(out_colors, out_positions, tile_mode);

    if is_uniform(&out_positions) {
        debug!(
            "{} stops detected evenly spaced, dropping positions",
            out_colors.len()
        );
        return Ok(NormalizedStops {
            colors: out_colors,
            positions: None,
        });
    }

    Ok(NormalizedStops {
        colors: out_colors,
        positions: Some(out_positions),
    })
}

/// Drop the redundant stop of a `{0, 0, 1}` or `{0, 1, 1}` hard edge
///
/// The leading stop of `{0, 0, 1}` only shows for `t < 0`, which repeat and
/// mirror never produce. The trailing stop of `{0, 1, 1}` shows for every
/// `t >= 1`, and both wrapping modes can land exactly on 1, so it is only
/// dropped when it repeats its neighbour's color.
pub fn collapse_three_stops(
    mut colors: Vec<Color4f>,
    mut positions: Vec<f32>,
    tile_mode: TileMode,
) -> (Vec<Color4f>, Vec<f32>) {
    if colors.len() != 3 || positions.len() != 3 {
        return (colors, positions);
    }
    let wraps = matches!(tile_mode, TileMode::Repeat | TileMode::Mirror);

    if positions == [0.0, 0.0, 1.0] && (wraps || colors[0] == colors[1]) {
        debug!("collapsing leading hard stop");
        colors.remove(0);
        positions.remove(0);
    } else if positions == [0.0, 1.0, 1.0] && colors[1] == colors[2] {
        // t == 1 is still sampled exactly, so a differing last color must stay
        debug!("collapsing trailing hard stop");
        colors.pop();
        positions.pop();
    }
    (colors, positions)
}

/// Every gap nearly equals the first one
fn is_uniform(positions: &[f32]) -> bool {
    let step = positions[1] - positions[0];
    positions
        .windows(2)
        .all(|w| nearly_equal(w[1] - w[0], step))
}

/// Build a normalized gradient description
///
/// `color_space` is the space the colors are expressed in (sRGB when `None`).
pub fn make_gradient(
    colors: &[Color4f],
    positions: Option<&[f32]>,
    tile_mode: TileMode,
    interpolation: Interpolation,
    color_space: Option<ColorSpace>,
) -> Result<GradientSpec> {
    let stops = normalize_stops(colors, positions, tile_mode)?;
    Ok(GradientSpec::from_normalized(
        stops.colors,
        stops.positions,
        tile_mode,
        interpolation,
        color_space.unwrap_or_default(),
    ))
}
