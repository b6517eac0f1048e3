//! Replacement shaders for zero-extent gradient geometry
//!
//! When the geometry collapses (coincident endpoints, zero radius) the
//! gradient parameter is undefined. The gradient is then replaced by what it
//! would look like from infinitely far away.

use log::debug;

use crate::color::{Color4f, ColorSpace};
use crate::gradient::{GradientSpec, TileMode};
use crate::math::pin;
use crate::shader::{ColorShader, Shader};
use crate::{Error, Result};

/// Axis lengths at or below this are treated as collapsed
pub const DEGENERATE_THRESHOLD: f32 = 1.0 / (1 << 15) as f32;

/// Closed-form replacement for a gradient with degenerate geometry
///
/// - decal: nothing is drawn
/// - repeat / mirror: the average color over one period
/// - clamp: the last color, which covers everything past the collapsed edge
pub fn make_degenerate(
    colors: &[Color4f],
    positions: Option<&[f32]>,
    tile_mode: TileMode,
    color_space: Option<ColorSpace>,
) -> Result<Shader> {
    let Some(&last) = colors.last() else {
        return Err(Error::EmptyColors);
    };
    match positions {
        Some(p) if p.len() != colors.len() => {
            return Err(Error::PositionCount {
                expected: colors.len(),
                actual: p.len(),
            });
        }
        _ => {}
    }

    Ok(fallback(colors, positions, last, tile_mode, color_space.unwrap_or_default()))
}

/// [`make_degenerate`] for stops that were already validated
pub fn degenerate_shader(spec: &GradientSpec) -> Shader {
    match spec.colors().last() {
        Some(&last) => fallback(
            spec.colors(),
            spec.positions(),
            last,
            spec.tile_mode(),
            *spec.color_space(),
        ),
        None => Shader::Empty,
    }
}

fn fallback(
    colors: &[Color4f],
    positions: Option<&[f32]>,
    last: Color4f,
    tile_mode: TileMode,
    color_space: ColorSpace,
) -> Shader {
    let shader = match tile_mode {
        TileMode::Decal => Shader::Empty,
        TileMode::Repeat | TileMode::Mirror => {
            Shader::Color(ColorShader::new(average_gradient_color(colors, positions), color_space))
        }
        TileMode::Clamp => Shader::Color(ColorShader::new(last, color_space)),
    };
    debug!("degenerate {tile_mode:?} gradient replaced by {shader:?}");
    shader
}

/// Area-weighted average color over [0, 1]
///
/// Each segment contributes the trapezoid `(p1 - p0) * (c0 + c1) / 2`. Region
/// `[0, p_first]` is filled by the first color and `[p_last, 1]` by the last.
pub fn average_gradient_color(colors: &[Color4f], positions: Option<&[f32]>) -> Color4f {
    let n = colors.len();
    match n {
        0 => return Color4f::TRANSPARENT,
        1 => return colors[0],
        _ => {}
    }

    let pos = |i: usize| -> f32 {
        match positions {
            Some(p) => p[i],
            None => i as f32 / (n - 1) as f32,
        }
    };

    let mut blend = [0.0f32; 4];
    for i in 0..n - 1 {
        let p0 = pin(pos(i), 0.0, 1.0);
        let p1 = pin(pos(i + 1), p0, 1.0);
        let c0 = colors[i].to_array();
        let c1 = colors[i + 1].to_array();
        let w = 0.5 * (p1 - p0);
        for k in 0..4 {
            blend[k] += w * (c0[k] + c1[k]);
        }
    }

    if positions.is_some() {
        let p0 = pin(pos(0), 0.0, 1.0);
        if p0 > 0.0 {
            let c = colors[0].to_array();
            for k in 0..4 {
                blend[k] += p0 * c[k];
            }
        }
        let p_last = pin(pos(n - 1), 0.0, 1.0);
        if p_last < 1.0 {
            let c = colors[n - 1].to_array();
            for k in 0..4 {
                blend[k] += (1.0 - p_last) * c[k];
            }
        }
    }

    Color4f::from_array(blend)
}
