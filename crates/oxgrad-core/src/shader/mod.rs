//! Shaders and their lowering onto the two execution backends
//!
//! Every shader can be evaluated two ways:
//! - [`Shader::append_stages`] appends stages to a [`RasterPipeline`](crate::pipeline::RasterPipeline)
//! - [`Shader::program`] records nodes in a program [`Builder`]
//!
//! The two must produce the same colors (within float tolerance) for every
//! input, so both are fed from the same table and the same tile fold.

mod gradient;
mod program;
mod stages;

pub use gradient::{points_to_unit, GradientShader};

use log::warn;

use crate::color::{xform_colors, Color4f, ColorSpace};
use crate::pipeline::{ShadeContext, Stage, StageRec};
use crate::program::{Builder, Color, Coord};
use crate::Result;

/// A solid color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorShader {
    color: Color4f,
    color_space: ColorSpace,
}

impl ColorShader {
    /// `color` is unpremultiplied and expressed in `color_space`
    pub fn new(color: Color4f, color_space: ColorSpace) -> Self {
        Self { color, color_space }
    }

    pub fn color(&self) -> Color4f {
        self.color
    }

    pub fn color_space(&self) -> &ColorSpace {
        &self.color_space
    }

    /// The color converted to the destination, premultiplied
    pub fn dst_color(&self, ctx: &ShadeContext) -> Result<Color4f> {
        let converted = xform_colors(&[self.color], &self.color_space, &ctx.dst_color_space, true)?;
        Ok(converted[0])
    }
}

/// Anything that can shade a draw
#[derive(Debug, Clone)]
pub enum Shader {
    Gradient(GradientShader),
    Color(ColorShader),
    /// Draws nothing (transparent)
    Empty,
}

impl Shader {
    /// Append stages producing premultiplied destination colors
    ///
    /// On failure nothing is appended and false is returned.
    pub fn append_stages(&self, rec: &mut StageRec<'_>) -> bool {
        match self {
            Shader::Gradient(g) => g.append_stages(rec),
            Shader::Color(c) => match c.dst_color(rec.ctx) {
                Ok(color) => {
                    rec.pipeline.append(Stage::UniformColor(color));
                    true
                }
                Err(e) => {
                    warn!("color stages not emitted: {e}");
                    false
                }
            },
            Shader::Empty => {
                rec.pipeline.append(Stage::UniformColor(Color4f::TRANSPARENT));
                true
            }
        }
    }

    /// Record program nodes producing premultiplied destination colors
    pub fn program(&self, p: &mut Builder, device: Coord, ctx: &ShadeContext) -> Option<Color> {
        match self {
            Shader::Gradient(g) => g.program(p, device, ctx),
            Shader::Color(c) => match c.dst_color(ctx) {
                Ok(color) => Some(p.uniform_color(color)),
                Err(e) => {
                    warn!("color program not emitted: {e}");
                    None
                }
            },
            Shader::Empty => {
                let zero = p.splat(0.0);
                Some(Color {
                    r: zero,
                    g: zero,
                    b: zero,
                    a: zero,
                })
            }
        }
    }

    pub fn is_opaque(&self) -> bool {
        match self {
            Shader::Gradient(g) => g.is_opaque(),
            Shader::Color(c) => c.color.is_opaque(),
            Shader::Empty => false,
        }
    }

    /// Single color standing in for the shader, e.g. for luminance masks
    ///
    /// For gradients this is the unweighted mean of the stop colors, in the
    /// gradient's source color space.
    pub fn as_luminance_color(&self) -> Option<Color4f> {
        match self {
            Shader::Gradient(g) => {
                let colors = g.spec().colors();
                if colors.is_empty() {
                    return None;
                }
                let mut sum = [0.0f32; 4];
                for c in colors {
                    for (acc, v) in sum.iter_mut().zip(c.to_array()) {
                        *acc += v;
                    }
                }
                let n = colors.len() as f32;
                Some(Color4f::from_array(sum.map(|v| v / n)))
            }
            Shader::Color(c) => Some(c.color),
            Shader::Empty => None,
        }
    }
}

impl From<GradientShader> for Shader {
    fn from(g: GradientShader) -> Self {
        Shader::Gradient(g)
    }
}

impl From<ColorShader> for Shader {
    fn from(c: ColorShader) -> Self {
        Shader::Color(c)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tiny_skia_path::Transform;

    use super::*;
    use crate::gradient::{make_gradient, Interpolation, TileMode};
    use crate::pipeline::RasterPipeline;

    fn both(shader: &Shader, ctx: &ShadeContext) -> (Color4f, Color4f) {
        let mut pipeline = RasterPipeline::new();
        assert!(shader.append_stages(&mut StageRec::new(&mut pipeline, ctx)));

        let mut p = Builder::new();
        let device = p.device_coord();
        let color = shader.program(&mut p, device, ctx).unwrap();
        let mut out = [Color4f::TRANSPARENT; 1];
        p.done(color).eval(&[3.0], &[4.0], &mut out);

        (pipeline.run_point(3.0, 4.0), out[0])
    }

    #[test]
    fn test_color_shader_premultiplies() {
        let shader = Shader::Color(ColorShader::new(
            Color4f::new(1.0, 0.5, 0.0, 0.5),
            ColorSpace::srgb(),
        ));
        let (stage, prog) = both(&shader, &ShadeContext::new());
        assert_eq!(stage, Color4f::new(0.5, 0.25, 0.0, 0.5));
        assert_eq!(prog, stage);
    }

    #[test]
    fn test_empty_is_transparent() {
        let (stage, prog) = both(&Shader::Empty, &ShadeContext::new());
        assert_eq!(stage, Color4f::TRANSPARENT);
        assert_eq!(prog, Color4f::TRANSPARENT);
        assert!(!Shader::Empty.is_opaque());
    }

    #[test]
    fn test_color_shader_converts_to_destination() {
        let shader = Shader::Color(ColorShader::new(Color4f::RED, ColorSpace::srgb()));
        let ctx = ShadeContext::new().with_dst_color_space(ColorSpace::display_p3());
        let (stage, prog) = both(&shader, &ctx);
        assert!(stage.r < 1.0 && stage.g > 0.0);
        assert_eq!(stage, prog);
    }

    #[test]
    fn test_luminance_color() {
        let spec = make_gradient(
            &[Color4f::RED, Color4f::RED, Color4f::BLUE],
            Some(&[0.0, 0.9, 1.0]),
            TileMode::Clamp,
            Interpolation::default(),
            None,
        )
        .unwrap();
        let gradient = Shader::Gradient(GradientShader::new(Arc::new(spec), Transform::identity()));
        // Stop positions do not weight the mean.
        let lum = gradient.as_luminance_color().unwrap();
        assert!(lum.approx_eq(&Color4f::new(2.0 / 3.0, 0.0, 1.0 / 3.0, 1.0), 1e-6));

        let solid = Shader::Color(ColorShader::new(Color4f::GREEN, ColorSpace::srgb()));
        assert_eq!(solid.as_luminance_color(), Some(Color4f::GREEN));
        assert_eq!(Shader::Empty.as_luminance_color(), None);
    }
}
