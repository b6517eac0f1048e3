//! Pipeline Stages
//!
//! Individual steps of the streaming shading pipeline. Each stage reads and
//! writes the per-pixel registers of a [`Pixel`].

use std::sync::Arc;

use tiny_skia_path::Transform;

use crate::color::{Color4f, ColorXform};
use crate::gradient::tile::{decal_mask, mirror};
use crate::gradient::{GradientTable, SearchStrategy};
use crate::math::{clamp01, fract, map_point};

/// Per-pixel registers
///
/// `r` and `g` hold coordinates until a color is produced; the gradient
/// parameter lives in `r`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    /// Device coordinate
    pub dx: f32,
    pub dy: f32,
    /// Decal validity
    pub mask: bool,
}

impl Pixel {
    pub fn at(dx: f32, dy: f32) -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 0.0,
            dx,
            dy,
            mask: true,
        }
    }

    pub fn color(&self) -> Color4f {
        Color4f::new(self.r, self.g, self.b, self.a)
    }

    fn set_color(&mut self, c: Color4f) {
        self.r = c.r;
        self.g = c.g;
        self.b = c.b;
        self.a = c.a;
    }
}

/// A pipeline stage
#[derive(Debug, Clone)]
pub enum Stage {
    /// Load the device coordinate into `(r, g)`
    SeedShader,
    /// Map `(r, g)` through an affine transform
    Matrix(Transform),
    /// `r = clamp01(r)`
    ClampX1,
    /// `r = fract(r)`
    RepeatX1,
    /// Mirror fold of `r`
    MirrorX1,
    /// Record whether `r` lies in [0, 1]
    DecalX,
    /// Single-interval lookup
    EvenlySpaced2StopGradient(Arc<GradientTable>),
    /// Evenly spaced lookup
    EvenlySpacedGradient(Arc<GradientTable>),
    /// Lookup by breakpoint search
    Gradient {
        table: Arc<GradientTable>,
        search: SearchStrategy,
    },
    /// Zero the color where the decal mask is off
    CheckDecalMask,
    /// Divide RGB by alpha
    Unpremul,
    /// Multiply RGB by alpha
    Premul,
    /// Convert unpremultiplied RGB between color spaces
    ColorXform(Arc<ColorXform>),
    /// Constant color
    UniformColor(Color4f),
}

impl Stage {
    /// Short name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Stage::SeedShader => "seed_shader",
            Stage::Matrix(_) => "matrix",
            Stage::ClampX1 => "clamp_x_1",
            Stage::RepeatX1 => "repeat_x_1",
            Stage::MirrorX1 => "mirror_x_1",
            Stage::DecalX => "decal_x",
            Stage::EvenlySpaced2StopGradient(_) => "evenly_spaced_2_stop_gradient",
            Stage::EvenlySpacedGradient(_) => "evenly_spaced_gradient",
            Stage::Gradient { .. } => "gradient",
            Stage::CheckDecalMask => "check_decal_mask",
            Stage::Unpremul => "unpremul",
            Stage::Premul => "premul",
            Stage::ColorXform(_) => "color_xform",
            Stage::UniformColor(_) => "uniform_color",
        }
    }

    /// Apply the stage to one pixel
    #[inline]
    pub fn apply(&self, px: &mut Pixel) {
        match self {
            Stage::SeedShader => {
                px.r = px.dx;
                px.g = px.dy;
                px.b = 1.0;
                px.a = 0.0;
            }
            Stage::Matrix(m) => {
                let (x, y) = map_point(m, px.r, px.g);
                px.r = x;
                px.g = y;
            }
            Stage::ClampX1 => px.r = clamp01(px.r),
            Stage::RepeatX1 => px.r = fract(px.r),
            Stage::MirrorX1 => px.r = mirror(px.r),
            Stage::DecalX => px.mask = decal_mask(px.r),
            Stage::EvenlySpaced2StopGradient(table) | Stage::EvenlySpacedGradient(table) => {
                px.set_color(table.eval(px.r));
            }
            Stage::Gradient { table, search } => {
                px.set_color(table.eval_with(px.r, *search));
            }
            Stage::CheckDecalMask => {
                if !px.mask {
                    px.set_color(Color4f::TRANSPARENT);
                }
            }
            Stage::Unpremul => px.set_color(px.color().unpremul()),
            Stage::Premul => px.set_color(px.color().premul()),
            Stage::ColorXform(xform) => {
                let [r, g, b] = xform.apply_rgb([px.r, px.g, px.b]);
                px.r = r;
                px.g = g;
                px.b = b;
            }
            Stage::UniformColor(c) => px.set_color(*c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::TableBuilder;

    #[test]
    fn test_seed_and_matrix() {
        let mut px = Pixel::at(3.0, 4.0);
        Stage::SeedShader.apply(&mut px);
        Stage::Matrix(Transform::from_scale(0.5, 2.0)).apply(&mut px);
        assert_eq!((px.r, px.g), (1.5, 8.0));
    }

    #[test]
    fn test_tile_stages() {
        let mut px = Pixel::at(0.0, 0.0);
        px.r = 1.25;
        Stage::RepeatX1.apply(&mut px);
        assert_eq!(px.r, 0.25);

        px.r = 1.25;
        Stage::MirrorX1.apply(&mut px);
        assert_eq!(px.r, 0.75);

        px.r = 1.25;
        Stage::DecalX.apply(&mut px);
        Stage::ClampX1.apply(&mut px);
        assert!(!px.mask);
        assert_eq!(px.r, 1.0);
    }

    #[test]
    fn test_decal_mask_zeroes() {
        let table = Arc::new(TableBuilder::new(&[Color4f::RED, Color4f::BLUE], None).build());
        let mut px = Pixel::at(0.0, 0.0);
        px.r = -0.5;
        for stage in [
            Stage::DecalX,
            Stage::EvenlySpaced2StopGradient(table),
            Stage::CheckDecalMask,
        ] {
            stage.apply(&mut px);
        }
        assert_eq!(px.color(), Color4f::TRANSPARENT);
    }

    #[test]
    fn test_premul_roundtrip() {
        let mut px = Pixel::at(0.0, 0.0);
        Stage::UniformColor(Color4f::new(0.8, 0.4, 0.2, 0.5)).apply(&mut px);
        Stage::Premul.apply(&mut px);
        assert_eq!(px.color(), Color4f::new(0.4, 0.2, 0.1, 0.5));
        Stage::Unpremul.apply(&mut px);
        assert!(px.color().approx_eq(&Color4f::new(0.8, 0.4, 0.2, 0.5), 1e-6));
    }
}
