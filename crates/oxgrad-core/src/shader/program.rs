//! Lowering gradients onto the vectorized program builder

use log::warn;

use crate::color::ColorXform;
use crate::gradient::{lower_tile, ScaleBias, TableLayout, TileLowering};
use crate::pipeline::ShadeContext;
use crate::program::{Builder, Color, Coord, F32, I32};
use crate::shader::gradient::{PostStep, Prepared};
use crate::shader::GradientShader;

/// Tile lowering that records branchless program nodes
struct ProgramTiles<'a> {
    p: &'a mut Builder,
}

impl TileLowering for ProgramTiles<'_> {
    type T = F32;
    type Mask = I32;

    fn repeat(&mut self, t: F32) -> F32 {
        self.p.fract(t)
    }

    fn mirror(&mut self, t: F32) -> F32 {
        let p = &mut *self.p;
        let one = p.splat(1.0);
        let half = p.splat(0.5);
        let a = p.sub(t, one);
        let h = p.mul(a, half);
        let b = p.floor(h);
        let bb = p.add(b, b);
        let d = p.sub(a, bb);
        let d = p.sub(d, one);
        p.abs(d)
    }

    fn decal_mask(&mut self, t: F32) -> I32 {
        let c = self.p.clamp01(t);
        self.p.eq(t, c)
    }
}

impl GradientShader {
    /// Emit program nodes computing this gradient at `device`
    ///
    /// Returns `None`, with no nodes recorded, when the draw cannot be shaded.
    pub fn program(&self, p: &mut Builder, device: Coord, ctx: &ShadeContext) -> Option<Color> {
        match self.prepare(ctx) {
            Ok(prepared) => Some(self.emit_program(p, device, prepared)),
            Err(e) => {
                warn!("gradient program not emitted: {e}");
                None
            }
        }
    }

    fn emit_program(&self, p: &mut Builder, device: Coord, prepared: Prepared) -> Color {
        let table = &prepared.table;
        let unit = p.apply_transform(&prepared.matrix, device);
        let mut tiles = ProgramTiles { p: &mut *p };
        let (t, mask) = lower_tile(self.spec().tile_mode(), &mut tiles, unit.x);

        let (ix, t) = match table.layout() {
            TableLayout::TwoStop => {
                let t = p.clamp01(t);
                (p.splat_i(0), t)
            }
            TableLayout::Even { gap_count } => {
                let t = p.clamp01(t);
                let gap = p.splat(*gap_count as f32);
                let scaled = p.mul(t, gap);
                (p.trunc(scaled), t)
            }
            TableLayout::Search { breakpoints } => {
                let one = p.splat_i(1);
                let mut ix = p.splat_i(0);
                for &b in breakpoints {
                    let b = p.uniform(b);
                    let ge = p.gte(t, b);
                    let step = p.and_i(ge, one);
                    ix = p.add_i(ix, step);
                }
                (ix, t)
            }
        };

        let flat = p.push_table(table.flat().to_vec());
        let base = p.shl_i(ix, ScaleBias::STRIDE.trailing_zeros());
        let channel = |p: &mut Builder, k: i32| -> F32 {
            let off_f = p.splat_i(k);
            let off_b = p.splat_i(k + 4);
            let ix_f = p.add_i(base, off_f);
            let ix_b = p.add_i(base, off_b);
            let f = p.gather(flat, ix_f);
            let b = p.gather(flat, ix_b);
            p.mad(t, f, b)
        };
        let mut color = Color {
            r: channel(p, 0),
            g: channel(p, 1),
            b: channel(p, 2),
            a: channel(p, 3),
        };

        if let Some(mask) = mask {
            color = Color {
                r: p.bit_and(color.r, mask),
                g: p.bit_and(color.g, mask),
                b: p.bit_and(color.b, mask),
                a: p.bit_and(color.a, mask),
            };
        }

        for step in &prepared.post {
            color = match step {
                PostStep::Unpremul => unpremul(p, color),
                PostStep::Xform(xform) => color_xform(p, xform, color),
                PostStep::Premul => premul(p, color),
            };
        }
        color
    }
}

pub(crate) fn premul(p: &mut Builder, c: Color) -> Color {
    Color {
        r: p.mul(c.r, c.a),
        g: p.mul(c.g, c.a),
        b: p.mul(c.b, c.a),
        a: c.a,
    }
}

pub(crate) fn unpremul(p: &mut Builder, c: Color) -> Color {
    let zero = p.splat(0.0);
    let one = p.splat(1.0);
    let inv = p.div(one, c.a);
    let transparent = p.eq(c.a, zero);
    let scale = p.select(transparent, zero, inv);
    Color {
        r: p.mul(c.r, scale),
        g: p.mul(c.g, scale),
        b: p.mul(c.b, scale),
        a: c.a,
    }
}

pub(crate) fn color_xform(p: &mut Builder, xform: &ColorXform, c: Color) -> Color {
    if xform.is_identity() {
        return c;
    }
    let src = xform.src_transfer();
    let dst = xform.dst_transfer();
    let mut rgb = [c.r, c.g, c.b].map(|v| p.transfer(v, src, false));

    if xform.has_matrix() {
        let m = *xform.matrix();
        let lin = rgb;
        let row = |p: &mut Builder, i: usize| -> F32 {
            let m0 = p.uniform(m[i][0]);
            let m1 = p.uniform(m[i][1]);
            let m2 = p.uniform(m[i][2]);
            let a = p.mul(m0, lin[0]);
            let b = p.mul(m1, lin[1]);
            let c = p.mul(m2, lin[2]);
            let ab = p.add(a, b);
            p.add(ab, c)
        };
        rgb = [row(p, 0), row(p, 1), row(p, 2)];
    }

    let [r, g, b] = rgb.map(|v| p.transfer(v, dst, true));
    Color { r, g, b, a: c.a }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tiny_skia_path::Transform;

    use crate::color::{Color4f, ColorSpace};
    use crate::gradient::{make_gradient, Interpolation, TileMode};

    fn eval(s: &GradientShader, ctx: &ShadeContext, xs: &[f32]) -> Vec<Color4f> {
        let mut p = Builder::new();
        let device = p.device_coord();
        let color = s.program(&mut p, device, ctx).unwrap();
        let prog = p.done(color);
        let ys = vec![0.0; xs.len()];
        let mut out = vec![Color4f::TRANSPARENT; xs.len()];
        prog.eval(xs, &ys, &mut out);
        out
    }

    #[test]
    fn test_even_gradient() {
        let spec = make_gradient(
            &[Color4f::RED, Color4f::GREEN, Color4f::BLUE],
            None,
            TileMode::Clamp,
            Interpolation::default(),
            None,
        )
        .unwrap();
        let s = GradientShader::new(Arc::new(spec), Transform::from_scale(0.01, 1.0));
        let out = eval(&s, &ShadeContext::new(), &[-10.0, 25.0, 100.0, 250.0]);
        assert_eq!(out[0], Color4f::RED);
        assert!(out[1].approx_eq(&Color4f::new(0.5, 0.5, 0.0, 1.0), 1e-6));
        assert_eq!(out[2], Color4f::BLUE);
        assert_eq!(out[3], Color4f::BLUE);
    }

    #[test]
    fn test_repeat_two_stop() {
        let spec = make_gradient(
            &[Color4f::RED, Color4f::BLUE],
            None,
            TileMode::Repeat,
            Interpolation::default(),
            None,
        )
        .unwrap();
        let s = GradientShader::new(Arc::new(spec), Transform::identity());
        let out = eval(&s, &ShadeContext::new(), &[1.5]);
        assert!(out[0].approx_eq(&Color4f::new(0.5, 0.0, 0.5, 1.0), 1e-6));
    }

    #[test]
    fn test_decal_outside_is_transparent() {
        let spec = make_gradient(
            &[Color4f::RED, Color4f::BLUE],
            Some(&[0.0, 0.4]),
            TileMode::Decal,
            Interpolation::default(),
            None,
        )
        .unwrap();
        let s = GradientShader::new(Arc::new(spec), Transform::identity());
        let out = eval(&s, &ShadeContext::new(), &[-0.1, 0.7, 1.1]);
        assert_eq!(out[0], Color4f::TRANSPARENT);
        assert_eq!(out[1], Color4f::BLUE);
        assert_eq!(out[2], Color4f::TRANSPARENT);
    }

    #[test]
    fn test_failure_records_no_nodes() {
        let spec = make_gradient(
            &[Color4f::RED, Color4f::BLUE],
            None,
            TileMode::Clamp,
            Interpolation::default(),
            None,
        )
        .unwrap();
        let s = GradientShader::new(Arc::new(spec), Transform::identity());
        let ctx = ShadeContext::new().with_local_to_device(Transform::from_scale(1.0, 0.0));

        let mut p = Builder::new();
        let device = p.device_coord();
        let before = p.len();
        assert!(s.program(&mut p, device, &ctx).is_none());
        assert_eq!(p.len(), before);
    }

    #[test]
    fn test_working_space_conversion() {
        let spec = make_gradient(
            &[Color4f::BLACK, Color4f::WHITE],
            None,
            TileMode::Clamp,
            Interpolation::default().with_color_space(ColorSpace::srgb_linear()),
            None,
        )
        .unwrap();
        let s = GradientShader::new(Arc::new(spec), Transform::identity());
        let out = eval(&s, &ShadeContext::new(), &[0.5]);
        // Linear midpoint re-encoded to sRGB
        assert!((out[0].r - 0.7354).abs() < 1e-3, "{:?}", out[0]);
        assert_eq!(out[0].a, 1.0);
    }
}
