//! Gradient shader and the per-draw preparation shared by both emitters

use std::sync::Arc;

use log::debug;
use tiny_skia_path::{Point, Transform};

use crate::color::{xform_colors, ColorSpace, ColorXform};
use crate::gradient::{
    degenerate_shader, GradientSpec, GradientTable, TableBuilder, TableKey, DEGENERATE_THRESHOLD,
};
use crate::pipeline::ShadeContext;
use crate::shader::Shader;
use crate::Result;

/// A gradient bound to its geometry
///
/// `pts_to_unit` maps local coordinates onto the gradient axis: the x
/// coordinate of the mapped point is the gradient parameter `t`.
#[derive(Debug, Clone)]
pub struct GradientShader {
    spec: Arc<GradientSpec>,
    pts_to_unit: Transform,
}

/// Color step applied after the table lookup
#[derive(Debug, Clone)]
pub(crate) enum PostStep {
    Unpremul,
    Xform(Arc<ColorXform>),
    Premul,
}

/// Everything a draw needs, computed before any emission
#[derive(Debug, Clone)]
pub(crate) struct Prepared {
    /// Device → unit space
    pub matrix: Transform,
    pub table: Arc<GradientTable>,
    pub post: Vec<PostStep>,
}

impl GradientShader {
    pub fn new(spec: Arc<GradientSpec>, pts_to_unit: Transform) -> Self {
        Self { spec, pts_to_unit }
    }

    /// Linear gradient with `t = 0` at `start` and `t = 1` at `end`
    ///
    /// Coincident endpoints have no axis; those draw with
    /// [`degenerate_shader`] instead.
    pub fn linear(spec: Arc<GradientSpec>, start: Point, end: Point) -> Shader {
        match points_to_unit(start, end) {
            Some(ts) => Shader::Gradient(Self::new(spec, ts)),
            None => {
                debug!("linear gradient from {start:?} to {end:?} has no length");
                degenerate_shader(&spec)
            }
        }
    }

    /// Horizontal gradient from `x0` to `x1`
    pub fn horizontal(spec: Arc<GradientSpec>, x0: f32, x1: f32) -> Shader {
        Self::linear(spec, Point::from_xy(x0, 0.0), Point::from_xy(x1, 0.0))
    }

    pub fn spec(&self) -> &Arc<GradientSpec> {
        &self.spec
    }

    pub fn pts_to_unit(&self) -> &Transform {
        &self.pts_to_unit
    }

    pub fn is_opaque(&self) -> bool {
        self.spec.is_opaque()
    }

    /// Space the colors are interpolated in for this draw
    pub fn working_space(&self, ctx: &ShadeContext) -> ColorSpace {
        self.spec
            .interpolation()
            .color_space
            .unwrap_or(ctx.dst_color_space)
    }

    /// Scale/bias table for this draw, from the context's cache when enabled
    pub fn table(&self, ctx: &ShadeContext) -> Result<Arc<GradientTable>> {
        let spec = &self.spec;
        let in_premul = spec.interpolate_in_premul();
        let working = self.working_space(ctx);
        let build = || -> Result<GradientTable> {
            let colors = xform_colors(spec.colors(), spec.color_space(), &working, in_premul)?;
            Ok(TableBuilder::new(&colors, spec.positions())
                .in_premul(in_premul)
                .build())
        };

        match ctx.table_cache() {
            Some(cache) => cache.get_or_build(TableKey::new(spec, &ctx.dst_color_space), build),
            None => build().map(Arc::new),
        }
    }

    pub(crate) fn prepare(&self, ctx: &ShadeContext) -> Result<Prepared> {
        let matrix = ctx.total_inverse(&self.pts_to_unit)?;
        let table = self.table(ctx)?;

        let in_premul = self.spec.interpolate_in_premul();
        let working = self.working_space(ctx);
        let mut post = Vec::new();
        if working != ctx.dst_color_space {
            let xform = ColorXform::new(&working, &ctx.dst_color_space)?;
            if in_premul {
                post.push(PostStep::Unpremul);
            }
            post.push(PostStep::Xform(Arc::new(xform)));
            post.push(PostStep::Premul);
        } else if !in_premul && !self.spec.colors_are_opaque() {
            post.push(PostStep::Premul);
        }

        Ok(Prepared {
            matrix,
            table,
            post,
        })
    }
}

/// Maps `start` to the origin and `end` to `(1, 0)`
///
/// `None` when the two points are closer than [`DEGENERATE_THRESHOLD`] or
/// the distance is not finite.
pub fn points_to_unit(start: Point, end: Point) -> Option<Transform> {
    let (dx, dy) = (end.x - start.x, end.y - start.y);
    let mag = dx.hypot(dy);
    if !mag.is_finite() || mag <= DEGENERATE_THRESHOLD {
        return None;
    }

    let inv = 1.0 / mag;
    let (cos, sin) = (dx * inv, dy * inv);
    let ts = Transform::from_translate(-start.x, -start.y)
        .post_concat(Transform::from_row(cos, -sin, sin, cos, 0.0, 0.0))
        .post_scale(inv, inv);
    ts.is_finite().then_some(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color4f;
    use crate::gradient::{make_gradient, Interpolation, TableCache, TileMode};
    use crate::math::map_point;

    fn spec(colors: &[Color4f], mode: TileMode, interpolation: Interpolation) -> Arc<GradientSpec> {
        Arc::new(make_gradient(colors, None, mode, interpolation, None).unwrap())
    }

    fn shader(colors: &[Color4f], interpolation: Interpolation) -> GradientShader {
        let ts = points_to_unit(Point::from_xy(0.0, 0.0), Point::from_xy(100.0, 0.0)).unwrap();
        GradientShader::new(spec(colors, TileMode::Clamp, interpolation), ts)
    }

    #[test]
    fn test_horizontal_mapping() {
        let s = shader(&[Color4f::RED, Color4f::BLUE], Interpolation::default());
        let (t, _) = map_point(s.pts_to_unit(), 25.0, 7.0);
        assert!((t - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_mapping() {
        let ts = points_to_unit(Point::from_xy(10.0, 10.0), Point::from_xy(13.0, 14.0)).unwrap();
        let (t, u) = map_point(&ts, 10.0, 10.0);
        assert!(t.abs() < 1e-5 && u.abs() < 1e-5);
        let (t, u) = map_point(&ts, 13.0, 14.0);
        assert!((t - 1.0).abs() < 1e-5 && u.abs() < 1e-5);
        // Perpendicular offsets leave t unchanged.
        let (t, _) = map_point(&ts, 11.5 + 4.0, 12.0 - 3.0);
        assert!((t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_reversed_axis() {
        let ts = points_to_unit(Point::from_xy(100.0, 0.0), Point::from_xy(0.0, 0.0)).unwrap();
        let (t, _) = map_point(&ts, 75.0, 0.0);
        assert!((t - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_coincident_points_degenerate() {
        let p = Point::from_xy(5.0, 5.0);
        assert!(points_to_unit(p, p).is_none());
        assert!(points_to_unit(p, Point::from_xy(f32::INFINITY, 5.0)).is_none());

        let colors = [Color4f::RED, Color4f::BLUE];
        let clamp = spec(&colors, TileMode::Clamp, Interpolation::default());
        match GradientShader::horizontal(clamp, 5.0, 5.0) {
            Shader::Color(c) => assert_eq!(c.color(), Color4f::BLUE),
            other => panic!("expected a color shader, got {other:?}"),
        }

        let decal = spec(&colors, TileMode::Decal, Interpolation::default());
        assert!(matches!(
            GradientShader::horizontal(Arc::clone(&decal), 5.0, 5.0),
            Shader::Empty
        ));
        let ok = GradientShader::horizontal(decal, 0.0, 1.0);
        assert!(matches!(ok, Shader::Gradient(_)));
    }

    #[test]
    fn test_post_steps() {
        let ctx = ShadeContext::new();

        let opaque = shader(&[Color4f::RED, Color4f::BLUE], Interpolation::default());
        assert!(opaque.prepare(&ctx).unwrap().post.is_empty());

        let translucent = shader(
            &[Color4f::RED, Color4f::new(0.0, 0.0, 1.0, 0.5)],
            Interpolation::default(),
        );
        let post = translucent.prepare(&ctx).unwrap().post;
        assert!(matches!(post.as_slice(), [PostStep::Premul]));

        let premul = shader(&[Color4f::RED, Color4f::new(0.0, 0.0, 1.0, 0.5)], Interpolation::premul());
        assert!(premul.prepare(&ctx).unwrap().post.is_empty());

        let linear = shader(
            &[Color4f::RED, Color4f::BLUE],
            Interpolation::premul().with_color_space(ColorSpace::srgb_linear()),
        );
        let post = linear.prepare(&ctx).unwrap().post;
        assert!(matches!(
            post.as_slice(),
            [PostStep::Unpremul, PostStep::Xform(_), PostStep::Premul]
        ));
    }

    #[test]
    fn test_table_cached() {
        let cache = Arc::new(TableCache::new());
        let ctx = ShadeContext::new().with_cache(Arc::clone(&cache));
        let s = shader(&[Color4f::RED, Color4f::GREEN, Color4f::BLUE], Interpolation::default());

        let a = s.table(&ctx).unwrap();
        let b = s.table(&ctx).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }
}
