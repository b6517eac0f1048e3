//! Vectorized Shading Programs
//!
//! A [`Builder`] records a straight-line expression graph over per-lane
//! values. [`Builder::done`] freezes it into a [`Program`] that evaluates
//! [`LANES`] pixels at a time.
//!
//! Values are typed by handle: [`F32`] for floats and [`I32`] for integers
//! and comparison masks (all bits set for true, zero for false).

mod eval;

pub use eval::{active_features, LANES};

use tiny_skia_path::Transform;

use crate::color::Color4f;
use crate::math::TransferFn;

/// Float node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct F32(pub(crate) usize);

/// Integer or mask node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I32(pub(crate) usize);

/// Handle to a table pushed with [`Builder::push_table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableId(pub(crate) usize);

/// Device coordinate nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coord {
    pub x: F32,
    pub y: F32,
}

/// Color nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: F32,
    pub g: F32,
    pub b: F32,
    pub a: F32,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    CoordX,
    CoordY,
    Splat(f32),
    SplatI(i32),
    Uniform(usize),

    Add(F32, F32),
    Sub(F32, F32),
    Mul(F32, F32),
    Div(F32, F32),
    Min(F32, F32),
    Max(F32, F32),
    Floor(F32),
    Abs(F32),
    Clamp01(F32),
    Transfer(F32, TransferFn, bool),

    Trunc(F32),
    Eq(F32, F32),
    Gte(F32, F32),
    AddI(I32, I32),
    ShlI(I32, u32),
    AndI(I32, I32),

    Gather(TableId, I32),
    Select(I32, F32, F32),
    BitAnd(F32, I32),
}

/// Program builder
#[derive(Debug, Clone, Default)]
pub struct Builder {
    ops: Vec<Op>,
    uniforms: Vec<f32>,
    tables: Vec<Vec<f32>>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes recorded so far
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    fn push_f(&mut self, op: Op) -> F32 {
        self.ops.push(op);
        F32(self.ops.len() - 1)
    }

    fn push_i(&mut self, op: Op) -> I32 {
        self.ops.push(op);
        I32(self.ops.len() - 1)
    }

    /// The device coordinate of each lane
    pub fn device_coord(&mut self) -> Coord {
        let x = self.push_f(Op::CoordX);
        let y = self.push_f(Op::CoordY);
        Coord { x, y }
    }

    pub fn splat(&mut self, v: f32) -> F32 {
        self.push_f(Op::Splat(v))
    }

    pub fn splat_i(&mut self, v: i32) -> I32 {
        self.push_i(Op::SplatI(v))
    }

    /// Per-draw value stored in the program's uniform buffer
    pub fn uniform(&mut self, v: f32) -> F32 {
        self.uniforms.push(v);
        let slot = self.uniforms.len() - 1;
        self.push_f(Op::Uniform(slot))
    }

    /// Uniform color
    pub fn uniform_color(&mut self, c: Color4f) -> Color {
        Color {
            r: self.uniform(c.r),
            g: self.uniform(c.g),
            b: self.uniform(c.b),
            a: self.uniform(c.a),
        }
    }

    /// Attach a read-only table for [`gather`](Self::gather)
    pub fn push_table(&mut self, data: Vec<f32>) -> TableId {
        self.tables.push(data);
        TableId(self.tables.len() - 1)
    }

    pub fn add(&mut self, a: F32, b: F32) -> F32 {
        self.push_f(Op::Add(a, b))
    }

    pub fn sub(&mut self, a: F32, b: F32) -> F32 {
        self.push_f(Op::Sub(a, b))
    }

    pub fn mul(&mut self, a: F32, b: F32) -> F32 {
        self.push_f(Op::Mul(a, b))
    }

    pub fn div(&mut self, a: F32, b: F32) -> F32 {
        self.push_f(Op::Div(a, b))
    }

    pub fn min(&mut self, a: F32, b: F32) -> F32 {
        self.push_f(Op::Min(a, b))
    }

    pub fn max(&mut self, a: F32, b: F32) -> F32 {
        self.push_f(Op::Max(a, b))
    }

    pub fn floor(&mut self, a: F32) -> F32 {
        self.push_f(Op::Floor(a))
    }

    pub fn abs(&mut self, a: F32) -> F32 {
        self.push_f(Op::Abs(a))
    }

    /// Clamp to [0, 1]; NaN passes through
    pub fn clamp01(&mut self, a: F32) -> F32 {
        self.push_f(Op::Clamp01(a))
    }

    /// `a - floor(a)`
    pub fn fract(&mut self, a: F32) -> F32 {
        let f = self.floor(a);
        self.sub(a, f)
    }

    /// `a*b + c`, multiply then add
    pub fn mad(&mut self, a: F32, b: F32, c: F32) -> F32 {
        let m = self.mul(a, b);
        self.add(m, c)
    }

    /// Transfer function decode (`inverse == false`) or encode
    pub fn transfer(&mut self, a: F32, tf: TransferFn, inverse: bool) -> F32 {
        self.push_f(Op::Transfer(a, tf, inverse))
    }

    /// Truncate toward zero; NaN becomes 0
    pub fn trunc(&mut self, a: F32) -> I32 {
        self.push_i(Op::Trunc(a))
    }

    pub fn eq(&mut self, a: F32, b: F32) -> I32 {
        self.push_i(Op::Eq(a, b))
    }

    pub fn gte(&mut self, a: F32, b: F32) -> I32 {
        self.push_i(Op::Gte(a, b))
    }

    pub fn add_i(&mut self, a: I32, b: I32) -> I32 {
        self.push_i(Op::AddI(a, b))
    }

    pub fn shl_i(&mut self, a: I32, bits: u32) -> I32 {
        self.push_i(Op::ShlI(a, bits))
    }

    pub fn and_i(&mut self, a: I32, b: I32) -> I32 {
        self.push_i(Op::AndI(a, b))
    }

    /// `table[ix]`, with `ix` clamped into the table
    pub fn gather(&mut self, table: TableId, ix: I32) -> F32 {
        self.push_f(Op::Gather(table, ix))
    }

    /// Lane-wise `cond ? if_true : if_false`
    pub fn select(&mut self, cond: I32, if_true: F32, if_false: F32) -> F32 {
        self.push_f(Op::Select(cond, if_true, if_false))
    }

    /// Bitwise and of float bits with a mask
    pub fn bit_and(&mut self, a: F32, mask: I32) -> F32 {
        self.push_f(Op::BitAnd(a, mask))
    }

    /// Map a point through an affine transform held in uniforms
    pub fn apply_transform(&mut self, m: &Transform, p: Coord) -> Coord {
        let sx = self.uniform(m.sx);
        let kx = self.uniform(m.kx);
        let tx = self.uniform(m.tx);
        let ky = self.uniform(m.ky);
        let sy = self.uniform(m.sy);
        let ty = self.uniform(m.ty);

        let x0 = self.mul(sx, p.x);
        let x1 = self.mul(kx, p.y);
        let x = self.add(x0, x1);
        let x = self.add(x, tx);

        let y0 = self.mul(ky, p.x);
        let y1 = self.mul(sy, p.y);
        let y = self.add(y0, y1);
        let y = self.add(y, ty);

        Coord { x, y }
    }

    /// Freeze the graph with `out` as the result
    pub fn done(self, out: Color) -> Program {
        Program {
            ops: self.ops,
            uniforms: self.uniforms,
            tables: self.tables,
            out,
        }
    }
}

/// A finished program
#[derive(Debug, Clone)]
pub struct Program {
    ops: Vec<Op>,
    uniforms: Vec<f32>,
    tables: Vec<Vec<f32>>,
    out: Color,
}

impl Program {
    /// Number of nodes
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Evaluate at device points `(xs[i], ys[i])`, writing `out[i]`
    pub fn eval(&self, xs: &[f32], ys: &[f32], out: &mut [Color4f]) {
        assert_eq!(xs.len(), ys.len());
        assert!(out.len() >= xs.len());
        eval::eval_program(
            &self.ops,
            &self.uniforms,
            &self.tables,
            self.out,
            xs,
            ys,
            out,
        );
    }

    /// Evaluate `width` pixel centers of row `y`, starting at column `x`
    pub fn shade_row(&self, x: i32, y: i32, width: usize) -> Vec<Color4f> {
        let xs: Vec<f32> = (0..width).map(|i| (x as f32) + (i as f32) + 0.5).collect();
        let ys = vec![y as f32 + 0.5; width];
        let mut out = vec![Color4f::TRANSPARENT; width];
        self.eval(&xs, &ys, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let mut p = Builder::new();
        let c = p.device_coord();
        let two = p.splat(2.0);
        let r = p.mul(c.x, two);
        let g = p.sub(c.y, c.x);
        let b = p.fract(c.x);
        let a = p.splat(1.0);
        let prog = p.done(Color { r, g, b, a });

        let xs = [0.5, 1.25, -0.75];
        let ys = [1.0, 1.0, 1.0];
        let mut out = [Color4f::TRANSPARENT; 3];
        prog.eval(&xs, &ys, &mut out);
        assert_eq!(out[0], Color4f::new(1.0, 0.5, 0.5, 1.0));
        assert_eq!(out[1], Color4f::new(2.5, -0.25, 0.25, 1.0));
        assert_eq!(out[2], Color4f::new(-1.5, 1.75, 0.25, 1.0));
    }

    #[test]
    fn test_gather_and_masks() {
        let mut p = Builder::new();
        let c = p.device_coord();
        let table = p.push_table(vec![10.0, 20.0, 30.0]);
        let ix = p.trunc(c.x);
        let g = p.gather(table, ix);
        let half = p.splat(0.5);
        let ge = p.gte(c.x, half);
        let one = p.splat(1.0);
        let zero = p.splat(0.0);
        let sel = p.select(ge, one, zero);
        let masked = p.bit_and(one, ge);
        let prog = p.done(Color {
            r: g,
            g: sel,
            b: masked,
            a: one,
        });

        let xs = [0.0, 1.5, 2.0, 7.0, -3.0];
        let ys = [0.0; 5];
        let mut out = [Color4f::TRANSPARENT; 5];
        prog.eval(&xs, &ys, &mut out);
        let reds: Vec<f32> = out.iter().map(|c| c.r).collect();
        // Out-of-range indices clamp to the table
        assert_eq!(reds, vec![10.0, 20.0, 30.0, 30.0, 10.0]);
        assert_eq!(out[0].g, 0.0);
        assert_eq!(out[1].g, 1.0);
        assert_eq!(out[0].b, 0.0);
        assert_eq!(out[1].b, 1.0);
    }

    #[test]
    fn test_many_lanes_and_tail() {
        let mut p = Builder::new();
        let c = p.device_coord();
        let k = p.uniform(3.0);
        let r = p.mad(c.x, k, c.y);
        let one = p.splat(1.0);
        let prog = p.done(Color {
            r,
            g: one,
            b: one,
            a: one,
        });

        let n = LANES * 3 + 5;
        let xs: Vec<f32> = (0..n).map(|i| i as f32).collect();
        let ys = vec![1.0; n];
        let mut out = vec![Color4f::TRANSPARENT; n];
        prog.eval(&xs, &ys, &mut out);
        for (i, c) in out.iter().enumerate() {
            assert_eq!(c.r, i as f32 * 3.0 + 1.0);
        }
    }

    #[test]
    fn test_transform() {
        let mut p = Builder::new();
        let c = p.device_coord();
        let m = Transform::from_row(2.0, 0.0, 1.0, 1.0, 5.0, 0.0);
        let t = p.apply_transform(&m, c);
        let one = p.splat(1.0);
        let prog = p.done(Color {
            r: t.x,
            g: t.y,
            b: one,
            a: one,
        });
        let mut out = [Color4f::TRANSPARENT; 1];
        prog.eval(&[3.0], &[4.0], &mut out);
        let (x, y) = crate::math::map_point(&m, 3.0, 4.0);
        assert!((out[0].r - x).abs() < 1e-6 && (out[0].g - y).abs() < 1e-6);
    }
}
