//! Lane-batched program evaluation
//!
//! Every node is computed for [`LANES`] pixels before moving on, so the inner
//! loops are fixed-width array maps the compiler can vectorize. The entry
//! point is compiled for several targets with runtime dispatch.

use multiversion::multiversion;

use super::{Color, Op};
use crate::color::Color4f;
use crate::math::clamp01;

/// Pixels evaluated per batch
pub const LANES: usize = 8;

type Lanes = [f32; LANES];
type LanesI = [i32; LANES];

#[inline(always)]
fn map1(a: &Lanes, f: impl Fn(f32) -> f32) -> Lanes {
    std::array::from_fn(|k| f(a[k]))
}

#[inline(always)]
fn map2(a: &Lanes, b: &Lanes, f: impl Fn(f32, f32) -> f32) -> Lanes {
    std::array::from_fn(|k| f(a[k], b[k]))
}

#[inline(always)]
fn mask(c: bool) -> i32 {
    if c { -1 } else { 0 }
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub(crate) fn eval_program(
    ops: &[Op],
    uniforms: &[f32],
    tables: &[Vec<f32>],
    out: Color,
    xs: &[f32],
    ys: &[f32],
    dst: &mut [Color4f],
) {
    let mut f: Vec<Lanes> = vec![[0.0; LANES]; ops.len()];
    let mut i: Vec<LanesI> = vec![[0; LANES]; ops.len()];

    for ((xc, yc), dc) in xs
        .chunks(LANES)
        .zip(ys.chunks(LANES))
        .zip(dst.chunks_mut(LANES))
    {
        let n = xc.len();
        let mut x = [0.0; LANES];
        let mut y = [0.0; LANES];
        x[..n].copy_from_slice(xc);
        y[..n].copy_from_slice(yc);

        for (id, op) in ops.iter().enumerate() {
            match op {
                Op::CoordX => f[id] = x,
                Op::CoordY => f[id] = y,
                Op::Splat(v) => f[id] = [*v; LANES],
                Op::SplatI(v) => i[id] = [*v; LANES],
                Op::Uniform(slot) => f[id] = [uniforms[*slot]; LANES],

                Op::Add(a, b) => f[id] = map2(&f[a.0], &f[b.0], |a, b| a + b),
                Op::Sub(a, b) => f[id] = map2(&f[a.0], &f[b.0], |a, b| a - b),
                Op::Mul(a, b) => f[id] = map2(&f[a.0], &f[b.0], |a, b| a * b),
                Op::Div(a, b) => f[id] = map2(&f[a.0], &f[b.0], |a, b| a / b),
                Op::Min(a, b) => f[id] = map2(&f[a.0], &f[b.0], f32::min),
                Op::Max(a, b) => f[id] = map2(&f[a.0], &f[b.0], f32::max),
                Op::Floor(a) => f[id] = map1(&f[a.0], f32::floor),
                Op::Abs(a) => f[id] = map1(&f[a.0], f32::abs),
                Op::Clamp01(a) => f[id] = map1(&f[a.0], clamp01),
                Op::Transfer(a, tf, inverse) => {
                    f[id] = map1(&f[a.0], |v| tf.apply_f32(v, *inverse));
                }

                Op::Trunc(a) => {
                    let a = &f[a.0];
                    // Saturating; NaN → 0
                    i[id] = std::array::from_fn(|k| a[k] as i32);
                }
                Op::Eq(a, b) => {
                    let (a, b) = (&f[a.0], &f[b.0]);
                    i[id] = std::array::from_fn(|k| mask(a[k] == b[k]));
                }
                Op::Gte(a, b) => {
                    let (a, b) = (&f[a.0], &f[b.0]);
                    i[id] = std::array::from_fn(|k| mask(a[k] >= b[k]));
                }
                Op::AddI(a, b) => {
                    let (a, b) = (&i[a.0], &i[b.0]);
                    i[id] = std::array::from_fn(|k| a[k].wrapping_add(b[k]));
                }
                Op::ShlI(a, bits) => {
                    let a = &i[a.0];
                    i[id] = std::array::from_fn(|k| a[k].wrapping_shl(*bits));
                }
                Op::AndI(a, b) => {
                    let (a, b) = (&i[a.0], &i[b.0]);
                    i[id] = std::array::from_fn(|k| a[k] & b[k]);
                }

                Op::Gather(table, ix) => {
                    let table = &tables[table.0];
                    let ix = &i[ix.0];
                    let last = table.len().saturating_sub(1) as i32;
                    f[id] = std::array::from_fn(|k| {
                        table.get(ix[k].clamp(0, last) as usize).copied().unwrap_or(0.0)
                    });
                }
                Op::Select(cond, t, e) => {
                    let (c, t, e) = (&i[cond.0], &f[t.0], &f[e.0]);
                    f[id] = std::array::from_fn(|k| if c[k] != 0 { t[k] } else { e[k] });
                }
                Op::BitAnd(a, m) => {
                    let (a, m) = (&f[a.0], &i[m.0]);
                    f[id] = std::array::from_fn(|k| f32::from_bits(a[k].to_bits() & m[k] as u32));
                }
            }
        }

        let (r, g, b, a) = (&f[out.r.0], &f[out.g.0], &f[out.b.0], &f[out.a.0]);
        for (k, px) in dc.iter_mut().take(n).enumerate() {
            *px = Color4f::new(r[k], g[k], b[k], a[k]);
        }
    }
}

/// Instruction set the evaluator dispatches to on this machine
pub fn active_features() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            "AVX2"
        } else if is_x86_feature_detected!("sse4.1") {
            "SSE4.1"
        } else {
            "scalar"
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        "NEON"
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        "scalar"
    }
}
