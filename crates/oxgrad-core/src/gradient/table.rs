//! Scale/bias tables
//!
//! Every gradient is lowered to one canonical piecewise-linear table. Each
//! entry stores per-channel `(F, B)` so that `color(t) = t*F + B` within the
//! entry's interval. Both execution backends read the same table; they only
//! differ in how they find the entry index.

use bytemuck::{Pod, Zeroable};
use log::debug;

use crate::color::Color4f;
use crate::math::clamp01;

/// How the stage executor locates the table entry for arbitrary stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Binary search over breakpoints
    #[default]
    Binary,
    /// Count breakpoints `<= t`, as the vectorized backend does
    Linear,
}

/// Per-channel scale and bias for one interval
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct ScaleBias {
    pub f: [f32; 4],
    pub b: [f32; 4],
}

impl ScaleBias {
    /// Number of floats in the flat representation
    pub const STRIDE: usize = 8;

    /// Interval holding a single color
    pub const fn constant(c: Color4f) -> Self {
        Self {
            f: [0.0; 4],
            b: c.to_array(),
        }
    }

    /// Interval interpolating from `l` at `t_l` to `r` at `t_r`
    ///
    /// `scale` is `1 / (t_r - t_l)`, the caller guarantees the interval is not
    /// empty.
    fn segment(l: Color4f, r: Color4f, scale: f32, t_l: f32) -> Self {
        let l = l.to_array();
        let r = r.to_array();
        let mut f = [0.0; 4];
        let mut b = [0.0; 4];
        for k in 0..4 {
            f[k] = (r[k] - l[k]) * scale;
            b[k] = l[k] - f[k] * t_l;
        }
        Self { f, b }
    }

    /// `t*F + B`, multiply then add
    #[inline]
    pub fn eval(&self, t: f32) -> Color4f {
        Color4f::new(
            t * self.f[0] + self.b[0],
            t * self.f[1] + self.b[1],
            t * self.f[2] + self.b[2],
            t * self.f[3] + self.b[3],
        )
    }
}

/// How the entry for a given `t` is located
#[derive(Debug, Clone, PartialEq)]
pub enum TableLayout {
    /// Single entry, evaluated at `clamp01(t)`
    TwoStop,
    /// `gap_count + 1` entries, index `floor(clamp01(t) * gap_count)`
    Even { gap_count: usize },
    /// Index is the number of breakpoints `<= t`, evaluated at raw `t`
    Search { breakpoints: Vec<f32> },
}

/// Canonical lookup table for one gradient in one working space
#[derive(Debug, Clone, PartialEq)]
pub struct GradientTable {
    layout: TableLayout,
    entries: Vec<ScaleBias>,
    in_premul: bool,
}

impl GradientTable {
    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn entries(&self) -> &[ScaleBias] {
        &self.entries
    }

    /// Entries hold premultiplied colors
    pub fn in_premul(&self) -> bool {
        self.in_premul
    }

    /// The parameter lookups are evaluated at
    #[inline]
    pub fn lookup_t(&self, t: f32) -> f32 {
        match self.layout {
            TableLayout::TwoStop | TableLayout::Even { .. } => clamp01(t),
            TableLayout::Search { .. } => t,
        }
    }

    /// Entry index for `t` using binary search
    #[inline]
    pub fn segment_index(&self, t: f32) -> usize {
        self.segment_index_with(t, SearchStrategy::Binary)
    }

    /// Entry index for `t`
    ///
    /// Both strategies return the same index; `Linear` mirrors the compare-sum
    /// the program backend performs.
    pub fn segment_index_with(&self, t: f32, strategy: SearchStrategy) -> usize {
        match &self.layout {
            TableLayout::TwoStop => 0,
            TableLayout::Even { gap_count } => {
                // NaN casts to 0
                let ix = (clamp01(t) * *gap_count as f32) as usize;
                ix.min(*gap_count)
            }
            TableLayout::Search { breakpoints } => match strategy {
                SearchStrategy::Binary => breakpoints.partition_point(|&b| b <= t),
                SearchStrategy::Linear => breakpoints.iter().filter(|&&b| t >= b).count(),
            },
        }
    }

    /// Color at `t` (after tiling)
    #[inline]
    pub fn eval(&self, t: f32) -> Color4f {
        self.eval_with(t, SearchStrategy::Binary)
    }

    pub fn eval_with(&self, t: f32, strategy: SearchStrategy) -> Color4f {
        let ix = self.segment_index_with(t, strategy);
        self.entries[ix].eval(self.lookup_t(t))
    }

    /// Flat `[F r,g,b,a, B r,g,b,a]` view, one stride per entry
    pub fn flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.entries)
    }
}

/// Builds a [`GradientTable`] from working-space stop colors
#[derive(Debug, Clone)]
pub struct TableBuilder<'a> {
    colors: &'a [Color4f],
    positions: Option<&'a [f32]>,
    in_premul: bool,
    two_stop_fast_path: bool,
}

impl<'a> TableBuilder<'a> {
    /// `colors` must already be in the working space (and premultiplied if
    /// the table is). `positions` follow the normalized-stop invariants.
    pub fn new(colors: &'a [Color4f], positions: Option<&'a [f32]>) -> Self {
        Self {
            colors,
            positions,
            in_premul: false,
            two_stop_fast_path: true,
        }
    }

    pub fn in_premul(mut self, in_premul: bool) -> Self {
        self.in_premul = in_premul;
        self
    }

    /// Allow the single-entry layout for two evenly spaced stops
    pub fn two_stop_fast_path(mut self, enabled: bool) -> Self {
        self.two_stop_fast_path = enabled;
        self
    }

    pub fn build(&self) -> GradientTable {
        let colors = self.colors;
        let n = colors.len();
        debug_assert!(n >= 2);

        let (layout, entries) = match self.positions {
            None if n == 2 && self.two_stop_fast_path => {
                let entry = ScaleBias::segment(colors[0], colors[1], 1.0, 0.0);
                (TableLayout::TwoStop, vec![entry])
            }
            None => {
                let gap_count = n - 1;
                let gap = gap_count as f32;
                let mut entries = Vec::with_capacity(n);
                for i in 0..gap_count {
                    entries.push(ScaleBias::segment(
                        colors[i],
                        colors[i + 1],
                        gap,
                        i as f32 / gap,
                    ));
                }
                entries.push(ScaleBias::constant(colors[n - 1]));
                (TableLayout::Even { gap_count }, entries)
            }
            Some(positions) => {
                debug_assert_eq!(positions.len(), n);
                let mut breakpoints = Vec::with_capacity(n);
                let mut entries = Vec::with_capacity(n + 1);

                // Everything before the first breakpoint is the first color.
                entries.push(ScaleBias::constant(colors[0]));

                let mut t_l = positions[0];
                let mut c_l = colors[0];
                for i in 1..n {
                    let t_r = positions[i];
                    let c_r = colors[i];
                    // Hard stops contribute no interval; c_r supersedes c_l.
                    if t_l < t_r {
                        breakpoints.push(t_l);
                        entries.push(ScaleBias::segment(c_l, c_r, 1.0 / (t_r - t_l), t_l));
                    }
                    t_l = t_r;
                    c_l = c_r;
                }
                breakpoints.push(t_l);
                entries.push(ScaleBias::constant(c_l));

                (TableLayout::Search { breakpoints }, entries)
            }
        };

        debug!(
            "built gradient table: {} entries, layout {:?}",
            entries.len(),
            match &layout {
                TableLayout::TwoStop => "two-stop",
                TableLayout::Even { .. } => "even",
                TableLayout::Search { .. } => "search",
            }
        );

        GradientTable {
            layout,
            entries,
            in_premul: self.in_premul,
        }
    }
}
