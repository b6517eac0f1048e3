//! Streaming Shading Pipeline
//!
//! A [`RasterPipeline`] is an ordered list of [`Stage`]s run once per pixel.
//! Shaders append their stages through a [`StageRec`]; the executor then
//! shades arbitrary device points or whole rows.
//!
//! # Pipeline Architecture
//!
//! A gradient lowers to:
//! 1. Coordinates: seed the device point, map it into gradient space
//! 2. Tiling: fold the parameter (repeat / mirror), or record the decal mask
//! 3. Lookup: scale/bias table, evenly spaced or searched
//! 4. Color: decal masking, then working-space conversion and premultiply

mod context;
mod stages;

pub use crate::gradient::SearchStrategy;
pub use context::{ShadeContext, ShadeFlags, StageRec};
pub use stages::{Pixel, Stage};

use multiversion::multiversion;

use crate::color::Color4f;

/// An ordered list of shading stages
#[derive(Debug, Clone, Default)]
pub struct RasterPipeline {
    stages: Vec<Stage>,
}

impl RasterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    pub fn extend(&mut self, stages: impl IntoIterator<Item = Stage>) {
        self.stages.extend(stages);
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Shade one device point
    pub fn run_point(&self, x: f32, y: f32) -> Color4f {
        let mut px = Pixel::at(x, y);
        for stage in &self.stages {
            stage.apply(&mut px);
        }
        px.color()
    }

    /// Shade device points `(xs[i], ys[i])` into `out[i]`
    pub fn run_points(&self, xs: &[f32], ys: &[f32], out: &mut [Color4f]) {
        assert_eq!(xs.len(), ys.len());
        assert!(out.len() >= xs.len());
        run_stages(&self.stages, xs, ys, out);
    }

    /// Shade `width` pixel centers of row `y`, starting at column `x`
    pub fn shade_row(&self, x: i32, y: i32, width: usize) -> Vec<Color4f> {
        let xs: Vec<f32> = (0..width).map(|i| (x as f32) + (i as f32) + 0.5).collect();
        let ys = vec![y as f32 + 0.5; width];
        let mut out = vec![Color4f::TRANSPARENT; width];
        self.run_points(&xs, &ys, &mut out);
        out
    }
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
fn run_stages(stages: &[Stage], xs: &[f32], ys: &[f32], out: &mut [Color4f]) {
    for ((&x, &y), dst) in xs.iter().zip(ys.iter()).zip(out.iter_mut()) {
        let mut px = Pixel::at(x, y);
        for stage in stages {
            stage.apply(&mut px);
        }
        *dst = px.color();
    }
}
