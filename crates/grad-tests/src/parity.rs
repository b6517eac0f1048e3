//! Backend parity framework
//!
//! Shades the same device points through the stage pipeline and the
//! vectorized program and reports the largest per-channel difference.

use anyhow::{bail, Context};

use oxgrad_core::{Builder, Color4f, Program, RasterPipeline, ShadeContext, Shader, StageRec};

/// Both lowerings of one shader for one draw
#[derive(Debug, Clone)]
pub struct Backends {
    pub pipeline: RasterPipeline,
    pub program: Program,
}

impl Backends {
    /// Emit `shader` into both backends
    pub fn new(shader: &Shader, ctx: &ShadeContext) -> anyhow::Result<Self> {
        let mut pipeline = RasterPipeline::new();
        if !shader.append_stages(&mut StageRec::new(&mut pipeline, ctx)) {
            bail!("stage emission failed for {shader:?}");
        }

        let mut builder = Builder::new();
        let device = builder.device_coord();
        let color = shader
            .program(&mut builder, device, ctx)
            .context("program emission failed")?;

        Ok(Self {
            pipeline,
            program: builder.done(color),
        })
    }

    /// Shade `(xs[i], ys[i])` with both backends: (stages, program)
    pub fn shade(&self, xs: &[f32], ys: &[f32]) -> (Vec<Color4f>, Vec<Color4f>) {
        let mut stages = vec![Color4f::TRANSPARENT; xs.len()];
        let mut program = vec![Color4f::TRANSPARENT; xs.len()];
        self.pipeline.run_points(xs, ys, &mut stages);
        self.program.eval(xs, ys, &mut program);
        (stages, program)
    }
}

/// Result of a parity run
#[derive(Debug, Clone)]
pub struct ParityResult {
    pub test_name: String,
    /// Largest per-channel difference
    pub max_diff: f32,
    /// Input index of the largest difference
    pub worst_index: usize,
    pub count: usize,
    pub passed: bool,
}

/// A parity check with a tolerance
#[derive(Debug, Clone)]
pub struct ParityTest {
    pub name: String,
    pub tolerance: f32,
}

impl ParityTest {
    /// Default tolerance is 1e-4 per channel
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tolerance: 1e-4,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Compare backends at device points
    pub fn run(&self, backends: &Backends, xs: &[f32], ys: &[f32]) -> ParityResult {
        let (stages, program) = backends.shade(xs, ys);
        let mut max_diff = 0.0f32;
        let mut worst_index = 0;
        for (i, (s, p)) in stages.iter().zip(program.iter()).enumerate() {
            let diff = s.max_diff(p);
            // NaN counts as a failure
            if diff > max_diff || diff.is_nan() {
                max_diff = if diff.is_nan() { f32::INFINITY } else { diff };
                worst_index = i;
            }
        }
        ParityResult {
            test_name: self.name.clone(),
            max_diff,
            worst_index,
            count: xs.len(),
            passed: max_diff <= self.tolerance,
        }
    }

    /// Compare backends along the x axis, one device x per parameter
    pub fn run_parameters(&self, backends: &Backends, ts: &[f32]) -> ParityResult {
        let ys = vec![0.0; ts.len()];
        self.run(backends, ts, &ys)
    }
}
