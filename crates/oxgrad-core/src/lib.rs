//! # oxgrad - gradient color interpolation
//!
//! Maps a gradient parameter `t` to a color through a piecewise-linear
//! scale/bias table, with two interchangeable execution backends:
//!
//! - a streaming per-pixel stage pipeline ([`pipeline`])
//! - a vectorized program evaluated eight lanes at a time ([`program`])
//!
//! Both are fed by the same normalized [`GradientSpec`], the same
//! [`GradientTable`] and the same tile fold, and agree within float
//! tolerance.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use oxgrad_core::{
//!     make_gradient, Color4f, GradientShader, Interpolation, RasterPipeline, ShadeContext,
//!     Shader, StageRec, TileMode,
//! };
//!
//! let spec = make_gradient(
//!     &[Color4f::RED, Color4f::GREEN, Color4f::BLUE],
//!     None,
//!     TileMode::Clamp,
//!     Interpolation::default(),
//!     None,
//! )
//! .unwrap();
//!
//! // Horizontal gradient across 100 device pixels
//! let shader: Shader = GradientShader::horizontal(Arc::new(spec), 0.0, 100.0);
//!
//! let ctx = ShadeContext::new();
//! let mut pipeline = RasterPipeline::new();
//! assert!(shader.append_stages(&mut StageRec::new(&mut pipeline, &ctx)));
//!
//! let row = pipeline.shade_row(0, 0, 100);
//! assert_eq!(row.len(), 100);
//! ```

pub mod color;
pub mod error;
pub mod gradient;
pub mod math;
pub mod pipeline;
pub mod program;
pub mod shader;

pub use color::{xform_colors, Color4f, ColorSpace, ColorXform, Primaries};
pub use error::{Error, Result};
pub use gradient::{
    degenerate_shader, make_degenerate, make_gradient, GradientSpec, GradientTable, Interpolation,
    TableBuilder, TableCache, TileMapper, TileMode,
};
pub use math::TransferFn;
pub use pipeline::{RasterPipeline, SearchStrategy, ShadeContext, ShadeFlags, Stage, StageRec};
pub use program::{Builder, Program};
pub use shader::{points_to_unit, ColorShader, GradientShader, Shader};
pub use tiny_skia_path::{Point, Transform};

/// Version of oxgrad
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
