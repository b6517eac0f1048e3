//! Shading Context and Options
//!
//! Per-draw configuration handed to the shader emitters.

use std::sync::Arc;

use crate::color::ColorSpace;
use tiny_skia_path::Transform;

use crate::gradient::{SearchStrategy, TableCache};
use crate::math::invert_finite;
use crate::pipeline::RasterPipeline;
use crate::{Error, Result};

/// Shading flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadeFlags {
    /// Segment search used by the stage executor
    pub search: SearchStrategy,
    /// Use the context's table cache when one is attached
    pub use_cache: bool,
}

impl Default for ShadeFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadeFlags {
    /// Default flags (binary search, cache enabled)
    pub fn new() -> Self {
        Self {
            search: SearchStrategy::Binary,
            use_cache: true,
        }
    }

    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    /// Always build tables fresh
    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }
}

/// Draw configuration
#[derive(Debug, Clone, Default)]
pub struct ShadeContext {
    /// Color space of the destination surface
    pub dst_color_space: ColorSpace,
    /// Current transform (local → device)
    pub local_to_device: Transform,
    /// Extra local matrix applied to the shader
    pub local_matrix: Option<Transform>,
    /// Flags
    pub flags: ShadeFlags,
    /// Shared table cache
    pub cache: Option<Arc<TableCache>>,
}

impl ShadeContext {
    /// Create a context drawing into sRGB with identity transforms
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dst_color_space(mut self, dst: ColorSpace) -> Self {
        self.dst_color_space = dst;
        self
    }

    pub fn with_local_to_device(mut self, ctm: Transform) -> Self {
        self.local_to_device = ctm;
        self
    }

    pub fn with_local_matrix(mut self, local: Transform) -> Self {
        self.local_matrix = Some(local);
        self
    }

    pub fn with_flags(mut self, flags: ShadeFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.flags.search = search;
        self
    }

    pub fn with_cache(mut self, cache: Arc<TableCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Cache to use for this draw, if any
    pub fn table_cache(&self) -> Option<&TableCache> {
        if self.flags.use_cache {
            self.cache.as_deref()
        } else {
            None
        }
    }

    /// Device → shader-unit mapping
    ///
    /// Inverts `local_to_device × local_matrix`, then applies `pts_to_unit`.
    pub fn total_inverse(&self, pts_to_unit: &Transform) -> Result<Transform> {
        let total = match &self.local_matrix {
            Some(local) => self.local_to_device.pre_concat(*local),
            None => self.local_to_device,
        };
        let inverse = invert_finite(&total).ok_or(Error::NonInvertibleMatrix)?;
        let m = inverse.post_concat(*pts_to_unit);
        if m.is_finite() {
            Ok(m)
        } else {
            Err(Error::NonInvertibleMatrix)
        }
    }
}

/// Destination of stage emission: the pipeline being built and its context
#[derive(Debug)]
pub struct StageRec<'a> {
    pub pipeline: &'a mut RasterPipeline,
    pub ctx: &'a ShadeContext,
}

impl<'a> StageRec<'a> {
    pub fn new(pipeline: &'a mut RasterPipeline, ctx: &'a ShadeContext) -> Self {
        Self { pipeline, ctx }
    }
}
