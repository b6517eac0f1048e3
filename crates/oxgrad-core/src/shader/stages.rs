//! Lowering gradients onto the streaming stage pipeline

use std::sync::Arc;

use log::warn;

use crate::gradient::{lower_tile, TableLayout, TileLowering, TileMode};
use crate::pipeline::{Stage, StageRec};
use crate::shader::gradient::PostStep;
use crate::shader::GradientShader;
use crate::Result;

/// Tile lowering that records stages
struct StageTiles<'a> {
    stages: &'a mut Vec<Stage>,
}

impl TileLowering for StageTiles<'_> {
    type T = ();
    type Mask = ();

    fn repeat(&mut self, _: ()) {
        self.stages.push(Stage::RepeatX1);
    }

    fn mirror(&mut self, _: ()) {
        self.stages.push(Stage::MirrorX1);
    }

    fn decal_mask(&mut self, _: ()) {
        self.stages.push(Stage::DecalX);
    }
}

impl GradientShader {
    /// Append this gradient's stages
    ///
    /// Returns false, leaving the pipeline untouched, when the draw cannot be
    /// shaded (singular transform, failed color conversion).
    pub fn append_stages(&self, rec: &mut StageRec<'_>) -> bool {
        match self.try_append_stages(rec) {
            Ok(()) => true,
            Err(e) => {
                warn!("gradient stages not emitted: {e}");
                false
            }
        }
    }

    fn try_append_stages(&self, rec: &mut StageRec<'_>) -> Result<()> {
        let prepared = self.prepare(rec.ctx)?;
        let table = prepared.table;
        let tile_mode = self.spec().tile_mode();
        let searched = matches!(table.layout(), TableLayout::Search { .. });

        let mut stages = vec![Stage::SeedShader, Stage::Matrix(prepared.matrix)];

        let (_, mask) = lower_tile(tile_mode, &mut StageTiles { stages: &mut stages }, ());
        if !searched && matches!(tile_mode, TileMode::Clamp | TileMode::Decal) {
            stages.push(Stage::ClampX1);
        }

        stages.push(match table.layout() {
            TableLayout::TwoStop => Stage::EvenlySpaced2StopGradient(Arc::clone(&table)),
            TableLayout::Even { .. } => Stage::EvenlySpacedGradient(Arc::clone(&table)),
            TableLayout::Search { .. } => Stage::Gradient {
                table: Arc::clone(&table),
                search: rec.ctx.flags.search,
            },
        });

        if mask.is_some() {
            stages.push(Stage::CheckDecalMask);
        }

        stages.extend(prepared.post.into_iter().map(|step| match step {
            PostStep::Unpremul => Stage::Unpremul,
            PostStep::Xform(xform) => Stage::ColorXform(xform),
            PostStep::Premul => Stage::Premul,
        }));

        rec.pipeline.extend(stages);
        Ok(())
    }
}
