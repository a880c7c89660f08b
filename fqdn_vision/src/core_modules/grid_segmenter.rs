// THEORY:
// The `GridSegmenter` is the orchestrator of the segmentation layer. It partitions a
// screenshot into approximately monochrome rectangles without any prior knowledge of
// the UI layout, theme or scale.
//
// Key architectural principles:
// 1.  **Coarse Sampling Grid**: Seeds are laid every `row_step` rows and every
//     `col_step` columns (10 and 100 by default). The grid is deliberately anisotropic:
//     browser chrome is wide and short, so a sparse column step still lands at least one
//     seed inside every toolbar, while a dense row step catches thin strips.
// 2.  **Coverage Skip**: Seeds are visited in row-major order. A seed that falls inside
//     (inclusive bounds) any block already produced is skipped. Blocks are approximate,
//     so this can over- or under-skip; candidate order and count depend on it.
// 3.  **No Merging**: Apart from the coverage skip, blocks are neither merged nor
//     deduplicated. The same UI element may surface more than once.
// 4.  **Stateless Utility**: A segmenter holds only its configuration. Every call to
//     `segment` is independent, so separate images can be segmented on separate
//     threads without synchronization.

use crate::core_modules::block_extractor::{DEFAULT_EXTRACTION_ROUNDS, block_extractor};
use crate::core_modules::pixel::pixel::{DEFAULT_TOLERANCE, Distance};
use crate::core_modules::raster::raster::Raster;
use crate::core_modules::smart_block::{Block, Point};
use crate::error::{VisionError, VisionResult};
use tracing::{debug, trace};

pub const DEFAULT_ROW_STEP: usize = 10;
pub const DEFAULT_COL_STEP: usize = 100;

/// Lays a sampling grid over a raster and grows a block at every uncovered grid point.
#[derive(Debug, Clone)]
pub struct GridSegmenter {
    /// Vertical distance between seed rows, in pixels.
    row_step: usize,
    /// Horizontal distance between seed columns, in pixels.
    col_step: usize,
    /// Boundary-chasing rounds per extracted block.
    extraction_rounds: usize,
    /// Tolerance for approximate color equality.
    tolerance: Distance,
}

impl Default for GridSegmenter {
    fn default() -> Self {
        Self {
            row_step: DEFAULT_ROW_STEP,
            col_step: DEFAULT_COL_STEP,
            extraction_rounds: DEFAULT_EXTRACTION_ROUNDS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl GridSegmenter {
    pub fn new(
        row_step: usize,
        col_step: usize,
        extraction_rounds: usize,
        tolerance: Distance,
    ) -> VisionResult<Self> {
        if row_step == 0 || col_step == 0 {
            return Err(VisionError::configuration(format!(
                "grid steps must be positive (row_step = {row_step}, col_step = {col_step})"
            )));
        }
        if extraction_rounds == 0 {
            return Err(VisionError::configuration("extraction_rounds must be at least 1"));
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(VisionError::configuration(format!(
                "color tolerance must be a non-negative number, got {tolerance}"
            )));
        }
        Ok(Self {
            row_step,
            col_step,
            extraction_rounds,
            tolerance,
        })
    }

    /// Produces the candidate blocks in seed scan order (row-major).
    /// A degenerate (empty) raster yields no blocks.
    pub fn segment(&self, raster: &Raster) -> Vec<Block> {
        let mut blocks: Vec<Block> = Vec::new();
        if raster.is_empty() {
            debug!("segmentation skipped: empty raster");
            return blocks;
        }

        let mut seeds = 0usize;
        for row in (0..raster.height()).step_by(self.row_step) {
            for col in (0..raster.width()).step_by(self.col_step) {
                seeds += 1;
                let seed = Point::new(row, col);
                if blocks.iter().any(|block| block.contains(seed)) {
                    continue;
                }
                let block = block_extractor::get_block(
                    raster,
                    seed,
                    self.extraction_rounds,
                    self.tolerance,
                );
                trace!(?seed, ?block, "extracted block");
                blocks.push(block);
            }
        }

        debug!(
            height = raster.height(),
            width = raster.width(),
            seeds,
            blocks = blocks.len(),
            "segmentation complete"
        );
        blocks
    }
}
