// THEORY:
// The `BlockExtractor` grows a single seed pixel into a rectangle that is assumed to
// cover one flat-colored UI element. It is a boundary-chasing heuristic, deliberately
// cheaper than a flood fill.
//
// Algorithm:
// 1.  **Target Capture**: The seed's color becomes the region color.
// 2.  **Boundary Chasing**: For a fixed number of rounds (3 by default), every point
//     discovered in the previous round is projected with the `RayProjector`, and the
//     four ray end points join the set of "assumed interior" points. Because UI chrome
//     is rectangular, a handful of projections from sparse interior points is enough
//     to reach the true extent of the region.
// 3.  **Bounding Box**: The block is the axis-aligned bounding box of every point ever
//     discovered.
//
// Projection is pure, so re-projecting a point seen in an earlier round can only
// rediscover points already in the set. Only the newly discovered frontier is
// projected each round; the resulting block is identical to projecting the whole set.
//
// Accepted heuristic error: non-rectangular regions are over-covered, and regions
// whose extent needs more than the configured number of rounds are under-covered.

use crate::core_modules::pixel::pixel::Distance;
use crate::core_modules::raster::raster::Raster;
use crate::core_modules::ray_projector::ray_projector;
use crate::core_modules::smart_block::{Block, Point};

/// Rounds of boundary chasing used when none is configured.
pub const DEFAULT_EXTRACTION_ROUNDS: usize = 3;

pub mod block_extractor {
    use super::*;
    use std::collections::HashSet;

    /// Grows `seed` into a block. The seed must lie inside the raster.
    /// The returned block always contains the seed.
    pub fn get_block(raster: &Raster, seed: Point, rounds: usize, tolerance: Distance) -> Block {
        let target = raster.color_at(seed);

        let mut seen: HashSet<Point> = HashSet::new();
        seen.insert(seed);
        let mut block = Block::at(seed);
        let mut frontier = vec![seed];

        for _ in 0..rounds {
            if frontier.is_empty() {
                break;
            }
            let mut next = Vec::new();
            for point in frontier.drain(..) {
                let projection = ray_projector::project(raster, point, &target, tolerance);
                for end in projection.points() {
                    if seen.insert(end) {
                        block.include(end);
                        next.push(end);
                    }
                }
            }
            frontier = next;
        }

        block
    }
}
