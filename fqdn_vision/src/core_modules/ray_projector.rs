// THEORY:
// The `RayProjector` is the lowest layer of the segmentation engine. From an origin
// pixel assumed to sit inside a flat-colored region, it casts four 1-D rays along the
// cardinal axes and reports where each ray last saw the region's color.
//
// A ray advances one pixel at a time while the next pixel matches the target color
// within tolerance. It stops one step *before* the first mismatch, or on the edge
// pixel when it runs off the raster. A ray that mismatches immediately has zero
// length and its end point is the origin.
//
// The projector is a pure function of (raster, origin, target color, tolerance).

pub mod ray_projector {
    use crate::core_modules::pixel::pixel::{Color, Distance};
    use crate::core_modules::raster::raster::Raster;
    use crate::core_modules::smart_block::Point;

    /// The four end points of a projection, one per cardinal direction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Projection {
        pub left: Point,
        pub right: Point,
        pub up: Point,
        pub down: Point,
    }

    impl Projection {
        pub fn points(&self) -> [Point; 4] {
            [self.left, self.right, self.up, self.down]
        }
    }

    /// Casts the four rays from `origin`. The origin must lie inside the raster.
    pub fn project(
        raster: &Raster,
        origin: Point,
        target: &Color,
        tolerance: Distance,
    ) -> Projection {
        let Point { row, col } = origin;
        let matches =
            |r: usize, c: usize| raster.color_at(Point::new(r, c)).matches(target, tolerance);

        let mut j_min = col;
        while j_min > 0 && matches(row, j_min - 1) {
            j_min -= 1;
        }

        let mut j_max = col;
        while j_max + 1 < raster.width() && matches(row, j_max + 1) {
            j_max += 1;
        }

        let mut i_min = row;
        while i_min > 0 && matches(i_min - 1, col) {
            i_min -= 1;
        }

        let mut i_max = row;
        while i_max + 1 < raster.height() && matches(i_max + 1, col) {
            i_max += 1;
        }

        Projection {
            left: Point::new(row, j_min),
            right: Point::new(row, j_max),
            up: Point::new(i_min, col),
            down: Point::new(i_max, col),
        }
    }
}
