// THEORY:
// The `SmartBlock` module holds the output vocabulary of the segmentation layer.
// A `Block` is an axis-aligned rectangle hypothesized to cover one flat-colored UI
// element of a screenshot (a toolbar, a tab strip, the address bar).
//
// Key architectural principles:
// 1.  **Raster Coordinates**: A `Point` addresses a pixel by (row, column). Rows grow
//     downward and columns grow rightward, exactly like the underlying pixel buffer.
// 2.  **Inclusive Bounds**: A `Block` stores `i_min..=i_max` rows and `j_min..=j_max`
//     columns. Both bounds belong to the block, which is what the segmenter's
//     "already covered" test and the locator's slicing rely on.
// 3.  **Approximation, Not Truth**: A `Block` is a bounding box over the points the
//     extractor visited. It may over-cover non-rectangular regions and under-cover
//     very large ones. Downstream code treats it as a hint, never as an exact mask.
// 4.  **Stateless Data Container**: Blocks live for one segmentation pass and carry
//     no history.

use serde::Serialize;

/// A pixel coordinate: `row` grows downward, `col` grows rightward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// An axis-aligned rectangle with inclusive bounds.
/// Invariant: `i_min <= i_max` and `j_min <= j_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Block {
    pub i_min: usize,
    pub i_max: usize,
    pub j_min: usize,
    pub j_max: usize,
}

impl Block {
    pub fn new(i_min: usize, i_max: usize, j_min: usize, j_max: usize) -> Self {
        Self {
            i_min,
            i_max,
            j_min,
            j_max,
        }
    }

    /// A single-pixel block at `point`.
    pub fn at(point: Point) -> Self {
        Self {
            i_min: point.row,
            i_max: point.row,
            j_min: point.col,
            j_max: point.col,
        }
    }

    /// The bounding box of a set of points, or `None` when the set is empty.
    pub fn bounding<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let mut block = Self::at(*iter.next()?);
        for point in iter {
            block.include(*point);
        }
        Some(block)
    }

    /// Grows the block just enough to contain `point`.
    pub fn include(&mut self, point: Point) {
        self.i_min = self.i_min.min(point.row);
        self.i_max = self.i_max.max(point.row);
        self.j_min = self.j_min.min(point.col);
        self.j_max = self.j_max.max(point.col);
    }

    /// Corners clockwise from the lower-left:
    /// `[(i_min, j_min), (i_max, j_min), (i_max, j_max), (i_min, j_max)]`.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.i_min, self.j_min),
            Point::new(self.i_max, self.j_min),
            Point::new(self.i_max, self.j_max),
            Point::new(self.i_min, self.j_max),
        ]
    }

    /// Inclusive containment on all four sides.
    pub fn contains(&self, point: Point) -> bool {
        self.i_min <= point.row
            && point.row <= self.i_max
            && self.j_min <= point.col
            && point.col <= self.j_max
    }

    /// Row span (`i_max − i_min`).
    pub fn height(&self) -> usize {
        self.i_max - self.i_min
    }

    /// Column span (`j_max − j_min`).
    pub fn width(&self) -> usize {
        self.j_max - self.j_min
    }

    pub fn overlaps(&self, other: &Block) -> bool {
        self.i_min <= other.i_max
            && other.i_min <= self.i_max
            && self.j_min <= other.j_max
            && other.j_min <= self.j_max
    }
}
