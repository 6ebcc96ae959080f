//! Spatial indexing for efficient track lookups.
//!
//! Track segments never move, so a uniform grid built once at load time gives
//! constant-time candidate lookups for both shape and point queries.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use super::error::{Error, Result};
use super::mask::PixelRect;

/// Integer grid cell coordinate.
pub type Cell = (i32, i32);

/// Uniform grid mapping cells to the ids of segments whose bounding
/// rectangle overlaps them.
///
/// Queries never miss a segment whose bounding rectangle overlaps the query,
/// but may return segments that only share a cell with it. Callers filter
/// those with an exact test.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    /// Side length of a square cell in pixels.
    cell_size: i32,
    /// Segment ids per occupied cell.
    cells: HashMap<Cell, Vec<usize>>,
}

impl SpatialIndex {
    /// Creates an empty grid.
    ///
    /// # Arguments
    ///
    /// * `cell_size` - Side length of a cell in pixels, must be positive
    pub fn new(cell_size: i32) -> Result<Self> {
        if cell_size <= 0 {
            return Err(Error::InvalidParams("grid_size must be positive".into()));
        }

        Ok(Self {
            cell_size,
            cells: HashMap::new(),
        })
    }

    /// Side length of a cell in pixels.
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Number of cells holding at least one segment.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell containing the world pixel `(x, y)`.
    pub fn cell_of(&self, x: i32, y: i32) -> Cell {
        (x.div_euclid(self.cell_size), y.div_euclid(self.cell_size))
    }

    /// Registers `segment_id` in every cell its bounding rectangle covers.
    ///
    /// Each segment is expected to be inserted exactly once.
    pub fn insert(&mut self, segment_id: usize, rect: &PixelRect) {
        let (xs, ys) = self.cell_range(rect);
        for cx in xs {
            for cy in ys.clone() {
                self.cells.entry((cx, cy)).or_default().push(segment_id);
            }
        }
    }

    /// Returns the ids of all segments sharing a cell with `rect`.
    ///
    /// Each id appears once and the result is sorted.
    pub fn query_region(&self, rect: &PixelRect) -> Vec<usize> {
        let (xs, ys) = self.cell_range(rect);
        let mut ids = Vec::new();
        for cx in xs {
            for cy in ys.clone() {
                if let Some(cell) = self.cells.get(&(cx, cy)) {
                    ids.extend_from_slice(cell);
                }
            }
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Returns the ids of segments in the cell containing `(x, y)`.
    pub fn query_point(&self, x: i32, y: i32) -> &[usize] {
        self.cells
            .get(&self.cell_of(x, y))
            .map_or(&[], Vec::as_slice)
    }

    /// Inclusive cell ranges covered by `rect`.
    fn cell_range(&self, rect: &PixelRect) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        let (left, top) = self.cell_of(rect.left, rect.top);
        let (right, bottom) = self.cell_of(rect.right(), rect.bottom());
        (left..=right, top..=bottom)
    }
}
