// Spatial hash grid for overlap queries against placed boxes.
//
// Boxes are bucketed by the cells they touch; a query only tests the boxes
// sharing a cell with it. Touching edges count as overlap, so bucket ranges
// are inclusive on both ends.

use std::collections::{HashMap, HashSet};

use super::RectF;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    rects: Vec<RectF>,
    /// Cell coordinates -> indices into `rects`.
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    /// Cell size should be roughly the size of the largest expected box.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 { cell_size } else { 1.0 };
        Self {
            cell_size,
            rects: Vec::new(),
            cells: HashMap::new(),
        }
    }

    fn cell_range(&self, rect: &RectF) -> Vec<(i64, i64)> {
        let min_x = (rect.left() / self.cell_size).floor() as i64;
        let max_x = (rect.right() / self.cell_size).floor() as i64;
        let min_y = (rect.top() / self.cell_size).floor() as i64;
        let max_y = (rect.bottom() / self.cell_size).floor() as i64;

        let mut cells = Vec::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                cells.push((cx, cy));
            }
        }
        cells
    }

    pub fn insert(&mut self, rect: RectF) {
        let index = self.rects.len();
        self.rects.push(rect);
        for cell in self.cell_range(&rect) {
            self.cells.entry(cell).or_default().push(index);
        }
    }

    /// Boxes sharing a cell with `rect`. May include boxes that do not overlap it.
    pub fn query(&self, rect: &RectF) -> Vec<RectF> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for cell in self.cell_range(rect) {
            if let Some(indices) = self.cells.get(&cell) {
                for &i in indices {
                    if seen.insert(i) {
                        result.push(self.rects[i]);
                    }
                }
            }
        }
        result
    }

    pub fn overlaps_any(&self, rect: &RectF) -> bool {
        self.query(rect).iter().any(|candidate| rect.overlaps(candidate))
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}
