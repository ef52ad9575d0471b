// Cluster caption placement.
//
// Tries eight ranked spots around the cluster's padded bounding box, top
// first, and takes the first one whose box is clear of every hexagon and of
// every label placed before it. When nothing is clear the top-center spot is
// used anyway. Labels depend on the order they are placed in: each one is
// recorded in the index before the next cluster is tried.

use serde::Serialize;

use crate::measure::LabelMetrics;
use super::hex_grid::HexGrid;
use super::spatial_grid::SpatialGrid;
use super::{PixelCoordinate, RectF};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelAnchor {
    TopCenter,
    TopLeft,
    TopRight,
    LeftMiddle,
    RightMiddle,
    BottomCenter,
    BottomLeft,
    BottomRight,
}

impl LabelAnchor {
    /// Candidates in the order they are tried.
    pub const RANKED: [LabelAnchor; 8] = [
        LabelAnchor::TopCenter,
        LabelAnchor::TopLeft,
        LabelAnchor::TopRight,
        LabelAnchor::LeftMiddle,
        LabelAnchor::RightMiddle,
        LabelAnchor::BottomCenter,
        LabelAnchor::BottomLeft,
        LabelAnchor::BottomRight,
    ];

    /// 1 is best.
    pub fn priority(self) -> u8 {
        match self {
            LabelAnchor::TopCenter => 1,
            LabelAnchor::TopLeft | LabelAnchor::TopRight => 2,
            LabelAnchor::LeftMiddle | LabelAnchor::RightMiddle => 3,
            LabelAnchor::BottomCenter => 4,
            LabelAnchor::BottomLeft | LabelAnchor::BottomRight => 5,
        }
    }

    /// Label box of size `w`×`h` sitting just outside `padded` at this spot.
    pub fn label_box(self, padded: &RectF, w: f64, h: f64) -> RectF {
        let center = padded.center();
        let above = padded.top() - h;
        let below = padded.bottom();
        let (x, y) = match self {
            LabelAnchor::TopCenter => (center.x - w / 2.0, above),
            LabelAnchor::TopLeft => (padded.left(), above),
            LabelAnchor::TopRight => (padded.right() - w, above),
            LabelAnchor::LeftMiddle => (padded.left() - w, center.y - h / 2.0),
            LabelAnchor::RightMiddle => (padded.right(), center.y - h / 2.0),
            LabelAnchor::BottomCenter => (center.x - w / 2.0, below),
            LabelAnchor::BottomLeft => (padded.left(), below),
            LabelAnchor::BottomRight => (padded.right() - w, below),
        };
        RectF { x, y, w, h }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub cluster_id: String,
    pub text: String,
    /// Center of `bounds`.
    pub position: PixelCoordinate,
    pub bounds: RectF,
    pub anchor: LabelAnchor,
    /// True when every candidate collided and top-center was forced.
    pub fallback: bool,
}

/// Everything a new label must stay clear of: all hexagons of the pass and
/// the labels placed so far, in placement order.
#[derive(Debug, Clone)]
pub struct LabelIndex {
    hexagons: SpatialGrid,
    labels: SpatialGrid,
    placed: Vec<LabelPlacement>,
}

impl LabelIndex {
    pub fn new(cell_size: f64) -> Self {
        Self {
            hexagons: SpatialGrid::new(cell_size),
            labels: SpatialGrid::new(cell_size),
            placed: Vec::new(),
        }
    }

    pub fn add_hexagon(&mut self, bounds: RectF) {
        self.hexagons.insert(bounds);
    }

    pub fn push(&mut self, label: LabelPlacement) {
        self.labels.insert(label.bounds);
        self.placed.push(label);
    }

    pub fn is_clear(&self, rect: &RectF) -> bool {
        !self.hexagons.overlaps_any(rect) && !self.labels.overlaps_any(rect)
    }

    pub fn labels(&self) -> &[LabelPlacement] {
        &self.placed
    }
}

pub struct LabelPlacer<'a> {
    grid: &'a HexGrid,
    metrics: LabelMetrics,
    /// Bounding-box padding in multiples of the hex size.
    padding: f64,
}

impl<'a> LabelPlacer<'a> {
    pub fn new(grid: &'a HexGrid, metrics: LabelMetrics, padding: f64) -> Self {
        Self { grid, metrics, padding }
    }

    /// Place the caption for one cluster and record it in `index`.
    ///
    /// `anchor` stands in for the hexagons when the cluster has none.
    pub fn place_label(
        &self,
        cluster_id: &str,
        hex_positions: &[PixelCoordinate],
        anchor: PixelCoordinate,
        text: &str,
        index: &mut LabelIndex,
    ) -> LabelPlacement {
        let padded = self.padded_bounds(hex_positions, anchor);
        let (w, h) = self.metrics.label_size(text);

        let own_hexagons: Vec<RectF> = hex_positions
            .iter()
            .map(|&p| self.grid.hexagon_bounds(p))
            .collect();

        let chosen = LabelAnchor::RANKED.iter().find_map(|&candidate| {
            let rect = candidate.label_box(&padded, w, h);
            let clear = !own_hexagons.iter().any(|hex| rect.overlaps(hex)) && index.is_clear(&rect);
            clear.then_some((candidate, rect, false))
        });

        let (spot, bounds, fallback) = chosen.unwrap_or_else(|| {
            let candidate = LabelAnchor::TopCenter;
            (candidate, candidate.label_box(&padded, w, h), true)
        });

        let placement = LabelPlacement {
            cluster_id: cluster_id.to_string(),
            text: text.to_string(),
            position: bounds.center(),
            bounds,
            anchor: spot,
            fallback,
        };
        index.push(placement.clone());
        placement
    }

    fn padded_bounds(&self, hex_positions: &[PixelCoordinate], anchor: PixelCoordinate) -> RectF {
        let bounds = RectF::enclosing(hex_positions.iter().copied()).unwrap_or(RectF {
            x: anchor.x,
            y: anchor.y,
            w: 0.0,
            h: 0.0,
        });
        bounds.expand(self.padding * self.grid.hex_size)
    }
}
