// Hex map layout pass.
//
// Goals:
// - Deterministic: same data, same order => same layout
// - Explicit + auto: applications with a grid position keep it, the rest are
//   packed around their cluster's anchor
// - Collisions are flagged, never prevented
// - Cluster captions avoid hexagons and earlier captions
//
// Submodules:
// - hex_grid: odd-r grid <-> pixel transform, hexagon outlines
// - occupancy: first-writer-wins cell tracker shared by all clusters
// - packing: explicit + staggered auto placement per cluster
// - spatial_grid: O(1) average box overlap queries
// - labels: ranked caption search
// - connections: curve geometry for connection overlays
// - viewport: focus transforms
//
// Output:
// - LayoutResult with placed hexagons per cluster, labels, collision report
//   and diagnostics.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::measure::LabelMetrics;
use crate::model::{InputDiagnostics, MapData};

pub mod connections;
pub mod hex_grid;
pub mod labels;
pub mod occupancy;
pub mod packing;
pub mod spatial_grid;
pub mod viewport;

use connections::{resolve_connections, ConnectionCurve};
use hex_grid::HexGrid;
use labels::{LabelIndex, LabelPlacement, LabelPlacer};
use occupancy::OccupancyTracker;
use packing::{HexPacker, PlacedEntity};
use viewport::{cluster_focus, ZoomTransform};

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct PixelCoordinate {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RectF {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectF {
    pub fn left(&self) -> f64 { self.x }
    pub fn right(&self) -> f64 { self.x + self.w }
    pub fn top(&self) -> f64 { self.y }
    pub fn bottom(&self) -> f64 { self.y + self.h }

    pub fn center(&self) -> PixelCoordinate {
        PixelCoordinate { x: self.x + self.w / 2.0, y: self.y + self.h / 2.0 }
    }

    /// Inclusive: boxes that only touch overlap.
    pub fn overlaps(&self, other: &RectF) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    pub fn union(&self, other: &RectF) -> RectF {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        RectF { x: x0, y: y0, w: x1 - x0, h: y1 - y0 }
    }

    /// Grow by `pad` on every side.
    pub fn expand(&self, pad: f64) -> RectF {
        RectF { x: self.x - pad, y: self.y - pad, w: self.w + 2.0 * pad, h: self.h + 2.0 * pad }
    }

    /// Smallest box containing every point; None for no points.
    pub fn enclosing(points: impl IntoIterator<Item = PixelCoordinate>) -> Option<RectF> {
        points
            .into_iter()
            .map(|p| RectF { x: p.x, y: p.y, w: 0.0, h: 0.0 })
            .reduce(|acc, r| acc.union(&r))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Hexagon circumradius in pixels.
    pub hex_size: f64,
    /// Viewport size; grid (0,0) maps to its center.
    pub width: f64,
    pub height: f64,
    /// Hexagons per row when auto-packing a cluster.
    pub cluster_width: usize,
    pub label_font_size: f64,
    /// Padding around a cluster's hexagons before label candidates, in hex sizes.
    pub label_padding: f64,
    /// Scale used when focusing a cluster.
    pub focus_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hex_size: 20.0,
            width: 1000.0,
            height: 800.0,
            cluster_width: 5,
            label_font_size: 14.0,
            label_padding: 1.5,
            focus_scale: 2.2,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        fn positive(field: &'static str, v: f64) -> Result<(), LayoutError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(LayoutError::InvalidConfig { field, reason: "must be a positive number" })
            }
        }
        fn finite(field: &'static str, v: f64) -> Result<(), LayoutError> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(LayoutError::InvalidConfig { field, reason: "must be a finite number" })
            }
        }

        positive("hexSize", self.hex_size)?;
        positive("labelFontSize", self.label_font_size)?;
        positive("focusScale", self.focus_scale)?;
        finite("width", self.width)?;
        finite("height", self.height)?;
        finite("labelPadding", self.label_padding)?;
        if self.cluster_width == 0 {
            return Err(LayoutError::InvalidConfig { field: "clusterWidth", reason: "must be at least 1" });
        }
        Ok(())
    }

    /// Bucket size of the label index: four hexes, but never below one caption line.
    pub fn label_cell_size(&self) -> f64 {
        (self.hex_size * 4.0).max(self.label_metrics().line_height())
    }

    pub fn label_metrics(&self) -> LabelMetrics {
        LabelMetrics::with_font_size(self.label_font_size)
    }

    pub fn hex_grid(&self) -> HexGrid {
        HexGrid::new(self.hex_size, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterLayout {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    /// Explicit placements first, then auto placements.
    pub placed: Vec<PlacedEntity>,
    pub label: LabelPlacement,
    /// None for a cluster with nothing placed.
    pub focus: Option<ZoomTransform>,
}

/// One line of the collision banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollisionRecord {
    pub entity_name: String,
    pub cluster_name: String,
    /// `"q,r"`
    pub position: String,
    pub collides_with_entity: String,
    pub collides_with_cluster: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnplacedEntity {
    pub entity_id: String,
    pub cluster_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutDiagnostics {
    pub skipped_entities: usize,
    pub skipped_clusters: usize,
    pub demoted_positions: usize,
    /// Auto-placed applications that did not fit their cluster's search area.
    pub unplaced: Vec<UnplacedEntity>,
}

impl From<&InputDiagnostics> for LayoutDiagnostics {
    fn from(d: &InputDiagnostics) -> Self {
        Self {
            skipped_entities: d.skipped_entities,
            skipped_clusters: d.skipped_clusters,
            demoted_positions: d.demoted_positions,
            unplaced: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    pub clusters: Vec<ClusterLayout>,
    pub collisions: Vec<CollisionRecord>,
    pub connections: Vec<ConnectionCurve>,
    pub diagnostics: LayoutDiagnostics,
}

impl LayoutResult {
    pub fn placed(&self) -> impl Iterator<Item = &PlacedEntity> {
        self.clusters.iter().flat_map(|c| c.placed.iter())
    }
}

/// Run one full layout pass. The occupancy tracker and label index live only
/// for the duration of this call.
pub fn layout_map(data: &MapData, cfg: &LayoutConfig) -> LayoutResult {
    let grid = cfg.hex_grid();
    let packer = HexPacker::new(&grid, cfg.cluster_width);
    let mut tracker = OccupancyTracker::new();
    let mut diagnostics = LayoutDiagnostics::from(&data.diagnostics);

    // First pass: hexagons for every cluster, sharing one tracker.
    let mut packed: Vec<Vec<PlacedEntity>> = Vec::with_capacity(data.clusters.len());
    for cluster in &data.clusters {
        debug!("Processing cluster {} with {} apps", cluster.id, cluster.entities.len());
        let outcome = packer.pack(&cluster.cluster_ref(), &cluster.entities, cluster.anchor, &mut tracker);
        diagnostics.unplaced.extend(outcome.unplaced.into_iter().map(|entity_id| UnplacedEntity {
            entity_id,
            cluster_id: cluster.id.clone(),
        }));
        packed.push(outcome.placed);
    }

    // Second pass: captions, in cluster order, against every hexagon.
    let mut index = LabelIndex::new(cfg.label_cell_size());
    for p in packed.iter().flatten() {
        index.add_hexagon(grid.hexagon_bounds(p.pixel));
    }
    let placer = LabelPlacer::new(&grid, cfg.label_metrics(), cfg.label_padding);

    let mut clusters = Vec::with_capacity(data.clusters.len());
    for (cluster, placed) in data.clusters.iter().zip(packed) {
        let positions: Vec<PixelCoordinate> = placed.iter().map(|p| p.pixel).collect();
        let anchor = grid.coord_to_pixel(cluster.anchor);
        let label = placer.place_label(&cluster.id, &positions, anchor, &cluster.name, &mut index);

        let focus = placed
            .iter()
            .map(|p| grid.hexagon_bounds(p.pixel))
            .reduce(|acc, r| acc.union(&r))
            .map(|bounds| cluster_focus(&bounds, cfg.width, cfg.height, cfg.focus_scale));

        clusters.push(ClusterLayout {
            id: cluster.id.clone(),
            name: cluster.name.clone(),
            color: cluster.color.clone(),
            placed,
            label,
            focus,
        });
    }

    let all_placed: Vec<PlacedEntity> = clusters.iter().flat_map(|c| c.placed.iter().cloned()).collect();
    let connections = resolve_connections(&all_placed);
    let collisions = collision_report(&all_placed);

    if !collisions.is_empty() {
        warn!("{} position collision(s) detected", collisions.len());
    }
    info!(
        "Positioned {} out of {} applications in {} clusters",
        all_placed.len(),
        data.entity_count(),
        clusters.len()
    );

    LayoutResult { clusters, collisions, connections, diagnostics }
}

fn collision_report(placed: &[PlacedEntity]) -> Vec<CollisionRecord> {
    placed
        .iter()
        .filter_map(|p| {
            let prior = p.collides_with.as_ref()?;
            Some(CollisionRecord {
                entity_name: p.entity.name.clone(),
                cluster_name: p.cluster.name.clone(),
                position: p.grid.key(),
                collides_with_entity: prior.name.clone(),
                collides_with_cluster: prior.cluster_name.clone(),
            })
        })
        .collect()
}
