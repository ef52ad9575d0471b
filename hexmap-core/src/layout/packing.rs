// Hex packing for one cluster.
//
// Explicit entities go straight to their cell; a taken cell is flagged as a
// collision but the entity is still placed. The rest are packed row by row
// into a fixed-width staggered block anchored at the cluster's grid position,
// skipping any cell the tracker already holds.
//
// Output order: explicit entities in input order, then auto-placed ones in
// placement order.

use log::warn;
use serde::Serialize;

use crate::model::{ClusterRef, Entity, GridCoordinate};
use super::hex_grid::HexGrid;
use super::occupancy::{Claim, OccupancyTracker, Occupant};
use super::PixelCoordinate;

/// How a placed entity got its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Explicit,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedEntity {
    pub entity: Entity,
    pub cluster: ClusterRef,
    pub grid: GridCoordinate,
    pub pixel: PixelCoordinate,
    pub placement: Placement,
    pub has_collision: bool,
    /// First occupant of the cell, set when `has_collision`.
    pub collides_with: Option<Occupant>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackOutcome {
    pub placed: Vec<PlacedEntity>,
    /// Ids of auto-placed entities that did not fit in the search area.
    pub unplaced: Vec<String>,
}

pub struct HexPacker<'a> {
    grid: &'a HexGrid,
    /// Hexagons per row of the auto-placement block.
    cluster_width: usize,
}

impl<'a> HexPacker<'a> {
    pub fn new(grid: &'a HexGrid, cluster_width: usize) -> Self {
        Self {
            grid,
            cluster_width: cluster_width.max(1),
        }
    }

    pub fn pack(
        &self,
        owner: &ClusterRef,
        entities: &[Entity],
        anchor: GridCoordinate,
        tracker: &mut OccupancyTracker,
    ) -> PackOutcome {
        let (explicit, implicit): (Vec<&Entity>, Vec<&Entity>) =
            entities.iter().partition(|e| e.grid_position.is_some());

        let mut placed = Vec::with_capacity(entities.len());

        for entity in explicit {
            let Some(cell) = entity.grid_position else { continue };
            placed.push(self.place_explicit(owner, entity, cell, tracker));
        }

        let mut unplaced = Vec::new();
        if !implicit.is_empty() {
            let before = placed.len();
            self.place_implicit(owner, &implicit, anchor, tracker, &mut placed);
            let fitted = placed.len() - before;
            if fitted < implicit.len() {
                warn!(
                    "Cluster \"{}\": search area exhausted, {} of {} applications not placed",
                    owner.name,
                    implicit.len() - fitted,
                    implicit.len()
                );
                unplaced = implicit[fitted..].iter().map(|e| e.id.clone()).collect();
            }
        }

        PackOutcome { placed, unplaced }
    }

    fn place_explicit(
        &self,
        owner: &ClusterRef,
        entity: &Entity,
        cell: GridCoordinate,
        tracker: &mut OccupancyTracker,
    ) -> PlacedEntity {
        let collides_with = match tracker.occupy(cell, occupant_for(owner, entity)) {
            Claim::Claimed => None,
            Claim::Occupied(prior) => {
                warn!(
                    "Collision detected: App \"{}\" at position {} collides with \"{}\" from cluster \"{}\"",
                    entity.name, cell, prior.name, prior.cluster_name
                );
                Some(prior)
            }
        };

        PlacedEntity {
            entity: entity.clone(),
            cluster: owner.clone(),
            grid: cell,
            pixel: self.grid.coord_to_pixel(cell),
            placement: Placement::Explicit,
            has_collision: collides_with.is_some(),
            collides_with,
        }
    }

    /// Walks up to twice the rows strictly needed so occupied cells can be skipped.
    fn place_implicit(
        &self,
        owner: &ClusterRef,
        implicit: &[&Entity],
        anchor: GridCoordinate,
        tracker: &mut OccupancyTracker,
        placed: &mut Vec<PlacedEntity>,
    ) {
        let cols = self.cluster_width;
        let rows = implicit.len().div_ceil(cols);
        let base = self.grid.coord_to_pixel(anchor);
        let h_spacing = self.grid.horizontal_spacing();
        let v_spacing = self.grid.vertical_spacing();

        let mut pending = implicit.iter();
        let mut next = pending.next();

        'rows: for row in 0..rows * 2 {
            let offset_x = if row % 2 == 1 { h_spacing / 2.0 } else { 0.0 };
            for col in 0..cols {
                let Some(entity) = next else { break 'rows };

                let x = base.x + col as f64 * h_spacing + offset_x;
                let y = base.y + row as f64 * v_spacing;
                let cell = self.grid.pixel_to_grid(x, y);

                if tracker.occupy(cell, occupant_for(owner, entity)) != Claim::Claimed {
                    continue;
                }

                placed.push(PlacedEntity {
                    entity: (*entity).clone(),
                    cluster: owner.clone(),
                    grid: cell,
                    pixel: self.grid.coord_to_pixel(cell),
                    placement: Placement::Auto,
                    has_collision: false,
                    collides_with: None,
                });
                next = pending.next();
            }
        }
    }
}

fn occupant_for(owner: &ClusterRef, entity: &Entity) -> Occupant {
    Occupant {
        name: entity.name.clone(),
        cluster_id: owner.id.clone(),
        cluster_name: owner.name.clone(),
    }
}
