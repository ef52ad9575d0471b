// Occupancy tracking for grid cells.
//
// One tracker lives for one layout pass and is shared by every cluster in it,
// so collisions are detected across clusters. First writer wins: a cell keeps
// the occupant that claimed it first.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::GridCoordinate;

/// Who holds a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupant {
    pub name: String,
    pub cluster_id: String,
    pub cluster_name: String,
}

/// Result of trying to claim a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    Claimed,
    /// The cell was already taken; carries the existing occupant.
    Occupied(Occupant),
}

#[derive(Debug, Clone, Default)]
pub struct OccupancyTracker {
    /// Keyed by the canonical `"q,r"` string.
    cells: HashMap<String, (GridCoordinate, Occupant)>,
}

impl OccupancyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, coord: GridCoordinate) -> bool {
        self.cells.contains_key(&coord.key())
    }

    pub fn occupant(&self, coord: GridCoordinate) -> Option<&Occupant> {
        self.cells.get(&coord.key()).map(|(_, o)| o)
    }

    /// Record `occupant` if the cell is free. Never overwrites.
    pub fn occupy(&mut self, coord: GridCoordinate, occupant: Occupant) -> Claim {
        match self.cells.get(&coord.key()) {
            Some((_, existing)) => Claim::Occupied(existing.clone()),
            None => {
                self.cells.insert(coord.key(), (coord, occupant));
                Claim::Claimed
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridCoordinate, &Occupant)> {
        self.cells.values().map(|(c, o)| (*c, o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupant(name: &str) -> Occupant {
        Occupant {
            name: name.to_string(),
            cluster_id: "c1".to_string(),
            cluster_name: "Cluster 1".to_string(),
        }
    }

    #[test]
    fn test_occupy_free_cell() {
        let mut tracker = OccupancyTracker::new();
        let cell = GridCoordinate::new(5, 5);
        assert!(!tracker.is_occupied(cell));
        assert_eq!(tracker.occupy(cell, occupant("A")), Claim::Claimed);
        assert!(tracker.is_occupied(cell));
        assert_eq!(tracker.occupant(cell).map(|o| o.name.as_str()), Some("A"));
    }

    #[test]
    fn test_first_writer_wins() {
        let mut tracker = OccupancyTracker::new();
        let cell = GridCoordinate::new(5, 5);
        tracker.occupy(cell, occupant("A"));
        assert_eq!(tracker.occupy(cell, occupant("B")), Claim::Occupied(occupant("A")));
        assert_eq!(tracker.occupy(cell, occupant("C")), Claim::Occupied(occupant("A")));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_mirrored_cells_are_distinct() {
        let mut tracker = OccupancyTracker::new();
        tracker.occupy(GridCoordinate::new(1, -2), occupant("A"));
        assert!(!tracker.is_occupied(GridCoordinate::new(-1, 2)));
        assert_eq!(tracker.occupy(GridCoordinate::new(-1, 2), occupant("B")), Claim::Claimed);
        assert_eq!(tracker.iter().count(), 2);
    }
}
