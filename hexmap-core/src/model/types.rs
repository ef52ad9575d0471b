use std::fmt;

use serde::Serialize;

/// A cell of the staggered hex grid, addressed as (q, r).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GridCoordinate {
    pub q: i32,
    pub r: i32,
}

impl GridCoordinate {
    pub const ORIGIN: GridCoordinate = GridCoordinate { q: 0, r: 0 };

    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Canonical `"q,r"` key used by the occupancy tracker and collision report.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// True when the row is shifted right by half a hex (odd rows, including negative ones).
    pub fn is_odd_row(&self) -> bool {
        self.r & 1 == 1
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

/// An outgoing link from one application to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub to: String,
    /// "data-flow", "api", "integration", ...
    pub kind: Option<String>,
    pub strength: Option<String>,
}

/// An application, the unit that gets a hexagon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    /// Explicit target cell. None => auto placement.
    pub grid_position: Option<GridCoordinate>,
    pub status: Option<f64>,
    pub description: Option<String>,
    pub connections: Vec<Connection>,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grid_position: None,
            status: None,
            description: None,
            connections: Vec::new(),
        }
    }

    pub fn at(mut self, q: i32, r: i32) -> Self {
        self.grid_position = Some(GridCoordinate::new(q, r));
        self
    }
}

/// Identity of the cluster that owns a placed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    /// Origin of the auto-placement grid.
    pub anchor: GridCoordinate,
    pub entities: Vec<Entity>,
}

impl Cluster {
    pub fn new(id: impl Into<String>, name: impl Into<String>, anchor: GridCoordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            anchor,
            entities: Vec::new(),
        }
    }

    pub fn with_entities(mut self, entities: Vec<Entity>) -> Self {
        self.entities = entities;
        self
    }

    pub fn cluster_ref(&self) -> ClusterRef {
        ClusterRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Counters reported when the input contained data the engine could not use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputDiagnostics {
    pub skipped_entities: usize,
    pub skipped_clusters: usize,
    pub demoted_positions: usize,
}

/// Normalized input to a layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapData {
    pub clusters: Vec<Cluster>,
    pub diagnostics: InputDiagnostics,
}

impl MapData {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self {
            clusters,
            diagnostics: InputDiagnostics::default(),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.clusters.iter().map(|c| c.entities.len()).sum()
    }
}
