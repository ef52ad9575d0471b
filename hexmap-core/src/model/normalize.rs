//
// Normalize step: MapFile (raw JSON records) -> MapData (layout-friendly model)
//
// What this does:
// - Drops clusters and applications without a string id and name, counting them
// - Drops connections without a string target; mistyped metadata (status,
//   color, description, connection type) is read as absent
// - Validates explicit grid positions; anything that is not a pair of
//   integral numbers is demoted to auto placement and counted
// - Preserves input order of clusters and of applications within a cluster
//
// Nothing here fails: the counts travel with MapData into the layout output.

use log::warn;
use serde_json::Value;

use super::input::{ApplicationRecord, ClusterRecord, ConnectionRecord, Lenient, MapFile};
use super::types::{Cluster, Connection, Entity, GridCoordinate, InputDiagnostics, MapData};

pub fn normalize(file: &MapFile) -> MapData {
    let mut diagnostics = InputDiagnostics::default();
    let mut clusters = Vec::with_capacity(file.clusters.len());

    for (index, item) in file.clusters.iter().enumerate() {
        let record = match item {
            Lenient::Valid(record) => record,
            Lenient::Invalid(raw) => {
                warn!("Skipping cluster #{}: expected an object, got {}", index, raw);
                diagnostics.skipped_clusters += 1;
                continue;
            }
        };
        match normalize_cluster(record, &mut diagnostics) {
            Some(cluster) => clusters.push(cluster),
            None => {
                warn!(
                    "Skipping cluster #{} without id or name ({} applications)",
                    index,
                    record.applications.len()
                );
                diagnostics.skipped_clusters += 1;
                diagnostics.skipped_entities += record.applications.len();
            }
        }
    }

    MapData { clusters, diagnostics }
}

fn normalize_cluster(record: &ClusterRecord, diagnostics: &mut InputDiagnostics) -> Option<Cluster> {
    let id = identity(record.id.as_ref())?;
    let name = identity(record.name.as_ref())?;

    let anchor = match record.grid_position.as_ref() {
        None | Some(Value::Null) => GridCoordinate::ORIGIN,
        Some(raw) => explicit_position(raw).unwrap_or_else(|| {
            warn!("Cluster \"{}\" has an invalid grid position, anchoring at 0,0", name);
            GridCoordinate::ORIGIN
        }),
    };

    let mut entities = Vec::with_capacity(record.applications.len());
    for item in &record.applications {
        let entity = match item {
            Lenient::Valid(app) => normalize_application(app, name, diagnostics),
            Lenient::Invalid(_) => None,
        };
        match entity {
            Some(entity) => entities.push(entity),
            None => {
                warn!(
                    "Skipping application without id or name in cluster \"{}\"",
                    name
                );
                diagnostics.skipped_entities += 1;
            }
        }
    }

    Some(Cluster {
        id: id.to_string(),
        name: name.to_string(),
        color: text(record.color.as_ref()).map(str::to_string),
        anchor,
        entities,
    })
}

fn normalize_application(
    app: &ApplicationRecord,
    cluster_name: &str,
    diagnostics: &mut InputDiagnostics,
) -> Option<Entity> {
    let id = identity(app.id.as_ref())?;
    let name = identity(app.name.as_ref())?;

    let grid_position = match &app.grid_position {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let pos = explicit_position(raw);
            if pos.is_none() {
                diagnostics.demoted_positions += 1;
            }
            pos
        }
    };

    let connections = app
        .connections
        .iter()
        .filter_map(|item| {
            let conn = match item {
                Lenient::Valid(record) => connection(record),
                Lenient::Invalid(_) => None,
            };
            if conn.is_none() {
                warn!(
                    "Dropping connection without a target from \"{}\" in cluster \"{}\"",
                    name, cluster_name
                );
            }
            conn
        })
        .collect();

    Some(Entity {
        id: id.to_string(),
        name: name.to_string(),
        grid_position,
        status: app.status.as_ref().and_then(Value::as_f64),
        description: text(app.description.as_ref()).map(str::to_string),
        connections,
    })
}

fn connection(record: &ConnectionRecord) -> Option<Connection> {
    Some(Connection {
        to: identity(record.to.as_ref())?.to_string(),
        kind: text(record.kind.as_ref()).map(str::to_string),
        strength: text(record.strength.as_ref()).map(str::to_string),
    })
}

fn text(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str)
}

/// A string with something other than whitespace in it.
fn identity(value: Option<&Value>) -> Option<&str> {
    text(value).filter(|s| !s.trim().is_empty())
}

/// `{"q": <int>, "r": <int>}` or nothing.
fn explicit_position(raw: &Value) -> Option<GridCoordinate> {
    let obj = raw.as_object()?;
    let q = integral(obj.get("q")?)?;
    let r = integral(obj.get("r")?)?;
    Some(GridCoordinate::new(q, r))
}

/// Accepts integers and floats with no fractional part (`3.0`), within i32 range.
fn integral(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::input::parse_map_file;
    use serde_json::json;

    fn normalize_json(value: Value) -> MapData {
        let file = parse_map_file(&value.to_string()).unwrap();
        normalize(&file)
    }

    #[test]
    fn test_valid_positions_are_kept() {
        let data = normalize_json(json!({
            "clusters": [{"id": "c", "name": "C", "gridPosition": {"q": 3, "r": 4},
                "applications": [{"id": "a", "name": "A", "gridPosition": {"q": -1, "r": 2.0}}]}]
        }));
        let cluster = &data.clusters[0];
        assert_eq!(cluster.anchor, GridCoordinate::new(3, 4));
        assert_eq!(cluster.entities[0].grid_position, Some(GridCoordinate::new(-1, 2)));
        assert_eq!(data.diagnostics, InputDiagnostics::default());
    }

    #[test]
    fn test_invalid_positions_are_demoted() {
        let data = normalize_json(json!({
            "clusters": [{"id": "c", "name": "C", "applications": [
                {"id": "a", "name": "A", "gridPosition": {"q": "1", "r": 2}},
                {"id": "b", "name": "B", "gridPosition": {"q": 1.5, "r": 2}},
                {"id": "d", "name": "D", "gridPosition": {"q": 1}},
                {"id": "e", "name": "E", "gridPosition": null},
                {"id": "f", "name": "F"}
            ]}]
        }));
        let entities = &data.clusters[0].entities;
        assert_eq!(entities.len(), 5);
        assert!(entities.iter().all(|e| e.grid_position.is_none()));
        assert_eq!(data.diagnostics.demoted_positions, 3);
    }

    #[test]
    fn test_missing_identity_is_skipped_and_counted() {
        let data = normalize_json(json!({
            "clusters": [
                {"id": "c", "name": "C", "applications": [
                    {"id": "a", "name": "A"},
                    {"name": "NoId"},
                    {"id": "x", "name": "  "}
                ]},
                {"name": "Anonymous", "applications": [{"id": "b", "name": "B"}, {"id": "d", "name": "D"}]}
            ]
        }));
        assert_eq!(data.clusters.len(), 1);
        assert_eq!(data.clusters[0].entities.len(), 1);
        assert_eq!(data.diagnostics.skipped_clusters, 1);
        assert_eq!(data.diagnostics.skipped_entities, 4);
    }

    #[test]
    fn test_cluster_without_anchor_uses_origin() {
        let data = normalize_json(json!({"clusters": [{"id": "c", "name": "C"}]}));
        assert_eq!(data.clusters[0].anchor, GridCoordinate::ORIGIN);
        assert!(data.clusters[0].entities.is_empty());
    }

    #[test]
    fn test_mistyped_identity_skips_only_that_application() {
        let data = normalize_json(json!({
            "clusters": [{"id": "c", "name": "C", "applications": [
                {"id": 7, "name": "Seven"},
                {"id": "n", "name": ["not", "text"]},
                "just a string",
                {"id": "a", "name": "A"}
            ]}]
        }));
        let entities = &data.clusters[0].entities;
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, "a");
        assert_eq!(data.diagnostics.skipped_entities, 3);
    }

    #[test]
    fn test_connection_without_target_is_dropped() {
        let data = normalize_json(json!({
            "clusters": [{"id": "c", "name": "C", "applications": [
                {"id": "a", "name": "A", "connections": [
                    {"type": "api"},
                    {"to": 3},
                    42,
                    {"to": "b", "type": "data-flow", "strength": 5}
                ]},
                {"id": "b", "name": "B"}
            ]}]
        }));
        let a = &data.clusters[0].entities[0];
        assert_eq!(a.connections.len(), 1);
        assert_eq!(a.connections[0].to, "b");
        assert_eq!(a.connections[0].kind.as_deref(), Some("data-flow"));
        assert_eq!(a.connections[0].strength, None);
        assert_eq!(data.diagnostics, InputDiagnostics::default());
    }

    #[test]
    fn test_non_numeric_status_becomes_none() {
        let data = normalize_json(json!({
            "clusters": [{"id": "c", "name": "C", "color": 12, "applications": [
                {"id": "a", "name": "A", "status": "active", "description": false},
                {"id": "b", "name": "B", "status": 75}
            ]}]
        }));
        let cluster = &data.clusters[0];
        assert_eq!(cluster.color, None);
        assert_eq!(cluster.entities[0].status, None);
        assert_eq!(cluster.entities[0].description, None);
        assert_eq!(cluster.entities[1].status, Some(75.0));
        assert_eq!(data.diagnostics, InputDiagnostics::default());
    }

    #[test]
    fn test_non_object_cluster_is_skipped() {
        let data = normalize_json(json!({
            "clusters": ["nope", {"id": 5, "name": "Numeric", "applications": [{"id": "x", "name": "X"}]},
                {"id": "c", "name": "C", "gridPosition": "top", "applications": [{"id": "a", "name": "A"}]}]
        }));
        assert_eq!(data.clusters.len(), 1);
        assert_eq!(data.clusters[0].anchor, GridCoordinate::ORIGIN);
        assert_eq!(data.diagnostics.skipped_clusters, 2);
        assert_eq!(data.diagnostics.skipped_entities, 1);
    }
}
