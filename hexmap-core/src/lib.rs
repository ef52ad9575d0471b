pub mod error;
pub mod layout;
pub mod measure;
pub mod model;
pub mod output;
mod wasm;

pub use error::LayoutError;
pub use layout::{layout_map, LayoutConfig, LayoutResult, PixelCoordinate, RectF};
pub use model::{parse_map, Cluster, Entity, GridCoordinate, MapData};
pub use output::MapOutput;

/// Parse a data file, lay it out and build the renderer output.
///
/// `config` overrides the `config` object embedded in the data file; with
/// neither present the defaults are used.
pub fn compute(input: &str, config: Option<&str>) -> Result<MapOutput, LayoutError> {
    let (data, embedded) = parse_map(input)?;
    let cfg = match config {
        Some(json) => serde_json::from_str::<LayoutConfig>(json).map_err(LayoutError::Config)?,
        None => embedded.unwrap_or_default(),
    };
    cfg.validate()?;

    let layout = layout_map(&data, &cfg);
    Ok(MapOutput::from_layout(&layout, &cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample() -> Value {
        json!({
            "clusters": [
                {"id": "c1", "name": "Payments", "color": "#1f78b4", "gridPosition": {"q": 0, "r": 0},
                 "applications": [
                    {"id": "a1", "name": "Ledger", "gridPosition": {"q": 3, "r": 3},
                     "connections": [{"to": "b1", "type": "data-flow", "strength": "high"}]},
                    {"id": "a2", "name": "Billing"}
                 ]},
                {"id": "c2", "name": "Risk", "color": "#6a3d9a", "gridPosition": {"q": 8, "r": 0},
                 "applications": [
                    {"id": "b1", "name": "Scoring", "gridPosition": {"q": 3, "r": 3}},
                    {"name": "Broken"}
                 ]}
            ]
        })
    }

    #[test]
    fn test_compute_end_to_end() {
        let out = compute(&sample().to_string(), None).unwrap();
        assert!(out.error.is_none());
        assert_eq!(out.clusters.len(), 2);
        assert_eq!(out.clusters[0].hexagons.len(), 2);
        assert_eq!(out.clusters[1].hexagons.len(), 1);
        assert_eq!(out.collisions.len(), 1);
        assert_eq!(out.collisions[0].entity_name, "Scoring");
        assert_eq!(out.collisions[0].collides_with_entity, "Ledger");
        assert_eq!(out.diagnostics.skipped_entities, 1);
        assert_eq!(out.connections.len(), 1);
        assert!(out.connections[0].path.starts_with("M "));
        assert_eq!(out.hexagon_path.matches('L').count(), 5);
    }

    #[test]
    fn test_config_argument_overrides_embedded() {
        let mut input = sample();
        input["config"] = json!({"hexSize": 10});
        let embedded = compute(&input.to_string(), None).unwrap();
        let overridden = compute(&input.to_string(), Some(r#"{"hexSize": 30}"#)).unwrap();

        let spacing = |out: &MapOutput| {
            let hexes = &out.clusters[0].hexagons;
            hexes[0].y - 400.0
        };
        assert!((spacing(&embedded) - 45.0).abs() < 1e-9);
        assert!((spacing(&overridden) - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let err = compute(&sample().to_string(), Some(r#"{"clusterWidth": 0}"#)).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig { .. }));
    }

    #[test]
    fn test_malformed_config_argument_is_config_error() {
        let err = compute(&sample().to_string(), Some("{\"hexSize\": ")).unwrap_err();
        assert!(matches!(err, LayoutError::Config(_)));
        assert!(err.to_string().starts_with("Invalid layout config"));
    }

    #[test]
    fn test_mistyped_metadata_still_lays_out() {
        let input = json!({"clusters": [{"id": "c", "name": "C", "applications": [
            {"id": "x", "name": "X", "status": "active", "connections": [{"type": "api"}]},
            {"id": 7, "name": "Seven"},
            {"id": "a", "name": "A"}
        ]}]});
        let out = compute(&input.to_string(), None).unwrap();
        assert_eq!(out.clusters[0].hexagons.len(), 2);
        assert_eq!(out.diagnostics.skipped_entities, 1);
        assert!(out.connections.is_empty());
    }

    #[test]
    fn test_output_serializes() {
        let out = compute(&sample().to_string(), None).unwrap();
        let value: Value = serde_json::to_value(&out).unwrap();
        let hex = &value["clusters"][0]["hexagons"][0];
        assert_eq!(hex["placement"], "explicit");
        assert_eq!(hex["q"], 3);
        assert!(value.get("error").is_none());
        assert!(value["clusters"][0]["label"]["anchor"].is_string());
        assert_eq!(value["clusters"][0]["focus_level"], "detail");
    }
}
