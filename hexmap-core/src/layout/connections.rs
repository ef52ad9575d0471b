// Connection overlay geometry.
//
// Each application connection becomes a quadratic curve between the two
// hexagon centers. The control point is pushed off the straight line by a
// fraction of its length that depends on the connection type.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use super::packing::PlacedEntity;
use super::PixelCoordinate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionCurve {
    pub from: String,
    pub to: String,
    pub kind: Option<String>,
    pub strength: Option<String>,
    pub source: PixelCoordinate,
    pub target: PixelCoordinate,
    pub control: PixelCoordinate,
}

impl ConnectionCurve {
    /// SVG path data: `M sx sy Q cx cy, tx ty`.
    pub fn svg_path(&self) -> String {
        format!(
            "M {} {} Q {} {}, {} {}",
            self.source.x, self.source.y, self.control.x, self.control.y, self.target.x, self.target.y
        )
    }
}

/// Bend of the curve as a fraction of the source-target distance.
pub fn curve_factor(kind: Option<&str>) -> f64 {
    match kind {
        Some("data-flow") => 0.3,
        Some("api") => 0.15,
        _ => 0.2,
    }
}

pub fn control_point(source: PixelCoordinate, target: PixelCoordinate, kind: Option<&str>) -> PixelCoordinate {
    let dx = target.x - source.x;
    let dy = target.y - source.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let mid = PixelCoordinate {
        x: (source.x + target.x) / 2.0,
        y: (source.y + target.y) / 2.0,
    };
    if distance == 0.0 {
        return mid;
    }

    let height = distance * curve_factor(kind);
    // Unit perpendicular (rotated 90°)
    let perp_x = -dy / distance;
    let perp_y = dx / distance;
    PixelCoordinate {
        x: mid.x + perp_x * height,
        y: mid.y + perp_y * height,
    }
}

/// Curves for every connection whose target was placed, in output order.
pub fn resolve_connections(placed: &[PlacedEntity]) -> Vec<ConnectionCurve> {
    let mut by_id: HashMap<&str, PixelCoordinate> = HashMap::new();
    for p in placed {
        by_id.entry(p.entity.id.as_str()).or_insert(p.pixel);
    }

    let mut curves = Vec::new();
    for p in placed {
        for conn in &p.entity.connections {
            let Some(&target) = by_id.get(conn.to.as_str()) else {
                debug!("Connection {} -> {} has no placed target", p.entity.id, conn.to);
                continue;
            };
            curves.push(ConnectionCurve {
                from: p.entity.id.clone(),
                to: conn.to.clone(),
                kind: conn.kind.clone(),
                strength: conn.strength.clone(),
                source: p.pixel,
                target,
                control: control_point(p.pixel, target, conn.kind.as_deref()),
            });
        }
    }
    curves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::packing::Placement;
    use crate::model::{ClusterRef, Connection, Entity, GridCoordinate};

    fn pt(x: f64, y: f64) -> PixelCoordinate {
        PixelCoordinate { x, y }
    }

    fn placed(id: &str, at: PixelCoordinate, to: &[(&str, &str)]) -> PlacedEntity {
        let mut entity = Entity::new(id, id.to_uppercase());
        entity.connections = to
            .iter()
            .map(|(t, kind)| Connection { to: t.to_string(), kind: Some(kind.to_string()), strength: None })
            .collect();
        PlacedEntity {
            entity,
            cluster: ClusterRef { id: "c".to_string(), name: "C".to_string() },
            grid: GridCoordinate::ORIGIN,
            pixel: at,
            placement: Placement::Auto,
            has_collision: false,
            collides_with: None,
        }
    }

    #[test]
    fn test_control_point_is_perpendicular_offset() {
        let c = control_point(pt(0.0, 0.0), pt(100.0, 0.0), Some("data-flow"));
        assert!((c.x - 50.0).abs() < 1e-9);
        assert!((c.y - 30.0).abs() < 1e-9);

        let c = control_point(pt(0.0, 0.0), pt(100.0, 0.0), Some("api"));
        assert!((c.y - 15.0).abs() < 1e-9);

        let c = control_point(pt(0.0, 0.0), pt(0.0, 100.0), None);
        assert!((c.x + 20.0).abs() < 1e-9);
        assert!((c.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_connection_uses_midpoint() {
        let c = control_point(pt(5.0, 5.0), pt(5.0, 5.0), Some("api"));
        assert_eq!(c, pt(5.0, 5.0));
    }

    #[test]
    fn test_unresolved_targets_are_skipped() {
        let entities = vec![
            placed("a", pt(0.0, 0.0), &[("b", "api"), ("missing", "api")]),
            placed("b", pt(100.0, 0.0), &[]),
        ];
        let curves = resolve_connections(&entities);
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].from, "a");
        assert_eq!(curves[0].to, "b");
        assert_eq!(curves[0].target, pt(100.0, 0.0));
    }

    #[test]
    fn test_svg_path_format() {
        let curves = resolve_connections(&[
            placed("a", pt(0.0, 0.0), &[("b", "integration")]),
            placed("b", pt(10.0, 0.0), &[]),
        ]);
        assert_eq!(curves[0].svg_path(), "M 0 0 Q 5 2, 10 0");
    }
}
