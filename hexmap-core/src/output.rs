//! Output types for the map renderer.
//!
//! These structs are serialized to JSON and handed to the frontend, which
//! draws hexagons, captions and connection curves from them as-is.

use serde::Serialize;

use crate::layout::connections::ConnectionCurve;
use crate::layout::hex_grid::hexagon_svg_path;
use crate::layout::labels::{LabelAnchor, LabelPlacement};
use crate::layout::occupancy::Occupant;
use crate::layout::packing::{PlacedEntity, Placement};
use crate::layout::viewport::{ZoomLevel, ZoomTransform};
use crate::layout::{LayoutConfig, LayoutDiagnostics, LayoutResult, RectF};
use crate::layout::CollisionRecord;

/// A hexagon ready to draw
#[derive(Debug, Clone, Serialize)]
pub struct HexagonOutput {
    pub id: String,
    pub name: String,
    pub cluster_id: String,
    pub q: i32,
    pub r: i32,
    pub x: f64,
    pub y: f64,
    pub placement: Placement,
    pub has_collision: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collides_with: Option<Occupant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelOutput {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub bounds: RectF,
    pub anchor: LabelAnchor,
    pub fallback: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterOutput {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub label: LabelOutput,
    /// Transform that zooms onto this cluster
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<ZoomTransform>,
    /// Detail level the renderer switches to at `focus`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_level: Option<ZoomLevel>,
    pub hexagons: Vec<HexagonOutput>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionOutput {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    /// SVG path data of the curve
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// The combined output sent to the frontend
#[derive(Debug, Clone, Serialize)]
pub struct MapOutput {
    /// Outline shared by every hexagon, relative to its center
    pub hexagon_path: String,
    pub clusters: Vec<ClusterOutput>,
    pub collisions: Vec<CollisionRecord>,
    pub connections: Vec<ConnectionOutput>,
    pub diagnostics: LayoutDiagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl MapOutput {
    pub fn from_layout(layout: &LayoutResult, cfg: &LayoutConfig) -> Self {
        Self {
            hexagon_path: hexagon_svg_path(cfg.hex_size),
            clusters: layout
                .clusters
                .iter()
                .map(|c| ClusterOutput {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    color: c.color.clone(),
                    label: label_output(&c.label),
                    focus: c.focus,
                    focus_level: c.focus.map(|t| ZoomLevel::from_scale(t.k)),
                    hexagons: c.placed.iter().map(hexagon_output).collect(),
                })
                .collect(),
            collisions: layout.collisions.clone(),
            connections: layout.connections.iter().map(connection_output).collect(),
            diagnostics: layout.diagnostics.clone(),
            error: None,
        }
    }

    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            hexagon_path: String::new(),
            clusters: vec![],
            collisions: vec![],
            connections: vec![],
            diagnostics: LayoutDiagnostics::default(),
            error: Some(ErrorInfo { message: message.into() }),
        }
    }
}

fn hexagon_output(p: &PlacedEntity) -> HexagonOutput {
    HexagonOutput {
        id: p.entity.id.clone(),
        name: p.entity.name.clone(),
        cluster_id: p.cluster.id.clone(),
        q: p.grid.q,
        r: p.grid.r,
        x: p.pixel.x,
        y: p.pixel.y,
        placement: p.placement,
        has_collision: p.has_collision,
        collides_with: p.collides_with.clone(),
        status: p.entity.status,
        description: p.entity.description.clone(),
    }
}

fn label_output(label: &LabelPlacement) -> LabelOutput {
    LabelOutput {
        text: label.text.clone(),
        x: label.position.x,
        y: label.position.y,
        bounds: label.bounds,
        anchor: label.anchor,
        fallback: label.fallback,
    }
}

fn connection_output(curve: &ConnectionCurve) -> ConnectionOutput {
    ConnectionOutput {
        from: curve.from.clone(),
        to: curve.to.clone(),
        kind: curve.kind.clone(),
        strength: curve.strength.clone(),
        path: curve.svg_path(),
    }
}
