//! Zoom helpers for focusing a cluster.
//!
//! Works on the placed pixel coordinates directly; the renderer only has to
//! apply the resulting transform.

use serde::Serialize;

use super::{PixelCoordinate, RectF};

/// `translate(x, y) scale(k)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl ZoomTransform {
    /// Screen position of a layout-space point.
    pub fn apply(&self, p: PixelCoordinate) -> PixelCoordinate {
        PixelCoordinate {
            x: self.x + self.k * p.x,
            y: self.y + self.k * p.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    Overview,
    Intermediate,
    Detail,
}

impl ZoomLevel {
    pub fn from_scale(k: f64) -> Self {
        if k <= 0.7 {
            ZoomLevel::Overview
        } else if k < 2.2 {
            ZoomLevel::Intermediate
        } else {
            ZoomLevel::Detail
        }
    }
}

/// Mean of the hexagon centers, or the origin for none.
pub fn hexagons_center(positions: &[PixelCoordinate]) -> PixelCoordinate {
    if positions.is_empty() {
        return PixelCoordinate { x: 0.0, y: 0.0 };
    }
    let n = positions.len() as f64;
    let (sx, sy) = positions.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    PixelCoordinate { x: sx / n, y: sy / n }
}

/// Transform that puts the middle of `bounds` at the viewport center at scale `k`.
pub fn cluster_focus(bounds: &RectF, width: f64, height: f64, k: f64) -> ZoomTransform {
    let c = bounds.center();
    ZoomTransform {
        x: width / 2.0 - k * c.x,
        y: height / 2.0 - k * c.y,
        k,
    }
}
