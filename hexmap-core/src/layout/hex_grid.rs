// Odd-r horizontal hex grid.
//
// Pointy-top hexagons, odd rows shifted right by half a hex width. The pixel
// origin sits at the middle of the configured viewport so cell (0,0) lands
// at (width/2, height/2).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3};
use std::fmt::Write;

use crate::model::GridCoordinate;
use super::{PixelCoordinate, RectF};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexGrid {
    pub hex_size: f64,
    pub width: f64,
    pub height: f64,
}

impl HexGrid {
    pub fn new(hex_size: f64, width: f64, height: f64) -> Self {
        Self { hex_size, width, height }
    }

    /// Horizontal distance between neighbouring cell centers in one row.
    pub fn horizontal_spacing(&self) -> f64 {
        self.hex_size * SQRT_3
    }

    /// Vertical distance between row centers.
    pub fn vertical_spacing(&self) -> f64 {
        self.hex_size * 1.5
    }

    pub fn grid_to_pixel(&self, q: i32, r: i32) -> PixelCoordinate {
        self.coord_to_pixel(GridCoordinate::new(q, r))
    }

    pub fn coord_to_pixel(&self, coord: GridCoordinate) -> PixelCoordinate {
        PixelCoordinate {
            x: self.width / 2.0 + self.horizontal_spacing() * (coord.q as f64 + row_shift(coord)),
            y: self.height / 2.0 + self.vertical_spacing() * coord.r as f64,
        }
    }

    /// Inverse of `grid_to_pixel`, rounding to the nearest cell.
    ///
    /// The row is recovered first since its parity decides the horizontal shift.
    pub fn pixel_to_grid(&self, x: f64, y: f64) -> GridCoordinate {
        let dx = x - self.width / 2.0;
        let dy = y - self.height / 2.0;

        let row = GridCoordinate::new(0, (dy / self.vertical_spacing()).round() as i32);
        let q = (dx / self.horizontal_spacing() - row_shift(row)).round() as i32;

        GridCoordinate { q, ..row }
    }

    /// Box around the outline of a `hex_size` hexagon centered at `center`.
    pub fn hexagon_bounds(&self, center: PixelCoordinate) -> RectF {
        let corners = hexagon_path(self.hex_size);
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in corners {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        RectF {
            x: center.x + min_x,
            y: center.y + min_y,
            w: max_x - min_x,
            h: max_y - min_y,
        }
    }
}

/// Half a hex for odd rows, nothing for even ones.
fn row_shift(coord: GridCoordinate) -> f64 {
    if coord.is_odd_row() { 0.5 } else { 0.0 }
}

/// Corners of a pointy-top hexagon with circumradius `size`, relative to its center.
/// Vertex `i` sits at angle 90° + i·60°.
pub fn hexagon_path(size: f64) -> [PixelCoordinate; 6] {
    std::array::from_fn(|i| {
        let angle = FRAC_PI_2 + i as f64 * FRAC_PI_3;
        PixelCoordinate {
            x: size * angle.cos(),
            y: size * angle.sin(),
        }
    })
}

/// SVG path data for `hexagon_path(size)`: one move, five lines, closed.
pub fn hexagon_svg_path(size: f64) -> String {
    let mut d = String::new();
    for (i, p) in hexagon_path(size).iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{}{},{}", cmd, p.x, p.y);
    }
    d.push('Z');
    d
}
