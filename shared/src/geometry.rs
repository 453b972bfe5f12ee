//! Angular slice layout for multi-occupant composites.

use crate::config::{PIE_CENTER_X, PIE_CENTER_Y, PIE_RADIUS};

/// One angular range of the composite, in degrees. Slices start at -90°
/// (12 o'clock) and proceed clockwise, so a 2-occupant group splits
/// top/bottom rather than left/right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl Slice {
    pub fn width(&self) -> f64 {
        self.end_deg - self.start_deg
    }
}

/// `count` equal slices of `360/count` degrees each, clockwise from -90°.
pub fn compute_slices(count: usize) -> Vec<Slice> {
    let per_slice = 360.0 / count as f64;
    (0..count)
        .map(|i| Slice {
            start_deg: i as f64 * per_slice - 90.0,
            end_deg: (i + 1) as f64 * per_slice - 90.0,
        })
        .collect()
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * (std::f64::consts::PI / 180.0)
}

/// Point on a circle of `radius` around (`cx`, `cy`) at `angle` radians.
pub fn point_on_circle(angle: f64, radius: f64, cx: f64, cy: f64) -> (f64, f64) {
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}

/// SVG path for one pie slice on the composite's 100x100 viewBox.
pub fn pie_path(slice: Slice) -> String {
    let start_rad = degrees_to_radians(slice.start_deg);
    let end_rad = degrees_to_radians(slice.end_deg);
    let (sx, sy) = point_on_circle(start_rad, PIE_RADIUS, PIE_CENTER_X, PIE_CENTER_Y);
    let (ex, ey) = point_on_circle(end_rad, PIE_RADIUS, PIE_CENTER_X, PIE_CENTER_Y);
    let large_arc = if slice.width() > 180.0 { 1 } else { 0 };
    format!(
        "M {PIE_CENTER_X},{PIE_CENTER_Y} L {sx},{sy} A {PIE_RADIUS},{PIE_RADIUS} 0 {large_arc},1 {ex},{ey} Z"
    )
}
