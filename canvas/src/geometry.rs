//! Measurement geometry: polygon area, centroid, unit conversion, distance
//! labels. Pure functions with no scene dependency.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;
use crate::consts::{MM2_PER_M2, MM_PER_M};

/// Polygon area in squared pixels via the shoelace formula.
///
/// Returns 0 for fewer than three points. Winding order does not matter.
#[must_use]
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice.abs() / 2.0
}

/// Convert an area in squared pixels to square meters.
#[must_use]
pub fn pixel_area_to_m2(pixel_area: f64, px_per_mm: f64) -> f64 {
    let mm_per_px = 1.0 / px_per_mm;
    pixel_area * mm_per_px * mm_per_px / MM2_PER_M2
}

/// Volume in cubic meters for a floor area and a room height in millimeters.
#[must_use]
pub fn volume_m3(area_m2: f64, height_mm: f64) -> f64 {
    area_m2 * (height_mm / MM_PER_M)
}

/// Arithmetic mean of the vertices. Good enough for label placement; not an
/// area-weighted centroid.
#[must_use]
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Whether `a` and `b` lie within `threshold` of each other.
#[must_use]
pub fn points_near(a: Point, b: Point, threshold: f64) -> bool {
    a.distance_to(b) < threshold
}

/// Real-world length of a pixel distance, formatted for a label.
///
/// At or above one meter: meters with two decimals (`"1.00 m"`). Below:
/// whole millimeters (`"999 mm"`).
#[must_use]
pub fn format_distance(pixel_distance: f64, px_per_mm: f64) -> String {
    let mm = pixel_distance / px_per_mm;
    if mm >= MM_PER_M {
        format!("{:.2} m", mm / MM_PER_M)
    } else {
        format!("{mm:.0} mm")
    }
}

/// Label text for an area measurement, with an optional volume line.
#[must_use]
pub fn format_area_label(area_m2: f64, volume_m3: Option<f64>) -> String {
    match volume_m3 {
        Some(v) => format!("{area_m2:.2} m²\n{v:.2} m³"),
        None => format!("{area_m2:.2} m²"),
    }
}

/// Snap `end` onto the horizontal or vertical through `start`, whichever
/// axis has the larger delta.
#[must_use]
pub fn axis_snap(start: Point, end: Point) -> Point {
    if (end.x - start.x).abs() >= (end.y - start.y).abs() {
        Point::new(end.x, start.y)
    } else {
        Point::new(start.x, end.y)
    }
}

/// Axis-aligned rectangle spanned by two corners in any quadrant order.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Normalize a signed drag from `anchor` to `corner` into left/top/size.
    #[must_use]
    pub fn from_corners(anchor: Point, corner: Point) -> Self {
        Self {
            left: anchor.x.min(corner.x),
            top: anchor.y.min(corner.y),
            width: (corner.x - anchor.x).abs(),
            height: (corner.y - anchor.y).abs(),
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// True when either side has no extent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest rectangle containing every point; `None` when empty.
    #[must_use]
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self { left: min_x, top: min_y, width: max_x - min_x, height: max_y - min_y })
    }
}
