//! Reference-grid settings and half-cell snapping.
//!
//! The snap granularity is half a nominal grid cell. The grid is expressed in
//! real-world millimeters, so it only has a pixel size once a scale
//! calibration exists; until then every snap is a no-op.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use crate::camera::{Point, Viewport};
use crate::input::{Modifiers, PointerKind};

/// Grid visibility and cell size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    pub visible: bool,
    /// Cell size in real-world millimeters. Zero disables snapping.
    pub size_mm: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self { visible: false, size_mm: 1000.0 }
    }
}

impl GridSettings {
    /// Snap step in screen pixels, or `None` when snapping is disabled.
    #[must_use]
    pub fn step_px(&self, scale: Option<f64>, zoom: f64) -> Option<f64> {
        let step = (self.size_mm * scale? * zoom) / 2.0;
        (step.is_finite() && step > 0.0).then_some(step)
    }
}

/// Parse a user-entered grid size. Anything unparsable, negative or
/// non-finite becomes 0 (snapping off).
#[must_use]
pub fn parse_grid_size(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Snap a world point to the nearest half-grid boundary in screen space.
///
/// Returns `world` untouched when there is no scale or the grid size is 0.
#[must_use]
pub fn snap_to_grid(world: Point, grid: &GridSettings, scale: Option<f64>, viewport: &Viewport) -> Point {
    let Some(step) = grid.step_px(scale, viewport.zoom()) else {
        return world;
    };
    let screen = viewport.world_to_screen(world);
    let snapped = Point::new((screen.x / step).round() * step, (screen.y / step).round() * step);
    viewport.screen_to_world(snapped)
}

/// Which call site is asking; each one has its own activation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapSite {
    /// Dragging an existing object in select mode.
    ObjectDrag,
    /// Live endpoint of a distance annotation.
    DistanceEndpoint,
    /// Cursor-following symbol preview.
    SymbolPlacement,
}

/// Whether snapping applies for this event.
///
/// Touch input snaps whenever the grid is visible. Pointer input needs a
/// modifier: Shift for distance endpoints (and a visible grid), Ctrl/Meta
/// for object drags and symbol placement.
#[must_use]
pub fn snap_active(site: SnapSite, grid: &GridSettings, modifiers: Modifiers, kind: PointerKind) -> bool {
    if kind == PointerKind::Touch && grid.visible {
        return true;
    }
    match site {
        SnapSite::DistanceEndpoint => grid.visible && modifiers.shift,
        SnapSite::ObjectDrag | SnapSite::SymbolPlacement => modifiers.ctrl || modifiers.meta,
    }
}
