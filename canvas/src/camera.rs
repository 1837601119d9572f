//! Viewport transform and screen/world coordinate conversion.
//!
//! The viewport maps world space (the floor-plan's own coordinate system,
//! invariant under pan/zoom) to screen space (CSS pixels reported by pointer
//! events): `screen = world * scale + translate`, per axis. Every conversion
//! reads the live viewport; callers never cache a converted point across
//! events because pan/zoom can change mid-gesture.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_MAX, ZOOM_MIN};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// 2D affine viewport: translation plus per-axis scale.
///
/// `translate_x` / `translate_y` are in CSS pixels. `scale_x` / `scale_y`
/// are kept equal by every operation in this crate; `zoom()` reports the
/// x component. A scale of zero or below is a precondition violation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Device pixel ratio of the backing store.
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { translate_x: 0.0, translate_y: 0.0, scale_x: 1.0, scale_y: 1.0, dpr: 1.0 }
    }
}

impl Viewport {
    /// The active zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.scale_x
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.translate_x) / self.scale_x,
            y: (screen.y - self.translate_y) / self.scale_y,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale_x + self.translate_x,
            y: world.y * self.scale_y + self.translate_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale_x
    }

    /// Convert a CSS-pixel point to backing-store (device) pixels.
    #[must_use]
    pub fn screen_to_device(&self, screen: Point) -> Point {
        Point::new(screen.x * self.dpr, screen.y * self.dpr)
    }

    /// Set zoom to `zoom` (clamped) while keeping the world point under
    /// `screen` fixed on screen.
    pub fn zoom_to_point(&mut self, screen: Point, zoom: f64) {
        let zoom = clamp_zoom(zoom);
        let anchor = self.screen_to_world(screen);
        self.scale_x = zoom;
        self.scale_y = zoom;
        self.translate_x = screen.x - anchor.x * zoom;
        self.translate_y = screen.y - anchor.y * zoom;
    }

    /// Shift the translation by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Reset translation and scale to identity, keeping the device ratio.
    pub fn reset(&mut self) {
        *self = Self { dpr: self.dpr, ..Self::default() };
    }
}

/// Clamp a zoom factor into `[ZOOM_MIN, ZOOM_MAX]`. Non-finite input maps to 1.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() { zoom.clamp(ZOOM_MIN, ZOOM_MAX) } else { 1.0 }
}
