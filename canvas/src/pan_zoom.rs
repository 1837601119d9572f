//! Viewport gestures: wheel zoom about the cursor, drag pan, two-finger
//! pinch and pan.
//!
//! The engine consults [`PanZoom`] before the active tool sees an event, and
//! skips it entirely while a tool mode blocks pan/zoom.

#[cfg(test)]
#[path = "pan_zoom_test.rs"]
mod pan_zoom_test;

use crate::camera::{Point, Viewport, clamp_zoom};
use crate::input::{Button, PointerEvent, WheelDelta};
use crate::mode::Mode;

/// State captured when a two-finger gesture starts. Every move is computed
/// from here, never incrementally, so rounding does not accumulate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchStart {
    distance: f64,
    center: Point,
    viewport: Viewport,
}

#[derive(Debug, Default)]
pub struct PanZoom {
    /// Screen position of the previous pan event while a drag pan runs.
    pan_last: Option<Point>,
    space_held: bool,
    pinch: Option<PinchStart>,
}

impl PanZoom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_space_held(&mut self, held: bool) {
        self.space_held = held;
    }

    #[must_use]
    pub fn space_held(&self) -> bool {
        self.space_held
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan_last.is_some()
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Whether a pointer-down in `mode` starts a drag pan.
    ///
    /// Space+primary, middle and right button pan in every mode that allows
    /// it; in `move` mode a plain primary drag pans too.
    #[must_use]
    pub fn wants_pan(&self, ev: &PointerEvent, mode: Mode) -> bool {
        if mode.blocks_pan_zoom() {
            return false;
        }
        match ev.button {
            Button::Middle | Button::Secondary => true,
            Button::Primary => self.space_held || mode == Mode::Move,
        }
    }

    pub fn begin_pan(&mut self, screen: Point) {
        self.pan_last = Some(screen);
    }

    /// Translate the viewport by the cursor delta. Returns `false` when no
    /// pan is running.
    pub fn drag(&mut self, viewport: &mut Viewport, screen: Point) -> bool {
        let Some(last) = self.pan_last else {
            return false;
        };
        viewport.pan_by(screen.x - last.x, screen.y - last.y);
        self.pan_last = Some(screen);
        true
    }

    pub fn end_pan(&mut self) {
        self.pan_last = None;
    }

    /// Start a two-finger gesture. Fewer than two touches is ignored.
    pub fn touch_start(&mut self, viewport: &Viewport, touches: &[Point]) {
        let [a, b, ..] = touches else {
            return;
        };
        self.pan_last = None;
        self.pinch = Some(PinchStart { distance: a.distance_to(*b), center: a.midpoint(*b), viewport: *viewport });
    }

    /// Pinch-zoom by the distance ratio and pan by the centroid delta, both
    /// relative to the gesture start. Returns `false` when no pinch runs.
    pub fn touch_move(&mut self, viewport: &mut Viewport, touches: &[Point]) -> bool {
        let (Some(start), [a, b, ..]) = (self.pinch, touches) else {
            return false;
        };
        let ratio = if start.distance > 0.0 { a.distance_to(*b) / start.distance } else { 1.0 };
        let zoom = clamp_zoom(start.viewport.zoom() * ratio);
        let anchor = start.viewport.screen_to_world(start.center);
        let center = a.midpoint(*b);
        *viewport = Viewport {
            translate_x: center.x - anchor.x * zoom,
            translate_y: center.y - anchor.y * zoom,
            scale_x: zoom,
            scale_y: zoom,
            dpr: viewport.dpr,
        };
        true
    }

    pub fn touch_end(&mut self) {
        self.pinch = None;
    }

    /// Cancel any running pan or pinch.
    pub fn reset(&mut self) {
        self.pan_last = None;
        self.pinch = None;
    }
}

/// Exponential wheel zoom about `screen`: `zoom * base^dy`, clamped.
/// Returns the new zoom.
pub fn wheel_zoom(viewport: &mut Viewport, screen: Point, delta: WheelDelta, base: f64) -> f64 {
    let zoom = viewport.zoom() * base.powf(delta.dy);
    viewport.zoom_to_point(screen, zoom);
    viewport.zoom()
}
