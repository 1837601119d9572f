//! Shared numeric constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 20.0;

/// Base of the exponential wheel-zoom curve: `zoom * base^deltaY`.
pub const WHEEL_ZOOM_BASE: f64 = 0.999;

// ── Scene tags ──────────────────────────────────────────────────

/// Stable name carried by the floor-plan background drawable.
///
/// History restore finds the background by this tag, never by position.
pub const BACKGROUND_NAME: &str = "background";

/// Stable name carried by the title-block overlay.
pub const TITLE_BLOCK_NAME: &str = "title-block";

// ── Gestures ────────────────────────────────────────────────────

/// Screen-space radius within which a release closes an area polygon.
pub const CLOSE_POLYGON_THRESHOLD_PX: f64 = 30.0;

/// Screen-space radius for "clicked the first point again" tests.
pub const FIRST_POINT_THRESHOLD_PX: f64 = 20.0;

/// Radius of start/vertex marker circles, in screen pixels.
pub const MARKER_RADIUS_PX: f64 = 4.0;

// ── Measurement ─────────────────────────────────────────────────

/// Square millimeters per square meter.
pub const MM2_PER_M2: f64 = 1_000_000.0;

/// Millimeters per meter.
pub const MM_PER_M: f64 = 1000.0;

/// Dash pattern used by every rubber-band and preview outline.
pub const PREVIEW_DASH: [f64; 2] = [5.0, 5.0];

/// Stroke color of rubber bands and calibration lines.
pub const PREVIEW_STROKE: &str = "#64748b";

/// Placeholder content of a freshly placed text label.
pub const DEFAULT_TEXT: &str = "Text";
