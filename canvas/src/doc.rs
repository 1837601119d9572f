//! Document model: drawables, their shapes and styles.
//!
//! Every drawable stores local geometry plus a transform: its world-space
//! footprint is `local * scale + (left, top)`. Box-like shapes (symbols,
//! rectangles, text, the background raster) have their local origin at the
//! top-left corner. Point-based shapes (lines, paths, polygons, groups) keep
//! their points in world coordinates at creation time, with `left`/`top`
//! starting at zero and accumulating later moves.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{BACKGROUND_NAME, TITLE_BLOCK_NAME};
use crate::geometry::Rect;
use crate::raster::RasterImage;

/// Unique identifier for a drawable.
pub type DrawableId = Uuid;

/// Stroke/fill appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke: String,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<[f64; 2]>,
}

impl Default for Style {
    fn default() -> Self {
        Self { stroke: "#000000".into(), stroke_width: 1.0, fill: None, opacity: 1.0, dash: None }
    }
}

impl Style {
    #[must_use]
    pub fn stroked(color: &str, width: f64) -> Self {
        Self { stroke: color.to_owned(), stroke_width: width, ..Self::default() }
    }

    #[must_use]
    pub fn with_fill(mut self, fill: &str) -> Self {
        self.fill = Some(fill.to_owned());
        self
    }

    #[must_use]
    pub fn dashed(mut self, dash: [f64; 2]) -> Self {
        self.dash = Some(dash);
        self
    }
}

/// Geometry of a drawable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// The floor-plan raster. Local size is the native pixel size.
    Background { image: RasterImage },
    /// Page title-block overlay.
    TitleBlock { width: f64, height: f64 },
    /// A symbol from the external symbol factory, drawn in a `width` x `height` box.
    Symbol { symbol: String, width: f64, height: f64 },
    Line { a: Point, b: Point },
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
    /// Freehand stroke.
    Path { points: Vec<Point> },
    /// Closed, filled polygon.
    Polygon { points: Vec<Point> },
    /// Open polyline.
    Polyline { points: Vec<Point> },
    Text { text: String, font_size: f64 },
    /// Several shapes moved, rotated and scaled as one.
    Group { children: Vec<Drawable> },
}

/// Semantic tag marking a drawable as part of a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeasureTag {
    /// Polygon or label of one area/volume measurement. Both constituents
    /// carry the same `measurement` id.
    Area { measurement: Uuid, area_m2: f64, volume_m3: Option<f64> },
    /// A dimensioned distance arrow.
    Distance { a: Point, b: Point, label: String },
}

/// A renderable, selectable scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub id: DrawableId,
    /// Stable name tag (`"background"`, `"title-block"`). Survives serialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub shape: Shape,
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Clockwise rotation in degrees.
    pub angle: f64,
    pub style: Style,
    /// Persisted lock flag; only meaningful on the background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Runtime selectable/evented flag. Not serialized; re-derived after restore.
    #[serde(skip, default = "default_true")]
    pub interactive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<MeasureTag>,
    /// Transient preview: excluded from hit-testing, export and history.
    #[serde(skip)]
    pub preview: bool,
}

fn default_true() -> bool {
    true
}

impl Drawable {
    /// A drawable at `(left, top)` with identity scale and no rotation.
    #[must_use]
    pub fn new(shape: Shape, left: f64, top: f64, style: Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            shape,
            left,
            top,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            style,
            locked: None,
            interactive: true,
            tag: None,
            preview: false,
        }
    }

    /// The floor-plan background, locked and non-interactive.
    #[must_use]
    pub fn background(image: RasterImage, left: f64, top: f64, scale: f64) -> Self {
        let mut d = Self::new(Shape::Background { image }, left, top, Style::default());
        d.name = Some(BACKGROUND_NAME.to_owned());
        d.scale_x = scale;
        d.scale_y = scale;
        d.locked = Some(true);
        d.interactive = false;
        d
    }

    /// Title-block overlay.
    #[must_use]
    pub fn title_block(left: f64, top: f64, width: f64, height: f64) -> Self {
        let mut d = Self::new(Shape::TitleBlock { width, height }, left, top, Style::default());
        d.name = Some(TITLE_BLOCK_NAME.to_owned());
        d
    }

    /// Mark as a non-interactive transient preview.
    #[must_use]
    pub fn into_preview(mut self) -> Self {
        self.preview = true;
        self.interactive = false;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: MeasureTag) -> Self {
        self.tag = Some(tag);
        self
    }

    #[must_use]
    pub fn is_background(&self) -> bool {
        self.name.as_deref() == Some(BACKGROUND_NAME)
    }

    #[must_use]
    pub fn is_title_block(&self) -> bool {
        self.name.as_deref() == Some(TITLE_BLOCK_NAME)
    }

    /// Area-measurement id, if this drawable belongs to one.
    #[must_use]
    pub fn area_measurement(&self) -> Option<Uuid> {
        match self.tag {
            Some(MeasureTag::Area { measurement, .. }) => Some(measurement),
            _ => None,
        }
    }

    /// Axis-aligned world-space bounds. Rotation is not taken into account.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let local = local_bounds(&self.shape);
        Rect {
            left: self.left + local.left * self.scale_x,
            top: self.top + local.top * self.scale_y,
            width: local.width * self.scale_x,
            height: local.height * self.scale_y,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn local_bounds(shape: &Shape) -> Rect {
    let sized = |width: f64, height: f64| Rect { left: 0.0, top: 0.0, width, height };
    match shape {
        Shape::Background { image } => sized(f64::from(image.width), f64::from(image.height)),
        Shape::TitleBlock { width, height } | Shape::Symbol { width, height, .. } | Shape::Rect { width, height } => {
            sized(*width, *height)
        }
        Shape::Circle { radius } => sized(radius * 2.0, radius * 2.0),
        Shape::Line { a, b } => Rect::from_corners(*a, *b),
        Shape::Path { points } | Shape::Polygon { points } | Shape::Polyline { points } => {
            Rect::bounding(points).unwrap_or_default()
        }
        Shape::Text { text, font_size } => {
            let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            let lines = text.lines().count().max(1);
            sized(longest as f64 * font_size * 0.6, lines as f64 * font_size * 1.2)
        }
        Shape::Group { children } => {
            let corners: Vec<Point> = children
                .iter()
                .map(Drawable::bounds)
                .flat_map(|r| [Point::new(r.left, r.top), Point::new(r.right(), r.bottom())])
                .collect();
            Rect::bounding(&corners).unwrap_or_default()
        }
    }
}
