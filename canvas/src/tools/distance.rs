//! Distance annotation: two clicks, a live preview line in between, and a
//! grouped line + arrowheads + label on commit.
//!
//! The live endpoint snaps to the half-grid while Shift is held over a
//! visible grid, and to the dominant axis while Ctrl is held.

use tracing::debug;

use super::area::{center_on, marker};
use super::{ToolCtx, ToolError, ToolHandler};
use crate::camera::Point;
use crate::consts::PREVIEW_DASH;
use crate::doc::{Drawable, DrawableId, MeasureTag, Shape, Style};
use crate::engine::{Action, MeasurementKind};
use crate::geometry::{axis_snap, format_distance};
use crate::grid::{SnapSite, snap_active, snap_to_grid};
use crate::input::PointerEvent;
use crate::mode::Mode;

#[derive(Debug, Default)]
pub struct DistanceTool {
    start: Option<Point>,
    marker: Option<DrawableId>,
    line: Option<DrawableId>,
}

/// Apply the grid and axis snapping rules to a raw world endpoint.
fn snapped_endpoint(ctx: &ToolCtx<'_>, start: Option<Point>, ev: &PointerEvent) -> Point {
    let mut p = ctx.world(ev.screen);
    if snap_active(SnapSite::DistanceEndpoint, ctx.grid, ev.modifiers, ev.kind) {
        p = snap_to_grid(p, ctx.grid, *ctx.scale, ctx.viewport);
    }
    match start {
        Some(s) if ev.modifiers.ctrl => axis_snap(s, p),
        _ => p,
    }
}

/// Filled triangle with its tip at `tip`, pointing along `dir` (unit).
fn arrowhead(tip: Point, dir: Point, size: f64, style: &Style) -> Drawable {
    let base = Point::new(tip.x - dir.x * size, tip.y - dir.y * size);
    let (nx, ny) = (-dir.y * size / 2.0, dir.x * size / 2.0);
    let points = vec![tip, Point::new(base.x + nx, base.y + ny), Point::new(base.x - nx, base.y - ny)];
    Drawable::new(Shape::Polygon { points }, 0.0, 0.0, style.clone())
}

/// The committed annotation: line, two inward arrowheads, centered label.
fn annotation(ctx: &ToolCtx<'_>, a: Point, b: Point, label: &str) -> Drawable {
    let cfg = ctx.config;
    let width = cfg.distance_stroke_width;
    let line_style = Style::stroked(&cfg.distance_color, width);
    let head_style = line_style.clone().with_fill(&cfg.distance_color);
    let size = width * cfg.arrow_size_factor;

    let len = a.distance_to(b);
    let dir = if len > 0.0 { Point::new((b.x - a.x) / len, (b.y - a.y) / len) } else { Point::new(1.0, 0.0) };
    let back = Point::new(-dir.x, -dir.y);

    let text = Drawable::new(
        Shape::Text { text: label.to_owned(), font_size: cfg.label_font_size },
        0.0,
        0.0,
        Style::stroked(&cfg.distance_color, 0.0).with_fill(&cfg.distance_color),
    );
    // label sits just off the line, on the left-hand normal
    let mid = a.midpoint(b);
    let offset = cfg.label_font_size;
    let label_at = Point::new(mid.x + dir.y * offset, mid.y - dir.x * offset);

    let children = vec![
        Drawable::new(Shape::Line { a, b }, 0.0, 0.0, line_style),
        arrowhead(b, dir, size, &head_style),
        arrowhead(a, back, size, &head_style),
        center_on(text, label_at),
    ];
    Drawable::new(Shape::Group { children }, 0.0, 0.0, Style::default())
        .with_tag(MeasureTag::Distance { a, b, label: label.to_owned() })
}

impl DistanceTool {
    fn discard(&mut self, ctx: &mut ToolCtx<'_>) {
        self.start = None;
        ctx.clear_preview(&mut self.marker);
        ctx.clear_preview(&mut self.line);
    }

    fn finish(&mut self, ctx: &mut ToolCtx<'_>, a: Point, b: Point) {
        self.discard(ctx);
        let Some(scale) = *ctx.scale else {
            ctx.fail(&ToolError::NoScale);
            ctx.render();
            return;
        };
        let label = format_distance(a.distance_to(b), scale);
        let group = annotation(ctx, a, b, &label);
        let id = ctx.scene.add(group);
        debug!(%id, %label, "distance annotation added");
        ctx.emit(Action::MeasurementAdded { kind: MeasurementKind::Distance, id });
        ctx.commit();
    }
}

impl ToolHandler for DistanceTool {
    fn mode(&self) -> Mode {
        Mode::MeasureDistance
    }

    fn exit(&mut self, ctx: &mut ToolCtx<'_>) {
        self.discard(ctx);
    }

    fn pointer_down(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        if !ev.is_primary() {
            return;
        }
        let end = snapped_endpoint(ctx, self.start, ev);
        if let Some(start) = self.start {
            self.finish(ctx, start, end);
            return;
        }
        self.start = Some(end);
        let color = ctx.config.distance_color.clone();
        let dot = marker(ctx, end, &color);
        ctx.show_preview(&mut self.marker, dot);
        let style = Style::stroked(&color, ctx.config.distance_stroke_width).dashed(PREVIEW_DASH);
        ctx.show_preview(&mut self.line, Drawable::new(Shape::Line { a: end, b: end }, 0.0, 0.0, style));
        ctx.render();
    }

    fn pointer_move(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        let Some(start) = self.start else {
            return;
        };
        let end = snapped_endpoint(ctx, Some(start), ev);
        if let Some(d) = ctx.preview_mut(self.line) {
            d.shape = Shape::Line { a: start, b: end };
        }
        ctx.render();
    }

    fn capturing(&self) -> bool {
        self.start.is_some()
    }
}
