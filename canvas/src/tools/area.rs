//! Area and volume measuring: capture a polygon vertex by vertex, close it
//! near the first vertex, label it with m² (and m³ when a room height was
//! given).
//!
//! Each vertex is a press-drag-release: the press drops a draft marker that
//! follows the pointer, the release commits it. A release within the close
//! threshold of the first vertex, with at least three committed, closes the
//! polygon instead.

use tracing::{debug, warn};
use uuid::Uuid;

use super::{ToolCtx, ToolError, ToolHandler};
use crate::camera::Point;
use crate::consts::{MARKER_RADIUS_PX, PREVIEW_DASH, PREVIEW_STROKE};
use crate::doc::{Drawable, DrawableId, MeasureTag, Shape, Style};
use crate::engine::{Action, MeasurementKind};
use crate::geometry::{centroid, format_area_label, pixel_area_to_m2, points_near, polygon_area, volume_m3};
use crate::input::PointerEvent;
use crate::mode::Mode;

pub struct AreaTool {
    mode: Mode,
    height_mm: Option<f64>,
    vertices: Vec<Point>,
    pressing: bool,
    draft: Option<DrawableId>,
    markers: Vec<DrawableId>,
    outline: Option<DrawableId>,
    /// Background id and its interactivity before entry.
    bg_prior: Option<(DrawableId, bool)>,
}

/// Small filled circle centered on `at`, `MARKER_RADIUS_PX` on screen.
pub(super) fn marker(ctx: &ToolCtx<'_>, at: Point, color: &str) -> Drawable {
    let r = ctx.screen_len(MARKER_RADIUS_PX);
    Drawable::new(Shape::Circle { radius: r }, at.x - r, at.y - r, Style::stroked(color, 0.0).with_fill(color))
}

/// Center a drawable's bounds on `at`.
pub(super) fn center_on(mut d: Drawable, at: Point) -> Drawable {
    let b = d.bounds();
    d.left = at.x - b.width / 2.0;
    d.top = at.y - b.height / 2.0;
    d
}

impl AreaTool {
    pub fn new(mode: Mode, height_mm: Option<f64>) -> Self {
        Self {
            mode,
            height_mm,
            vertices: Vec::new(),
            pressing: false,
            draft: None,
            markers: Vec::new(),
            outline: None,
            bg_prior: None,
        }
    }

    fn discard(&mut self, ctx: &mut ToolCtx<'_>) {
        self.pressing = false;
        self.vertices.clear();
        ctx.clear_preview(&mut self.draft);
        ctx.clear_preview(&mut self.outline);
        for id in self.markers.drain(..) {
            ctx.scene.remove(id);
        }
    }

    fn update_outline(&mut self, ctx: &mut ToolCtx<'_>, live: Point) {
        if self.vertices.is_empty() {
            return;
        }
        let mut points = self.vertices.clone();
        points.push(live);
        if let Some(d) = ctx.preview_mut(self.outline) {
            d.shape = Shape::Polyline { points };
            return;
        }
        let style = Style::stroked(&ctx.config.area_color, ctx.screen_len(1.5)).dashed(PREVIEW_DASH);
        let outline = Drawable::new(Shape::Polyline { points }, 0.0, 0.0, style);
        ctx.show_preview(&mut self.outline, outline);
    }

    /// Ring the first vertex while a release there would close the polygon.
    fn highlight_first(&self, ctx: &mut ToolCtx<'_>, screen: Point) {
        let (Some(first), Some(&id)) = (self.vertices.first(), self.markers.first()) else {
            return;
        };
        let near = self.vertices.len() >= 3
            && points_near(ctx.viewport.world_to_screen(*first), screen, ctx.config.first_point_threshold_px);
        let (stroke, width) =
            if near { (PREVIEW_STROKE, ctx.screen_len(2.0)) } else { (ctx.config.area_color.as_str(), 0.0) };
        let stroke = stroke.to_owned();
        if let Some(d) = ctx.scene.get_mut(id) {
            d.style.stroke = stroke;
            d.style.stroke_width = width;
        }
    }

    fn close(&mut self, ctx: &mut ToolCtx<'_>) {
        let points = std::mem::take(&mut self.vertices);
        self.discard(ctx);
        ctx.render();
        let Some(scale) = *ctx.scale else {
            ctx.fail(&ToolError::NoScale);
            return;
        };
        if points.len() < 3 {
            ctx.fail(&ToolError::DegeneratePolygon(points.len()));
            return;
        }

        let area_m2 = pixel_area_to_m2(polygon_area(&points), scale);
        let volume = self.height_mm.map(|h| volume_m3(area_m2, h));
        let measurement = Uuid::new_v4();
        let tag = MeasureTag::Area { measurement, area_m2, volume_m3: volume };
        let cfg = ctx.config;

        let mut fill = Style::stroked(&cfg.area_color, ctx.screen_len(2.0)).with_fill(&cfg.area_color);
        fill.opacity = cfg.area_opacity;
        let label_at = centroid(&points);
        let polygon = Drawable::new(Shape::Polygon { points }, 0.0, 0.0, fill).with_tag(tag.clone());
        let text = format_area_label(area_m2, volume);
        let label = Drawable::new(
            Shape::Text { text, font_size: cfg.label_font_size },
            0.0,
            0.0,
            Style::stroked(&cfg.area_color, 0.0).with_fill("#000000"),
        )
        .with_tag(tag);

        ctx.scene.add(polygon);
        ctx.scene.add(center_on(label, label_at));
        debug!(%measurement, area_m2, ?volume, "area measurement added");
        ctx.emit(Action::MeasurementAdded { kind: MeasurementKind::Area, id: measurement });
        ctx.commit();
    }
}

impl ToolHandler for AreaTool {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn enter(&mut self, ctx: &mut ToolCtx<'_>) {
        let Some((id, prior)) = ctx.scene.background().map(|d| (d.id, d.interactive)) else {
            warn!("background not found, nothing to lock");
            return;
        };
        self.bg_prior = Some((id, prior));
        if let Some(bg) = ctx.scene.get_mut(id) {
            bg.interactive = false;
        }
    }

    fn exit(&mut self, ctx: &mut ToolCtx<'_>) {
        self.discard(ctx);
        let Some((id, prior)) = self.bg_prior.take() else {
            return;
        };
        match ctx.scene.get_mut(id) {
            Some(bg) => bg.interactive = prior,
            None => warn!(%id, "background not found, lock not restored"),
        }
    }

    fn pointer_down(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        if !ev.is_primary() || self.pressing {
            return;
        }
        self.pressing = true;
        let world = ctx.world(ev.screen);
        let draft = marker(ctx, world, &ctx.config.area_color);
        ctx.show_preview(&mut self.draft, draft);
        ctx.render();
    }

    fn pointer_move(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        let world = ctx.world(ev.screen);
        if self.pressing {
            let r = ctx.screen_len(MARKER_RADIUS_PX);
            if let Some(d) = ctx.preview_mut(self.draft) {
                d.left = world.x - r;
                d.top = world.y - r;
            }
        }
        self.update_outline(ctx, world);
        self.highlight_first(ctx, ev.screen);
        ctx.render();
    }

    fn pointer_up(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        if !self.pressing {
            return;
        }
        self.pressing = false;
        ctx.clear_preview(&mut self.draft);
        let world = ctx.world(ev.screen);

        let closes = self.vertices.first().is_some_and(|first| {
            let first_screen = ctx.viewport.world_to_screen(*first);
            points_near(first_screen, ev.screen, ctx.config.close_threshold_px)
        });
        if closes && self.vertices.len() >= 3 {
            self.close(ctx);
            return;
        }

        self.vertices.push(world);
        let m = marker(ctx, world, &ctx.config.area_color);
        self.markers.push(ctx.scene.add(m.into_preview()));
        self.update_outline(ctx, world);
        ctx.render();
    }

    fn capturing(&self) -> bool {
        self.pressing || !self.vertices.is_empty()
    }
}
