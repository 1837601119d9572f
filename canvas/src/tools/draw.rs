//! Draw mode: line, rectangle and circle by press-drag-release; freehand by
//! collecting the pointer path.

use tracing::debug;

use super::{ToolCtx, ToolHandler};
use crate::camera::Point;
use crate::doc::{Drawable, DrawableId, Shape, Style};
use crate::engine::Action;
use crate::geometry::Rect;
use crate::input::PointerEvent;
use crate::mode::{DrawPrimitive, Mode, Placeable};

pub struct DrawTool {
    primitive: DrawPrimitive,
    anchor: Option<Point>,
    path: Vec<Point>,
    preview: Option<DrawableId>,
}

impl DrawTool {
    pub fn new(primitive: DrawPrimitive) -> Self {
        Self { primitive, anchor: None, path: Vec::new(), preview: None }
    }

    /// Shape spanning `anchor`..`to` (or the collected path), with its
    /// placement. `None` when the gesture produced nothing visible.
    fn shape(&self, anchor: Point, to: Point) -> Option<(Shape, Point)> {
        let origin = Point::default();
        match self.primitive {
            DrawPrimitive::Line => (anchor != to).then_some((Shape::Line { a: anchor, b: to }, origin)),
            DrawPrimitive::Rectangle => {
                let r = Rect::from_corners(anchor, to);
                (!r.is_empty()).then_some((Shape::Rect { width: r.width, height: r.height }, Point::new(r.left, r.top)))
            }
            DrawPrimitive::Circle => {
                let radius = anchor.distance_to(to);
                (radius > 0.0).then_some((Shape::Circle { radius }, Point::new(anchor.x - radius, anchor.y - radius)))
            }
            DrawPrimitive::Freehand => {
                (self.path.len() >= 2).then(|| (Shape::Path { points: self.path.clone() }, origin))
            }
        }
    }
}

impl ToolHandler for DrawTool {
    fn mode(&self) -> Mode {
        Mode::Draw
    }

    fn exit(&mut self, ctx: &mut ToolCtx<'_>) {
        self.anchor = None;
        self.path.clear();
        ctx.clear_preview(&mut self.preview);
    }

    fn set_placeable(&mut self, ctx: &mut ToolCtx<'_>, placeable: &Placeable) {
        if let Placeable::Draw(p) = placeable {
            self.exit(ctx);
            self.primitive = *p;
        }
    }

    fn pointer_down(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        if !ev.is_primary() {
            return;
        }
        let world = ctx.world(ev.screen);
        self.anchor = Some(world);
        self.path = vec![world];
    }

    fn pointer_move(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        let Some(anchor) = self.anchor else {
            return;
        };
        let world = ctx.world(ev.screen);
        if self.primitive == DrawPrimitive::Freehand {
            self.path.push(world);
        }
        match self.shape(anchor, world) {
            Some((shape, at)) => {
                if let Some(d) = ctx.preview_mut(self.preview) {
                    d.shape = shape;
                    d.left = at.x;
                    d.top = at.y;
                } else {
                    let style = Style::stroked(ctx.stroke_color, ctx.config.stroke_width);
                    ctx.show_preview(&mut self.preview, Drawable::new(shape, at.x, at.y, style));
                }
            }
            None => ctx.clear_preview(&mut self.preview),
        }
        ctx.render();
    }

    fn pointer_up(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        let Some(anchor) = self.anchor.take() else {
            return;
        };
        ctx.clear_preview(&mut self.preview);
        let world = ctx.world(ev.screen);
        if self.primitive == DrawPrimitive::Freehand && self.path.last() != Some(&world) {
            self.path.push(world);
        }
        let shape = self.shape(anchor, world);
        self.path.clear();
        let Some((shape, at)) = shape else {
            debug!(primitive = ?self.primitive, "zero-size shape discarded");
            ctx.render();
            return;
        };

        let color = ctx.stroke_color.to_owned();
        let id = ctx.scene.add(Drawable::new(shape, at.x, at.y, Style::stroked(&color, ctx.config.stroke_width)));
        debug!(%id, primitive = ?self.primitive, "shape drawn");
        if ctx.colors.push(&color) {
            let entries = ctx.colors.entries().to_vec();
            ctx.emit(Action::ColorHistoryChanged(entries));
        }
        ctx.commit();
    }

    fn capturing(&self) -> bool {
        self.anchor.is_some()
    }
}
