//! Scale calibration (`measure` mode): two clicks draw a reference line,
//! the user types its real length, and the scale becomes px per mm.

use tracing::debug;

use super::{ToolCtx, ToolError, ToolHandler};
use crate::camera::Point;
use crate::consts::{PREVIEW_DASH, PREVIEW_STROKE};
use crate::doc::{Drawable, DrawableId, Shape, Style};
use crate::engine::Action;
use crate::input::PointerEvent;
use crate::mode::Mode;
use crate::prompt::parse_positive_mm;

#[derive(Debug, Default)]
pub struct CalibrateTool {
    start: Option<Point>,
    line: Option<DrawableId>,
}

impl CalibrateTool {
    fn finish(&mut self, ctx: &mut ToolCtx<'_>, start: Point, end: Point) {
        ctx.clear_preview(&mut self.line);
        ctx.render();
        let pixel_length = start.distance_to(end);
        if pixel_length <= 0.0 {
            ctx.fail(&ToolError::ZeroLength);
            return;
        }
        let Some(raw) = ctx.prompts.calibration_distance_mm(pixel_length) else {
            debug!("calibration cancelled");
            ctx.switch_mode(Mode::Select);
            return;
        };
        let Some(real_mm) = parse_positive_mm(&raw) else {
            ctx.fail(&ToolError::InvalidDistance(raw));
            return;
        };
        let scale = pixel_length / real_mm;
        debug!(pixel_length, real_mm, scale, "scale calibrated");
        *ctx.scale = Some(scale);
        ctx.emit(Action::ScaleChanged(Some(scale)));
        ctx.switch_mode(Mode::Select);
    }
}

impl ToolHandler for CalibrateTool {
    fn mode(&self) -> Mode {
        Mode::Measure
    }

    fn exit(&mut self, ctx: &mut ToolCtx<'_>) {
        self.start = None;
        ctx.clear_preview(&mut self.line);
    }

    fn pointer_down(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        if !ev.is_primary() {
            return;
        }
        let world = ctx.world(ev.screen);
        if let Some(start) = self.start.take() {
            self.finish(ctx, start, world);
            return;
        }
        self.start = Some(world);
        let style = Style::stroked(PREVIEW_STROKE, ctx.screen_len(2.0)).dashed(PREVIEW_DASH);
        ctx.show_preview(&mut self.line, Drawable::new(Shape::Line { a: world, b: world }, 0.0, 0.0, style));
        ctx.render();
    }

    fn pointer_move(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        let Some(start) = self.start else {
            return;
        };
        let world = ctx.world(ev.screen);
        if let Some(d) = ctx.preview_mut(self.line) {
            d.shape = Shape::Line { a: start, b: world };
        }
        ctx.render();
    }

    fn capturing(&self) -> bool {
        self.start.is_some()
    }
}
