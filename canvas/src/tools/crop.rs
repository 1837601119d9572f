//! Crop: rubber-band a region, confirm, extract it from the background at
//! native resolution.
//!
//! First primary press anchors a corner; moves resize the dashed preview in
//! any quadrant; a second primary press finishes and asks for confirmation.

use tracing::debug;

use super::{ToolCtx, ToolError, ToolHandler};
use crate::camera::Point;
use crate::consts::{PREVIEW_DASH, PREVIEW_STROKE};
use crate::doc::{Drawable, DrawableId, Shape, Style};
use crate::engine::Action;
use crate::geometry::Rect;
use crate::input::PointerEvent;
use crate::mode::Mode;
use crate::raster::{Placement, RasterError};

#[derive(Debug, Default)]
pub struct CropTool {
    anchor: Option<Point>,
    preview: Option<DrawableId>,
}

/// Dashed, unfilled rectangle preview at `rect`.
pub(super) fn band(rect: Rect, zoom: f64) -> Drawable {
    Drawable::new(
        Shape::Rect { width: rect.width, height: rect.height },
        rect.left,
        rect.top,
        Style::stroked(PREVIEW_STROKE, 1.0 / zoom).dashed(PREVIEW_DASH),
    )
}

/// Resize a rubber-band preview to span `anchor`..`corner`.
pub(super) fn resize_band(ctx: &mut ToolCtx<'_>, slot: Option<DrawableId>, anchor: Point, corner: Point) {
    let rect = Rect::from_corners(anchor, corner);
    if let Some(d) = ctx.preview_mut(slot) {
        d.left = rect.left;
        d.top = rect.top;
        d.shape = Shape::Rect { width: rect.width, height: rect.height };
    }
    ctx.render();
}

/// Background raster plus its world placement.
pub(super) fn background_placement(ctx: &ToolCtx<'_>) -> Result<(DrawableId, Placement), RasterError> {
    let bg = ctx.scene.background().ok_or(RasterError::NoBackground)?;
    let placement = Placement { left: bg.left, top: bg.top, scale_x: bg.scale_x, scale_y: bg.scale_y };
    Ok((bg.id, placement))
}

impl CropTool {
    fn finish(&mut self, ctx: &mut ToolCtx<'_>, corner: Point) {
        let Some(anchor) = self.anchor.take() else {
            return;
        };
        ctx.clear_preview(&mut self.preview);
        ctx.render();
        let region = Rect::from_corners(anchor, corner);
        if region.is_empty() {
            debug!("crop region empty, ignored");
            return;
        }
        if !ctx.prompts.confirm_crop(&region) {
            debug!("crop cancelled");
            return;
        }
        match extract(ctx, &region) {
            Ok(action) => ctx.emit(action),
            Err(e) => ctx.fail(&e),
        }
    }
}

/// Sample the background under `region`; pan and zoom play no part.
fn extract(ctx: &ToolCtx<'_>, region: &Rect) -> Result<Action, ToolError> {
    let (id, placement) = background_placement(ctx)?;
    let image = match ctx.scene.get(id).map(|d| &d.shape) {
        Some(Shape::Background { image }) => image.extract(region, &placement)?,
        _ => return Err(RasterError::NoBackground.into()),
    };
    debug!(width = image.width, height = image.height, "crop extracted");
    Ok(Action::CropExtracted { region: *region, image })
}

impl ToolHandler for CropTool {
    fn mode(&self) -> Mode {
        Mode::Crop
    }

    fn exit(&mut self, ctx: &mut ToolCtx<'_>) {
        self.anchor = None;
        ctx.clear_preview(&mut self.preview);
    }

    fn pointer_down(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        if !ev.is_primary() {
            return;
        }
        let world = ctx.world(ev.screen);
        if self.anchor.is_some() {
            self.finish(ctx, world);
            return;
        }
        self.anchor = Some(world);
        let zoom = ctx.viewport.zoom();
        ctx.show_preview(&mut self.preview, band(Rect::from_corners(world, world), zoom));
        ctx.render();
    }

    fn pointer_move(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        if let Some(anchor) = self.anchor {
            let world = ctx.world(ev.screen);
            resize_band(ctx, self.preview, anchor, world);
        }
    }

    fn capturing(&self) -> bool {
        self.anchor.is_some()
    }
}
