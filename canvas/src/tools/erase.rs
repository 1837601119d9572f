//! Erase: press-drag-release a rectangle and paint it white into the
//! background raster.

use tracing::debug;

use super::crop::{background_placement, band, resize_band};
use super::{ToolCtx, ToolError, ToolHandler};
use crate::camera::Point;
use crate::doc::{DrawableId, Shape};
use crate::engine::Action;
use crate::geometry::Rect;
use crate::input::PointerEvent;
use crate::mode::Mode;
use crate::raster::RasterError;

#[derive(Debug, Default)]
pub struct EraseTool {
    anchor: Option<Point>,
    preview: Option<DrawableId>,
}

/// Flatten `region` into the background and swap the new raster in place.
fn flatten_background(ctx: &mut ToolCtx<'_>, region: &Rect) -> Result<(), ToolError> {
    let (id, placement) = background_placement(ctx)?;
    let Some(bg) = ctx.scene.get_mut(id) else {
        return Err(RasterError::NoBackground.into());
    };
    let Shape::Background { image } = &mut bg.shape else {
        return Err(RasterError::NoBackground.into());
    };
    *image = image.flatten(region, &placement)?;
    Ok(())
}

impl ToolHandler for EraseTool {
    fn mode(&self) -> Mode {
        Mode::Erase
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

    fn pointer_up(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        let Some(anchor) = self.anchor.take() else {
            return;
        };
        ctx.clear_preview(&mut self.preview);
        let region = Rect::from_corners(anchor, ctx.world(ev.screen));
        if region.is_empty() {
            ctx.render();
            return;
        }
        match flatten_background(ctx, &region) {
            Ok(()) => {
                debug!(?region, "background region erased");
                ctx.emit(Action::BackgroundChanged);
                ctx.commit();
            }
            Err(e) => {
                ctx.fail(&e);
                ctx.render();
            }
        }
    }

    fn capturing(&self) -> bool {
        self.anchor.is_some()
    }
}
