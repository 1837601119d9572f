//! Symbol and text placement with a cursor-following preview.
//!
//! One preview drawable is kept for the current placeable and repositioned
//! on every move; it is recreated only when the placeable changes.

use tracing::debug;

use super::{ToolCtx, ToolHandler};
use crate::camera::Point;
use crate::consts::DEFAULT_TEXT;
use crate::doc::{Drawable, DrawableId, Shape, Style};
use crate::engine::Action;
use crate::grid::{SnapSite, snap_active, snap_to_grid};
use crate::input::PointerEvent;
use crate::mode::{Mode, Placeable};

pub struct PlaceTool {
    placeable: Option<Placeable>,
    preview: Option<DrawableId>,
}

impl PlaceTool {
    pub fn new(placeable: Option<Placeable>) -> Self {
        Self { placeable, preview: None }
    }

    /// Cursor position in world space, grid-snapped when Ctrl/Meta (or touch
    /// over a visible grid) asks for it.
    fn target(ctx: &ToolCtx<'_>, ev: &PointerEvent) -> Point {
        let world = ctx.world(ev.screen);
        if snap_active(SnapSite::SymbolPlacement, ctx.grid, ev.modifiers, ev.kind) {
            snap_to_grid(world, ctx.grid, *ctx.scale, ctx.viewport)
        } else {
            world
        }
    }
}

/// A fresh drawable for `placeable` with its top-left at `at`.
fn build(ctx: &ToolCtx<'_>, placeable: &Placeable, at: Point) -> Option<Drawable> {
    let cfg = ctx.config;
    let shape = match placeable {
        Placeable::Symbol(key) => Shape::Symbol { symbol: key.clone(), width: cfg.symbol_size, height: cfg.symbol_size },
        Placeable::Text => Shape::Text { text: DEFAULT_TEXT.to_owned(), font_size: cfg.label_font_size },
        Placeable::Draw(_) => return None,
    };
    Some(Drawable::new(shape, at.x, at.y, Style::stroked(ctx.stroke_color, cfg.stroke_width)))
}

impl ToolHandler for PlaceTool {
    fn mode(&self) -> Mode {
        Mode::PlaceSymbol
    }

    fn exit(&mut self, ctx: &mut ToolCtx<'_>) {
        ctx.clear_preview(&mut self.preview);
    }

    fn set_placeable(&mut self, ctx: &mut ToolCtx<'_>, placeable: &Placeable) {
        if self.placeable.as_ref() != Some(placeable) {
            ctx.clear_preview(&mut self.preview);
            ctx.render();
        }
        self.placeable = Some(placeable.clone());
    }

    fn pointer_move(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        let Some(placeable) = &self.placeable else {
            return;
        };
        let at = Self::target(ctx, ev);
        if let Some(d) = ctx.preview_mut(self.preview) {
            d.left = at.x;
            d.top = at.y;
        } else if let Some(d) = build(ctx, placeable, at) {
            ctx.show_preview(&mut self.preview, d);
        }
        ctx.render();
    }

    fn pointer_down(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        if !ev.is_primary() {
            return;
        }
        let Some(placeable) = self.placeable.clone() else {
            return;
        };
        let at = Self::target(ctx, ev);
        if ctx.scene.hit_test(ctx.world(ev.screen)).is_some() {
            debug!("click landed on an existing object, not placing");
            return;
        }
        let Some(d) = build(ctx, &placeable, at) else {
            return;
        };
        let id = ctx.scene.add(d);
        debug!(%id, key = placeable.key(), "placed");
        ctx.emit(Action::SymbolPlaced { id, key: placeable.key().to_owned() });
        ctx.commit();

        if placeable == Placeable::Text {
            ctx.clear_preview(&mut self.preview);
            self.placeable = None;
            ctx.scene.set_active(Some(id));
            ctx.switch_mode(Mode::Select);
            ctx.emit(Action::EditTextRequested { id });
            ctx.emit(Action::PlaceableCleared);
        }
    }
}
