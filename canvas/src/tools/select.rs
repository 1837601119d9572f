//! Idle mode: click to select, drag to move with optional grid snapping.

use tracing::debug;

use super::{ToolCtx, ToolHandler};
use crate::camera::Point;
use crate::doc::{Drawable, DrawableId};
use crate::grid::{SnapSite, snap_active, snap_to_grid};
use crate::input::PointerEvent;
use crate::mode::Mode;

#[derive(Debug, Default)]
enum Gesture {
    #[default]
    Idle,
    Dragging {
        id: DrawableId,
        /// World pointer position at press.
        start_world: Point,
        /// Bounds top-left at press.
        orig_corner: Point,
        moved: bool,
    },
}

#[derive(Debug, Default)]
pub struct SelectTool {
    gesture: Gesture,
}

/// Move `drawable` so its bounds' top-left corner lands on `snap(corner)`.
///
/// Works for every shape kind: point-based shapes keep their local points
/// and only their offset changes. Returns the corner actually applied.
pub fn snap_object(drawable: &mut Drawable, corner: Point, snap: impl Fn(Point) -> Point) -> Point {
    let bounds = drawable.bounds();
    let (off_x, off_y) = (bounds.left - drawable.left, bounds.top - drawable.top);
    let snapped = snap(corner);
    drawable.left = snapped.x - off_x;
    drawable.top = snapped.y - off_y;
    snapped
}

impl ToolHandler for SelectTool {
    fn mode(&self) -> Mode {
        Mode::Select
    }

    /// An unfinished drag puts the object back where the press found it.
    fn exit(&mut self, ctx: &mut ToolCtx<'_>) {
        if let Gesture::Dragging { id, orig_corner, moved: true, .. } = std::mem::take(&mut self.gesture) {
            if let Some(d) = ctx.scene.get_mut(id) {
                snap_object(d, orig_corner, |p| p);
                debug!(%id, "drag abandoned, object restored");
                ctx.render();
            }
        }
    }

    fn pointer_down(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        if !ev.is_primary() || !ctx.scene.selection_enabled() {
            return;
        }
        let world = ctx.world(ev.screen);
        let hit = ctx.scene.hit_test(world);
        ctx.scene.set_active(hit);
        self.gesture = match hit.and_then(|id| ctx.scene.get(id)) {
            Some(d) => {
                let b = d.bounds();
                Gesture::Dragging {
                    id: d.id,
                    start_world: world,
                    orig_corner: Point::new(b.left, b.top),
                    moved: false,
                }
            }
            None => Gesture::Idle,
        };
        ctx.render();
    }

    fn pointer_move(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent) {
        let Gesture::Dragging { id, start_world, orig_corner, moved } = &mut self.gesture else {
            return;
        };
        let world = ctx.world(ev.screen);
        let target = Point::new(orig_corner.x + world.x - start_world.x, orig_corner.y + world.y - start_world.y);
        let snapping = snap_active(SnapSite::ObjectDrag, ctx.grid, ev.modifiers, ev.kind);
        let (grid, scale, viewport) = (*ctx.grid, *ctx.scale, *ctx.viewport);
        let Some(d) = ctx.scene.get_mut(*id) else {
            self.gesture = Gesture::Idle;
            return;
        };
        snap_object(d, target, |p| if snapping { snap_to_grid(p, &grid, scale, &viewport) } else { p });
        *moved = true;
        ctx.render();
    }

    fn pointer_up(&mut self, ctx: &mut ToolCtx<'_>, _ev: &PointerEvent) {
        if let Gesture::Dragging { id, moved: true, .. } = std::mem::take(&mut self.gesture) {
            debug!(%id, "object modified");
            ctx.commit();
        }
    }

    fn capturing(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }
}
