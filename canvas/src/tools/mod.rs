//! Per-mode gesture controllers.
//!
//! Exactly one [`ToolHandler`] is installed at a time. The engine calls
//! `enter` when a mode becomes active and `exit` when it is left (including
//! on Escape and around undo/redo), so a handler can force scene-wide flags
//! on entry and must put them back, and drop its previews, on exit.

mod area;
mod calibrate;
mod crop;
mod distance;
mod draw;
mod erase;
mod idle;
mod place;
mod select;

#[cfg(test)]
#[path = "tools_test.rs"]
mod tools_test;

pub use select::snap_object;

use tracing::{debug, warn};

use crate::camera::{Point, Viewport};
use crate::color::ColorHistory;
use crate::config::CanvasConfig;
use crate::doc::{Drawable, DrawableId};
use crate::engine::{Action, ToastLevel};
use crate::grid::GridSettings;
use crate::history::SceneHistory;
use crate::input::PointerEvent;
use crate::mode::{DrawPrimitive, Mode, Placeable};
use crate::prompt::Prompts;
use crate::raster::RasterError;
use crate::scene::{Scene, SceneError};

/// Refused or failed tool operations. Always absorbed into a toast.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("set a scale before measuring")]
    NoScale,
    #[error("invalid distance: {0:?}")]
    InvalidDistance(String),
    #[error("invalid room height: {0:?}")]
    InvalidHeight(String),
    #[error("a polygon needs at least 3 points, got {0}")]
    DegeneratePolygon(usize),
    #[error("calibration line has no length")]
    ZeroLength,
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Everything a handler may read or touch while processing one event.
pub struct ToolCtx<'a> {
    pub scene: &'a mut dyn Scene,
    pub viewport: &'a Viewport,
    pub grid: &'a GridSettings,
    /// Scale calibration in px/mm; calibration writes it.
    pub scale: &'a mut Option<f64>,
    pub config: &'a CanvasConfig,
    pub prompts: &'a mut dyn Prompts,
    pub history: &'a mut SceneHistory,
    pub colors: &'a mut ColorHistory,
    pub stroke_color: &'a str,
    /// Notifications produced by this event.
    pub actions: Vec<Action>,
    /// Mode the handler wants the engine to switch to afterwards.
    pub next_mode: Option<Mode>,
}

impl ToolCtx<'_> {
    /// Screen point to world, against the live viewport.
    #[must_use]
    pub fn world(&self, screen: Point) -> Point {
        self.viewport.screen_to_world(screen)
    }

    /// A length given in screen pixels, in world units at the current zoom.
    #[must_use]
    pub fn screen_len(&self, px: f64) -> f64 {
        self.viewport.screen_dist_to_world(px)
    }

    pub fn emit(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.actions.push(Action::Toast { level, message: message.into() });
    }

    /// Log and surface an absorbed failure.
    pub fn fail(&mut self, err: &ToolError) {
        warn!(error = %err, "tool operation refused");
        let level = match err {
            ToolError::NoScale | ToolError::InvalidDistance(_) | ToolError::InvalidHeight(_) => ToastLevel::Warning,
            _ => ToastLevel::Error,
        };
        self.toast(level, err.to_string());
    }

    /// Snapshot the scene after a confirmed commit.
    pub fn commit(&mut self) {
        if let Err(e) = self.history.save(&*self.scene) {
            self.fail(&ToolError::Scene(e));
        }
        self.render();
    }

    pub fn render(&mut self) {
        self.scene.request_render();
        self.actions.push(Action::RenderNeeded);
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        self.next_mode = Some(mode);
    }

    /// Add a preview drawable and remember its id in `slot`.
    pub fn show_preview(&mut self, slot: &mut Option<DrawableId>, drawable: Drawable) {
        self.clear_preview(slot);
        *slot = Some(self.scene.add(drawable.into_preview()));
    }

    /// Remove the preview held in `slot`, if any.
    pub fn clear_preview(&mut self, slot: &mut Option<DrawableId>) {
        if let Some(id) = slot.take() {
            self.scene.remove(id);
        }
    }

    /// Mutable access to a live preview.
    pub fn preview_mut(&mut self, slot: Option<DrawableId>) -> Option<&mut Drawable> {
        slot.and_then(|id| self.scene.get_mut(id))
    }
}

/// A mode's event handlers.
pub trait ToolHandler {
    fn mode(&self) -> Mode;

    /// Install scene-wide state for this mode.
    fn enter(&mut self, _ctx: &mut ToolCtx<'_>) {}

    /// Drop previews and in-progress state; undo anything `enter` forced.
    fn exit(&mut self, _ctx: &mut ToolCtx<'_>) {}

    fn pointer_down(&mut self, ctx: &mut ToolCtx<'_>, ev: &PointerEvent);

    fn pointer_move(&mut self, _ctx: &mut ToolCtx<'_>, _ev: &PointerEvent) {}

    fn pointer_up(&mut self, _ctx: &mut ToolCtx<'_>, _ev: &PointerEvent) {}

    /// The externally selected placeable changed while this mode is active.
    fn set_placeable(&mut self, _ctx: &mut ToolCtx<'_>, _placeable: &Placeable) {}

    /// A multi-step capture is in flight; history must not run.
    fn capturing(&self) -> bool {
        false
    }
}

/// Per-mode construction inputs collected before the mode becomes active.
#[derive(Debug, Clone, Default)]
pub struct ToolSetup {
    /// Room height for volume measuring.
    pub height_mm: Option<f64>,
    pub placeable: Option<Placeable>,
}

/// Build the handler for `mode`.
#[must_use]
pub fn for_mode(mode: Mode, setup: ToolSetup) -> Box<dyn ToolHandler> {
    debug!(%mode, "installing tool");
    match mode {
        Mode::None | Mode::Move => Box::new(idle::IdleTool::new(mode)),
        Mode::Select => Box::new(select::SelectTool::default()),
        Mode::Crop => Box::new(crop::CropTool::default()),
        Mode::Measure => Box::new(calibrate::CalibrateTool::default()),
        Mode::MeasureArea => Box::new(area::AreaTool::new(Mode::MeasureArea, None)),
        Mode::MeasureVolume => Box::new(area::AreaTool::new(Mode::MeasureVolume, setup.height_mm)),
        Mode::MeasureDistance => Box::new(distance::DistanceTool::default()),
        Mode::Erase => Box::new(erase::EraseTool::default()),
        Mode::PlaceSymbol => Box::new(place::PlaceTool::new(setup.placeable)),
        Mode::Draw => {
            let primitive = match setup.placeable {
                Some(Placeable::Draw(p)) => p,
                _ => DrawPrimitive::Freehand,
            };
            Box::new(draw::DrawTool::new(primitive))
        }
    }
}
