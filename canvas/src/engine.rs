//! The interaction engine: mode state machine plus input routing.
//!
//! [`Engine`] owns the active [`Mode`] and exactly one installed tool. Every
//! input event goes to the pan/zoom controller first (unless the mode blocks
//! it) and otherwise to the tool. Handlers return [`Action`]s for the host to
//! act on: status updates, toasts, extracted images, render requests.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::camera::{Point, Viewport, clamp_zoom};
use crate::color::ColorHistory;
use crate::config::CanvasConfig;
use crate::doc::{Drawable, DrawableId, MeasureTag, Shape};
use crate::geometry::Rect;
use crate::grid::{GridSettings, SnapSite, parse_grid_size, snap_active, snap_to_grid};
use crate::history::SceneHistory;
use crate::input::{Key, Modifiers, PointerEvent, PointerKind, WheelDelta};
use crate::mode::{Mode, Placeable};
use crate::pan_zoom::{PanZoom, wheel_zoom};
use crate::prompt::{Prompts, ScriptedPrompts, parse_positive_mm};
use crate::raster::{RasterError, RasterImage};
use crate::scene::{Scene, SceneStore};
use crate::tools::{self, ToolCtx, ToolError, ToolHandler, ToolSetup, snap_object};

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Area,
    Distance,
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ModeChanged(Mode),
    /// New scale calibration in px/mm.
    ScaleChanged(Option<f64>),
    ZoomChanged(f64),
    Toast { level: ToastLevel, message: String },
    /// A confirmed crop, at native background resolution.
    CropExtracted { region: Rect, image: RasterImage },
    SymbolPlaced { id: DrawableId, key: String },
    /// Open the text editor on a freshly placed label.
    EditTextRequested { id: DrawableId },
    /// The externally selected placeable should be deselected.
    PlaceableCleared,
    ColorHistoryChanged(Vec<String>),
    /// `id` is the measurement id for areas, the group id for distances.
    MeasurementAdded { kind: MeasurementKind, id: Uuid },
    /// The background raster was replaced.
    BackgroundChanged,
    RenderNeeded,
}

/// Counts derived by scanning the scene, so they follow undo/redo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeasurementCounts {
    pub areas: usize,
    pub distances: usize,
    pub symbols: usize,
}

fn toast(level: ToastLevel, message: impl Into<String>) -> Action {
    Action::Toast { level, message: message.into() }
}

/// Mode state machine, viewport, history and tool routing over a scene.
pub struct Engine<S: Scene = SceneStore, P: Prompts = ScriptedPrompts> {
    scene: S,
    prompts: P,
    config: CanvasConfig,
    viewport: Viewport,
    viewport_width: f64,
    viewport_height: f64,
    grid: GridSettings,
    /// Scale calibration in px/mm.
    scale: Option<f64>,
    mode: Mode,
    tool: Box<dyn ToolHandler>,
    placeable: Option<Placeable>,
    history: SceneHistory,
    colors: ColorHistory,
    stroke_color: String,
    pan: PanZoom,
}

impl Engine<SceneStore, ScriptedPrompts> {
    /// In-memory scene with scripted prompts.
    #[must_use]
    pub fn headless(config: CanvasConfig) -> Self {
        Self::new(SceneStore::new(), ScriptedPrompts::new(), config)
    }
}

impl<S: Scene, P: Prompts> Engine<S, P> {
    /// Start in `select` mode with selection enabled and no scale.
    #[must_use]
    pub fn new(mut scene: S, prompts: P, config: CanvasConfig) -> Self {
        scene.set_selection_enabled(true);
        Self {
            scene,
            prompts,
            viewport: Viewport::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            grid: GridSettings { visible: config.grid_visible, size_mm: config.grid_size_mm },
            scale: None,
            mode: Mode::Select,
            tool: tools::for_mode(Mode::Select, ToolSetup::default()),
            placeable: None,
            history: SceneHistory::new(config.history_capacity),
            colors: ColorHistory::new(config.color_history_len),
            stroke_color: config.stroke_color.clone(),
            pan: PanZoom::new(),
            config,
        }
    }

    // --- Tool plumbing ---

    /// Run `f` against the installed tool with a fresh context.
    fn run_tool(&mut self, f: impl FnOnce(&mut dyn ToolHandler, &mut ToolCtx<'_>)) -> (Vec<Action>, Option<Mode>) {
        let mut ctx = ToolCtx {
            scene: &mut self.scene,
            viewport: &self.viewport,
            grid: &self.grid,
            scale: &mut self.scale,
            config: &self.config,
            prompts: &mut self.prompts,
            history: &mut self.history,
            colors: &mut self.colors,
            stroke_color: &self.stroke_color,
            actions: Vec::new(),
            next_mode: None,
        };
        f(self.tool.as_mut(), &mut ctx);
        (ctx.actions, ctx.next_mode)
    }

    /// Run `f`, then honor any mode switch or placeable release it asked for.
    fn dispatch(&mut self, f: impl FnOnce(&mut dyn ToolHandler, &mut ToolCtx<'_>)) -> Vec<Action> {
        let (mut actions, next_mode) = self.run_tool(f);
        if actions.iter().any(|a| matches!(a, Action::PlaceableCleared)) {
            self.placeable = None;
        }
        if let Some(mode) = next_mode {
            let setup = self.setup_for(mode);
            actions.extend(self.transition(mode, setup));
        }
        actions
    }

    fn setup_for(&self, mode: Mode) -> ToolSetup {
        let placeable = self.placeable.clone().filter(|p| p.target_mode() == mode);
        ToolSetup { height_mm: None, placeable }
    }

    /// Swap tools unconditionally: exit the old one, apply the new mode's
    /// scene-wide flags, enter the new one.
    fn transition(&mut self, mode: Mode, setup: ToolSetup) -> Vec<Action> {
        let (mut actions, _) = self.run_tool(|tool, ctx| tool.exit(ctx));
        self.pan.reset();
        let previous = self.mode;
        self.mode = mode;
        self.tool = tools::for_mode(mode, setup);

        if self.placeable.as_ref().is_some_and(|p| p.target_mode() != mode) {
            self.placeable = None;
            actions.push(Action::PlaceableCleared);
        }
        if mode.clears_selection() {
            self.scene.set_active(None);
        }
        self.scene.set_selection_enabled(mode.allows_selection());

        let (entered, _) = self.run_tool(|tool, ctx| tool.enter(ctx));
        actions.extend(entered);
        debug!(from = %previous, to = %mode, "mode changed");
        self.scene.request_render();
        actions.push(Action::ModeChanged(mode));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Mode control ---

    /// Externally requested mode change.
    ///
    /// Measuring modes are refused without a scale. `measure-volume` asks for
    /// the room height first; cancelling or an invalid height leaves the
    /// current mode in place.
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        if mode.requires_scale() && self.scale.is_none() {
            warn!(%mode, "mode refused, no scale set");
            return vec![toast(ToastLevel::Warning, ToolError::NoScale.to_string())];
        }
        let mut setup = self.setup_for(mode);
        if mode == Mode::MeasureVolume {
            let Some(raw) = self.prompts.room_height_mm() else {
                debug!("room height prompt cancelled");
                return Vec::new();
            };
            let Some(height) = parse_positive_mm(&raw) else {
                let err = ToolError::InvalidHeight(raw);
                warn!(error = %err, "mode refused");
                return vec![toast(ToastLevel::Warning, err.to_string())];
            };
            setup.height_mm = Some(height);
        }
        self.transition(mode, setup)
    }

    /// Select (or, with `None`, deselect) the entity to place or draw.
    ///
    /// Draw primitives switch to `draw`, everything else to `place-symbol`.
    /// Deselecting while in one of those modes returns to `select`.
    pub fn select_placeable(&mut self, placeable: Option<Placeable>) -> Vec<Action> {
        let Some(p) = placeable else {
            let had = self.placeable.take().is_some();
            if had && matches!(self.mode, Mode::Draw | Mode::PlaceSymbol) {
                return self.transition(Mode::Select, ToolSetup::default());
            }
            return Vec::new();
        };
        let target = p.target_mode();
        self.placeable = Some(p.clone());
        if self.mode == target {
            self.dispatch(|tool, ctx| tool.set_placeable(ctx, &p))
        } else {
            self.set_mode(target)
        }
    }

    /// Global cancel: back to `select`, no selection, no previews.
    fn escape(&mut self) -> Vec<Action> {
        let actions = self.transition(Mode::Select, ToolSetup::default());
        self.scene.set_active(None);
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, ev: PointerEvent) -> Vec<Action> {
        if self.pan.wants_pan(&ev, self.mode) {
            self.pan.begin_pan(ev.screen);
            return Vec::new();
        }
        self.dispatch(|tool, ctx| tool.pointer_down(ctx, &ev))
    }

    pub fn on_pointer_move(&mut self, ev: PointerEvent) -> Vec<Action> {
        if self.pan.drag(&mut self.viewport, ev.screen) {
            self.scene.request_render();
            return vec![Action::RenderNeeded];
        }
        self.dispatch(|tool, ctx| tool.pointer_move(ctx, &ev))
    }

    pub fn on_pointer_up(&mut self, ev: PointerEvent) -> Vec<Action> {
        if self.pan.is_panning() {
            self.pan.end_pan();
            return Vec::new();
        }
        self.dispatch(|tool, ctx| tool.pointer_up(ctx, &ev))
    }

    /// Wheel zoom about the cursor. Ignored in tool modes.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        if self.mode.blocks_pan_zoom() {
            return Vec::new();
        }
        let zoom = wheel_zoom(&mut self.viewport, screen, delta, self.config.wheel_zoom_base);
        self.scene.request_render();
        vec![Action::ZoomChanged(zoom), Action::RenderNeeded]
    }

    /// Touch points changed to `touches` (screen space). Two or more start a
    /// pinch/pan gesture.
    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        if !self.mode.blocks_pan_zoom() {
            self.pan.touch_start(&self.viewport, touches);
        }
        Vec::new()
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        if self.mode.blocks_pan_zoom() || !self.pan.touch_move(&mut self.viewport, touches) {
            return Vec::new();
        }
        self.scene.request_render();
        vec![Action::ZoomChanged(self.viewport.zoom()), Action::RenderNeeded]
    }

    pub fn on_touch_end(&mut self) -> Vec<Action> {
        self.pan.touch_end();
        Vec::new()
    }

    /// Escape, space (pan), delete, and Ctrl/Cmd+Z / +Shift+Z / +Y.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is_escape() {
            return self.escape();
        }
        if key.is_space() {
            self.pan.set_space_held(true);
            return Vec::new();
        }
        let command = modifiers.ctrl || modifiers.meta;
        match key.0.as_str() {
            "z" | "Z" if command && modifiers.shift => self.redo(),
            "z" | "Z" if command => self.undo(),
            "y" | "Y" if command => self.redo(),
            "Delete" | "Backspace" if self.mode == Mode::Select => self.delete_active(),
            _ => Vec::new(),
        }
    }

    pub fn on_key_up(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_space() {
            self.pan.set_space_held(false);
        }
        Vec::new()
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        self.step_history(true)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.step_history(false)
    }

    fn step_history(&mut self, back: bool) -> Vec<Action> {
        if self.tool.capturing() {
            debug!(back, "history skipped during capture");
            return Vec::new();
        }
        let possible = if back { self.history.can_undo() } else { self.history.can_redo() };
        if !possible {
            return Vec::new();
        }
        let (mut actions, _) = self.run_tool(|tool, ctx| tool.exit(ctx));
        let result = if back { self.history.undo(&mut self.scene) } else { self.history.redo(&mut self.scene) };
        let (entered, _) = self.run_tool(|tool, ctx| tool.enter(ctx));
        actions.extend(entered);
        match result {
            Ok(_) => {
                self.scene.request_render();
                actions.push(Action::RenderNeeded);
            }
            Err(e) => {
                warn!(error = %e, back, "history restore failed");
                actions.push(toast(ToastLevel::Error, e.to_string()));
            }
        }
        actions
    }

    fn save_history(&mut self) -> Vec<Action> {
        if let Err(e) = self.history.save(&self.scene) {
            warn!(error = %e, "history save failed");
            return vec![toast(ToastLevel::Error, e.to_string())];
        }
        self.scene.request_render();
        vec![Action::RenderNeeded]
    }

    // --- Scene operations ---

    /// An object is being dragged by the host: put its bounds' top-left at
    /// `corner`, snapped when the object-drag rule applies. Returns the
    /// applied corner, or `None` for an unknown id.
    pub fn object_moving(
        &mut self,
        id: DrawableId,
        corner: Point,
        modifiers: Modifiers,
        kind: PointerKind,
    ) -> Option<Point> {
        let snapping = snap_active(SnapSite::ObjectDrag, &self.grid, modifiers, kind);
        let (grid, scale, viewport) = (self.grid, self.scale, self.viewport);
        let d = self.scene.get_mut(id)?;
        let applied = snap_object(d, corner, |p| if snapping { snap_to_grid(p, &grid, scale, &viewport) } else { p });
        self.scene.request_render();
        Some(applied)
    }

    /// A drag, resize or rotate finished: snapshot the scene.
    pub fn object_modified(&mut self) -> Vec<Action> {
        debug!("object modified");
        self.save_history()
    }

    /// Decode and install the floor-plan background (bottommost, locked),
    /// replacing any previous one, then snapshot. The first call seeds the
    /// undo floor.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::Codec`] if `bytes` is not a decodable image;
    /// the scene is untouched.
    pub fn load_background(&mut self, bytes: &[u8], left: f64, top: f64, scale: f64) -> Result<Vec<Action>, RasterError> {
        let image = RasterImage::from_encoded(bytes)?;
        debug!(width = image.width, height = image.height, left, top, scale, "background loaded");
        let (mut actions, _) = self.run_tool(|tool, ctx| tool.exit(ctx));
        self.scene.add(Drawable::background(image, left, top, scale));
        let (entered, _) = self.run_tool(|tool, ctx| tool.enter(ctx));
        actions.extend(entered);
        actions.push(Action::BackgroundChanged);
        actions.extend(self.save_history());
        Ok(actions)
    }

    /// Install (or replace) the title block overlay, kept topmost.
    pub fn set_title_block(&mut self, left: f64, top: f64, width: f64, height: f64) -> Vec<Action> {
        self.scene.add(Drawable::title_block(left, top, width, height));
        self.save_history()
    }

    /// Commit edited text back into a text label.
    pub fn set_text(&mut self, id: DrawableId, text: &str) -> Vec<Action> {
        match self.scene.get_mut(id).map(|d| &mut d.shape) {
            Some(Shape::Text { text: current, .. }) => *current = text.to_owned(),
            _ => return Vec::new(),
        }
        self.save_history()
    }

    /// Remove every drawable of one area measurement as a unit.
    pub fn remove_measurement(&mut self, measurement: Uuid) -> Vec<Action> {
        let ids: Vec<DrawableId> = self
            .scene
            .objects()
            .iter()
            .filter(|d| d.area_measurement() == Some(measurement))
            .map(|d| d.id)
            .collect();
        if ids.is_empty() {
            return Vec::new();
        }
        for id in ids {
            self.scene.remove(id);
        }
        debug!(%measurement, "measurement removed");
        self.save_history()
    }

    /// Delete the selected drawable (a whole measurement when it is part of
    /// one). The background cannot be deleted this way.
    pub fn delete_active(&mut self) -> Vec<Action> {
        let Some(d) = self.scene.active().and_then(|id| self.scene.get(id)) else {
            return Vec::new();
        };
        if d.is_background() {
            warn!("refusing to delete the background");
            return Vec::new();
        }
        if let Some(m) = d.area_measurement() {
            return self.remove_measurement(m);
        }
        let id = d.id;
        self.scene.remove(id);
        self.save_history()
    }

    // --- Settings ---

    /// Set the draw stroke color and record it in the color history.
    pub fn set_stroke_color(&mut self, color: &str) -> Vec<Action> {
        color.clone_into(&mut self.stroke_color);
        if self.colors.push(color) {
            return vec![Action::ColorHistoryChanged(self.colors.entries().to_vec())];
        }
        Vec::new()
    }

    pub fn set_grid(&mut self, visible: bool, size_mm: f64) -> Vec<Action> {
        self.grid = GridSettings { visible, size_mm: if size_mm.is_finite() && size_mm > 0.0 { size_mm } else { 0.0 } };
        self.scene.request_render();
        vec![Action::RenderNeeded]
    }

    /// Set the grid size from user input; unparsable input disables snapping.
    pub fn set_grid_size(&mut self, raw: &str) -> Vec<Action> {
        self.set_grid(self.grid.visible, parse_grid_size(raw))
    }

    /// Set or clear the scale directly (e.g. when reopening a project).
    /// Clearing it while in a measuring mode returns to `select`.
    pub fn set_scale(&mut self, scale: Option<f64>) -> Vec<Action> {
        let scale = scale.filter(|s| s.is_finite() && *s > 0.0);
        self.scale = scale;
        let mut actions = vec![Action::ScaleChanged(scale)];
        if scale.is_none() && self.mode.requires_scale() {
            actions.extend(self.transition(Mode::Select, ToolSetup::default()));
        }
        actions
    }

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.viewport.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    }

    /// Back to identity pan/zoom.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.viewport.reset();
        self.scene.request_render();
        vec![Action::ZoomChanged(self.viewport.zoom()), Action::RenderNeeded]
    }

    /// Zoom and center so the whole background fits the viewport.
    pub fn fit_background(&mut self) -> Vec<Action> {
        let Some(b) = self.scene.background().map(Drawable::bounds) else {
            warn!("background not found, nothing to fit");
            return Vec::new();
        };
        let (w, h) = (self.viewport_width, self.viewport_height);
        if b.is_empty() || w <= 0.0 || h <= 0.0 {
            return Vec::new();
        }
        let zoom = clamp_zoom((w / b.width).min(h / b.height));
        self.viewport.scale_x = zoom;
        self.viewport.scale_y = zoom;
        self.viewport.translate_x = (w - b.width * zoom) / 2.0 - b.left * zoom;
        self.viewport.translate_y = (h - b.height * zoom) / 2.0 - b.top * zoom;
        self.scene.request_render();
        vec![Action::ZoomChanged(zoom), Action::RenderNeeded]
    }

    // --- Queries ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Scale calibration in px/mm, if set.
    #[must_use]
    pub fn scale(&self) -> Option<f64> {
        self.scale
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.viewport.zoom()
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn prompts_mut(&mut self) -> &mut P {
        &mut self.prompts
    }

    #[must_use]
    pub fn history(&self) -> &SceneHistory {
        &self.history
    }

    #[must_use]
    pub fn color_history(&self) -> &[String] {
        self.colors.entries()
    }

    #[must_use]
    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    #[must_use]
    pub fn placeable(&self) -> Option<&Placeable> {
        self.placeable.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// A capture gesture is in flight in the active tool.
    #[must_use]
    pub fn capturing(&self) -> bool {
        self.tool.capturing()
    }

    /// Area measurements, distance annotations and placements in the scene.
    ///
    /// `symbols` counts everything that emitted [`Action::SymbolPlaced`]:
    /// symbols and free text labels (untagged text).
    #[must_use]
    pub fn counts(&self) -> MeasurementCounts {
        let mut counts = MeasurementCounts::default();
        for d in self.scene.objects().iter().filter(|d| !d.preview) {
            match (&d.tag, &d.shape) {
                (Some(MeasureTag::Area { .. }), Shape::Polygon { .. }) => counts.areas += 1,
                (Some(MeasureTag::Distance { .. }), _) => counts.distances += 1,
                (_, Shape::Symbol { .. }) | (None, Shape::Text { .. }) => counts.symbols += 1,
                _ => {}
            }
        }
        counts
    }
}
