#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{MeasureTag, Shape, Style};
use crate::prompt::ScriptedPrompts;
use crate::scene::SceneStore;

/// Owns everything a [`ToolCtx`] borrows.
struct Fixture {
    scene: SceneStore,
    viewport: Viewport,
    grid: GridSettings,
    scale: Option<f64>,
    config: CanvasConfig,
    prompts: ScriptedPrompts,
    history: SceneHistory,
    colors: ColorHistory,
}

impl Fixture {
    fn new(scale: Option<f64>) -> Self {
        Self {
            scene: SceneStore::new(),
            viewport: Viewport::default(),
            grid: GridSettings::default(),
            scale,
            config: CanvasConfig::default(),
            prompts: ScriptedPrompts::new(),
            history: SceneHistory::default(),
            colors: ColorHistory::new(10),
        }
    }

    fn ctx(&mut self) -> ToolCtx<'_> {
        ToolCtx {
            scene: &mut self.scene,
            viewport: &self.viewport,
            grid: &self.grid,
            scale: &mut self.scale,
            config: &self.config,
            prompts: &mut self.prompts,
            history: &mut self.history,
            colors: &mut self.colors,
            stroke_color: "#000000",
            actions: Vec::new(),
            next_mode: None,
        }
    }

    /// Primary press and release at a screen point; returns the actions.
    fn click(&mut self, tool: &mut dyn ToolHandler, x: f64, y: f64) -> Vec<Action> {
        let ev = PointerEvent::at(x, y);
        let mut ctx = self.ctx();
        tool.pointer_down(&mut ctx, &ev);
        tool.pointer_up(&mut ctx, &ev);
        ctx.actions
    }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// for_mode
// =============================================================

#[test]
fn for_mode_installs_matching_handler() {
    for mode in Mode::ALL {
        assert_eq!(for_mode(mode, ToolSetup::default()).mode(), mode);
    }
}

#[test]
fn fresh_handlers_are_not_capturing() {
    for mode in Mode::ALL {
        assert!(!for_mode(mode, ToolSetup::default()).capturing(), "{mode}");
    }
}

#[test]
fn draw_handler_takes_primitive_from_setup() {
    let mut fx = Fixture::new(None);
    let setup = ToolSetup { placeable: Some(Placeable::Draw(DrawPrimitive::Line)), ..ToolSetup::default() };
    let mut tool = for_mode(Mode::Draw, setup);
    let mut ctx = fx.ctx();
    tool.pointer_down(&mut ctx, &PointerEvent::at(0.0, 0.0));
    tool.pointer_up(&mut ctx, &PointerEvent::at(30.0, 0.0));
    drop(ctx);
    assert!(matches!(fx.scene.objects()[0].shape, Shape::Line { .. }));
}

// =============================================================
// ToolCtx helpers
// =============================================================

#[test]
fn world_and_screen_len_follow_zoom() {
    let mut fx = Fixture::new(None);
    fx.viewport.zoom_to_point(pt(0.0, 0.0), 2.0);
    let ctx = fx.ctx();
    assert_eq!(ctx.world(pt(20.0, 40.0)), pt(10.0, 20.0));
    assert_eq!(ctx.screen_len(4.0), 2.0);
}

#[test]
fn fail_picks_level_by_error() {
    let mut fx = Fixture::new(None);
    let mut ctx = fx.ctx();
    ctx.fail(&ToolError::NoScale);
    ctx.fail(&ToolError::InvalidDistance("abc".into()));
    ctx.fail(&ToolError::ZeroLength);
    ctx.fail(&ToolError::Raster(RasterError::NoBackground));
    let levels: Vec<ToastLevel> = ctx
        .actions
        .iter()
        .filter_map(|a| match a {
            Action::Toast { level, .. } => Some(*level),
            _ => None,
        })
        .collect();
    assert_eq!(levels, vec![ToastLevel::Warning, ToastLevel::Warning, ToastLevel::Error, ToastLevel::Error]);
}

#[test]
fn show_preview_replaces_previous() {
    let mut fx = Fixture::new(None);
    let mut slot = None;
    let mut ctx = fx.ctx();
    let rect = |w: f64| Drawable::new(Shape::Rect { width: w, height: w }, 0.0, 0.0, Style::default());
    ctx.show_preview(&mut slot, rect(10.0));
    ctx.show_preview(&mut slot, rect(20.0));
    assert_eq!(ctx.scene.objects().len(), 1);
    let d = ctx.preview_mut(slot).unwrap();
    assert!(d.preview && !d.interactive);
    assert_eq!(d.shape, Shape::Rect { width: 20.0, height: 20.0 });

    ctx.clear_preview(&mut slot);
    assert!(slot.is_none());
    assert!(ctx.scene.objects().is_empty());
}

#[test]
fn commit_saves_history_and_renders() {
    let mut fx = Fixture::new(None);
    let mut ctx = fx.ctx();
    ctx.commit();
    assert_eq!(ctx.actions, vec![Action::RenderNeeded]);
    drop(ctx);
    assert_eq!(fx.history.undo_depth(), 1);
    assert_eq!(fx.scene.render_requests(), 1);
}

#[test]
fn switch_mode_is_deferred() {
    let mut fx = Fixture::new(None);
    let mut ctx = fx.ctx();
    ctx.switch_mode(Mode::Select);
    assert_eq!(ctx.next_mode, Some(Mode::Select));
}

// =============================================================
// snap_object
// =============================================================

#[test]
fn snap_object_places_box_corner() {
    let mut d = Drawable::new(Shape::Rect { width: 10.0, height: 10.0 }, 3.0, 4.0, Style::default());
    let applied = snap_object(&mut d, pt(12.0, 27.0), |p| pt((p.x / 10.0).round() * 10.0, (p.y / 10.0).round() * 10.0));
    assert_eq!(applied, pt(10.0, 30.0));
    assert_eq!((d.left, d.top), (10.0, 30.0));
}

#[test]
fn snap_object_offsets_point_shapes() {
    let points = vec![pt(5.0, 5.0), pt(25.0, 5.0), pt(15.0, 20.0)];
    let mut d = Drawable::new(Shape::Polygon { points }, 0.0, 0.0, Style::default());
    snap_object(&mut d, pt(40.0, 50.0), |p| p);
    let b = d.bounds();
    assert_eq!((b.left, b.top), (40.0, 50.0));
    assert_eq!((d.left, d.top), (35.0, 45.0));
}

// =============================================================
// Handler edge cases
// =============================================================

#[test]
fn area_close_without_scale_warns_and_adds_nothing() {
    let mut fx = Fixture::new(None);
    let mut tool = for_mode(Mode::MeasureArea, ToolSetup::default());
    let mut actions = Vec::new();
    for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (2.0, 2.0)] {
        actions.extend(fx.click(tool.as_mut(), x, y));
    }
    assert!(actions.iter().any(|a| matches!(a, Action::Toast { level: ToastLevel::Warning, .. })));
    assert!(fx.scene.objects().is_empty());
    assert!(!tool.capturing());
    assert_eq!(fx.history.undo_depth(), 0);
}

#[test]
fn volume_handler_uses_setup_height() {
    let mut fx = Fixture::new(Some(0.1));
    let setup = ToolSetup { height_mm: Some(3000.0), ..ToolSetup::default() };
    let mut tool = for_mode(Mode::MeasureVolume, setup);
    for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (1.0, 1.0)] {
        fx.click(tool.as_mut(), x, y);
    }
    let volume = fx.scene.objects().iter().find_map(|d| match d.tag {
        Some(MeasureTag::Area { volume_m3, .. }) => volume_m3,
        _ => None,
    });
    assert!((volume.unwrap() - 3.0).abs() < 1e-9);
}

#[test]
fn calibrate_capture_ends_on_exit() {
    let mut fx = Fixture::new(None);
    let mut tool = for_mode(Mode::Measure, ToolSetup::default());
    fx.click(tool.as_mut(), 0.0, 0.0);
    assert!(tool.capturing());
    assert_eq!(fx.scene.objects().len(), 1);
    tool.exit(&mut fx.ctx());
    assert!(!tool.capturing());
    assert!(fx.scene.objects().is_empty());
}

#[test]
fn crop_empty_region_never_prompts() {
    let mut fx = Fixture::new(None);
    let mut tool = for_mode(Mode::Crop, ToolSetup::default());
    fx.click(tool.as_mut(), 5.0, 5.0);
    fx.click(tool.as_mut(), 5.0, 40.0);
    assert!(fx.prompts.asked.is_empty());
    assert!(!tool.capturing());
}

#[test]
fn place_without_placeable_does_nothing() {
    let mut fx = Fixture::new(None);
    let mut tool = for_mode(Mode::PlaceSymbol, ToolSetup::default());
    let mut ctx = fx.ctx();
    tool.pointer_move(&mut ctx, &PointerEvent::at(10.0, 10.0));
    tool.pointer_down(&mut ctx, &PointerEvent::at(10.0, 10.0));
    assert!(ctx.actions.is_empty());
    assert!(ctx.scene.objects().is_empty());
}

#[test]
fn idle_handler_ignores_pointer() {
    let mut fx = Fixture::new(None);
    let mut tool = for_mode(Mode::None, ToolSetup::default());
    assert!(fx.click(tool.as_mut(), 0.0, 0.0).is_empty());
}
