use image::{Rgba, RgbaImage};

use super::*;
use crate::doc::{Drawable, Shape, Style};
use crate::raster::RasterImage;
use crate::scene::SceneStore;

fn symbol(left: f64) -> Drawable {
    Drawable::new(Shape::Symbol { symbol: "door".into(), width: 10.0, height: 10.0 }, left, 0.0, Style::default())
}

fn symbol_count(scene: &SceneStore) -> usize {
    scene.objects().iter().filter(|d| matches!(d.shape, Shape::Symbol { .. })).count()
}

fn background() -> Drawable {
    let img = RasterImage::from_rgba(&RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))).unwrap();
    Drawable::background(img, 0.0, 0.0, 1.0)
}

/// Scene with a seed snapshot followed by `n` committed symbols.
fn seeded_with_commits(n: usize) -> (SceneStore, SceneHistory) {
    let mut scene = SceneStore::new();
    let mut history = SceneHistory::new(None);
    history.save(&scene).unwrap();
    for i in 0..n {
        #[allow(clippy::cast_precision_loss)]
        scene.add(symbol(i as f64 * 20.0));
        history.save(&scene).unwrap();
    }
    (scene, history)
}

// =============================================================
// Floors and no-ops
// =============================================================

#[test]
fn undo_on_empty_history_is_noop() {
    let mut scene = SceneStore::new();
    let mut history = SceneHistory::default();
    assert!(!history.undo(&mut scene).unwrap());
}

#[test]
fn undo_at_seed_is_noop() {
    let (mut scene, mut history) = seeded_with_commits(0);
    assert!(!history.can_undo());
    assert!(!history.undo(&mut scene).unwrap());
    assert_eq!(history.undo_depth(), 1);
}

#[test]
fn redo_with_empty_stack_is_noop() {
    let (mut scene, mut history) = seeded_with_commits(2);
    assert!(!history.redo(&mut scene).unwrap());
    assert_eq!(symbol_count(&scene), 2);
}

// =============================================================
// Undo / redo
// =============================================================

#[test]
fn undo_restores_previous_snapshot() {
    let (mut scene, mut history) = seeded_with_commits(2);
    assert!(history.undo(&mut scene).unwrap());
    assert_eq!(symbol_count(&scene), 1);
    assert_eq!(history.redo_depth(), 1);
}

#[test]
fn undo_then_redo_is_identity() {
    let (mut scene, mut history) = seeded_with_commits(3);
    let before = scene.serialize().unwrap();
    for _ in 0..3 {
        history.undo(&mut scene).unwrap();
    }
    assert_eq!(symbol_count(&scene), 0);
    for _ in 0..3 {
        history.redo(&mut scene).unwrap();
    }
    assert_eq!(scene.serialize().unwrap(), before);
}

#[test]
fn save_clears_redo() {
    let (mut scene, mut history) = seeded_with_commits(2);
    history.undo(&mut scene).unwrap();
    assert!(history.can_redo());
    scene.add(symbol(99.0));
    history.save(&scene).unwrap();
    assert!(!history.can_redo());
}

#[test]
fn three_commits_undo_twice_redo_once() {
    let mut scene = SceneStore::new();
    let mut history = SceneHistory::new(None);
    for i in 0..3 {
        scene.add(symbol(f64::from(i) * 20.0));
        history.save(&scene).unwrap();
    }
    history.undo(&mut scene).unwrap();
    history.undo(&mut scene).unwrap();
    history.redo(&mut scene).unwrap();
    assert_eq!(symbol_count(&scene), 2);
}

#[test]
fn failed_restore_rolls_back_stacks() {
    let (mut scene, mut history) = seeded_with_commits(1);
    history.undo.insert(0, "{broken".into());
    history.undo.remove(1);
    // stack is now [broken, current]; undo must fail and keep both
    assert!(history.undo(&mut scene).is_err());
    assert_eq!(history.undo_depth(), 2);
    assert_eq!(history.redo_depth(), 0);
    assert_eq!(symbol_count(&scene), 1);
}

// =============================================================
// Capacity
// =============================================================

#[test]
fn capacity_evicts_oldest() {
    let mut scene = SceneStore::new();
    let mut history = SceneHistory::new(Some(3));
    for i in 0..5 {
        scene.add(symbol(f64::from(i)));
        history.save(&scene).unwrap();
    }
    assert_eq!(history.undo_depth(), 3);
    history.undo(&mut scene).unwrap();
    history.undo(&mut scene).unwrap();
    assert!(!history.undo(&mut scene).unwrap());
    // oldest surviving snapshot holds three symbols
    assert_eq!(symbol_count(&scene), 3);
}

#[test]
fn capacity_of_one_keeps_current() {
    let mut scene = SceneStore::new();
    let mut history = SceneHistory::new(Some(1));
    scene.add(symbol(0.0));
    history.save(&scene).unwrap();
    scene.add(symbol(1.0));
    history.save(&scene).unwrap();
    assert_eq!(history.undo_depth(), 1);
    assert!(!history.can_undo());
}

// =============================================================
// Background identity
// =============================================================

#[test]
fn restore_relocks_background() {
    let mut scene = SceneStore::new();
    let mut history = SceneHistory::new(None);
    scene.add(background());
    history.save(&scene).unwrap();
    scene.add(symbol(0.0));
    history.save(&scene).unwrap();

    history.undo(&mut scene).unwrap();
    let bg = scene.background().unwrap();
    assert_eq!(bg.locked, Some(true));
    assert!(!bg.interactive);
}

#[test]
fn missing_lock_flag_defaults_to_locked() {
    let mut scene = SceneStore::new();
    let mut bg = background();
    bg.locked = None;
    bg.interactive = true;
    scene.add(bg);
    assert!(sync_background(&mut scene));
    let bg = scene.background().unwrap();
    assert_eq!(bg.locked, Some(true));
    assert!(!bg.interactive);
}

#[test]
fn unlocked_background_becomes_interactive() {
    let mut scene = SceneStore::new();
    let mut bg = background();
    bg.locked = Some(false);
    scene.add(bg);
    sync_background(&mut scene);
    assert!(scene.background().unwrap().interactive);
}

#[test]
fn sync_without_background_reports_missing() {
    let mut scene = SceneStore::new();
    scene.add(symbol(0.0));
    assert!(!sync_background(&mut scene));
}
