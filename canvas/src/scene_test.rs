use image::{Rgba, RgbaImage};

use super::*;
use crate::doc::{Shape, Style};
use crate::raster::RasterImage;

fn raster() -> RasterImage {
    RasterImage::from_rgba(&RgbaImage::from_pixel(8, 8, Rgba([9, 9, 9, 255]))).unwrap()
}

fn rect(left: f64) -> Drawable {
    Drawable::new(Shape::Rect { width: 10.0, height: 10.0 }, left, 0.0, Style::default())
}

// =============================================================
// Stacking
// =============================================================

#[test]
fn new_store_is_empty_with_selection_on() {
    let s = SceneStore::new();
    assert!(s.is_empty());
    assert!(s.selection_enabled());
    assert!(s.active().is_none());
}

#[test]
fn add_keeps_insertion_order() {
    let mut s = SceneStore::new();
    let a = s.add(rect(0.0));
    let b = s.add(rect(1.0));
    let ids: Vec<_> = s.objects().iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn background_always_bottom() {
    let mut s = SceneStore::new();
    s.add(rect(0.0));
    let bg = s.add(Drawable::background(raster(), 0.0, 0.0, 1.0));
    assert_eq!(s.objects()[0].id, bg);
}

#[test]
fn second_background_replaces_first() {
    let mut s = SceneStore::new();
    s.add(Drawable::background(raster(), 0.0, 0.0, 1.0));
    let bg2 = s.add(Drawable::background(raster(), 5.0, 0.0, 1.0));
    assert_eq!(s.objects().iter().filter(|d| d.is_background()).count(), 1);
    assert_eq!(s.background().map(|d| d.id), Some(bg2));
}

#[test]
fn title_block_always_top() {
    let mut s = SceneStore::new();
    let tb = s.add(Drawable::title_block(0.0, 0.0, 50.0, 10.0));
    s.add(rect(0.0));
    s.add(rect(1.0));
    assert_eq!(s.objects().last().map(|d| d.id), Some(tb));
}

#[test]
fn re_adding_same_id_moves_not_duplicates() {
    let mut s = SceneStore::new();
    let d = rect(0.0);
    s.add(d.clone());
    s.add(rect(1.0));
    s.add(d.clone());
    assert_eq!(s.len(), 2);
    assert_eq!(s.objects()[1].id, d.id);
}

// =============================================================
// Remove / active
// =============================================================

#[test]
fn remove_clears_active() {
    let mut s = SceneStore::new();
    let id = s.add(rect(0.0));
    s.set_active(Some(id));
    assert_eq!(s.active(), Some(id));
    assert!(s.remove(id).is_some());
    assert!(s.active().is_none());
    assert!(s.remove(id).is_none());
}

#[test]
fn set_active_ignores_unknown_id() {
    let mut s = SceneStore::new();
    s.set_active(Some(uuid::Uuid::new_v4()));
    assert!(s.active().is_none());
}

#[test]
fn request_render_counts() {
    let mut s = SceneStore::new();
    s.request_render();
    s.request_render();
    assert_eq!(s.render_requests(), 2);
}

// =============================================================
// Serialize / restore
// =============================================================

#[test]
fn serialize_skips_previews() {
    let mut s = SceneStore::new();
    s.add(rect(0.0));
    s.add(rect(1.0).into_preview());
    let mut restored = SceneStore::new();
    restored.restore(&s.serialize().unwrap()).unwrap();
    assert_eq!(restored.len(), 1);
}

#[test]
fn restore_round_trips_objects_and_tags() {
    let mut s = SceneStore::new();
    s.add(Drawable::background(raster(), 3.0, 4.0, 0.5));
    let r = s.add(rect(7.0));
    let snap = s.serialize().unwrap();

    let mut other = SceneStore::new();
    other.add(rect(99.0));
    other.restore(&snap).unwrap();
    assert_eq!(other.len(), 2);
    let bg = other.background().unwrap();
    assert_eq!(bg.locked, Some(true));
    assert_eq!(bg.left, 3.0);
    assert!(other.get(r).is_some());
}

#[test]
fn restore_bad_json_leaves_scene() {
    let mut s = SceneStore::new();
    s.add(rect(0.0));
    assert!(matches!(s.restore("{nope"), Err(SceneError::Decode(_))));
    assert_eq!(s.len(), 1);
}

#[test]
fn restore_wrong_version_is_error() {
    let mut s = SceneStore::new();
    assert!(matches!(s.restore(r#"{"version": 9, "objects": []}"#), Err(SceneError::Version(9))));
}

#[test]
fn find_named_and_hit_test() {
    let mut s = SceneStore::new();
    s.add(Drawable::background(raster(), 0.0, 0.0, 10.0));
    let r = s.add(rect(0.0));
    assert!(s.find_named("background").is_some());
    assert_eq!(s.hit_test(Point::new(5.0, 5.0)), Some(r));
    // background is not interactive, so nothing is hit outside the rect
    assert_eq!(s.hit_test(Point::new(50.0, 50.0)), None);
}
