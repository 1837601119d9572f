#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn viewport(tx: f64, ty: f64, zoom: f64) -> Viewport {
    Viewport { translate_x: tx, translate_y: ty, scale_x: zoom, scale_y: zoom, dpr: 1.0 }
}

// --- Point ---

#[test]
fn point_distance_is_euclidean() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_midpoint() {
    let m = Point::new(0.0, 10.0).midpoint(Point::new(20.0, 30.0));
    assert!(point_approx_eq(m, Point::new(10.0, 20.0)));
}

// --- Defaults ---

#[test]
fn viewport_default_is_identity() {
    let vp = Viewport::default();
    assert_eq!(vp.translate_x, 0.0);
    assert_eq!(vp.translate_y, 0.0);
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.dpr, 1.0);
}

// --- screen_to_world ---

#[test]
fn screen_to_world_identity() {
    let vp = Viewport::default();
    assert!(point_approx_eq(vp.screen_to_world(Point::new(50.0, 75.0)), Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_world_with_zoom() {
    let vp = viewport(0.0, 0.0, 4.0);
    let world = vp.screen_to_world(Point::new(40.0, 80.0));
    assert!(point_approx_eq(world, Point::new(10.0, 20.0)));
}

#[test]
fn screen_to_world_with_pan_and_zoom() {
    let vp = viewport(20.0, 10.0, 2.0);
    assert!(point_approx_eq(vp.screen_to_world(Point::new(20.0, 10.0)), Point::new(0.0, 0.0)));
}

#[test]
fn screen_to_world_non_uniform_scale() {
    let vp = Viewport { translate_x: 0.0, translate_y: 0.0, scale_x: 2.0, scale_y: 4.0, dpr: 1.0 };
    assert!(point_approx_eq(vp.screen_to_world(Point::new(8.0, 8.0)), Point::new(4.0, 2.0)));
}

// --- world_to_screen ---

#[test]
fn world_to_screen_with_pan_and_zoom() {
    let vp = viewport(20.0, 10.0, 3.0);
    assert!(point_approx_eq(vp.world_to_screen(Point::new(5.0, 5.0)), Point::new(35.0, 25.0)));
}

#[test]
fn round_trip_fractional_zoom() {
    let vp = viewport(13.7, -42.3, 0.75);
    let world = Point::new(333.3, -999.9);
    assert!(point_approx_eq(vp.screen_to_world(vp.world_to_screen(world)), world));
}

#[test]
fn screen_dist_to_world_ignores_pan() {
    let vp = viewport(999.0, -999.0, 4.0);
    assert!(approx_eq(vp.screen_dist_to_world(8.0), 2.0));
}

#[test]
fn screen_to_device_scales_by_dpr() {
    let vp = Viewport { dpr: 2.0, ..Viewport::default() };
    assert!(point_approx_eq(vp.screen_to_device(Point::new(10.0, 5.0)), Point::new(20.0, 10.0)));
}

// --- zoom_to_point ---

#[test]
fn zoom_to_point_keeps_anchor_fixed() {
    let mut vp = viewport(30.0, -12.0, 1.5);
    let cursor = Point::new(200.0, 150.0);
    let before = vp.screen_to_world(cursor);
    vp.zoom_to_point(cursor, 3.0);
    assert!(approx_eq(vp.zoom(), 3.0));
    assert!(point_approx_eq(vp.screen_to_world(cursor), before));
}

#[test]
fn zoom_to_point_clamps_upper() {
    let mut vp = Viewport::default();
    vp.zoom_to_point(Point::new(0.0, 0.0), 50.0);
    assert_eq!(vp.zoom(), 20.0);
    assert_eq!(vp.scale_y, 20.0);
}

#[test]
fn zoom_to_point_clamps_lower() {
    let mut vp = Viewport::default();
    vp.zoom_to_point(Point::new(0.0, 0.0), 0.001);
    assert_eq!(vp.zoom(), 0.1);
}

#[test]
fn clamp_zoom_non_finite_is_one() {
    assert_eq!(clamp_zoom(f64::NAN), 1.0);
    assert_eq!(clamp_zoom(f64::INFINITY), 1.0);
}

// --- pan / reset ---

#[test]
fn pan_by_moves_translation_only() {
    let mut vp = viewport(5.0, 5.0, 2.0);
    vp.pan_by(10.0, -3.0);
    assert_eq!(vp.translate_x, 15.0);
    assert_eq!(vp.translate_y, 2.0);
    assert_eq!(vp.zoom(), 2.0);
}

#[test]
fn reset_keeps_dpr() {
    let mut vp = Viewport { translate_x: 9.0, translate_y: 9.0, scale_x: 3.0, scale_y: 3.0, dpr: 2.0 };
    vp.reset();
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.translate_x, 0.0);
    assert_eq!(vp.dpr, 2.0);
}
