#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn grid(size_mm: f64) -> GridSettings {
    GridSettings { visible: true, size_mm }
}

// --- step_px ---

#[test]
fn step_is_half_a_cell() {
    // 100mm * 0.1 px/mm * zoom 1 = 10px cell -> 5px step
    assert_eq!(grid(100.0).step_px(Some(0.1), 1.0), Some(5.0));
}

#[test]
fn step_scales_with_zoom() {
    assert_eq!(grid(100.0).step_px(Some(0.1), 2.0), Some(10.0));
}

#[test]
fn step_none_without_scale() {
    assert_eq!(grid(100.0).step_px(None, 1.0), None);
}

#[test]
fn step_none_for_zero_grid() {
    assert_eq!(grid(0.0).step_px(Some(1.0), 1.0), None);
}

// --- parse_grid_size ---

#[test]
fn parse_grid_size_valid() {
    assert_eq!(parse_grid_size(" 250 "), 250.0);
    assert_eq!(parse_grid_size("12.5"), 12.5);
}

#[test]
fn parse_grid_size_invalid_is_zero() {
    assert_eq!(parse_grid_size("abc"), 0.0);
    assert_eq!(parse_grid_size("-5"), 0.0);
    assert_eq!(parse_grid_size(""), 0.0);
    assert_eq!(parse_grid_size("inf"), 0.0);
}

// --- snap_to_grid ---

#[test]
fn snap_rounds_to_nearest_step() {
    let vp = Viewport::default();
    let p = snap_to_grid(Point::new(12.4, 17.6), &grid(100.0), Some(0.1), &vp);
    assert!(approx_eq(p.x, 10.0));
    assert!(approx_eq(p.y, 20.0));
}

#[test]
fn snap_is_noop_without_scale() {
    let vp = Viewport::default();
    let p = Point::new(12.4, 17.6);
    assert_eq!(snap_to_grid(p, &grid(100.0), None, &vp), p);
}

#[test]
fn snap_is_noop_for_invalid_grid() {
    let vp = Viewport::default();
    let p = Point::new(3.3, 4.4);
    assert_eq!(snap_to_grid(p, &grid(parse_grid_size("nope")), Some(1.0), &vp), p);
}

#[test]
fn snap_works_in_screen_space() {
    // zoom 2, pan 3: world 4.0 -> screen 11.0; step = 100*0.1*2/2 = 10 -> 10 -> world 3.5
    let vp = Viewport { translate_x: 3.0, translate_y: 3.0, scale_x: 2.0, scale_y: 2.0, dpr: 1.0 };
    let p = snap_to_grid(Point::new(4.0, 4.0), &grid(100.0), Some(0.1), &vp);
    assert!(approx_eq(p.x, 3.5));
    assert!(approx_eq(p.y, 3.5));
}

#[test]
fn snap_is_idempotent() {
    let vp = Viewport { translate_x: 17.3, translate_y: -4.1, scale_x: 1.7, scale_y: 1.7, dpr: 1.0 };
    let g = grid(300.0);
    for &(x, y) in &[(0.0, 0.0), (13.37, -88.2), (1234.5, 678.9), (-55.5, 55.5)] {
        let once = snap_to_grid(Point::new(x, y), &g, Some(0.37), &vp);
        let twice = snap_to_grid(once, &g, Some(0.37), &vp);
        assert!(approx_eq(once.x, twice.x), "x drifted at ({x}, {y})");
        assert!(approx_eq(once.y, twice.y), "y drifted at ({x}, {y})");
    }
}

// --- snap_active ---

#[test]
fn touch_snaps_when_grid_visible() {
    let g = grid(100.0);
    for site in [SnapSite::ObjectDrag, SnapSite::DistanceEndpoint, SnapSite::SymbolPlacement] {
        assert!(snap_active(site, &g, Modifiers::default(), PointerKind::Touch));
    }
}

#[test]
fn touch_does_not_snap_when_grid_hidden() {
    let g = GridSettings { visible: false, size_mm: 100.0 };
    assert!(!snap_active(SnapSite::SymbolPlacement, &g, Modifiers::default(), PointerKind::Touch));
}

#[test]
fn mouse_needs_ctrl_or_meta_for_placement() {
    let g = grid(100.0);
    assert!(!snap_active(SnapSite::SymbolPlacement, &g, Modifiers::default(), PointerKind::Mouse));
    let ctrl = Modifiers { ctrl: true, ..Default::default() };
    let meta = Modifiers { meta: true, ..Default::default() };
    assert!(snap_active(SnapSite::SymbolPlacement, &g, ctrl, PointerKind::Mouse));
    assert!(snap_active(SnapSite::ObjectDrag, &g, meta, PointerKind::Mouse));
}

#[test]
fn distance_needs_shift_and_visible_grid() {
    let shift = Modifiers { shift: true, ..Default::default() };
    assert!(snap_active(SnapSite::DistanceEndpoint, &grid(100.0), shift, PointerKind::Mouse));
    let hidden = GridSettings { visible: false, size_mm: 100.0 };
    assert!(!snap_active(SnapSite::DistanceEndpoint, &hidden, shift, PointerKind::Mouse));
    let ctrl = Modifiers { ctrl: true, ..Default::default() };
    assert!(!snap_active(SnapSite::DistanceEndpoint, &grid(100.0), ctrl, PointerKind::Mouse));
}
